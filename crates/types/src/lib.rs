//! Validated primitive types shared across the bedtrack crates.
//!
//! The core works with these types at its boundary so that text parsing
//! (severity digits, `"true"`/`"false"` covid flags, hospital names) happens
//! once, at the edge, and never inside the admission logic.

mod covid;
mod hospital_name;
mod severity;

pub use covid::{format_covid_flag, parse_covid_flag, CovidFlagError};
pub use hospital_name::{HospitalName, TextError};
pub use severity::{Severity, SeverityError};
