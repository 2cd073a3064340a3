//! Patient severity status.
//!
//! Severity is a closed scale from 0 (ready for discharge) to 3 (critical). On disk and
//! at the prompt it is written as a single digit; inside the core it is always this enum.

use std::fmt;
use std::str::FromStr;

/// Errors raised when converting raw values into a [`Severity`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeverityError {
    #[error("severity must be 0, 1, 2 or 3, got {0}")]
    OutOfRange(u8),
    #[error("severity must be one of \"0\", \"1\", \"2\" or \"3\", got '{0}'")]
    InvalidText(String),
}

/// Severity status of an admitted patient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Severity {
    /// Recovered; the only status from which a patient may be discharged.
    Stable = 0,
    Mild = 1,
    Serious = 2,
    /// Critical patients cannot be transferred.
    Critical = 3,
}

impl Severity {
    /// All statuses in ascending order.
    pub const ALL: [Severity; 4] = [
        Severity::Stable,
        Severity::Mild,
        Severity::Serious,
        Severity::Critical,
    ];

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn can_discharge(self) -> bool {
        self == Severity::Stable
    }

    pub fn can_transfer(self) -> bool {
        self < Severity::Critical
    }
}

impl TryFrom<u8> for Severity {
    type Error = SeverityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Severity::Stable),
            1 => Ok(Severity::Mild),
            2 => Ok(Severity::Serious),
            3 => Ok(Severity::Critical),
            other => Err(SeverityError::OutOfRange(other)),
        }
    }
}

impl From<Severity> for u8 {
    fn from(value: Severity) -> Self {
        value.level()
    }
}

impl FromStr for Severity {
    type Err = SeverityError;

    /// Parses exactly one of `"0"`, `"1"`, `"2"`, `"3"` (surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Severity::Stable),
            "1" => Ok(Severity::Mild),
            "2" => Ok(Severity::Serious),
            "3" => Ok(Severity::Critical),
            other => Err(SeverityError::InvalidText(other.to_string())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}
