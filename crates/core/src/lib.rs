//! # Bedtrack Core
//!
//! Core business logic for the bedtrack hospital bed tracker.
//!
//! This crate contains the admission engine and everything that drives it:
//! - Hospitals, patients and the [`Registry`] that keeps bed counts and identifiers consistent
//! - CSV snapshot files (load, save, and the periodic simulation states)
//! - The length-of-stay policy and the day-by-day admission simulation
//! - A textual report over a series of snapshots
//!
//! **No user-interface concerns**: prompts, argument parsing and subscriber setup belong in
//! `bedtrack-cli` and the `bedtrack-run` binary.

pub mod config;
pub mod constants;
pub mod error;
pub mod hospital;
pub mod patient;
pub mod registry;
pub mod report;
pub mod simulation;
pub mod snapshot;
pub mod stay;

pub use config::{CoreConfig, HospitalSpec};
pub use error::{WardError, WardResult};
pub use hospital::Hospital;
pub use patient::{Patient, PatientInfo};
pub use registry::{Registry, StatusChange};
pub use report::{build_report, render_report, HospitalTally, SnapshotTally};
pub use simulation::{AdmissionSchedule, Simulation, SimulationConfig, SimulationSummary};
pub use snapshot::{
    load_snapshot, read_snapshot, save_registry, write_snapshot, LoadOutcome,
};
pub use stay::{PolicyOutcome, StayTracker};

pub use bedtrack_patient_id::PatientId;
pub use bedtrack_types::{HospitalName, Severity};
