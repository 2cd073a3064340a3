//! Constants used throughout the bedtrack core crate.

/// Reference hospital roster: `(name, total beds)` in enumeration order.
pub const DEFAULT_HOSPITALS: &[(&str, u32)] = &[("kingston", 10), ("hamilton", 13), ("toronto", 20)];

/// Default directory for snapshot files when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = ".";

/// Snapshot loaded by the interactive tool at startup.
pub const INITIAL_STATE_FILENAME: &str = "initial_hospital_state.csv";

/// Snapshot written by the interactive tool after every action.
pub const FINAL_STATE_FILENAME: &str = "final_hospital_state.csv";

/// Prefix of the periodic simulation snapshots (`hospital_state_01.csv`, ...).
pub const SIMULATION_STATE_PREFIX: &str = "hospital_state_";

/// Header row of every snapshot file.
pub const SNAPSHOT_HEADER: [&str; 5] = ["", "Patient_ID", "Hospital", "Status", "Covid_Positive"];

/// Random draws attempted before falling back to a sequential scan of the id space.
pub const MAX_RANDOM_ID_ATTEMPTS: usize = 1_000;
