//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the registry and the simulation. The core never reads environment variables
//! itself; binaries read them and hand the raw values to the parse helpers below.

use crate::constants::{
    DEFAULT_HOSPITALS, FINAL_STATE_FILENAME, INITIAL_STATE_FILENAME, SIMULATION_STATE_PREFIX,
};
use crate::{WardError, WardResult};
use bedtrack_types::HospitalName;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A hospital in the roster: its lookup name and fixed bed capacity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HospitalSpec {
    pub name: HospitalName,
    pub total_beds: u32,
}

impl HospitalSpec {
    pub fn new(name: &str, total_beds: u32) -> WardResult<Self> {
        Ok(Self {
            name: HospitalName::new(name)?,
            total_beds,
        })
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    hospitals: Vec<HospitalSpec>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::EmptyRoster`] for an empty roster and
    /// [`WardError::DuplicateHospital`] if two entries share a name.
    pub fn new(data_dir: PathBuf, hospitals: Vec<HospitalSpec>) -> WardResult<Self> {
        validate_roster(&hospitals)?;
        Ok(Self {
            data_dir,
            hospitals,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn hospitals(&self) -> &[HospitalSpec] {
        &self.hospitals
    }

    pub fn initial_state_path(&self) -> PathBuf {
        self.data_dir.join(INITIAL_STATE_FILENAME)
    }

    pub fn final_state_path(&self) -> PathBuf {
        self.data_dir.join(FINAL_STATE_FILENAME)
    }

    /// Path of the `ordinal`-th periodic simulation snapshot (1-based, zero-padded to two digits).
    pub fn simulation_state_path(&self, ordinal: usize) -> PathBuf {
        self.data_dir
            .join(format!("{SIMULATION_STATE_PREFIX}{ordinal:02}.csv"))
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(crate::constants::DEFAULT_DATA_DIR),
            hospitals: default_roster(),
        }
    }
}

/// The reference three-hospital roster.
pub fn default_roster() -> Vec<HospitalSpec> {
    DEFAULT_HOSPITALS
        .iter()
        .filter_map(|(name, beds)| HospitalSpec::new(name, *beds).ok())
        .collect()
}

pub(crate) fn validate_roster(hospitals: &[HospitalSpec]) -> WardResult<()> {
    if hospitals.is_empty() {
        return Err(WardError::EmptyRoster);
    }
    let mut seen = HashSet::new();
    for spec in hospitals {
        if !seen.insert(spec.name.as_str()) {
            return Err(WardError::DuplicateHospital(spec.name.display_name()));
        }
    }
    Ok(())
}

/// Parse a hospital roster of the form `name:beds,name:beds,...`.
///
/// If `value` is `None` or empty/whitespace, returns [`default_roster`].
pub fn hospital_roster_from_env_value(value: Option<String>) -> WardResult<Vec<HospitalSpec>> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(value) = value else {
        return Ok(default_roster());
    };

    let mut roster = Vec::new();
    for entry in value.split(',') {
        let (name, beds) = entry.split_once(':').ok_or_else(|| {
            WardError::InvalidInput(format!(
                "hospital entry '{}' must have the form name:beds",
                entry.trim()
            ))
        })?;
        let beds = beds.trim().parse::<u32>().map_err(|_| {
            WardError::InvalidInput(format!(
                "bed count for hospital '{}' must be a non-negative integer",
                name.trim()
            ))
        })?;
        roster.push(HospitalSpec::new(name, beds)?);
    }

    validate_roster(&roster)?;
    Ok(roster)
}

/// Parse an optional RNG seed. Empty or missing values mean "seed from entropy".
pub fn seed_from_env_value(value: Option<String>) -> WardResult<Option<u64>> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| WardError::InvalidInput(format!("seed must be an unsigned integer, got '{v}'")))
        })
        .transpose()
}

/// Parse the number of simulated days, falling back to `default` when unset.
pub fn days_from_env_value(value: Option<String>, default: u32) -> WardResult<u32> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    match value {
        None => Ok(default),
        Some(v) => v
            .parse::<u32>()
            .map_err(|_| WardError::InvalidInput(format!("days must be an unsigned integer, got '{v}'"))),
    }
}
