//! Snapshot files.
//!
//! A snapshot is a flat CSV listing every admitted patient:
//!
//! ```text
//! ,Patient_ID,Hospital,Status,Covid_Positive
//! 0,042b,kingston,2,false
//! 1,917Q,toronto,3,true
//! ```
//!
//! The first column is a fresh 0-based row index assigned at save time and ignored on load.
//! Rows are written in roster order, then admission order within each hospital. Columns are
//! read by position, so files with a differently spelled header still load.
//!
//! Saves are whole-file overwrites: the CSV is rendered in memory and written in one call.

use crate::constants::SNAPSHOT_HEADER;
use crate::patient::PatientInfo;
use crate::registry::Registry;
use crate::{WardError, WardResult};
use bedtrack_patient_id::PatientId;
use bedtrack_types::{format_covid_flag, parse_covid_flag, HospitalName, Severity};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Wire row. Everything is text so that parse failures can name the offending row.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct SnapshotRow {
    index: String,
    patient_id: String,
    hospital: String,
    status: String,
    covid_positive: String,
}

impl SnapshotRow {
    fn from_info(index: usize, info: &PatientInfo) -> Self {
        Self {
            index: index.to_string(),
            patient_id: info.id.to_string(),
            hospital: info.hospital_name.to_string(),
            status: info.severity.to_string(),
            covid_positive: format_covid_flag(info.covid_positive).to_string(),
        }
    }

    fn into_info(self, row: usize) -> WardResult<PatientInfo> {
        let invalid = |reason: String| WardError::InvalidSnapshotRow { row, reason };
        Ok(PatientInfo {
            id: PatientId::parse(&self.patient_id).map_err(|e| invalid(e.to_string()))?,
            hospital_name: HospitalName::new(&self.hospital)
                .map_err(|_| invalid("hospital name is empty".into()))?,
            severity: self
                .status
                .parse::<Severity>()
                .map_err(|e| invalid(e.to_string()))?,
            covid_positive: parse_covid_flag(&self.covid_positive)
                .map_err(|e| invalid(e.to_string()))?,
        })
    }
}

/// What [`load_snapshot`] found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file does not exist; the registry was left untouched.
    Missing,
    /// The file was read and this many patients were restored.
    Loaded(usize),
}

/// Renders patient records as snapshot CSV.
pub fn render_snapshot(records: &[PatientInfo]) -> WardResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(SNAPSHOT_HEADER)
        .map_err(WardError::SnapshotWrite)?;
    for (index, info) in records.iter().enumerate() {
        writer
            .serialize(SnapshotRow::from_info(index, info))
            .map_err(WardError::SnapshotWrite)?;
    }
    writer
        .into_inner()
        .map_err(|e| WardError::FileWrite(std::io::Error::new(e.error().kind(), e.to_string())))
}

/// Parses snapshot CSV produced by [`render_snapshot`] (or a compatible tool).
pub fn parse_snapshot(bytes: &[u8]) -> WardResult<Vec<PatientInfo>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(WardError::SnapshotRead)?;
        let row: SnapshotRow = record
            .deserialize(None)
            .map_err(|e| WardError::InvalidSnapshotRow {
                row: i + 1,
                reason: e.to_string(),
            })?;
        records.push(row.into_info(i + 1)?);
    }
    Ok(records)
}

/// Reads every record from the snapshot at `path`.
pub fn read_snapshot(path: &Path) -> WardResult<Vec<PatientInfo>> {
    let bytes = fs::read(path).map_err(WardError::FileRead)?;
    parse_snapshot(&bytes)
}

/// Writes `records` to `path`, replacing any existing file.
pub fn write_snapshot(path: &Path, records: &[PatientInfo]) -> WardResult<()> {
    let bytes = render_snapshot(records)?;
    fs::write(path, bytes).map_err(WardError::FileWrite)
}

/// Writes every patient in `registry` to `path`.
pub fn save_registry(path: &Path, registry: &Registry) -> WardResult<()> {
    write_snapshot(path, &registry.snapshot())?;
    tracing::debug!(
        "saved {} patients to {}",
        registry.patient_count(),
        path.display()
    );
    Ok(())
}

/// Loads the snapshot at `path` into `registry`.
///
/// A missing file is not an error: the registry is left as it is and
/// [`LoadOutcome::Missing`] is returned. Loading is all-or-nothing: if any record fails
/// (malformed row, unknown hospital, duplicate id, over capacity) the registry is unchanged.
pub fn load_snapshot(path: &Path, registry: &mut Registry) -> WardResult<LoadOutcome> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(
                "snapshot {} not found, the system is currently empty",
                path.display()
            );
            return Ok(LoadOutcome::Missing);
        }
        Err(e) => return Err(WardError::FileRead(e)),
    };

    let records = parse_snapshot(&bytes)?;
    let mut staged = registry.clone();
    let count = records.len();
    for info in records {
        staged.restore(info)?;
    }
    *registry = staged;

    tracing::info!("loaded {} patients from {}", count, path.display());
    Ok(LoadOutcome::Loaded(count))
}
