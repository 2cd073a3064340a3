//! Textual summary of a series of snapshot files.
//!
//! For each snapshot, and each hospital in it, the report counts covid-positive patients and
//! how many patients hold each severity status. Snapshots that cannot be read are skipped with
//! a warning so one bad file does not hide the rest of the series.

use crate::config::HospitalSpec;
use crate::patient::PatientInfo;
use crate::snapshot::read_snapshot;
use bedtrack_types::{HospitalName, Severity};
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HospitalTally {
    pub name: HospitalName,
    pub patients: usize,
    pub covid_positive: usize,
    /// Patients per severity, indexed by [`Severity::level`].
    pub by_severity: [usize; 4],
}

impl HospitalTally {
    fn new(name: HospitalName) -> Self {
        Self {
            name,
            patients: 0,
            covid_positive: 0,
            by_severity: [0; 4],
        }
    }

    fn count(&mut self, info: &PatientInfo) {
        self.patients += 1;
        if info.covid_positive {
            self.covid_positive += 1;
        }
        self.by_severity[usize::from(info.severity.level())] += 1;
    }

    pub fn with_severity(&self, severity: Severity) -> usize {
        self.by_severity[usize::from(severity.level())]
    }
}

/// Per-hospital tallies for one snapshot file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotTally {
    pub path: PathBuf,
    pub hospitals: Vec<HospitalTally>,
}

impl SnapshotTally {
    /// Tallies `records`. Every roster hospital gets a row, even when empty; hospitals that
    /// appear only in the records follow in order of first appearance.
    pub fn from_records(path: &Path, roster: &[HospitalSpec], records: &[PatientInfo]) -> Self {
        let mut hospitals: Vec<HospitalTally> = roster
            .iter()
            .map(|spec| HospitalTally::new(spec.name.clone()))
            .collect();

        for info in records {
            let index = match hospitals.iter().position(|h| h.name == info.hospital_name) {
                Some(index) => index,
                None => {
                    hospitals.push(HospitalTally::new(info.hospital_name.clone()));
                    hospitals.len() - 1
                }
            };
            hospitals[index].count(info);
        }

        Self {
            path: path.to_path_buf(),
            hospitals,
        }
    }

    pub fn hospital(&self, name: &str) -> Option<&HospitalTally> {
        self.hospitals.iter().find(|h| h.name.matches(name))
    }
}

/// Reads and tallies each snapshot in order, skipping unreadable ones.
pub fn build_report(paths: &[PathBuf], roster: &[HospitalSpec]) -> Vec<SnapshotTally> {
    paths
        .iter()
        .filter_map(|path| match read_snapshot(path) {
            Ok(records) => Some(SnapshotTally::from_records(path, roster, &records)),
            Err(e) => {
                tracing::warn!(
                    "There was a problem opening {} for reading, it has been left out of the report: {}",
                    path.display(),
                    e
                );
                None
            }
        })
        .collect()
}

/// Formats the tallies as a plain-text table, one block per snapshot.
pub fn render_report(tallies: &[SnapshotTally]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, tallies);
    out
}

fn write_report(out: &mut String, tallies: &[SnapshotTally]) -> fmt::Result {
    for (ordinal, tally) in tallies.iter().enumerate() {
        writeln!(out, "State {} ({})", ordinal + 1, tally.path.display())?;
        writeln!(
            out,
            "  {:<12} {:>8} {:>6} {:>4} {:>4} {:>4} {:>4}",
            "Hospital", "Patients", "Covid", "S0", "S1", "S2", "S3"
        )?;
        for h in &tally.hospitals {
            writeln!(
                out,
                "  {:<12} {:>8} {:>6} {:>4} {:>4} {:>4} {:>4}",
                h.name.display_name(),
                h.patients,
                h.covid_positive,
                h.by_severity[0],
                h.by_severity[1],
                h.by_severity[2],
                h.by_severity[3]
            )?;
        }
    }
    Ok(())
}
