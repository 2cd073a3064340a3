//! Day-by-day admission simulation.
//!
//! The simulation drives a [`Registry`] through a fixed number of days. Each day it:
//!
//! 1. advances every stay counter and (from the second day on) applies the stay policy,
//! 2. grows the covid probability for new admissions,
//! 3. admits synthetic patients according to the admission schedule,
//! 4. periodically writes a snapshot of the whole registry.
//!
//! When a scheduled hospital is full the simulation tries to make room by transferring that
//! hospital's lowest-severity transferable patient to the hospital with the most free beds.
//! If no such move exists the admission is skipped.
//!
//! All randomness comes from one seeded `ChaCha8Rng`, so a run is reproducible from its seed.

use crate::config::CoreConfig;
use crate::registry::Registry;
use crate::snapshot::save_registry;
use crate::stay::StayTracker;
use crate::{WardError, WardResult};
use bedtrack_patient_id::PatientId;
use bedtrack_types::Severity;
use rand::distributions::{Bernoulli, Distribution, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

pub const DEFAULT_DAYS: u32 = 90;
pub const DEFAULT_COVID_START: f64 = 0.10;
pub const DEFAULT_COVID_GROWTH: f64 = 1.05;
pub const DEFAULT_SNAPSHOT_EVERY: u32 = 10;

/// Severities a synthetic patient can be admitted with, in weight order.
const ADMISSION_SEVERITIES: [Severity; 3] = [Severity::Mild, Severity::Serious, Severity::Critical];
const COVID_SEVERITY_WEIGHTS: [f64; 3] = [0.4, 0.3, 0.3];
const NON_COVID_SEVERITY_WEIGHTS: [f64; 3] = [0.6, 0.3, 0.1];

/// Admit one patient to `hospital` on every day `d` (1-based) with `d % every == 0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdmissionSchedule {
    pub hospital: String,
    pub every: u32,
}

impl AdmissionSchedule {
    pub fn new(hospital: &str, every: u32) -> Self {
        Self {
            hospital: hospital.to_string(),
            every,
        }
    }

    fn is_due(&self, day: u32) -> bool {
        (day + 1) % self.every == 0
    }
}

/// Reference schedule: Toronto every 4 days, Kingston and Hamilton every 7.
pub fn default_schedule() -> Vec<AdmissionSchedule> {
    vec![
        AdmissionSchedule::new("toronto", 4),
        AdmissionSchedule::new("kingston", 7),
        AdmissionSchedule::new("hamilton", 7),
    ]
}

#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub days: u32,
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub covid_start: f64,
    /// Daily multiplier on the covid probability. The probability is capped at 1.0.
    pub covid_growth: f64,
    /// Snapshot cadence in days; 0 disables periodic snapshots.
    pub snapshot_every: u32,
    pub schedule: Vec<AdmissionSchedule>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            seed: None,
            covid_start: DEFAULT_COVID_START,
            covid_growth: DEFAULT_COVID_GROWTH,
            snapshot_every: DEFAULT_SNAPSHOT_EVERY,
            schedule: default_schedule(),
        }
    }
}

impl SimulationConfig {
    fn validate(&self, registry: &Registry) -> WardResult<()> {
        if !(0.0..=1.0).contains(&self.covid_start) {
            return Err(WardError::InvalidInput(format!(
                "covid start probability must be within 0..=1, got {}",
                self.covid_start
            )));
        }
        if !self.covid_growth.is_finite() || self.covid_growth < 0.0 {
            return Err(WardError::InvalidInput(format!(
                "covid growth must be a non-negative number, got {}",
                self.covid_growth
            )));
        }
        for entry in &self.schedule {
            if entry.every == 0 {
                return Err(WardError::InvalidInput(format!(
                    "admission interval for '{}' must be at least one day",
                    entry.hospital
                )));
            }
            if registry.hospital(&entry.hospital).is_none() {
                return Err(WardError::UnknownHospital(entry.hospital.clone()));
            }
        }
        Ok(())
    }
}

/// Totals for a finished run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulationSummary {
    pub days: u32,
    pub admitted: usize,
    /// Admissions that first moved a patient out of the full target hospital.
    pub rebalanced: usize,
    pub skipped: usize,
    pub discharged: usize,
    pub downgraded: usize,
    pub snapshots: Vec<PathBuf>,
    pub final_patients: usize,
}

/// How a single scheduled admission went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Admission {
    Direct(PatientId),
    Rebalanced { admitted: PatientId, moved: PatientId },
    Skipped,
}

pub struct Simulation {
    core: CoreConfig,
    config: SimulationConfig,
    registry: Registry,
    tracker: StayTracker,
    rng: ChaCha8Rng,
    covid_chance: f64,
    covid_weights: WeightedIndex<f64>,
    non_covid_weights: WeightedIndex<f64>,
}

impl Simulation {
    /// Builds a simulation over an empty registry for the configured roster.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::InvalidInput`] for out-of-range probabilities or a zero admission
    /// interval, and [`WardError::UnknownHospital`] if the schedule names a hospital outside
    /// the roster.
    pub fn new(core: CoreConfig, config: SimulationConfig) -> WardResult<Self> {
        let registry = Registry::from_config(&core);
        config.validate(&registry)?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let weights = |w: &[f64; 3]| -> WardResult<WeightedIndex<f64>> {
            WeightedIndex::new(w).map_err(|e| WardError::InvalidInput(e.to_string()))
        };

        Ok(Self {
            covid_chance: config.covid_start,
            covid_weights: weights(&COVID_SEVERITY_WEIGHTS)?,
            non_covid_weights: weights(&NON_COVID_SEVERITY_WEIGHTS)?,
            core,
            config,
            registry,
            tracker: StayTracker::new(),
            rng,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn tracker(&self) -> &StayTracker {
        &self.tracker
    }

    pub fn covid_chance(&self) -> f64 {
        self.covid_chance
    }

    /// Runs every configured day and returns the totals.
    pub fn run(&mut self) -> WardResult<SimulationSummary> {
        let mut summary = SimulationSummary {
            days: self.config.days,
            ..SimulationSummary::default()
        };

        for day in 0..self.config.days {
            self.step(day, &mut summary)?;
        }

        summary.final_patients = self.registry.patient_count();
        tracing::info!(
            "The simulation for {} days has finished: {} admitted, {} discharged, {} patients remain.",
            summary.days,
            summary.admitted,
            summary.discharged,
            summary.final_patients
        );
        Ok(summary)
    }

    fn step(&mut self, day: u32, summary: &mut SimulationSummary) -> WardResult<()> {
        tracing::debug!("day {}: updating days stayed", day + 1);
        self.tracker.advance();
        if day != 0 {
            let outcome = self.tracker.apply_policy(&mut self.registry);
            summary.discharged += outcome.discharged.len();
            summary.downgraded += outcome.downgraded.len();
        }

        self.covid_chance = (self.covid_chance * self.config.covid_growth).min(1.0);
        tracing::debug!("day {}: covid chance {:.4}", day + 1, self.covid_chance);

        let due: Vec<String> = self
            .config
            .schedule
            .iter()
            .filter(|entry| entry.is_due(day))
            .map(|entry| entry.hospital.clone())
            .collect();
        for hospital in due {
            match self.admit_synthetic(&hospital)? {
                Admission::Direct(_) => summary.admitted += 1,
                Admission::Rebalanced { .. } => {
                    summary.admitted += 1;
                    summary.rebalanced += 1;
                }
                Admission::Skipped => summary.skipped += 1,
            }
        }

        let every = self.config.snapshot_every;
        if every != 0 && (day + 1) % every == 0 {
            let path = self.core.simulation_state_path(summary.snapshots.len() + 1);
            match save_registry(&path, &self.registry) {
                Ok(()) => {
                    tracing::info!(
                        "The state of the hospitals after {} days has been saved to {}.",
                        day + 1,
                        path.display()
                    );
                    summary.snapshots.push(path);
                }
                Err(e) => tracing::warn!("could not write {}: {}", path.display(), e),
            }
        }

        self.log_current_patients(day);
        Ok(())
    }

    fn admit_synthetic(&mut self, hospital: &str) -> WardResult<Admission> {
        let covid = Bernoulli::new(self.covid_chance)
            .map_err(|e| WardError::InvalidInput(e.to_string()))?
            .sample(&mut self.rng);
        let weights = if covid {
            &self.covid_weights
        } else {
            &self.non_covid_weights
        };
        let severity = ADMISSION_SEVERITIES[weights.sample(&mut self.rng)];

        let has_capacity = self
            .registry
            .hospital(hospital)
            .map(|h| h.has_capacity())
            .ok_or_else(|| WardError::UnknownHospital(hospital.to_string()))?;

        let admission = if has_capacity {
            let id = self.registry.admit(hospital, severity, covid, &mut self.rng)?;
            Admission::Direct(id)
        } else {
            let candidate = self.registry.lowest_severity_patient(hospital)?;
            let destination = self
                .registry
                .hospital_with_most_beds()
                .map(|h| h.key().as_str().to_string());

            match (candidate, destination) {
                (Some(moved), Some(destination)) => {
                    self.registry.transfer(moved, &destination)?;
                    let admitted = self.registry.admit(hospital, severity, covid, &mut self.rng)?;
                    tracing::info!(
                        "The patient with lowest severity, {}, was transferred to {}, which has the most available beds.",
                        moved,
                        destination
                    );
                    Admission::Rebalanced { admitted, moved }
                }
                _ => {
                    tracing::info!(
                        "No room in the {} hospital and no patient can be transferred out; admission skipped.",
                        hospital
                    );
                    Admission::Skipped
                }
            }
        };

        if let Admission::Direct(id) | Admission::Rebalanced { admitted: id, .. } = admission {
            self.tracker.track(id);
        }
        Ok(admission)
    }

    fn log_current_patients(&self, day: u32) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        tracing::debug!("day {}: current patients (id, status, days stayed, hospital)", day + 1);
        for (id, days) in self.tracker.entries() {
            if let Some(owner) = self.registry.find_owner(id) {
                let status = owner.get(id).map(|p| p.severity().level()).unwrap_or_default();
                tracing::debug!("  {}  {}  {}  {}", id, status, days, owner.name());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HospitalSpec;
    use crate::snapshot::read_snapshot;
    use tempfile::TempDir;

    fn core(dir: &TempDir) -> CoreConfig {
        CoreConfig::new(dir.path().to_path_buf(), crate::config::default_roster()).unwrap()
    }

    fn seeded(seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed: Some(seed),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn same_seed_gives_same_run() {
        let a_dir = TempDir::new().unwrap();
        let b_dir = TempDir::new().unwrap();

        let mut a = Simulation::new(core(&a_dir), seeded(11)).unwrap();
        let mut b = Simulation::new(core(&b_dir), seeded(11)).unwrap();
        let a_summary = a.run().unwrap();
        let b_summary = b.run().unwrap();

        assert_eq!(a_summary.admitted, b_summary.admitted);
        assert_eq!(a_summary.discharged, b_summary.discharged);
        assert_eq!(a.registry().snapshot(), b.registry().snapshot());
    }

    #[test]
    fn default_run_writes_nine_snapshots() {
        let dir = TempDir::new().unwrap();
        let mut sim = Simulation::new(core(&dir), seeded(5)).unwrap();
        let summary = sim.run().unwrap();

        assert_eq!(summary.snapshots.len(), 9);
        assert_eq!(
            summary.snapshots[0],
            dir.path().join("hospital_state_01.csv")
        );
        assert_eq!(
            summary.snapshots[8],
            dir.path().join("hospital_state_09.csv")
        );
        for path in &summary.snapshots {
            read_snapshot(path).unwrap();
        }

        // 22 Toronto admissions plus 12 each for Kingston and Hamilton.
        assert_eq!(summary.admitted + summary.skipped, 22 + 12 + 12);
        assert_eq!(summary.final_patients, sim.registry().patient_count());
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let dir = TempDir::new().unwrap();
        let roster = vec![
            HospitalSpec::new("kingston", 1).unwrap(),
            HospitalSpec::new("hamilton", 1).unwrap(),
            HospitalSpec::new("toronto", 2).unwrap(),
        ];
        let core = CoreConfig::new(dir.path().to_path_buf(), roster).unwrap();
        let config = SimulationConfig {
            seed: Some(2),
            days: 60,
            snapshot_every: 0,
            schedule: vec![
                AdmissionSchedule::new("toronto", 1),
                AdmissionSchedule::new("kingston", 1),
                AdmissionSchedule::new("hamilton", 2),
            ],
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(core, config).unwrap();

        let mut summary = SimulationSummary::default();
        for day in 0..60 {
            sim.step(day, &mut summary).unwrap();
            for h in sim.registry().hospitals() {
                assert!(h.occupied_beds() <= h.total_beds());
                assert_eq!(h.occupied_beds() as usize, h.len());
            }
        }
        assert!(summary.skipped > 0 || summary.rebalanced > 0);
        assert!(summary.snapshots.is_empty());
    }

    #[test]
    fn covid_chance_is_capped_at_one() {
        let dir = TempDir::new().unwrap();
        let config = SimulationConfig {
            seed: Some(1),
            days: 5,
            covid_start: 0.9,
            covid_growth: 2.0,
            snapshot_every: 0,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(core(&dir), config).unwrap();
        sim.run().unwrap();
        assert_eq!(sim.covid_chance(), 1.0);
        assert!(sim.registry().patients().all(|p| p.covid_positive()));
    }

    #[test]
    fn every_admitted_patient_is_tracked() {
        let dir = TempDir::new().unwrap();
        let config = SimulationConfig {
            days: 30,
            snapshot_every: 0,
            ..seeded(9)
        };
        let mut sim = Simulation::new(core(&dir), config).unwrap();
        sim.run().unwrap();

        for patient in sim.registry().patients() {
            assert!(sim.tracker().days(patient.id()).is_some());
        }
        assert_eq!(sim.tracker().len(), sim.registry().patient_count());
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        let dir = TempDir::new().unwrap();
        let bad_probability = SimulationConfig {
            covid_start: 1.5,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            Simulation::new(core(&dir), bad_probability),
            Err(WardError::InvalidInput(_))
        ));

        let bad_interval = SimulationConfig {
            schedule: vec![AdmissionSchedule::new("toronto", 0)],
            ..SimulationConfig::default()
        };
        assert!(matches!(
            Simulation::new(core(&dir), bad_interval),
            Err(WardError::InvalidInput(_))
        ));

        let unknown = SimulationConfig {
            schedule: vec![AdmissionSchedule::new("ottawa", 3)],
            ..SimulationConfig::default()
        };
        assert!(matches!(
            Simulation::new(core(&dir), unknown),
            Err(WardError::UnknownHospital(_))
        ));
    }
}
