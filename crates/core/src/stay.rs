//! Length-of-stay tracking and the time-driven severity policy.
//!
//! The registry knows nothing about time. The simulation keeps its own day counter per
//! patient here and, once per simulated day, lets the policy downgrade or discharge patients
//! according to how long they have stayed at their current severity:
//!
//! | Severity | Counter | Action |
//! |---|---|---|
//! | 1 | ≥ 1 day | discharged |
//! | 2 | = 3 days | downgraded to 1, counter reset |
//! | 3 | = 5 days | downgraded to 2, counter reset |

use crate::registry::Registry;
use bedtrack_patient_id::PatientId;
use bedtrack_types::Severity;

/// Days a severity-1 patient stays before automatic discharge.
pub const MILD_DISCHARGE_AFTER_DAYS: u32 = 1;
/// Days at severity 2 before downgrading to 1.
pub const SERIOUS_DOWNGRADE_AFTER_DAYS: u32 = 3;
/// Days at severity 3 before downgrading to 2.
pub const CRITICAL_DOWNGRADE_AFTER_DAYS: u32 = 5;

/// Changes made by one [`StayTracker::apply_policy`] step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyOutcome {
    pub discharged: Vec<PatientId>,
    pub downgraded: Vec<(PatientId, Severity)>,
}

/// Per-patient day counters, in the order patients were first tracked.
#[derive(Clone, Debug, Default)]
pub struct StayTracker {
    days: Vec<(PatientId, u32)>,
}

impl StayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) tracking `id` at day 0.
    pub fn track(&mut self, id: PatientId) {
        match self.days.iter_mut().find(|(tracked, _)| *tracked == id) {
            Some(entry) => entry.1 = 0,
            None => self.days.push((id, 0)),
        }
    }

    pub fn forget(&mut self, id: PatientId) {
        self.days.retain(|(tracked, _)| *tracked != id);
    }

    pub fn days(&self, id: PatientId) -> Option<u32> {
        self.days
            .iter()
            .find(|(tracked, _)| *tracked == id)
            .map(|(_, days)| *days)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Tracked patients with their day counters.
    pub fn entries(&self) -> impl Iterator<Item = (PatientId, u32)> + '_ {
        self.days.iter().copied()
    }

    /// One more day for every tracked patient.
    pub fn advance(&mut self) {
        for (_, days) in &mut self.days {
            *days += 1;
        }
    }

    /// Applies the severity policy to every tracked patient.
    ///
    /// Each patient is evaluated once per call against the severity they had at the start of
    /// the call. Patients no longer in the registry are dropped from tracking.
    pub fn apply_policy(&mut self, registry: &mut Registry) -> PolicyOutcome {
        let mut outcome = PolicyOutcome::default();
        let mut kept = Vec::with_capacity(self.days.len());

        for (id, days) in std::mem::take(&mut self.days) {
            let Some(severity) = registry.patient(id).map(|p| p.severity()) else {
                tracing::debug!("patient {} left the registry, no longer tracked", id);
                continue;
            };

            match severity {
                Severity::Mild if days >= MILD_DISCHARGE_AFTER_DAYS => {
                    match registry.release(id) {
                        Ok(_) => outcome.discharged.push(id),
                        Err(e) => tracing::warn!("could not discharge {}: {}", id, e),
                    }
                    continue;
                }
                Severity::Serious if days == SERIOUS_DOWNGRADE_AFTER_DAYS => {
                    self.downgrade(registry, id, Severity::Mild, &mut outcome);
                    kept.push((id, 0));
                }
                Severity::Critical if days == CRITICAL_DOWNGRADE_AFTER_DAYS => {
                    self.downgrade(registry, id, Severity::Serious, &mut outcome);
                    kept.push((id, 0));
                }
                _ => kept.push((id, days)),
            }
        }

        self.days = kept;
        outcome
    }

    fn downgrade(
        &self,
        registry: &mut Registry,
        id: PatientId,
        to: Severity,
        outcome: &mut PolicyOutcome,
    ) {
        match registry.update_status(id, to) {
            Ok(_) => outcome.downgraded.push((id, to)),
            Err(e) => tracing::warn!("could not downgrade {}: {}", id, e),
        }
    }
}
