//! The hospital registry.
//!
//! `Registry` owns the fixed roster of hospitals and is the only way to mutate them. Every
//! operation checks its preconditions (patient present, bed free, severity gate) before it
//! touches any hospital, so a failed call leaves the registry exactly as it was.
//!
//! ## Identifier allocation
//!
//! Identifiers are drawn at random (three digits plus a letter) and redrawn until no hospital
//! holds them. The space holds 52 000 identifiers, so collisions are rare until the registry
//! is close to saturation. After [`MAX_RANDOM_ID_ATTEMPTS`] misses the registry scans the
//! whole space sequentially from a random starting point, which bounds allocation even when
//! almost every identifier is taken.

use crate::config::{validate_roster, CoreConfig, HospitalSpec};
use crate::constants::MAX_RANDOM_ID_ATTEMPTS;
use crate::hospital::Hospital;
use crate::patient::{Patient, PatientInfo};
use crate::{WardError, WardResult};
use bedtrack_patient_id::{PatientId, ID_SPACE_SIZE};
use bedtrack_types::Severity;
use rand::Rng;
use std::collections::HashSet;

/// Result of a successful [`Registry::update_status`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusChange {
    /// The patient already had the requested status.
    Unchanged(Severity),
    Updated { from: Severity, to: Severity },
}

#[derive(Clone, Debug)]
pub struct Registry {
    hospitals: Vec<Hospital>,
}

impl Default for Registry {
    /// Empty registry over the reference roster.
    fn default() -> Self {
        Self::from_config(&CoreConfig::default())
    }
}

impl Registry {
    /// Creates an empty registry with one hospital per roster entry, in roster order.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::EmptyRoster`] or [`WardError::DuplicateHospital`] for an invalid
    /// roster.
    pub fn new(roster: &[HospitalSpec]) -> WardResult<Self> {
        validate_roster(roster)?;
        Ok(Self::build(roster))
    }

    /// Creates an empty registry from an already validated configuration.
    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::build(cfg.hospitals())
    }

    fn build(roster: &[HospitalSpec]) -> Self {
        Self {
            hospitals: roster
                .iter()
                .map(|spec| Hospital::new(spec.name.clone(), spec.total_beds))
                .collect(),
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Hospitals in roster order.
    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    /// Case-insensitive hospital lookup.
    pub fn hospital(&self, name: &str) -> Option<&Hospital> {
        self.hospitals.iter().find(|h| h.key().matches(name))
    }

    fn hospital_index(&self, name: &str) -> WardResult<usize> {
        self.hospitals
            .iter()
            .position(|h| h.key().matches(name))
            .ok_or_else(|| WardError::UnknownHospital(name.trim().to_string()))
    }

    fn owner_index(&self, id: PatientId) -> Option<usize> {
        self.hospitals.iter().position(|h| h.contains(id))
    }

    /// The hospital currently holding `id`, if any.
    pub fn find_owner(&self, id: PatientId) -> Option<&Hospital> {
        self.owner_index(id).map(|i| &self.hospitals[i])
    }

    pub fn patient(&self, id: PatientId) -> Option<&Patient> {
        self.hospitals.iter().find_map(|h| h.get(id))
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.owner_index(id).is_some()
    }

    /// All patients: roster order, then admission order within each hospital.
    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.hospitals.iter().flat_map(Hospital::patients)
    }

    pub fn patient_ids(&self) -> Vec<PatientId> {
        self.patients().map(Patient::id).collect()
    }

    pub fn patient_count(&self) -> usize {
        self.hospitals.iter().map(Hospital::len).sum()
    }

    /// Resolves user input to an admitted patient's identifier.
    ///
    /// An exact match wins. Otherwise the letter's case is ignored: with only two cases per
    /// letter, a miss on the exact form can match at most one admitted patient.
    ///
    /// # Errors
    ///
    /// - [`WardError::PatientId`] if `input` is not a well-formed identifier.
    /// - [`WardError::PatientNotFound`] if no admitted patient matches.
    pub fn resolve_id(&self, input: &str) -> WardResult<PatientId> {
        let id = PatientId::parse(input)?;
        if self.contains(id) {
            return Ok(id);
        }
        self.patients()
            .map(Patient::id)
            .find(|candidate| candidate.eq_ignore_case(&id))
            .ok_or_else(|| WardError::PatientNotFound(id.to_string()))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Lower-case names of hospitals with at least one free bed, in roster order.
    pub fn available_hospitals(&self) -> Vec<&str> {
        self.hospitals
            .iter()
            .filter(|h| h.has_capacity())
            .map(|h| h.key().as_str())
            .collect()
    }

    /// The transferable patient (severity below 3) with the lowest severity in `hospital`.
    ///
    /// Ties go to the earliest admission. Returns `Ok(None)` when every patient is critical
    /// or the hospital is empty.
    pub fn lowest_severity_patient(&self, hospital: &str) -> WardResult<Option<PatientId>> {
        let hospital = &self.hospitals[self.hospital_index(hospital)?];
        Ok(hospital
            .patients()
            .filter(|p| p.severity().can_transfer())
            .min_by_key(|p| p.severity())
            .map(Patient::id))
    }

    /// The hospital with the most free beds, first in roster order on ties.
    ///
    /// Returns `None` when every hospital is full.
    pub fn hospital_with_most_beds(&self) -> Option<&Hospital> {
        self.hospitals.iter().fold(None, |best: Option<&Hospital>, h| {
            match best {
                Some(b) if b.available_beds() >= h.available_beds() => Some(b),
                _ if h.has_capacity() => Some(h),
                _ => best,
            }
        })
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Allocates an identifier that no admitted patient currently holds.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::IdentifierSpaceExhausted`] if all 52 000 identifiers are in use.
    pub fn generate_id<R: Rng + ?Sized>(&self, rng: &mut R) -> WardResult<PatientId> {
        for _ in 0..MAX_RANDOM_ID_ATTEMPTS {
            let candidate = PatientId::random(rng);
            if !self.contains(candidate) {
                return Ok(candidate);
            }
        }

        tracing::warn!(
            "no free patient ID after {} random draws, scanning the ID space",
            MAX_RANDOM_ID_ATTEMPTS
        );
        let in_use: HashSet<PatientId> = self.patients().map(Patient::id).collect();
        let start = rng.gen_range(0..ID_SPACE_SIZE);
        (0..ID_SPACE_SIZE)
            .filter_map(|offset| PatientId::from_index((start + offset) % ID_SPACE_SIZE))
            .find(|candidate| !in_use.contains(candidate))
            .ok_or(WardError::IdentifierSpaceExhausted)
    }

    /// Admits a new patient to `hospital` and returns the issued identifier.
    ///
    /// # Errors
    ///
    /// - [`WardError::UnknownHospital`] if `hospital` is not in the roster.
    /// - [`WardError::HospitalFull`] if it has no free bed.
    /// - [`WardError::IdentifierSpaceExhausted`] if no identifier is free.
    pub fn admit<R: Rng + ?Sized>(
        &mut self,
        hospital: &str,
        severity: Severity,
        covid_positive: bool,
        rng: &mut R,
    ) -> WardResult<PatientId> {
        let index = self.hospital_index(hospital)?;
        if !self.hospitals[index].has_capacity() {
            return Err(WardError::HospitalFull(self.hospitals[index].name()));
        }

        let id = self.generate_id(rng)?;
        let name = self.hospitals[index].key().clone();
        let target = &mut self.hospitals[index];
        target.add(Patient::new(id, name, severity, covid_positive));

        tracing::info!(
            "Patient {} successfully added to the {} hospital.",
            id,
            target.name()
        );
        Ok(id)
    }

    /// Moves a patient to `destination`, keeping their severity and covid status.
    ///
    /// # Errors
    ///
    /// - [`WardError::PatientNotFound`] if `id` is not admitted.
    /// - [`WardError::TransferBlocked`] if the patient's severity is 3.
    /// - [`WardError::UnknownHospital`] if `destination` is not in the roster.
    /// - [`WardError::AlreadyInHospital`] if the patient is already there.
    /// - [`WardError::HospitalFull`] if `destination` has no free bed.
    pub fn transfer(&mut self, id: PatientId, destination: &str) -> WardResult<()> {
        let from = self
            .owner_index(id)
            .ok_or_else(|| WardError::PatientNotFound(id.to_string()))?;
        let severity = self.hospitals[from]
            .get(id)
            .map(Patient::severity)
            .ok_or_else(|| WardError::PatientNotFound(id.to_string()))?;
        if !severity.can_transfer() {
            return Err(WardError::TransferBlocked { id });
        }

        let to = self.hospital_index(destination)?;
        if to == from {
            return Err(WardError::AlreadyInHospital {
                id,
                hospital: self.hospitals[to].name(),
            });
        }
        if !self.hospitals[to].has_capacity() {
            return Err(WardError::HospitalFull(self.hospitals[to].name()));
        }

        let mut patient = self.hospitals[from].discharge(id)?;
        patient.update_hospital(self.hospitals[to].key().clone());
        self.hospitals[to].add(patient);

        tracing::info!(
            "Patient {} transferred successfully from the {} hospital to the {} hospital.",
            id,
            self.hospitals[from].name(),
            self.hospitals[to].name()
        );
        Ok(())
    }

    /// Discharges a recovered (severity 0) patient.
    ///
    /// # Errors
    ///
    /// - [`WardError::PatientNotFound`] if `id` is not admitted.
    /// - [`WardError::DischargeBlocked`] if the patient's severity is not 0.
    pub fn discharge(&mut self, id: PatientId) -> WardResult<Patient> {
        let severity = self
            .patient(id)
            .map(Patient::severity)
            .ok_or_else(|| WardError::PatientNotFound(id.to_string()))?;
        if !severity.can_discharge() {
            return Err(WardError::DischargeBlocked { id, severity });
        }
        self.release(id)
    }

    /// Removes a patient regardless of severity.
    ///
    /// Used by the stay policy, which sends mild patients home after their first day.
    pub fn release(&mut self, id: PatientId) -> WardResult<Patient> {
        let owner = self
            .owner_index(id)
            .ok_or_else(|| WardError::PatientNotFound(id.to_string()))?;
        let patient = self.hospitals[owner].discharge(id)?;
        tracing::info!(
            "Patient {} has been discharged from the {} hospital.",
            id,
            self.hospitals[owner].name()
        );
        Ok(patient)
    }

    /// Sets a patient's severity. Setting the current value is a successful no-op.
    pub fn update_status(&mut self, id: PatientId, new_status: Severity) -> WardResult<StatusChange> {
        let owner = self
            .owner_index(id)
            .ok_or_else(|| WardError::PatientNotFound(id.to_string()))?;
        let patient = self.hospitals[owner]
            .get_mut(id)
            .ok_or_else(|| WardError::PatientNotFound(id.to_string()))?;

        let current = patient.severity();
        if current == new_status {
            tracing::debug!("patient {} already has a status of {}", id, new_status);
            return Ok(StatusChange::Unchanged(current));
        }

        patient.update_status(new_status);
        tracing::info!(
            "The status of {} has been updated from {} to {}.",
            id,
            current,
            new_status
        );
        Ok(StatusChange::Updated {
            from: current,
            to: new_status,
        })
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Flat records for every admitted patient, in [`Registry::patients`] order.
    pub fn snapshot(&self) -> Vec<PatientInfo> {
        self.patients().map(Patient::info).collect()
    }

    /// Inserts a previously saved patient into the hospital named by the record.
    ///
    /// # Errors
    ///
    /// - [`WardError::UnknownHospital`] if the record names a hospital outside the roster.
    /// - [`WardError::DuplicatePatient`] if the identifier is already admitted.
    /// - [`WardError::HospitalFull`] if the hospital has no free bed.
    pub fn restore(&mut self, info: PatientInfo) -> WardResult<()> {
        let index = self.hospital_index(info.hospital_name.as_str())?;
        if self.contains(info.id) {
            return Err(WardError::DuplicatePatient(info.id));
        }
        if !self.hospitals[index].has_capacity() {
            return Err(WardError::HospitalFull(self.hospitals[index].name()));
        }
        self.hospitals[index].add(Patient::from(info));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedtrack_types::HospitalName;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(3)
    }

    fn roster(entries: &[(&str, u32)]) -> Vec<HospitalSpec> {
        entries
            .iter()
            .map(|(name, beds)| HospitalSpec::new(name, *beds).unwrap())
            .collect()
    }

    fn place(registry: &mut Registry, id: &str, hospital: &str, severity: Severity) -> PatientId {
        let id = PatientId::parse(id).unwrap();
        registry
            .restore(PatientInfo {
                id,
                hospital_name: HospitalName::new(hospital).unwrap(),
                severity,
                covid_positive: false,
            })
            .unwrap();
        id
    }

    #[test]
    fn new_rejects_duplicate_hospitals() {
        let err = Registry::new(&roster(&[("a", 1), ("A", 2)])).unwrap_err();
        assert!(matches!(err, WardError::DuplicateHospital(_)));
    }

    #[test]
    fn admit_takes_a_bed_in_the_named_hospital() {
        let mut registry = Registry::default();
        let mut rng = rng();
        let id = registry
            .admit("Hamilton", Severity::Serious, true, &mut rng)
            .unwrap();

        let owner = registry.find_owner(id).unwrap();
        assert_eq!(owner.name(), "Hamilton");
        assert_eq!(owner.available_beds(), 12);
        let patient = registry.patient(id).unwrap();
        assert_eq!(patient.hospital_name().as_str(), "hamilton");
        assert_eq!(patient.severity(), Severity::Serious);
        assert!(patient.covid_positive());
    }

    #[test]
    fn admit_rejects_full_and_unknown_hospitals() {
        let mut registry = Registry::new(&roster(&[("tiny", 1)])).unwrap();
        let mut rng = rng();
        registry.admit("tiny", Severity::Mild, false, &mut rng).unwrap();

        let err = registry
            .admit("tiny", Severity::Mild, false, &mut rng)
            .unwrap_err();
        assert!(matches!(err, WardError::HospitalFull(_)));
        assert_eq!(registry.hospital("tiny").unwrap().occupied_beds(), 1);

        let err = registry
            .admit("nowhere", Severity::Mild, false, &mut rng)
            .unwrap_err();
        assert!(matches!(err, WardError::UnknownHospital(_)));
    }

    #[test]
    fn occupancy_matches_live_count_over_mixed_operations() {
        let mut registry = Registry::new(&roster(&[("a", 4), ("b", 4)])).unwrap();
        let mut rng = rng();
        let mut admitted = Vec::new();

        for step in 0..40 {
            let hospital = if step % 2 == 0 { "a" } else { "b" };
            match registry.admit(hospital, Severity::Stable, false, &mut rng) {
                Ok(id) => admitted.push(id),
                Err(WardError::HospitalFull(_)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
            if step % 3 == 0 {
                if let Some(id) = admitted.pop() {
                    registry.discharge(id).unwrap();
                }
            }
            for h in registry.hospitals() {
                assert_eq!(h.occupied_beds() as usize, h.len());
                assert!(h.occupied_beds() <= h.total_beds());
            }
        }
    }

    #[test]
    fn generated_ids_are_unique_across_hospitals() {
        let mut registry = Registry::new(&roster(&[("a", 300), ("b", 300)])).unwrap();
        let mut rng = rng();
        for i in 0..600 {
            let hospital = if i % 2 == 0 { "a" } else { "b" };
            registry.admit(hospital, Severity::Mild, false, &mut rng).unwrap();
        }
        let ids: HashSet<PatientId> = registry.patient_ids().into_iter().collect();
        assert_eq!(ids.len(), 600);
    }

    #[test]
    fn generate_id_falls_back_to_a_scan_near_saturation() {
        // Occupy every identifier but one, so random draws almost always collide.
        let mut registry = Registry::new(&roster(&[("full", ID_SPACE_SIZE)])).unwrap();
        let free = PatientId::from_index(12_345).unwrap();
        for index in (0..ID_SPACE_SIZE).filter(|i| *i != 12_345) {
            let id = PatientId::from_index(index).unwrap();
            registry.hospitals[0].add(Patient::new(
                id,
                HospitalName::new("full").unwrap(),
                Severity::Mild,
                false,
            ));
        }

        let mut rng = rng();
        assert_eq!(registry.generate_id(&mut rng).unwrap(), free);

        registry.hospitals[0].add(Patient::new(
            free,
            HospitalName::new("full").unwrap(),
            Severity::Mild,
            false,
        ));
        assert!(matches!(
            registry.generate_id(&mut rng),
            Err(WardError::IdentifierSpaceExhausted)
        ));
    }

    #[test]
    fn transfer_moves_patient_and_preserves_fields() {
        let mut registry = Registry::default();
        let id = PatientId::parse("101a").unwrap();
        registry
            .restore(PatientInfo {
                id,
                hospital_name: HospitalName::new("kingston").unwrap(),
                severity: Severity::Serious,
                covid_positive: true,
            })
            .unwrap();
        let before = registry.patient_count();

        registry.transfer(id, "TORONTO").unwrap();

        assert_eq!(registry.patient_count(), before);
        assert_eq!(registry.find_owner(id).unwrap().name(), "Toronto");
        assert_eq!(registry.hospital("kingston").unwrap().occupied_beds(), 0);
        assert_eq!(registry.hospital("toronto").unwrap().occupied_beds(), 1);
        let patient = registry.patient(id).unwrap();
        assert_eq!(patient.severity(), Severity::Serious);
        assert!(patient.covid_positive());
        assert_eq!(patient.hospital_name().as_str(), "toronto");
    }

    #[test]
    fn transfer_rejects_critical_patients_without_mutation() {
        let mut registry = Registry::default();
        let id = place(&mut registry, "200c", "kingston", Severity::Critical);

        let err = registry.transfer(id, "toronto").unwrap_err();
        assert!(matches!(err, WardError::TransferBlocked { .. }));
        assert_eq!(registry.find_owner(id).unwrap().name(), "Kingston");
        assert_eq!(registry.hospital("toronto").unwrap().occupied_beds(), 0);
    }

    #[test]
    fn transfer_rejects_full_same_and_unknown_destinations() {
        let mut registry = Registry::new(&roster(&[("a", 2), ("b", 1)])).unwrap();
        let mover = place(&mut registry, "001a", "a", Severity::Mild);
        place(&mut registry, "002b", "b", Severity::Mild);

        assert!(matches!(
            registry.transfer(mover, "b"),
            Err(WardError::HospitalFull(_))
        ));
        assert!(matches!(
            registry.transfer(mover, "a"),
            Err(WardError::AlreadyInHospital { .. })
        ));
        assert!(matches!(
            registry.transfer(mover, "c"),
            Err(WardError::UnknownHospital(_))
        ));
        assert!(matches!(
            registry.transfer(PatientId::parse("999z").unwrap(), "b"),
            Err(WardError::PatientNotFound(_))
        ));
        assert_eq!(registry.find_owner(mover).unwrap().key().as_str(), "a");
    }

    #[test]
    fn discharge_requires_severity_zero() {
        let mut registry = Registry::default();
        for (i, severity) in [Severity::Mild, Severity::Serious, Severity::Critical]
            .into_iter()
            .enumerate()
        {
            let id = place(&mut registry, &format!("00{i}q"), "hamilton", severity);
            let err = registry.discharge(id).unwrap_err();
            assert!(matches!(err, WardError::DischargeBlocked { severity: s, .. } if s == severity));
            assert!(registry.contains(id));
        }

        let id = place(&mut registry, "010q", "hamilton", Severity::Stable);
        let discharged = registry.discharge(id).unwrap();
        assert_eq!(discharged.id(), id);
        assert!(registry.find_owner(id).is_none());
        assert_eq!(registry.hospital("hamilton").unwrap().occupied_beds(), 3);
    }

    #[test]
    fn release_ignores_severity() {
        let mut registry = Registry::default();
        let id = place(&mut registry, "321x", "toronto", Severity::Mild);
        registry.release(id).unwrap();
        assert!(!registry.contains(id));
        assert!(matches!(
            registry.release(id),
            Err(WardError::PatientNotFound(_))
        ));
    }

    #[test]
    fn update_status_reports_unchanged_and_updated() {
        let mut registry = Registry::default();
        let id = place(&mut registry, "555e", "kingston", Severity::Serious);

        assert_eq!(
            registry.update_status(id, Severity::Serious).unwrap(),
            StatusChange::Unchanged(Severity::Serious)
        );
        assert_eq!(
            registry.update_status(id, Severity::Stable).unwrap(),
            StatusChange::Updated {
                from: Severity::Serious,
                to: Severity::Stable
            }
        );
        assert_eq!(registry.patient(id).unwrap().severity(), Severity::Stable);
        assert!(matches!(
            registry.update_status(PatientId::parse("000a").unwrap(), Severity::Mild),
            Err(WardError::PatientNotFound(_))
        ));
    }

    #[test]
    fn find_owner_is_exact() {
        let mut registry = Registry::default();
        let a = place(&mut registry, "111a", "kingston", Severity::Mild);
        let b = place(&mut registry, "222b", "hamilton", Severity::Mild);
        let c = place(&mut registry, "333c", "toronto", Severity::Mild);

        assert_eq!(registry.find_owner(a).unwrap().name(), "Kingston");
        assert_eq!(registry.find_owner(b).unwrap().name(), "Hamilton");
        assert_eq!(registry.find_owner(c).unwrap().name(), "Toronto");
        assert!(registry.find_owner(PatientId::parse("111A").unwrap()).is_none());
    }

    #[test]
    fn resolve_id_ignores_letter_case_when_unambiguous() {
        let mut registry = Registry::default();
        let lower = place(&mut registry, "123k", "kingston", Severity::Mild);

        assert_eq!(registry.resolve_id("123k").unwrap(), lower);
        assert_eq!(registry.resolve_id(" 123K ").unwrap(), lower);
        assert!(matches!(
            registry.resolve_id("124k"),
            Err(WardError::PatientNotFound(_))
        ));
        assert!(matches!(
            registry.resolve_id("12k"),
            Err(WardError::PatientId(_))
        ));

        let upper = place(&mut registry, "123K", "toronto", Severity::Mild);
        assert_eq!(registry.resolve_id("123K").unwrap(), upper);

        place(&mut registry, "456p", "kingston", Severity::Mild);
        place(&mut registry, "456P", "toronto", Severity::Mild);
        assert!(matches!(
            registry.resolve_id("456p"),
            Ok(id) if id.as_str() == "456p"
        ));
    }

    #[test]
    fn available_hospitals_follow_roster_order() {
        let mut registry = Registry::new(&roster(&[("a", 1), ("b", 1), ("c", 1)])).unwrap();
        assert_eq!(registry.available_hospitals(), vec!["a", "b", "c"]);
        place(&mut registry, "001a", "b", Severity::Mild);
        assert_eq!(registry.available_hospitals(), vec!["a", "c"]);
    }

    #[test]
    fn lowest_severity_skips_critical_and_breaks_ties_by_admission() {
        let mut registry = Registry::default();
        place(&mut registry, "001a", "kingston", Severity::Critical);
        place(&mut registry, "002a", "kingston", Severity::Serious);
        let mild = place(&mut registry, "003a", "kingston", Severity::Mild);
        place(&mut registry, "004a", "kingston", Severity::Critical);
        place(&mut registry, "005a", "kingston", Severity::Mild);

        assert_eq!(registry.lowest_severity_patient("kingston").unwrap(), Some(mild));
    }

    #[test]
    fn lowest_severity_is_none_when_all_critical_or_empty() {
        let mut registry = Registry::default();
        place(&mut registry, "001a", "toronto", Severity::Critical);
        place(&mut registry, "002a", "toronto", Severity::Critical);

        assert_eq!(registry.lowest_severity_patient("toronto").unwrap(), None);
        assert_eq!(registry.lowest_severity_patient("hamilton").unwrap(), None);
        assert!(registry.lowest_severity_patient("ottawa").is_err());
    }

    #[test]
    fn hospital_with_most_beds_prefers_roster_order_on_ties() {
        let mut registry = Registry::new(&roster(&[("a", 2), ("b", 3), ("c", 3)])).unwrap();
        assert_eq!(registry.hospital_with_most_beds().unwrap().key().as_str(), "b");

        place(&mut registry, "001a", "b", Severity::Mild);
        assert_eq!(registry.hospital_with_most_beds().unwrap().key().as_str(), "c");

        let mut full = Registry::new(&roster(&[("a", 1)])).unwrap();
        place(&mut full, "001a", "a", Severity::Mild);
        assert!(full.hospital_with_most_beds().is_none());
    }

    #[test]
    fn restore_rejects_duplicates_and_overflow() {
        let mut registry = Registry::new(&roster(&[("a", 1), ("b", 1)])).unwrap();
        place(&mut registry, "001a", "a", Severity::Mild);

        let duplicate = PatientInfo {
            id: PatientId::parse("001a").unwrap(),
            hospital_name: HospitalName::new("b").unwrap(),
            severity: Severity::Mild,
            covid_positive: false,
        };
        assert!(matches!(
            registry.restore(duplicate),
            Err(WardError::DuplicatePatient(_))
        ));

        let overflow = PatientInfo {
            id: PatientId::parse("002a").unwrap(),
            hospital_name: HospitalName::new("a").unwrap(),
            severity: Severity::Mild,
            covid_positive: false,
        };
        assert!(matches!(
            registry.restore(overflow),
            Err(WardError::HospitalFull(_))
        ));
    }

    #[test]
    fn snapshot_lists_roster_order_then_admission_order() {
        let mut registry = Registry::default();
        place(&mut registry, "900t", "toronto", Severity::Mild);
        place(&mut registry, "100k", "kingston", Severity::Mild);
        place(&mut registry, "200k", "kingston", Severity::Mild);
        place(&mut registry, "300h", "hamilton", Severity::Mild);

        let ids: Vec<String> = registry
            .snapshot()
            .into_iter()
            .map(|info| info.id.to_string())
            .collect();
        assert_eq!(ids, vec!["100k", "200k", "300h", "900t"]);
    }
}
