//! A single hospital and the patients occupying its beds.
//!
//! `Hospital` is low-level: it keeps the bed counter and the patient
//! collection in lock-step but does not enforce capacity or severity rules. Those
//! belong to [`crate::Registry`], which checks them before calling in here.

use crate::patient::Patient;
use crate::{WardError, WardResult};
use bedtrack_patient_id::PatientId;
use bedtrack_types::HospitalName;

#[derive(Clone, Debug)]
pub struct Hospital {
    name: HospitalName,
    total_beds: u32,
    occupied_beds: u32,
    /// Insertion-ordered; capacities are small so lookups scan.
    patients: Vec<Patient>,
}

impl Hospital {
    pub fn new(name: HospitalName, total_beds: u32) -> Self {
        Self {
            name,
            total_beds,
            occupied_beds: 0,
            patients: Vec::new(),
        }
    }

    /// Capitalised display name, e.g. `"Kingston"`.
    pub fn name(&self) -> String {
        self.name.display_name()
    }

    /// Lower-case lookup key.
    pub fn key(&self) -> &HospitalName {
        &self.name
    }

    pub fn total_beds(&self) -> u32 {
        self.total_beds
    }

    pub fn occupied_beds(&self) -> u32 {
        self.occupied_beds
    }

    /// Free beds. Signed: an unchecked [`Hospital::add`] past capacity drives it negative.
    pub fn available_beds(&self) -> i64 {
        i64::from(self.total_beds) - i64::from(self.occupied_beds)
    }

    pub fn has_capacity(&self) -> bool {
        self.available_beds() > 0
    }

    /// Inserts a patient and takes a bed.
    ///
    /// The caller must ensure the id is not already present and that a bed is free.
    pub fn add(&mut self, patient: Patient) {
        self.patients.push(patient);
        self.occupied_beds += 1;
    }

    pub fn get(&self, id: PatientId) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id() == id)
    }

    pub fn get_mut(&mut self, id: PatientId) -> Option<&mut Patient> {
        self.patients.iter_mut().find(|p| p.id() == id)
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.get(id).is_some()
    }

    /// Removes a patient, frees their bed and hands the record back.
    ///
    /// # Errors
    ///
    /// Returns [`WardError::PatientNotFound`] if `id` is not held here.
    pub fn discharge(&mut self, id: PatientId) -> WardResult<Patient> {
        let position = self
            .patients
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| WardError::PatientNotFound(id.to_string()))?;
        let patient = self.patients.remove(position);
        self.occupied_beds -= 1;
        Ok(patient)
    }

    /// Patients in admission order.
    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.iter()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}
