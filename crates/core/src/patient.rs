//! Admitted patient records.

use bedtrack_patient_id::PatientId;
use bedtrack_types::{HospitalName, Severity};

/// A patient currently holding a bed.
///
/// The identifier is fixed for the lifetime of the admission; severity and the
/// hospital name change in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patient {
    id: PatientId,
    hospital_name: HospitalName,
    severity: Severity,
    covid_positive: bool,
}

/// Flat snapshot of a patient, as written to and read from snapshot files.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PatientInfo {
    pub id: PatientId,
    pub hospital_name: HospitalName,
    pub severity: Severity,
    pub covid_positive: bool,
}

impl Patient {
    pub fn new(
        id: PatientId,
        hospital_name: HospitalName,
        severity: Severity,
        covid_positive: bool,
    ) -> Self {
        Self {
            id,
            hospital_name,
            severity,
            covid_positive,
        }
    }

    pub fn id(&self) -> PatientId {
        self.id
    }

    pub fn hospital_name(&self) -> &HospitalName {
        &self.hospital_name
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn covid_positive(&self) -> bool {
        self.covid_positive
    }

    pub fn update_status(&mut self, new_status: Severity) {
        self.severity = new_status;
    }

    pub fn update_hospital(&mut self, name: HospitalName) {
        self.hospital_name = name;
    }

    pub fn info(&self) -> PatientInfo {
        PatientInfo {
            id: self.id,
            hospital_name: self.hospital_name.clone(),
            severity: self.severity,
            covid_positive: self.covid_positive,
        }
    }
}

impl From<PatientInfo> for Patient {
    fn from(info: PatientInfo) -> Self {
        Self::new(info.id, info.hospital_name, info.severity, info.covid_positive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutators_only_touch_their_field() {
        let id = PatientId::parse("123a").unwrap();
        let mut patient = Patient::new(
            id,
            HospitalName::new("kingston").unwrap(),
            Severity::Critical,
            true,
        );

        patient.update_status(Severity::Serious);
        patient.update_hospital(HospitalName::new("Toronto").unwrap());

        let info = patient.info();
        assert_eq!(info.id, id);
        assert_eq!(info.hospital_name.as_str(), "toronto");
        assert_eq!(info.severity, Severity::Serious);
        assert!(info.covid_positive);
    }
}
