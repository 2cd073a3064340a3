use bedtrack_patient_id::{PatientId, PatientIdError};
use bedtrack_types::{CovidFlagError, Severity, SeverityError, TextError};

#[derive(Debug, thiserror::Error)]
pub enum WardError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("patient {0} is not admitted to any hospital")]
    PatientNotFound(String),
    #[error("unknown hospital: {0}")]
    UnknownHospital(String),
    #[error("the {0} hospital has no available beds")]
    HospitalFull(String),
    #[error("patient {id} cannot be discharged with a severity status of {severity}")]
    DischargeBlocked { id: PatientId, severity: Severity },
    #[error("patient {id} has a severity status of 3 and cannot be transferred")]
    TransferBlocked { id: PatientId },
    #[error("patient {id} is already at the {hospital} hospital")]
    AlreadyInHospital { id: PatientId, hospital: String },
    #[error("patient {0} is already admitted")]
    DuplicatePatient(PatientId),
    #[error("every patient ID is in use")]
    IdentifierSpaceExhausted,
    #[error("hospital roster must not be empty")]
    EmptyRoster,
    #[error("hospital {0} appears more than once in the roster")]
    DuplicateHospital(String),

    #[error("invalid snapshot row {row}: {reason}")]
    InvalidSnapshotRow { row: usize, reason: String },
    #[error("failed to read snapshot file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write snapshot file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to parse snapshot: {0}")]
    SnapshotRead(csv::Error),
    #[error("failed to serialize snapshot: {0}")]
    SnapshotWrite(csv::Error),

    #[error("{0}")]
    PatientId(#[from] PatientIdError),
    #[error("invalid hospital name: {0}")]
    Text(#[from] TextError),
    #[error("{0}")]
    Severity(#[from] SeverityError),
    #[error("{0}")]
    CovidFlag(#[from] CovidFlagError),
}

pub type WardResult<T> = std::result::Result<T, WardError>;
