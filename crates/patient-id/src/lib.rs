//! Patient identifiers.
//!
//! Every admitted patient is identified by a short code: **three decimal digits followed by
//! one ASCII letter**, for example `042b` or `917Q`.
//!
//! This crate provides:
//! - A small copyable wrapper type ([`PatientId`]) that *guarantees* the format once
//!   constructed.
//! - Random generation of candidate identifiers and a dense index over the whole identifier
//!   space, so callers can fall back to an exhaustive scan when random draws keep colliding.
//!
//! ## Identifier space
//! - Digits: `000` to `999` (1 000 values)
//! - Letter: `a-z` and `A-Z` (52 values)
//! - Total: 52 000 identifiers ([`ID_SPACE_SIZE`])
//!
//! The letter is case-sensitive: `123a` and `123A` are different identifiers. Callers that
//! accept user input may use [`PatientId::eq_ignore_case`] to resolve a typed id.

mod id;

pub use id::{PatientId, ID_SPACE_SIZE};

/// Error type for patient identifier operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatientIdError {
    /// Invalid input provided
    #[error("Invalid patient ID: {0}")]
    InvalidInput(String),
}

/// Result type for patient identifier operations.
pub type PatientIdResult<T> = Result<T, PatientIdError>;
