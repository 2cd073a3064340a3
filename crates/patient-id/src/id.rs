//! Implementation of [`PatientId`].

use crate::{PatientIdError, PatientIdResult};
use rand::Rng;
use std::{fmt, str::FromStr};

/// Letters allowed in the final position, lower case first.
const LETTERS: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of distinct patient identifiers.
pub const ID_SPACE_SIZE: u32 = 1_000 * LETTERS.len() as u32;

/// A patient identifier: three ASCII digits followed by one ASCII letter.
///
/// Once constructed the contained bytes are always valid, so the identifier can be
/// displayed, hashed and compared without further checks.
///
/// # Construction
/// - [`PatientId::random`] draws a fresh candidate (uniqueness is the registry's concern).
/// - [`PatientId::parse`] validates an externally supplied identifier.
/// - [`PatientId::from_index`] maps a dense index in `0..ID_SPACE_SIZE` to an identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatientId([u8; 4]);

impl PatientId {
    /// Draws three independent random digits and one random letter.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 4];
        for digit in bytes.iter_mut().take(3) {
            *digit = b'0' + rng.gen_range(0..10u8);
        }
        bytes[3] = LETTERS[rng.gen_range(0..LETTERS.len())];
        Self(bytes)
    }

    /// Validates and parses a patient identifier.
    ///
    /// Surrounding whitespace is ignored; the letter keeps its case.
    ///
    /// # Errors
    ///
    /// Returns [`PatientIdError::InvalidInput`] if `input` is not three digits followed by a
    /// letter.
    pub fn parse(input: &str) -> PatientIdResult<Self> {
        let trimmed = input.trim();
        if !Self::is_canonical(trimmed) {
            return Err(PatientIdError::InvalidInput(format!(
                "patient ID must be 3 digits followed by a letter, got: '{}'",
                trimmed
            )));
        }
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(trimmed.as_bytes());
        Ok(Self(bytes))
    }

    /// Returns true if `input` is exactly three ASCII digits followed by one ASCII letter.
    pub fn is_canonical(input: &str) -> bool {
        let bytes = input.as_bytes();
        bytes.len() == 4
            && bytes[..3].iter().all(u8::is_ascii_digit)
            && bytes[3].is_ascii_alphabetic()
    }

    /// Maps `index` in `0..ID_SPACE_SIZE` to an identifier, or `None` when out of range.
    ///
    /// The mapping is a bijection with [`PatientId::index`].
    pub fn from_index(index: u32) -> Option<Self> {
        if index >= ID_SPACE_SIZE {
            return None;
        }
        let letters = LETTERS.len() as u32;
        let number = index / letters;
        let letter = LETTERS[(index % letters) as usize];
        let digits = [number / 100, (number / 10) % 10, number % 10];
        Some(Self([
            b'0' + digits[0] as u8,
            b'0' + digits[1] as u8,
            b'0' + digits[2] as u8,
            letter,
        ]))
    }

    /// Position of this identifier in the dense index space.
    pub fn index(&self) -> u32 {
        let number = self.0[..3]
            .iter()
            .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'));
        let letter = LETTERS
            .iter()
            .position(|&l| l == self.0[3])
            .unwrap_or_default() as u32;
        number * LETTERS.len() as u32 + letter
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        // Bytes are ASCII by construction.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Compares two identifiers ignoring the case of the letter.
    pub fn eq_ignore_case(&self, other: &PatientId) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatientId({})", self.as_str())
    }
}

impl FromStr for PatientId {
    type Err = PatientIdError;

    /// Equivalent to [`PatientId::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatientId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PatientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PatientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PatientId::parse(&s).map_err(serde::de::Error::custom)
    }
}
