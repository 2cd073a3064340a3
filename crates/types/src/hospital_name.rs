/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// The lookup key of a hospital.
///
/// Hospital names are compared case-insensitively everywhere, so the key is stored
/// trimmed and lower-cased. [`HospitalName::display_name`] produces the capitalised
/// form used in user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HospitalName(String);

impl HospitalName {
    /// Creates a new `HospitalName` from the given input.
    ///
    /// The input is trimmed and lower-cased. If the trimmed result is empty,
    /// `TextError::Empty` is returned.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the lower-case key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name with its first character upper-cased (`"kingston"` -> `"Kingston"`).
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Case-insensitive comparison against raw user input.
    pub fn matches(&self, input: &str) -> bool {
        self.0 == input.trim().to_lowercase()
    }
}

impl std::fmt::Display for HospitalName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for HospitalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for HospitalName {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for HospitalName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for HospitalName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HospitalName::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lowercases_and_trims() {
        let name = HospitalName::new("  Kingston ").unwrap();
        assert_eq!(name.as_str(), "kingston");
        assert_eq!(name.display_name(), "Kingston");
    }

    #[test]
    fn new_rejects_blank_input() {
        assert!(matches!(HospitalName::new("   "), Err(TextError::Empty)));
    }

    #[test]
    fn matches_ignores_case() {
        let name = HospitalName::new("toronto").unwrap();
        assert!(name.matches("TORONTO"));
        assert!(name.matches(" Toronto "));
        assert!(!name.matches("hamilton"));
    }

    #[test]
    fn deserialize_normalises_case() {
        let name: HospitalName = serde_json::from_str("\"Hamilton\"").unwrap();
        assert_eq!(name.as_str(), "hamilton");
        assert!(serde_json::from_str::<HospitalName>("\"\"").is_err());
    }
}
