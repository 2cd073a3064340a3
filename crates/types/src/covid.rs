//! Text form of the covid flag.

/// The covid flag was not `"true"` or `"false"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("covid status must be \"true\" or \"false\", got '{0}'")]
pub struct CovidFlagError(pub String);

/// Parses `"true"` / `"false"`, ignoring case and surrounding whitespace.
pub fn parse_covid_flag(input: &str) -> Result<bool, CovidFlagError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(CovidFlagError(trimmed.to_string()))
    }
}

pub fn format_covid_flag(covid_positive: bool) -> &'static str {
    if covid_positive {
        "true"
    } else {
        "false"
    }
}
