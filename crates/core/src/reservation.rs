//! Reserver-name rules.
//!
//! Reservations are made by anonymous visitors who type a display name.
//! That name doubles as the shared secret for removing the reservation later,
//! so the same normalisation must be applied on both sides.

use std::str::FromStr;

use crate::error::CoreError;

/// Maximum accepted length (in characters) of a reserver name.
pub const MAX_RESERVER_NAME_LEN: usize = 100;

/// Trim a reserver name and reject it if nothing is left.
pub fn normalize_reserver_name(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_RESERVER_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "name must be at most {MAX_RESERVER_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// How an unreserve request's name is compared with stored names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatchPolicy {
    /// Byte-for-byte equality after trimming.
    #[default]
    Exact,
    /// Equality after trimming and Unicode lower-casing.
    CaseInsensitive,
}

impl NameMatchPolicy {
    /// Whether `supplied` (already normalised) matches the `stored` name.
    pub fn matches(self, stored: &str, supplied: &str) -> bool {
        match self {
            NameMatchPolicy::Exact => stored == supplied,
            NameMatchPolicy::CaseInsensitive => stored.to_lowercase() == supplied.to_lowercase(),
        }
    }

    pub fn is_case_insensitive(self) -> bool {
        matches!(self, NameMatchPolicy::CaseInsensitive)
    }
}

impl FromStr for NameMatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(NameMatchPolicy::Exact),
            "case_insensitive" | "case-insensitive" => Ok(NameMatchPolicy::CaseInsensitive),
            other => Err(format!(
                "unknown name match policy '{other}' (expected 'exact' or 'case_insensitive')"
            )),
        }
    }
}

/// Initials shown to the public instead of a reserver's full name.
///
/// One upper-cased letter per whitespace-separated word, so `"Chioma"`
/// becomes `"C"` and `"tunde bakare"` becomes `"TB"`.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
