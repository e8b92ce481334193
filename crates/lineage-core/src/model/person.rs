use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::date::GenealogicalDate;

/// Recorded gender of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }

    /// Lenient conversion for values read back from the store.
    ///
    /// Anything unrecognised reads as [`Gender::Unknown`].
    #[must_use]
    pub fn from_stored(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised gender string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gender '{0}': expected male, female, or unknown")]
pub struct ParseGenderError(pub String);

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            "unknown" | "u" | "" => Ok(Self::Unknown),
            other => Err(ParseGenderError(other.to_string())),
        }
    }
}

/// A person row from the read model.
///
/// Dates stay as the raw recorded strings and are parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub person_id: String,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub full_name: String,
    pub gender: Gender,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub birth_place: Option<String>,
    pub death_place: Option<String>,
}

impl Person {
    /// Parsed birth date, if one was recorded.
    #[must_use]
    pub fn birth(&self) -> Option<GenealogicalDate> {
        GenealogicalDate::parse_opt(self.birth_date.as_deref())
    }

    /// Parsed death date, if one was recorded.
    #[must_use]
    pub fn death(&self) -> Option<GenealogicalDate> {
        GenealogicalDate::parse_opt(self.death_date.as_deref())
    }

    /// Best available display name.
    ///
    /// Falls back from the stored full name to "given surname", then to the
    /// identifier itself.
    #[must_use]
    pub fn display_name(&self) -> String {
        if !self.full_name.trim().is_empty() {
            return self.full_name.clone();
        }
        let joined = [self.given_name.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            self.person_id.clone()
        } else {
            joined
        }
    }
}
