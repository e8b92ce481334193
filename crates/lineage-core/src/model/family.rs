use serde::{Deserialize, Serialize};
use std::fmt;

use super::date::GenealogicalDate;

/// How a child is attached to a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    #[default]
    Biological,
    Adopted,
    Step,
    Foster,
    Guardian,
    Unknown,
}

impl RelationshipType {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Biological => "biological",
            Self::Adopted => "adopted",
            Self::Step => "step",
            Self::Foster => "foster",
            Self::Guardian => "guardian",
            Self::Unknown => "unknown",
        }
    }

    /// Lenient conversion for tags read back from the store.
    ///
    /// A missing tag means biological (the importer's default); any other
    /// unrecognised tag reads as [`RelationshipType::Unknown`].
    #[must_use]
    pub fn from_stored(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Biological;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "biological" | "birth" | "natural" => Self::Biological,
            "adopted" | "adoptive" => Self::Adopted,
            "step" | "stepchild" => Self::Step,
            "foster" => Self::Foster,
            "guardian" | "ward" => Self::Guardian,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A family (couple or single-parent unit) row from the read model.
///
/// Zero, one, or two partners are all valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    pub family_id: String,
    pub partner1_id: Option<String>,
    pub partner1_name: Option<String>,
    pub partner2_id: Option<String>,
    pub partner2_name: Option<String>,
    pub marriage_date: Option<String>,
    pub marriage_place: Option<String>,
    pub child_count: u32,
}

/// A partner slot of a [`Family`]: identifier plus denormalized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartnerRef<'a> {
    pub person_id: &'a str,
    pub name: Option<&'a str>,
}

impl Family {
    /// Partner slots that are filled, in positional order.
    pub fn partners(&self) -> impl Iterator<Item = PartnerRef<'_>> {
        [
            (self.partner1_id.as_deref(), self.partner1_name.as_deref()),
            (self.partner2_id.as_deref(), self.partner2_name.as_deref()),
        ]
        .into_iter()
        .filter_map(|(id, name)| {
            id.filter(|id| !id.is_empty())
                .map(|person_id| PartnerRef { person_id, name })
        })
    }

    /// Identifiers of the filled partner slots.
    pub fn partner_ids(&self) -> impl Iterator<Item = &str> {
        self.partners().map(|p| p.person_id)
    }

    /// Whether `person_id` fills either partner slot.
    #[must_use]
    pub fn has_partner(&self, person_id: &str) -> bool {
        self.partner_ids().any(|id| id == person_id)
    }

    /// Partners of this family other than `person_id`.
    pub fn other_partners<'a>(
        &'a self,
        person_id: &'a str,
    ) -> impl Iterator<Item = PartnerRef<'a>> + 'a {
        self.partners().filter(move |p| p.person_id != person_id)
    }

    /// Parsed marriage date, if one was recorded.
    #[must_use]
    pub fn marriage(&self) -> Option<GenealogicalDate> {
        GenealogicalDate::parse_opt(self.marriage_date.as_deref())
    }
}

/// A family-child link row from the read model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyChildLink {
    pub family_id: String,
    pub person_id: String,
    pub child_name: Option<String>,
    pub relationship_type: RelationshipType,
    /// Birth-order position within the family, when known.
    pub sequence: Option<u32>,
}
