//! Relationship traversal over the record store.
//!
//! ## Submodules
//!
//! - [`descendancy`]: descendant tree with spouses per generation.
//! - [`pedigree`]: binary ancestor tree (father/mother slots).
//! - [`ahnentafel`]: numbered ancestor report flattened from a pedigree.
//! - [`context`]: cooperative cancellation checked at every node.
//!
//! All builders clamp the requested generation count through
//! [`GenerationLimits`] and guard against cycles with an [`ActivePath`]
//! holding only the identifiers on the current root-to-node path.

pub mod ahnentafel;
pub mod context;
pub mod descendancy;
pub mod pedigree;

#[cfg(test)]
mod fixtures;

pub use ahnentafel::{AhnentafelEntry, AhnentafelFormatter, AhnentafelReport};
pub use context::{CancelToken, QueryContext};
pub use descendancy::{DescendancyBuilder, DescendancyNode, DescendancyResult, Spouse};
pub use pedigree::{PedigreeBuilder, PedigreeNode, PedigreeSource};

use serde::Serialize;

use crate::model::{GenealogicalDate, Gender, Person};

/// Generation count used when a request asks for zero or fewer.
pub const DEFAULT_GENERATIONS: u32 = 4;

/// No traversal ever goes deeper than this many generations.
pub const HARD_MAX_GENERATIONS: u32 = 10;

/// Rejected [`GenerationLimits`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "invalid generation limits default={default} max={ceiling}: \
     need 1 <= default <= max <= {hard}",
    hard = HARD_MAX_GENERATIONS
)]
pub struct InvalidLimits {
    pub default: u32,
    pub ceiling: u32,
}

/// Clamping rule applied to every requested generation count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationLimits {
    default: u32,
    ceiling: u32,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            default: DEFAULT_GENERATIONS,
            ceiling: HARD_MAX_GENERATIONS,
        }
    }
}

impl GenerationLimits {
    /// Build limits, enforcing `1 <= default <= ceiling <= HARD_MAX_GENERATIONS`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLimits`] when the ordering does not hold.
    pub const fn new(default: u32, ceiling: u32) -> Result<Self, InvalidLimits> {
        if default == 0 || default > ceiling || ceiling > HARD_MAX_GENERATIONS {
            return Err(InvalidLimits { default, ceiling });
        }
        Ok(Self { default, ceiling })
    }

    #[must_use]
    pub const fn default_generations(self) -> u32 {
        self.default
    }

    #[must_use]
    pub const fn max_generations(self) -> u32 {
        self.ceiling
    }

    /// Clamp a caller-supplied generation count.
    ///
    /// `<= 0` means "use the default"; anything above the ceiling is cut to
    /// the ceiling.
    #[must_use]
    pub const fn clamp(self, requested: i64) -> u32 {
        if requested <= 0 {
            self.default
        } else if requested >= self.ceiling as i64 {
            self.ceiling
        } else {
            // 0 < requested < ceiling <= HARD_MAX_GENERATIONS, fits in u32.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let clamped = requested as u32;
            clamped
        }
    }
}

/// Identifiers on the current root-to-node path.
///
/// Entered on descent and left on return, so siblings never see each
/// other's subtrees; a person may appear in two unrelated branches but
/// never below themselves.
#[derive(Debug, Default)]
pub(crate) struct ActivePath {
    ids: Vec<String>,
}

impl ActivePath {
    pub(crate) fn contains(&self, person_id: &str) -> bool {
        self.ids.iter().any(|id| id == person_id)
    }

    pub(crate) fn enter(&mut self, person_id: &str) {
        self.ids.push(person_id.to_string());
    }

    pub(crate) fn leave(&mut self) {
        self.ids.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.ids.len()
    }
}

/// Person fields carried on every derived node and report entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonSummary {
    pub person_id: String,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub full_name: String,
    pub gender: Gender,
    pub birth: Option<GenealogicalDate>,
    pub death: Option<GenealogicalDate>,
}

impl From<Person> for PersonSummary {
    fn from(person: Person) -> Self {
        let birth = person.birth();
        let death = person.death();
        let full_name = person.display_name();
        Self {
            person_id: person.person_id,
            given_name: person.given_name,
            surname: person.surname,
            full_name,
            gender: person.gender,
            birth,
            death,
        }
    }
}
