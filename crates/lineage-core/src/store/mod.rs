//! Record store adapter: the read-only lookups traversal depends on.
//!
//! Builders in [`crate::graph`] only ever see a [`RecordStore`]; the
//! production implementation is [`SqliteStore`] over the read-model
//! database, and tests plug in their own implementations to inject
//! failures.

mod sqlite;

pub use sqlite::SqliteStore;

use anyhow::Result;

use crate::model::{Family, FamilyChildLink, Person};

/// Read-only lookups over persons, families, and family-child links.
///
/// Every method returns an owned snapshot. `Err` means the lookup itself
/// failed; absence is `Ok(None)` or an empty list.
pub trait RecordStore {
    /// Person by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying lookup fails.
    fn get_person(&self, person_id: &str) -> Result<Option<Person>>;

    /// Family by identifier.
    ///
    /// No builder needs it; it is offered to callers that hold a family id
    /// from a spouse entry or child link and want the full record.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying lookup fails.
    fn get_family(&self, family_id: &str) -> Result<Option<Family>>;

    /// Families where the person fills either partner slot, in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying lookup fails.
    fn get_families_for_person(&self, person_id: &str) -> Result<Vec<Family>>;

    /// The single family in which the person is a child, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying lookup fails.
    fn get_child_family(&self, person_id: &str) -> Result<Option<Family>>;

    /// Child links of a family, in birth order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying lookup fails.
    fn get_family_children(&self, family_id: &str) -> Result<Vec<FamilyChildLink>>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn get_person(&self, person_id: &str) -> Result<Option<Person>> {
        (**self).get_person(person_id)
    }

    fn get_family(&self, family_id: &str) -> Result<Option<Family>> {
        (**self).get_family(family_id)
    }

    fn get_families_for_person(&self, person_id: &str) -> Result<Vec<Family>> {
        (**self).get_families_for_person(person_id)
    }

    fn get_child_family(&self, person_id: &str) -> Result<Option<Family>> {
        (**self).get_child_family(person_id)
    }

    fn get_family_children(&self, family_id: &str) -> Result<Vec<FamilyChildLink>> {
        (**self).get_family_children(family_id)
    }
}
