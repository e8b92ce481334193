//! Binary ancestor (pedigree) trees.
//!
//! Each node resolves the person's single family of origin and expands at
//! most one father and one mother. Unknown parents leave their slot empty;
//! sparse edges are the normal shape of a pedigree.
//!
//! # Parent slots
//!
//! The read model stores partners positionally, not as father/mother.
//! Partners are resolved to persons and placed by recorded gender: a female
//! first partner or a male second partner flips the positional order;
//! otherwise partner 1 fills the father slot and partner 2 the mother slot.

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, warn};

use super::{ActivePath, GenerationLimits, PersonSummary, QueryContext};
use crate::error::QueryError;
use crate::model::{Gender, Person};
use crate::store::RecordStore;

/// One person in a pedigree tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PedigreeNode {
    #[serde(flatten)]
    pub person: PersonSummary,
    /// Depth above the query root (root = 0).
    pub generation: u32,
    pub father: Option<Box<PedigreeNode>>,
    pub mother: Option<Box<PedigreeNode>>,
}

impl PedigreeNode {
    /// Parents present on this node, father first.
    pub fn parents(&self) -> impl Iterator<Item = &Self> {
        self.father.as_deref().into_iter().chain(self.mother.as_deref())
    }

    /// Number of ancestors recorded above this node.
    #[must_use]
    pub fn ancestor_count(&self) -> usize {
        self.parents().map(|p| 1 + p.ancestor_count()).sum()
    }

    /// Highest generation number in this subtree.
    #[must_use]
    pub fn max_generation(&self) -> u32 {
        self.parents()
            .map(Self::max_generation)
            .fold(self.generation, u32::max)
    }
}

/// Anything that can produce a pedigree tree.
///
/// The Ahnentafel formatter depends on this rather than on a concrete
/// builder so callers can inject their own source.
pub trait PedigreeSource {
    /// Build the pedigree of `person_id`.
    ///
    /// # Errors
    ///
    /// Same failure classes as [`PedigreeBuilder::build`].
    fn pedigree(
        &self,
        ctx: &QueryContext,
        person_id: &str,
        max_generations: i64,
    ) -> Result<PedigreeNode, QueryError>;
}

/// Builds [`PedigreeNode`] trees from a [`RecordStore`].
#[derive(Debug, Clone)]
pub struct PedigreeBuilder<S> {
    store: S,
    limits: GenerationLimits,
}

impl<S: RecordStore> PedigreeBuilder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            limits: GenerationLimits::default(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: GenerationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Build the pedigree of `person_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::PersonNotFound`] if the root does not resolve,
    /// [`QueryError::Store`] if any lookup fails, or
    /// [`QueryError::Cancelled`] if `ctx` is cancelled mid-traversal.
    pub fn build(
        &self,
        ctx: &QueryContext,
        person_id: &str,
        max_generations: i64,
    ) -> Result<PedigreeNode, QueryError> {
        let started = Instant::now();
        let bound = self.limits.clamp(max_generations);
        ctx.check()?;

        let root = self
            .store
            .get_person(person_id)?
            .ok_or_else(|| QueryError::PersonNotFound(person_id.to_string()))?;

        let mut path = ActivePath::default();
        let tree = self.expand(ctx, root, 0, bound, &mut path)?;

        debug!(
            person_id,
            bound,
            ancestors = tree.ancestor_count(),
            elapsed = ?started.elapsed(),
            "built pedigree tree"
        );
        Ok(tree)
    }

    fn expand(
        &self,
        ctx: &QueryContext,
        person: Person,
        generation: u32,
        bound: u32,
        path: &mut ActivePath,
    ) -> Result<PedigreeNode, QueryError> {
        ctx.check()?;
        path.enter(&person.person_id);

        let (father, mother) = if generation < bound {
            self.parents_of(&person)?
        } else {
            (None, None)
        };

        let father = self.expand_parent(ctx, father, generation, bound, path)?;
        let mother = self.expand_parent(ctx, mother, generation, bound, path)?;

        path.leave();
        Ok(PedigreeNode {
            person: person.into(),
            generation,
            father,
            mother,
        })
    }

    fn expand_parent(
        &self,
        ctx: &QueryContext,
        parent: Option<Person>,
        generation: u32,
        bound: u32,
        path: &mut ActivePath,
    ) -> Result<Option<Box<PedigreeNode>>, QueryError> {
        let Some(parent) = parent else {
            return Ok(None);
        };
        if path.contains(&parent.person_id) {
            warn!(
                person_id = %parent.person_id,
                depth = path.depth(),
                "pedigree cycle: parent already on path, branch truncated"
            );
            return Ok(None);
        }
        let node = self.expand(ctx, parent, generation + 1, bound, path)?;
        Ok(Some(Box::new(node)))
    }

    /// Resolve (father, mother) from the person's family of origin.
    fn parents_of(&self, person: &Person) -> Result<(Option<Person>, Option<Person>), QueryError> {
        let Some(family) = self.store.get_child_family(&person.person_id)? else {
            return Ok((None, None));
        };

        let first = self.resolve_partner(&family.family_id, family.partner1_id.as_deref())?;
        let second = self.resolve_partner(&family.family_id, family.partner2_id.as_deref())?;
        Ok(assign_parent_slots(first, second))
    }

    fn resolve_partner(
        &self,
        family_id: &str,
        partner_id: Option<&str>,
    ) -> Result<Option<Person>, QueryError> {
        let Some(partner_id) = partner_id.filter(|id| !id.is_empty()) else {
            return Ok(None);
        };
        let person = self.store.get_person(partner_id)?;
        if person.is_none() {
            warn!(
                person_id = partner_id,
                family_id, "family partner points at a missing person, slot left empty"
            );
        }
        Ok(person)
    }
}

impl<S: RecordStore> PedigreeSource for PedigreeBuilder<S> {
    fn pedigree(
        &self,
        ctx: &QueryContext,
        person_id: &str,
        max_generations: i64,
    ) -> Result<PedigreeNode, QueryError> {
        self.build(ctx, person_id, max_generations)
    }
}

/// Place two positional partners into (father, mother) slots.
fn assign_parent_slots(
    first: Option<Person>,
    second: Option<Person>,
) -> (Option<Person>, Option<Person>) {
    let g1 = first.as_ref().map(|p| p.gender);
    let g2 = second.as_ref().map(|p| p.gender);

    let first_is_mother = g1 == Some(Gender::Female) && g2 != Some(Gender::Female);
    let second_is_father = g2 == Some(Gender::Male) && g1 != Some(Gender::Male);

    if first_is_mother || second_is_father {
        (second, first)
    } else {
        (first, second)
    }
}
