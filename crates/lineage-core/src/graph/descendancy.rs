//! Descendant trees with spouses per generation.
//!
//! Starting at a root person, every family where that person is a partner
//! contributes one spouse entry per other partner and one child node per
//! family-child link. Children are expanded depth-first until the clamped
//! generation bound is reached.
//!
//! # Cycle handling
//!
//! Read-model data can be wrong (a person recorded as their own ancestor).
//! A candidate child already on the current root-to-node path is dropped
//! from its parent's child list and logged; the query still succeeds.
//! Only the active path is checked, so the same person may appear under
//! two unrelated branches (e.g. descendants of two marriages that later
//! intermarry).
//!
//! # Ordering
//!
//! Spouses and children follow store order: families by creation time,
//! then children by birth-order sequence. Nothing is re-sorted here.

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, warn};

use super::{ActivePath, GenerationLimits, PersonSummary, QueryContext};
use crate::error::QueryError;
use crate::model::{Family, GenealogicalDate, PartnerRef, Person, RelationshipType};
use crate::store::RecordStore;

/// Name used for a spouse whose name cannot be resolved.
const UNKNOWN_NAME: &str = "Unknown";

/// A partner of a descendancy node through one family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spouse {
    pub person_id: String,
    pub family_id: String,
    pub name: String,
    pub marriage_date: Option<GenealogicalDate>,
}

/// One person in a descendancy tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescendancyNode {
    #[serde(flatten)]
    pub person: PersonSummary,
    /// Depth below the query root (root = 0).
    pub generation: u32,
    /// How this node is linked to its parent; `None` at the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<RelationshipType>,
    pub spouses: Vec<Spouse>,
    pub children: Vec<DescendancyNode>,
}

impl DescendancyNode {
    /// Pre-order iterator over this node and everything below it.
    pub fn iter(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Number of nodes below this one.
    #[must_use]
    pub fn descendant_count(&self) -> usize {
        self.iter().count() - 1
    }

    /// Highest generation number in this subtree.
    #[must_use]
    pub fn max_generation(&self) -> u32 {
        self.iter()
            .map(|node| node.generation)
            .fold(self.generation, u32::max)
    }
}

/// Result of a descendancy query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescendancyResult {
    pub tree: DescendancyNode,
    /// All nodes except the root.
    pub total_descendants: usize,
    /// Highest generation present (0 when the root has no descendants).
    pub max_generation_reached: u32,
}

/// Builds [`DescendancyResult`]s from a [`RecordStore`].
#[derive(Debug, Clone)]
pub struct DescendancyBuilder<S> {
    store: S,
    limits: GenerationLimits,
}

impl<S: RecordStore> DescendancyBuilder<S> {
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

    /// Build the descendant tree of `person_id`.
    ///
    /// `max_generations <= 0` uses the default bound; larger values are
    /// clamped to the ceiling.
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
    ) -> Result<DescendancyResult, QueryError> {
        let started = Instant::now();
        let bound = self.limits.clamp(max_generations);
        ctx.check()?;

        let root = self
            .store
            .get_person(person_id)?
            .ok_or_else(|| QueryError::PersonNotFound(person_id.to_string()))?;

        let mut path = ActivePath::default();
        let tree = self.expand(ctx, root, None, 0, bound, &mut path)?;

        let total_descendants = tree.descendant_count();
        let max_generation_reached = tree.max_generation();
        debug!(
            person_id,
            bound,
            total_descendants,
            max_generation_reached,
            elapsed = ?started.elapsed(),
            "built descendancy tree"
        );

        Ok(DescendancyResult {
            tree,
            total_descendants,
            max_generation_reached,
        })
    }

    fn expand(
        &self,
        ctx: &QueryContext,
        person: Person,
        relationship: Option<RelationshipType>,
        generation: u32,
        bound: u32,
        path: &mut ActivePath,
    ) -> Result<DescendancyNode, QueryError> {
        ctx.check()?;
        path.enter(&person.person_id);

        let families = self.store.get_families_for_person(&person.person_id)?;
        let mut spouses = Vec::new();
        let mut children = Vec::new();

        for family in &families {
            for partner in family.other_partners(&person.person_id) {
                spouses.push(self.spouse(family, partner)?);
            }

            if generation >= bound {
                continue;
            }

            for link in self.store.get_family_children(&family.family_id)? {
                if path.contains(&link.person_id) {
                    warn!(
                        person_id = %link.person_id,
                        family_id = %family.family_id,
                        depth = path.depth(),
                        "descendancy cycle: child already on path, branch truncated"
                    );
                    continue;
                }
                let Some(child) = self.store.get_person(&link.person_id)? else {
                    warn!(
                        person_id = %link.person_id,
                        family_id = %family.family_id,
                        "family child link points at a missing person, skipped"
                    );
                    continue;
                };
                children.push(self.expand(
                    ctx,
                    child,
                    Some(link.relationship_type),
                    generation + 1,
                    bound,
                    path,
                )?);
            }
        }

        path.leave();
        Ok(DescendancyNode {
            person: person.into(),
            generation,
            relationship,
            spouses,
            children,
        })
    }

    fn spouse(&self, family: &Family, partner: PartnerRef<'_>) -> Result<Spouse, QueryError> {
        let name = match partner.name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => self
                .store
                .get_person(partner.person_id)?
                .map_or_else(|| UNKNOWN_NAME.to_string(), |p| p.display_name()),
        };

        Ok(Spouse {
            person_id: partner.person_id.to_string(),
            family_id: family.family_id.clone(),
            name,
            marriage_date: family.marriage(),
        })
    }
}
