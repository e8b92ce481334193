//! Ahnentafel (ancestor-number) reports.
//!
//! A pedigree tree is flattened with the classical doubling scheme: the
//! subject is 1, the father of N is 2N and the mother of N is 2N + 1.
//! Unknown ancestors leave gaps in the numbering. Each number therefore
//! encodes its own lineage: the bits after the leading 1 read as a path
//! from the subject, 0 for a father and 1 for a mother.

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, warn};

use super::{PedigreeNode, PedigreeSource, PersonSummary, QueryContext};
use crate::error::QueryError;

/// One numbered ancestor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AhnentafelEntry {
    pub number: u64,
    pub generation: u32,
    #[serde(flatten)]
    pub person: PersonSummary,
}

impl AhnentafelEntry {
    /// Relationship of this ancestor to the subject, e.g. `"maternal
    /// grandfather"`.
    #[must_use]
    pub fn relationship(&self) -> String {
        relationship_label(self.number).unwrap_or_default()
    }
}

/// Flat ancestor report, entries ascending by number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AhnentafelReport {
    pub entries: Vec<AhnentafelEntry>,
    pub total_entries: usize,
    pub max_generation_reached: u32,
}

impl AhnentafelReport {
    fn from_entries(entries: Vec<AhnentafelEntry>) -> Self {
        let max_generation_reached = entries.iter().map(|e| e.generation).max().unwrap_or(0);
        Self {
            total_entries: entries.len(),
            max_generation_reached,
            entries,
        }
    }

    /// Look up the entry holding `number`, if that ancestor is known.
    #[must_use]
    pub fn entry(&self, number: u64) -> Option<&AhnentafelEntry> {
        self.entries
            .binary_search_by_key(&number, |e| e.number)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Numbers present in the report, ascending.
    pub fn numbers(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|e| e.number)
    }
}

/// Produces [`AhnentafelReport`]s from any [`PedigreeSource`].
#[derive(Debug, Clone)]
pub struct AhnentafelFormatter<P> {
    pedigree: P,
}

impl<P: PedigreeSource> AhnentafelFormatter<P> {
    pub const fn new(pedigree: P) -> Self {
        Self { pedigree }
    }

    /// Build the numbered ancestor report for `person_id`.
    ///
    /// # Errors
    ///
    /// Propagates every error of the underlying pedigree source unchanged.
    pub fn build(
        &self,
        ctx: &QueryContext,
        person_id: &str,
        max_generations: i64,
    ) -> Result<AhnentafelReport, QueryError> {
        let started = Instant::now();
        let tree = self.pedigree.pedigree(ctx, person_id, max_generations)?;
        let report = AhnentafelReport::from_entries(flatten(&tree));

        debug!(
            person_id,
            entries = report.total_entries,
            max_generation = report.max_generation_reached,
            elapsed = ?started.elapsed(),
            "built ahnentafel report"
        );
        Ok(report)
    }
}

/// Number every node of `root` and return the entries sorted by number.
#[must_use]
pub fn flatten(root: &PedigreeNode) -> Vec<AhnentafelEntry> {
    let mut entries = Vec::with_capacity(root.ancestor_count() + 1);
    let mut stack: Vec<(u64, &PedigreeNode)> = vec![(1, root)];

    while let Some((number, node)) = stack.pop() {
        entries.push(AhnentafelEntry {
            number,
            generation: node.generation,
            person: node.person.clone(),
        });

        for (parent, offset) in [(node.mother.as_deref(), 1), (node.father.as_deref(), 0)] {
            let Some(parent) = parent else { continue };
            match number.checked_mul(2).and_then(|n| n.checked_add(offset)) {
                Some(parent_number) => stack.push((parent_number, parent)),
                None => warn!(
                    person_id = %parent.person.person_id,
                    number, "ahnentafel number overflow, ancestor dropped"
                ),
            }
        }
    }

    entries.sort_unstable_by_key(|e| e.number);
    entries
}

/// Generation encoded by an Ahnentafel number: `floor(log2(number))`.
///
/// `0` is not a valid number and maps to generation 0.
#[must_use]
pub const fn generation_of(number: u64) -> u32 {
    match number.checked_ilog2() {
        Some(generation) => generation,
        None => 0,
    }
}

/// English label for the ancestor numbered `number`, or `None` for 0.
///
/// ```
/// use lineage_core::graph::ahnentafel::relationship_label;
///
/// assert_eq!(relationship_label(1).as_deref(), Some("self"));
/// assert_eq!(relationship_label(6).as_deref(), Some("maternal grandfather"));
/// assert_eq!(
///     relationship_label(17).as_deref(),
///     Some("paternal 2x great-grandmother")
/// );
/// ```
#[must_use]
pub fn relationship_label(number: u64) -> Option<String> {
    let generation = number.checked_ilog2()?;
    let female = number & 1 == 1;
    let label = match generation {
        0 => "self".to_string(),
        1 => parent_word(female).to_string(),
        _ => {
            let maternal = (number >> (generation - 1)) & 1 == 1;
            let side = if maternal { "maternal" } else { "paternal" };
            let greats = match generation - 2 {
                0 => String::new(),
                1 => "great-".to_string(),
                n => format!("{n}x great-"),
            };
            format!("{side} {greats}grand{}", parent_word(female))
        }
    };
    Some(label)
}

const fn parent_word(female: bool) -> &'static str {
    if female { "mother" } else { "father" }
}
