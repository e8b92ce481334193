//! lineage-core library.
//!
//! Read-side relationship queries over a genealogy projection: descendancy
//! trees, pedigree trees and Ahnentafel reports.
//!
//! # Conventions
//!
//! - **Errors**: `anyhow::Result` for store and config plumbing,
//!   [`error::QueryError`] at the query boundary.
//! - **Logging**: Use `tracing` macros (`debug!`, `warn!`). The library never
//!   installs a subscriber.
//!
//! ```no_run
//! use lineage_core::graph::{DescendancyBuilder, QueryContext};
//! use lineage_core::store::SqliteStore;
//!
//! # fn main() -> anyhow::Result<()> {
//! let conn = lineage_core::db::open_projection(".lineage/lineage.sqlite3".as_ref())?;
//! let tree = DescendancyBuilder::new(SqliteStore::new(&conn))
//!     .build(&QueryContext::background(), "I1", 3)?;
//! println!("{} descendants", tree.total_descendants);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod model;
pub mod store;

use graph::{
    AhnentafelFormatter, AhnentafelReport, DescendancyBuilder, DescendancyResult,
    GenerationLimits, PedigreeBuilder, PedigreeNode, QueryContext,
};
use store::SqliteStore;

/// Descendancy tree of `person_id` read from `conn`.
///
/// # Errors
///
/// See [`DescendancyBuilder::build`].
pub fn get_descendancy(
    conn: &rusqlite::Connection,
    limits: GenerationLimits,
    ctx: &QueryContext,
    person_id: &str,
    max_generations: i64,
) -> Result<DescendancyResult, error::QueryError> {
    DescendancyBuilder::new(SqliteStore::new(conn))
        .with_limits(limits)
        .build(ctx, person_id, max_generations)
}

/// Pedigree tree of `person_id` read from `conn`.
///
/// # Errors
///
/// See [`PedigreeBuilder::build`].
pub fn get_pedigree(
    conn: &rusqlite::Connection,
    limits: GenerationLimits,
    ctx: &QueryContext,
    person_id: &str,
    max_generations: i64,
) -> Result<PedigreeNode, error::QueryError> {
    PedigreeBuilder::new(SqliteStore::new(conn))
        .with_limits(limits)
        .build(ctx, person_id, max_generations)
}

/// Ahnentafel report of `person_id` read from `conn`.
///
/// # Errors
///
/// See [`AhnentafelFormatter::build`].
pub fn get_ahnentafel(
    conn: &rusqlite::Connection,
    limits: GenerationLimits,
    ctx: &QueryContext,
    person_id: &str,
    max_generations: i64,
) -> Result<AhnentafelReport, error::QueryError> {
    let pedigree = PedigreeBuilder::new(SqliteStore::new(conn)).with_limits(limits);
    AhnentafelFormatter::new(pedigree).build(ctx, person_id, max_generations)
}
