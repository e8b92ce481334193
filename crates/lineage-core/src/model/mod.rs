//! Read-only record snapshots exposed by the record store.
//!
//! - [`person`]: persons and their recorded gender.
//! - [`family`]: partner families and family-child links.
//! - [`date`]: lenient parsing of recorded genealogical dates.

pub mod date;
pub mod family;
pub mod person;

pub use date::{DateQualifier, GenealogicalDate};
pub use family::{Family, FamilyChildLink, PartnerRef, RelationshipType};
pub use person::{Gender, Person};
