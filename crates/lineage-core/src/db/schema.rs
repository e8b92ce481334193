//! Canonical SQLite read-model schema for lineage.
//!
//! The read model is populated by the external event-sourced writer and is
//! only ever read by this crate:
//! - `persons` keeps the latest snapshot of each person
//! - `families` keeps partner slots with denormalized partner names
//! - `family_children` links children to families with a relationship tag
//!   and optional birth order
//! - `projection_meta` tracks the writer's replay cursor

/// Migration v1: core tables plus projection metadata.
pub const MIGRATION_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS persons (
    person_id TEXT PRIMARY KEY,
    given_name TEXT,
    surname TEXT,
    full_name TEXT NOT NULL DEFAULT '',
    gender TEXT NOT NULL DEFAULT 'unknown' CHECK (gender IN ('male', 'female', 'unknown')),
    birth_date TEXT,
    death_date TEXT,
    birth_place TEXT,
    death_place TEXT,
    created_at_us INTEGER NOT NULL DEFAULT 0,
    CHECK (length(trim(person_id)) > 0)
);

CREATE TABLE IF NOT EXISTS families (
    family_id TEXT PRIMARY KEY,
    partner1_id TEXT,
    partner1_name TEXT,
    partner2_id TEXT,
    partner2_name TEXT,
    marriage_date TEXT,
    marriage_place TEXT,
    child_count INTEGER NOT NULL DEFAULT 0 CHECK (child_count >= 0),
    created_at_us INTEGER NOT NULL DEFAULT 0,
    CHECK (length(trim(family_id)) > 0)
);

CREATE TABLE IF NOT EXISTS family_children (
    family_id TEXT NOT NULL REFERENCES families(family_id) ON DELETE CASCADE,
    person_id TEXT NOT NULL,
    child_name TEXT,
    relationship_type TEXT NOT NULL DEFAULT 'biological',
    sequence INTEGER CHECK (sequence IS NULL OR sequence >= 0),
    created_at_us INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (family_id, person_id)
);

CREATE TABLE IF NOT EXISTS projection_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL,
    last_event_offset INTEGER NOT NULL DEFAULT 0,
    last_event_hash TEXT,
    last_rebuild_at_us INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO projection_meta (
    id,
    schema_version,
    last_event_offset,
    last_event_hash,
    last_rebuild_at_us
) VALUES (1, 1, 0, NULL, 0);
"#;

/// Migration v2: traversal indexes.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_families_partner1
    ON families(partner1_id, created_at_us);

CREATE INDEX IF NOT EXISTS idx_families_partner2
    ON families(partner2_id, created_at_us);

CREATE INDEX IF NOT EXISTS idx_family_children_person
    ON family_children(person_id, relationship_type);

CREATE INDEX IF NOT EXISTS idx_family_children_family_sequence
    ON family_children(family_id, sequence);
";

/// Indexes every migrated database must carry.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_families_partner1",
    "idx_families_partner2",
    "idx_family_children_person",
    "idx_family_children_family_sequence",
];
