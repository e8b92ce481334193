//! `SQLite` query helpers for the read-model database.
//!
//! Typed lookups backing the record store adapter: persons by ID, families
//! by ID, families where a person is a partner, the family where a person is
//! a child, and the children of a family.
//!
//! All functions take a shared `&Connection` reference and return
//! `anyhow::Result<T>` with typed structs (never raw rows).

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::model::{Family, FamilyChildLink, Gender, Person, RelationshipType};

const PERSON_COLUMNS: &str = "person_id, given_name, surname, full_name, gender, \
     birth_date, death_date, birth_place, death_place";

const FAMILY_COLUMNS: &str = "f.family_id, f.partner1_id, f.partner1_name, \
     f.partner2_id, f.partner2_name, f.marriage_date, f.marriage_place, f.child_count";

/// Fetch a single person by exact `person_id`.
///
/// Returns `None` if the person does not exist.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_person(conn: &Connection, person_id: &str) -> Result<Option<Person>> {
    let sql = format!("SELECT {PERSON_COLUMNS} FROM persons WHERE person_id = ?1");
    let mut stmt = conn.prepare(&sql).context("prepare get_person query")?;

    stmt.query_row(params![person_id], row_to_person)
        .optional()
        .with_context(|| format!("get_person for '{person_id}'"))
}

/// Fetch a single family by exact `family_id`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_family(conn: &Connection, family_id: &str) -> Result<Option<Family>> {
    let sql = format!("SELECT {FAMILY_COLUMNS} FROM families f WHERE f.family_id = ?1");
    let mut stmt = conn.prepare(&sql).context("prepare get_family query")?;

    stmt.query_row(params![family_id], row_to_family)
        .optional()
        .with_context(|| format!("get_family for '{family_id}'"))
}

/// Families where `person_id` fills either partner slot.
///
/// Ordered by family creation time, then insertion order, so a person's
/// first marriage comes first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_families_for_person(conn: &Connection, person_id: &str) -> Result<Vec<Family>> {
    let sql = format!(
        "SELECT {FAMILY_COLUMNS} FROM families f \
         WHERE f.partner1_id = ?1 OR f.partner2_id = ?1 \
         ORDER BY f.created_at_us ASC, f.rowid ASC"
    );
    let mut stmt = conn
        .prepare(&sql)
        .context("prepare get_families_for_person")?;
    let rows = stmt
        .query_map(params![person_id], row_to_family)
        .with_context(|| format!("execute get_families_for_person for '{person_id}'"))?;

    let mut families = Vec::new();
    for row in rows {
        families.push(row.context("read family row")?);
    }
    Ok(families)
}

/// The single family in which `person_id` is a child.
///
/// When several links exist, the biological one wins, then the earliest
/// inserted.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_child_family(conn: &Connection, person_id: &str) -> Result<Option<Family>> {
    let sql = format!(
        "SELECT {FAMILY_COLUMNS} FROM family_children fc \
         JOIN families f ON f.family_id = fc.family_id \
         WHERE fc.person_id = ?1 \
         ORDER BY CASE fc.relationship_type WHEN 'biological' THEN 0 ELSE 1 END ASC, \
         fc.rowid ASC \
         LIMIT 1"
    );
    let mut stmt = conn.prepare(&sql).context("prepare get_child_family")?;

    stmt.query_row(params![person_id], row_to_family)
        .optional()
        .with_context(|| format!("get_child_family for '{person_id}'"))
}

/// Children linked to `family_id`.
///
/// Ordered by birth-order sequence (unsequenced links last), then insertion
/// order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_family_children(conn: &Connection, family_id: &str) -> Result<Vec<FamilyChildLink>> {
    let sql = "SELECT family_id, person_id, child_name, relationship_type, sequence \
               FROM family_children WHERE family_id = ?1 \
               ORDER BY sequence IS NULL ASC, sequence ASC, rowid ASC";

    let mut stmt = conn.prepare(sql).context("prepare get_family_children")?;
    let rows = stmt
        .query_map(params![family_id], |row| {
            let relationship: Option<String> = row.get(3)?;
            Ok(FamilyChildLink {
                family_id: row.get(0)?,
                person_id: row.get(1)?,
                child_name: row.get(2)?,
                relationship_type: RelationshipType::from_stored(relationship.as_deref()),
                sequence: row.get(4)?,
            })
        })
        .with_context(|| format!("execute get_family_children for '{family_id}'"))?;

    let mut links = Vec::new();
    for row in rows {
        links.push(row.context("read family child row")?);
    }
    Ok(links)
}

/// Read the writer's replay cursor `(last_event_offset, last_event_hash)`.
///
/// # Errors
///
/// Returns an error if `projection_meta` is missing or unreadable.
pub fn get_projection_cursor(conn: &Connection) -> Result<(i64, Option<String>)> {
    let sql = "SELECT last_event_offset, last_event_hash FROM projection_meta WHERE id = 1";
    conn.query_row(sql, [], |row| Ok((row.get(0)?, row.get(1)?)))
        .context("read projection cursor")
}

fn row_to_person(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
    let gender: String = row.get(4)?;
    Ok(Person {
        person_id: row.get(0)?,
        given_name: row.get(1)?,
        surname: row.get(2)?,
        full_name: row.get(3)?,
        gender: Gender::from_stored(&gender),
        birth_date: row.get(5)?,
        death_date: row.get(6)?,
        birth_place: row.get(7)?,
        death_place: row.get(8)?,
    })
}

fn row_to_family(row: &rusqlite::Row<'_>) -> rusqlite::Result<Family> {
    Ok(Family {
        family_id: row.get(0)?,
        partner1_id: row.get(1)?,
        partner1_name: row.get(2)?,
        partner2_id: row.get(3)?,
        partner2_name: row.get(4)?,
        marriage_date: row.get(5)?,
        marriage_place: row.get(6)?,
        child_count: row.get(7)?,
    })
}
