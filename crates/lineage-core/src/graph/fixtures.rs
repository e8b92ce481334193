//! In-memory read-model fixtures shared by the traversal tests.

use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};
use std::cell::Cell;

use crate::db::migrations;
use crate::graph::CancelToken;
use crate::model::{Family, FamilyChildLink, Person};
use crate::store::RecordStore;

pub fn test_db() -> Connection {
    let mut conn = Connection::open_in_memory().expect("open in-memory db");
    migrations::migrate(&mut conn).expect("migrate");
    conn
}

pub fn insert_person(conn: &Connection, id: &str, gender: &str) {
    conn.execute(
        "INSERT INTO persons (person_id, given_name, surname, full_name, gender, birth_date) \
         VALUES (?1, ?2, 'Test', ?3, ?4, 'ABT 1900')",
        params![id, format!("Given{id}"), format!("Name of {id}"), gender],
    )
    .expect("insert person");
}

pub fn insert_family(
    conn: &Connection,
    id: &str,
    partner1: Option<&str>,
    partner2: Option<&str>,
    created: i64,
) {
    conn.execute(
        "INSERT INTO families (family_id, partner1_id, partner1_name, partner2_id, \
         partner2_name, marriage_date, created_at_us) \
         VALUES (?1, ?2, ?3, ?4, ?5, '1 JUN 1920', ?6)",
        params![
            id,
            partner1,
            partner1.map(|p| format!("Name of {p}")),
            partner2,
            partner2.map(|p| format!("Name of {p}")),
            created
        ],
    )
    .expect("insert family");
}

pub fn insert_child(conn: &Connection, family_id: &str, person_id: &str) {
    insert_child_as(conn, family_id, person_id, "biological");
}

pub fn insert_child_as(conn: &Connection, family_id: &str, person_id: &str, relationship: &str) {
    conn.execute(
        "INSERT INTO family_children (family_id, person_id, child_name, relationship_type) \
         VALUES (?1, ?2, ?3, ?4)",
        params![family_id, person_id, format!("Name of {person_id}"), relationship],
    )
    .expect("insert child link");
}

/// Wraps a store and fails every lookup that touches `fail_on`.
pub struct FailingStore<S> {
    pub inner: S,
    pub fail_on: &'static str,
}

impl<S: RecordStore> FailingStore<S> {
    fn guard(&self, id: &str) -> Result<()> {
        if id == self.fail_on {
            Err(anyhow!("simulated disk I/O error").context(format!("lookup '{id}'")))
        } else {
            Ok(())
        }
    }
}

impl<S: RecordStore> RecordStore for FailingStore<S> {
    fn get_person(&self, person_id: &str) -> Result<Option<Person>> {
        self.guard(person_id)?;
        self.inner.get_person(person_id)
    }

    fn get_family(&self, family_id: &str) -> Result<Option<Family>> {
        self.guard(family_id)?;
        self.inner.get_family(family_id)
    }

    fn get_families_for_person(&self, person_id: &str) -> Result<Vec<Family>> {
        self.guard(person_id)?;
        self.inner.get_families_for_person(person_id)
    }

    fn get_child_family(&self, person_id: &str) -> Result<Option<Family>> {
        self.guard(person_id)?;
        self.inner.get_child_family(person_id)
    }

    fn get_family_children(&self, family_id: &str) -> Result<Vec<FamilyChildLink>> {
        self.guard(family_id)?;
        self.inner.get_family_children(family_id)
    }
}

/// Wraps a store and cancels `token` after `after` person lookups.
pub struct CancellingStore<S> {
    pub inner: S,
    pub token: CancelToken,
    pub after: usize,
    pub seen: Cell<usize>,
}

impl<S: RecordStore> RecordStore for CancellingStore<S> {
    fn get_person(&self, person_id: &str) -> Result<Option<Person>> {
        self.seen.set(self.seen.get() + 1);
        if self.seen.get() >= self.after {
            self.token.cancel();
        }
        self.inner.get_person(person_id)
    }

    fn get_family(&self, family_id: &str) -> Result<Option<Family>> {
        self.inner.get_family(family_id)
    }

    fn get_families_for_person(&self, person_id: &str) -> Result<Vec<Family>> {
        self.inner.get_families_for_person(person_id)
    }

    fn get_child_family(&self, person_id: &str) -> Result<Option<Family>> {
        self.inner.get_child_family(person_id)
    }

    fn get_family_children(&self, family_id: &str) -> Result<Vec<FamilyChildLink>> {
        self.inner.get_family_children(family_id)
    }
}
