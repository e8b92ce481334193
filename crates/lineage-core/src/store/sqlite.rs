use anyhow::Result;
use rusqlite::Connection;

use super::RecordStore;
use crate::db::query;
use crate::model::{Family, FamilyChildLink, Person};

/// [`RecordStore`] backed by the SQLite read-model database.
///
/// Borrows the connection for the duration of a query; open one connection
/// per worker thread.
#[derive(Debug, Clone, Copy)]
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    #[must_use]
    pub const fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordStore for SqliteStore<'_> {
    fn get_person(&self, person_id: &str) -> Result<Option<Person>> {
        query::get_person(self.conn, person_id)
    }

    fn get_family(&self, family_id: &str) -> Result<Option<Family>> {
        query::get_family(self.conn, family_id)
    }

    fn get_families_for_person(&self, person_id: &str) -> Result<Vec<Family>> {
        query::get_families_for_person(self.conn, person_id)
    }

    fn get_child_family(&self, person_id: &str) -> Result<Option<Family>> {
        query::get_child_family(self.conn, person_id)
    }

    fn get_family_children(&self, family_id: &str) -> Result<Vec<FamilyChildLink>> {
        query::get_family_children(self.conn, family_id)
    }
}
