//! Shared read-model builders for integration tests.
//!
//! Included with `#[path = "support.rs"] mod support;`.

#![allow(dead_code)]

use lineage_core::db::migrations;
use rusqlite::{Connection, params};

pub fn test_db() -> Connection {
    let mut conn = Connection::open_in_memory().expect("open in-memory db");
    migrations::migrate(&mut conn).expect("migrate schema");
    conn
}

/// Fluent writer for the projection tables.
pub struct Tree<'c> {
    conn: &'c Connection,
    clock: i64,
}

impl<'c> Tree<'c> {
    pub const fn new(conn: &'c Connection) -> Self {
        Self { conn, clock: 0 }
    }

    pub fn person(&mut self, id: &str, gender: &str) -> &mut Self {
        self.conn
            .execute(
                "INSERT INTO persons (person_id, given_name, surname, full_name, gender, \
                 birth_date, created_at_us) VALUES (?1, ?2, 'Doe', ?3, ?4, '2 FEB 1901', ?5)",
                params![id, id, format!("{id} Doe"), gender, self.tick()],
            )
            .expect("insert person");
        self
    }

    pub fn family(&mut self, id: &str, p1: Option<&str>, p2: Option<&str>) -> &mut Self {
        let created = self.tick();
        self.conn
            .execute(
                "INSERT INTO families (family_id, partner1_id, partner1_name, partner2_id, \
                 partner2_name, marriage_date, created_at_us) \
                 VALUES (?1, ?2, ?3, ?4, ?5, 'ABT 1925', ?6)",
                params![
                    id,
                    p1,
                    p1.map(|p| format!("{p} Doe")),
                    p2,
                    p2.map(|p| format!("{p} Doe")),
                    created
                ],
            )
            .expect("insert family");
        self
    }

    pub fn child(&mut self, family: &str, person: &str) -> &mut Self {
        self.conn
            .execute(
                "INSERT INTO family_children (family_id, person_id, child_name, created_at_us) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![family, person, format!("{person} Doe"), self.tick()],
            )
            .expect("insert child");
        self
    }

    /// `person` is the only child of a new family with the given parents.
    pub fn parents(
        &mut self,
        person: &str,
        father: Option<&str>,
        mother: Option<&str>,
    ) -> &mut Self {
        let family = format!("F-{person}");
        self.family(&family, father, mother).child(&family, person)
    }

    /// A straight line `ids[0] -> ids[1] -> ...` of fathers and sons.
    pub fn chain(&mut self, ids: &[&str]) -> &mut Self {
        for id in ids {
            self.person(id, "male");
        }
        for pair in ids.windows(2) {
            self.parents(pair[1], Some(pair[0]), None);
        }
        self
    }

    fn tick(&mut self) -> i64 {
        self.clock += 1;
        self.clock
    }
}
