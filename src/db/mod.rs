use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

use crate::models::Invoice;
use crate::utils::now_rfc3339;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(db_path: impl AsRef<Path>) -> SqlResult<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let mut db = Database { conn };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&mut self) -> SqlResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL
            );",
        )?;

        let migrations = vec![(
            "001_create_invoices.sql",
            include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/migrations/001_create_invoices.sql"
            )),
        )];

        for (name, sql) in migrations {
            let applied: Option<String> = self
                .conn
                .query_row(
                    "SELECT name FROM schema_migrations WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;

            if applied.is_none() {
                let tx = self.conn.transaction()?;
                tx.execute_batch(sql)?;
                tx.execute(
                    "INSERT INTO schema_migrations (name, applied_at) VALUES (?1, datetime('now'))",
                    params![name],
                )?;
                tx.commit()?;
            }
        }

        Ok(())
    }

    /// Assigns the id and creation timestamp, stores the document, and
    /// returns the stored form. Single-statement, so either the whole
    /// invoice lands or nothing does.
    pub fn create_invoice(&self, invoice: &Invoice) -> SqlResult<Invoice> {
        let mut stored = invoice.clone();
        stored.id = Some(Uuid::new_v4().to_string());
        stored.created_at = Some(now_rfc3339());

        self.conn.execute(
            "INSERT INTO invoices (id, file_name, vendor, invoice, line_items, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                stored.id,
                stored.file_name,
                to_json(&stored.vendor)?,
                to_json(&stored.invoice)?,
                to_json(&stored.line_items)?,
                stored.created_at
            ],
        )?;

        Ok(stored)
    }

    /// All invoices, newest first. Insertion order breaks timestamp ties.
    pub fn list_invoices(&self) -> SqlResult<Vec<Invoice>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, file_name, vendor, invoice, line_items, created_at
             FROM invoices
             ORDER BY created_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Invoice {
                id: row.get(0)?,
                file_name: row.get(1)?,
                vendor: from_json(2, row.get(2)?)?,
                invoice: from_json(3, row.get(3)?)?,
                line_items: from_json(4, row.get(4)?)?,
                created_at: row.get(5)?,
            })
        })?;

        rows.collect()
    }

    /// Hard delete. Returns whether a matching document existed.
    pub fn delete_invoice(&self, id: &str) -> SqlResult<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM invoices WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}

fn to_json<T: Serialize>(value: &T) -> SqlResult<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn from_json<T: DeserializeOwned>(column: usize, raw: String) -> SqlResult<T> {
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}
