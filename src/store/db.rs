use std::cell::Cell;
use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::{Map, Value};

/// Schema version written by [`Database::migrate`].
const SCHEMA_VERSION: i32 = 1;

#[derive(Debug)]
pub struct Database {
    conn: Connection,
    last_key_millis: Cell<i64>,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self, String> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
        }
        let conn = Connection::open(path).map_err(|e| format!("failed to open database: {e}"))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| format!("failed to set pragmas: {e}"))?;

        Ok(Database {
            conn,
            last_key_millis: Cell::new(0),
        })
    }

    /// Throwaway database for tests.
    pub fn open_in_memory() -> Result<Self, String> {
        let conn =
            Connection::open_in_memory().map_err(|e| format!("failed to open database: {e}"))?;
        Ok(Database {
            conn,
            last_key_millis: Cell::new(0),
        })
    }

    /// Create the schema if missing and record its version.
    pub fn migrate(&self) -> Result<(), String> {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS meta (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                key        TEXT NOT NULL,
                body       TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (collection, key)
            );
            ",
            )
            .map_err(|e| format!("migration failed: {e}"))?;

        self.conn
            .execute(
                "INSERT OR IGNORE INTO meta (key, value) VALUES ('schema_version', ?1)",
                params![SCHEMA_VERSION.to_string()],
            )
            .map_err(|e| format!("failed to seed schema_version: {e}"))?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<Option<i32>, String> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| format!("failed to read schema_version: {e}"))?;
        raw.map(|v| {
            v.parse::<i32>()
                .map_err(|e| format!("invalid schema_version value: {e}"))
        })
        .transpose()
    }

    /// Every record of a collection, ordered by key (which is creation order
    /// for generated keys).
    pub fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, body FROM documents WHERE collection = ?1 ORDER BY key ASC")
            .map_err(|e| format!("query error: {e}"))?;

        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| format!("query error: {e}"))?;

        let mut records = Vec::new();
        for row in rows {
            let (key, body) = row.map_err(|e| format!("row error: {e}"))?;
            records.push((key, parse_body(&body)?));
        }
        Ok(records)
    }

    pub fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, String> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
                params![collection, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| format!("query error: {e}"))?;
        body.as_deref().map(parse_body).transpose()
    }

    /// Store a new record under a fresh key and return the key.
    pub fn insert(&self, collection: &str, body: &Value) -> Result<String, String> {
        let key = self.generate_key();
        self.conn
            .execute(
                "INSERT INTO documents (collection, key, body, updated_at) VALUES (?1, ?2, ?3, ?4)",
                params![collection, key, body.to_string(), Utc::now().to_rfc3339()],
            )
            .map_err(|e| format!("failed to insert record: {e}"))?;
        Ok(key)
    }

    /// Full replace; creates the record when absent.
    pub fn put(&self, collection: &str, key: &str, body: &Value) -> Result<(), String> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO documents (collection, key, body, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![collection, key, body.to_string(), Utc::now().to_rfc3339()],
            )
            .map_err(|e| format!("failed to replace record: {e}"))?;
        Ok(())
    }

    /// Shallow merge of `fields` into an existing record. `None` when the
    /// record does not exist.
    pub fn patch(
        &self,
        collection: &str,
        key: &str,
        fields: &Map<String, Value>,
    ) -> Result<Option<Value>, String> {
        let Some(mut current) = self.get(collection, key)? else {
            return Ok(None);
        };
        match current.as_object_mut() {
            Some(obj) => {
                for (field, value) in fields {
                    obj.insert(field.clone(), value.clone());
                }
            }
            None => current = Value::Object(fields.clone()),
        }
        self.conn
            .execute(
                "UPDATE documents SET body = ?1, updated_at = ?2 WHERE collection = ?3 AND key = ?4",
                params![current.to_string(), Utc::now().to_rfc3339(), collection, key],
            )
            .map_err(|e| format!("update failed: {e}"))?;
        Ok(Some(current))
    }

    /// Remove a record. Returns whether it existed.
    pub fn delete(&self, collection: &str, key: &str) -> Result<bool, String> {
        let rows = self
            .conn
            .execute(
                "DELETE FROM documents WHERE collection = ?1 AND key = ?2",
                params![collection, key],
            )
            .map_err(|e| format!("failed to delete record: {e}"))?;
        Ok(rows > 0)
    }

    /// Time-ordered key: strictly increasing millisecond stamp plus a short
    /// random suffix.
    fn generate_key(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let millis = now.max(self.last_key_millis.get() + 1);
        self.last_key_millis.set(millis);
        let uuid = uuid::Uuid::new_v4();
        let suffix = &format!("{:x}", uuid.as_u128())[..6];
        format!("-{millis:012x}{suffix}")
    }
}

fn parse_body(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("corrupt record body: {e}"))
}
