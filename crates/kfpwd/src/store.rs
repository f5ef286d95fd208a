//! SQLite credential store
//!
//! One table, `passwords`, holding name, secret value, optional URL and the
//! creation time. Values are stored as given; there is no encryption.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Store-specific errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No password record with ID {0}")]
    NotFound(i64),

    #[error("Failed to create store directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid timestamp in store: {0}")]
    Timestamp(String),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// A saved credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credential {
    pub id: i64,
    pub name: String,
    pub value: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

const SELECT_COLUMNS: &str = "SELECT id, name, value, url, created_at FROM passwords";

/// Handle to the credential database
pub struct CredentialStore {
    conn: Connection,
}

impl CredentialStore {
    /// Open or create the store at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }

        debug!(path = %path.display(), "opening credential store");
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open a throwaway store in memory
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS passwords (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                value TEXT NOT NULL,
                url TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_passwords_created ON passwords(created_at DESC);
            "#,
        )?;
        Ok(())
    }

    /// Insert a credential and return its ID. An empty URL is stored as NULL.
    pub fn save(&self, name: &str, value: &str, url: Option<&str>) -> Result<i64, StoreError> {
        let url = url.filter(|u| !u.is_empty());
        self.conn.execute(
            "INSERT INTO passwords (name, value, url) VALUES (?, ?, ?)",
            params![name, value, url],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, credential = name, "saved credential");
        Ok(id)
    }

    /// All credentials, newest first
    pub fn list(&self) -> Result<Vec<Credential>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))?;

        let rows = stmt
            .query_map([], read_row)?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = rows.len(), "listed credentials");
        rows.into_iter().map(RawCredential::parse).collect()
    }

    /// Look up a single credential
    pub fn get(&self, id: i64) -> Result<Option<Credential>, StoreError> {
        self.conn
            .query_row(&format!("{} WHERE id = ?", SELECT_COLUMNS), params![id], read_row)
            .optional()?
            .map(RawCredential::parse)
            .transpose()
    }

    /// Delete a credential; `NotFound` when no row has this ID
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let affected = self
            .conn
            .execute("DELETE FROM passwords WHERE id = ?", params![id])?;

        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }

        info!(id, "deleted credential");
        Ok(())
    }
}

/// Row as read from SQLite, before the timestamp is parsed
struct RawCredential {
    id: i64,
    name: String,
    value: String,
    url: Option<String>,
    created_at: String,
}

impl RawCredential {
    fn parse(self) -> Result<Credential, StoreError> {
        Ok(Credential {
            id: self.id,
            name: self.name,
            value: self.value,
            url: self.url.filter(|u| !u.is_empty()),
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawCredential> {
    Ok(RawCredential {
        id: row.get(0)?,
        name: row.get(1)?,
        value: row.get(2)?,
        url: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// SQLite's CURRENT_TIMESTAMP is `YYYY-MM-DD HH:MM:SS` in UTC
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| StoreError::Timestamp(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_store_creation() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let db_path = tmp.path().join("passwords.db");
        let _store = CredentialStore::open(&db_path)?;
        assert!(db_path.exists());
        Ok(())
    }

    #[test]
    fn test_open_creates_parent_dir() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let db_path = tmp.path().join("nested").join("dir").join("passwords.db");
        let _store = CredentialStore::open(&db_path)?;
        assert!(db_path.exists());
        Ok(())
    }

    #[test]
    fn test_reopen_keeps_records() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let db_path = tmp.path().join("passwords.db");

        {
            let store = CredentialStore::open(&db_path)?;
            store.save("github", "s3cret!", Some("https://github.com"))?;
        }

        let store = CredentialStore::open(&db_path)?;
        let all = store.list()?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "github");
        assert_eq!(all[0].value, "s3cret!");
        assert_eq!(all[0].url.as_deref(), Some("https://github.com"));
        Ok(())
    }

    #[test]
    fn test_empty_list() -> anyhow::Result<()> {
        let store = CredentialStore::open_in_memory()?;
        assert!(store.list()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_and_get() -> anyhow::Result<()> {
        let store = CredentialStore::open_in_memory()?;
        let id = store.save("mail", "aB3xyz!", None)?;

        let record = store.get(id)?.expect("record exists");
        assert_eq!(record.id, id);
        assert_eq!(record.name, "mail");
        assert_eq!(record.value, "aB3xyz!");
        assert_eq!(record.url, None);
        assert!(store.get(id + 1)?.is_none());
        Ok(())
    }

    #[test]
    fn test_empty_url_is_none() -> anyhow::Result<()> {
        let store = CredentialStore::open_in_memory()?;
        let id = store.save("bank", "value", Some(""))?;
        assert_eq!(store.get(id)?.unwrap().url, None);
        Ok(())
    }

    #[test]
    fn test_list_newest_first() -> anyhow::Result<()> {
        let store = CredentialStore::open_in_memory()?;
        store.conn.execute(
            "INSERT INTO passwords (name, value, created_at) VALUES ('old', 'v', '2023-01-01 10:00:00')",
            [],
        )?;
        store.conn.execute(
            "INSERT INTO passwords (name, value, created_at) VALUES ('new', 'v', '2024-06-01 10:00:00')",
            [],
        )?;
        store.conn.execute(
            "INSERT INTO passwords (name, value, created_at) VALUES ('mid', 'v', '2023-08-15 09:30:00')",
            [],
        )?;

        let names: Vec<String> = store.list()?.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["new", "mid", "old"]);
        Ok(())
    }

    #[test]
    fn test_same_second_ties_by_id() -> anyhow::Result<()> {
        let store = CredentialStore::open_in_memory()?;
        let first = store.save("first", "v", None)?;
        let second = store.save("second", "v", None)?;

        let ids: Vec<i64> = store.list()?.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second, first]);
        Ok(())
    }

    #[test]
    fn test_created_at_parsed() -> anyhow::Result<()> {
        let store = CredentialStore::open_in_memory()?;
        store.conn.execute(
            "INSERT INTO passwords (name, value, created_at) VALUES ('x', 'v', '2024-03-09 07:05:42')",
            [],
        )?;
        let record = &store.list()?[0];
        assert_eq!(
            record.created_at,
            Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 42).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_delete() -> anyhow::Result<()> {
        let store = CredentialStore::open_in_memory()?;
        let keep = store.save("keep", "v", None)?;
        let gone = store.save("gone", "v", None)?;

        store.delete(gone)?;

        let ids: Vec<i64> = store.list()?.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![keep]);
        Ok(())
    }

    #[test]
    fn test_delete_not_found() -> anyhow::Result<()> {
        let store = CredentialStore::open_in_memory()?;
        let id = store.save("only", "v", None)?;

        let err = store.delete(id + 100).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(missing) if missing == id + 100));

        store.delete(id)?;
        assert!(matches!(store.delete(id), Err(StoreError::NotFound(_))));
        Ok(())
    }

    #[test]
    fn test_credential_json() -> anyhow::Result<()> {
        let store = CredentialStore::open_in_memory()?;
        let id = store.save("github", "aB3xyz!", Some("https://github.com"))?;

        let json = serde_json::to_value(store.get(id)?.unwrap())?;
        assert_eq!(json["id"], id);
        assert_eq!(json["name"], "github");
        assert_eq!(json["url"], "https://github.com");
        assert!(json["created_at"].is_string());
        Ok(())
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_timestamp("2024-01-02 03:04:05").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-02T03:04:05Z").unwrap(), expected);
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(StoreError::Timestamp(_))
        ));
    }
}
