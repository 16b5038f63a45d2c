//! SQLite-backed catalog of repositories to mirror.
//!
//! The catalog is a plain table administered out-of-band (`sqlite3` CLI or
//! whatever writes rows); this side only bootstraps the schema when the file
//! is fresh and reads the rows back. Schema bootstrap checks `sqlite_master`
//! for the known tables and creates the missing ones, so a repeated run
//! never re-issues DDL.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::{ParseError, RepoKey};

/// Fixed DDL for the known tables. Kept byte-compatible with existing
/// catalog files: no constraints beyond the column types.
const KNOWN_TABLES: &[(&str, &str)] = &[(
    "repos",
    "CREATE TABLE repos (id INTEGER, user_name VARCHAR, repo_name VARCHAR)",
)];

/// Errors returned by catalog operations. All of these are fatal to the
/// pass: without a readable catalog there is nothing to sync.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to open catalog {path}: {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    #[error("failed to create catalog table {table}: {source}")]
    Schema {
        table: String,
        source: rusqlite::Error,
    },
    #[error("catalog query failed: {0}")]
    Query(#[from] rusqlite::Error),
    #[error("failed to close catalog: {0}")]
    Close(rusqlite::Error),
}

/// One row of the `repos` table, as stored.
///
/// The identity columns are raw strings; [`CatalogEntry::repo_key`] parses
/// them into a validated [`RepoKey`] at read time.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: i64,
    pub user_name: String,
    pub repo_name: String,
}

impl CatalogEntry {
    /// Parse the identity columns into a validated key.
    pub fn repo_key(&self) -> Result<RepoKey, ParseError> {
        RepoKey::from_parts(&self.user_name, &self.repo_name)
    }
}

/// Handle on the open catalog database.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open (or create) the catalog file.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(|source| CatalogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { conn })
    }

    /// Create any known table that does not exist yet. Idempotent: existing
    /// tables (recognized or not) are left untouched, so repeated runs are
    /// safe and never touch stored rows.
    pub fn ensure_schema(&self) -> Result<(), CatalogError> {
        let existing = self.table_names()?;

        for (table, ddl) in KNOWN_TABLES {
            if !existing.iter().any(|name| name == table) {
                log::info!("creating catalog table {}", table);
                self.conn
                    .execute(ddl, [])
                    .map_err(|source| CatalogError::Schema {
                        table: (*table).to_string(),
                        source,
                    })?;
            }
        }

        Ok(())
    }

    fn table_names(&self) -> Result<Vec<String>, CatalogError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Begin a single pass over the `repos` table.
    ///
    /// Rows are produced lazily from the underlying cursor, one at a time and
    /// in no guaranteed order, so a large catalog never has to fit in memory.
    pub fn entries(&self) -> Result<EntryCursor<'_>, CatalogError> {
        let stmt = self
            .conn
            .prepare("SELECT id, user_name, repo_name FROM repos")?;
        Ok(EntryCursor { stmt })
    }

    /// Close the connection, surfacing any pending failure. Dropping a
    /// `Catalog` also closes the connection, so error paths that unwind past
    /// the handle still release it; this explicit form exists so the normal
    /// path can report a close failure instead of swallowing it.
    pub fn close(self) -> Result<(), CatalogError> {
        self.conn.close().map_err(|(_, e)| CatalogError::Close(e))
    }

    #[cfg(test)]
    fn insert_row(&self, id: i64, user_name: &str, repo_name: &str) {
        self.conn
            .execute(
                "INSERT INTO repos (id, user_name, repo_name) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, user_name, repo_name],
            )
            .unwrap();
    }
}

/// A finite, single-pass cursor over catalog entries.
pub struct EntryCursor<'conn> {
    stmt: rusqlite::Statement<'conn>,
}

impl EntryCursor<'_> {
    /// Iterate the rows. Each row is decoded as it is pulled; a decode or
    /// storage error surfaces on that element.
    pub fn rows(
        &mut self,
    ) -> Result<impl Iterator<Item = Result<CatalogEntry, CatalogError>> + '_, CatalogError> {
        let rows = self.stmt.query_map([], |row| {
            Ok(CatalogEntry {
                id: row.get(0)?,
                user_name: row.get(1)?,
                repo_name: row.get(2)?,
            })
        })?;
        Ok(rows.map(|row| row.map_err(CatalogError::from)))
    }
}
