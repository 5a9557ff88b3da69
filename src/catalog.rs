//! SQLite-backed game catalog.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, Row, params};
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::model::{Backend, CatalogEntry};

pub trait Catalog {
    fn list_entries(&self) -> Result<Vec<CatalogEntry>>;

    fn delete_entry(&mut self, id: i64) -> Result<()>;

    /// Makes pending deletions permanent.
    fn commit(&mut self) -> Result<()>;
}

pub struct SqliteCatalog {
    connection: Connection,
    in_transaction: bool,
}

impl SqliteCatalog {
    /// Opens an existing catalog and checks it looks like a game database.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        if !path.is_file() {
            return Err(SourceError::ResourceMissing {
                path: path.to_path_buf(),
            });
        }

        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|err| SourceError::malformed(path, err))?;

        connection
            .prepare("SELECT id, name, slug, directory FROM games")
            .map_err(|err| SourceError::malformed(path, format!("not a game catalog database: {err}")))?;

        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self {
            connection,
            in_transaction: false,
        }
    }
}

fn decode_entry(row: &Row<'_>) -> rusqlite::Result<CatalogEntry> {
    let runner: Option<String> = row.get(2)?;
    Ok(CatalogEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        backend: Backend::from_runner(runner.as_deref()),
        config_ref: row.get(3)?,
    })
}

impl Catalog for SqliteCatalog {
    fn list_entries(&self) -> Result<Vec<CatalogEntry>> {
        let mut statement = self
            .connection
            .prepare("SELECT id, name, runner, configpath FROM games")
            .context("failed to prepare catalog listing")?;
        let mut rows = statement.query([]).context("failed to list catalog entries")?;

        let mut entries = Vec::new();
        let mut position = 0_usize;
        while let Some(row) = rows.next().context("failed to read catalog row")? {
            match decode_entry(row) {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!(row = position, error = %err, "skipping malformed catalog row"),
            }
            position += 1;
        }

        debug!(count = entries.len(), "listed catalog entries");
        Ok(entries)
    }

    fn delete_entry(&mut self, id: i64) -> Result<()> {
        if !self.in_transaction {
            self.connection
                .execute_batch("BEGIN")
                .context("failed to begin catalog transaction")?;
            self.in_transaction = true;
        }

        self.connection
            .execute("DELETE FROM games WHERE id = ?1", params![id])
            .with_context(|| format!("failed to delete catalog entry {id}"))?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.in_transaction {
            self.connection
                .execute_batch("COMMIT")
                .context("failed to commit catalog changes")?;
            self.in_transaction = false;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::Path;

    use rusqlite::{Connection, params};

    /// Writes a minimal catalog with the given (name, runner, configpath) rows.
    pub(crate) fn write_catalog(path: &Path, rows: &[(&str, Option<&str>, Option<&str>)]) {
        let connection = Connection::open(path).expect("open fixture db");
        connection
            .execute_batch(
                "CREATE TABLE games (
                   id INTEGER PRIMARY KEY,
                   name TEXT,
                   slug TEXT,
                   directory TEXT,
                   runner TEXT,
                   configpath TEXT
                 );",
            )
            .expect("create games table");

        for (name, runner, configpath) in rows {
            connection
                .execute(
                    "INSERT INTO games (name, slug, directory, runner, configpath)
                     VALUES (?1, ?2, '', ?3, ?4)",
                    params![name, name.to_lowercase(), runner, configpath],
                )
                .expect("insert game");
        }
    }
}
