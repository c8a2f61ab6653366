//! SQLite-backed repositories and unit of work.
//!
//! # Responsibility
//! - Bind repository traits to one migrated SQLite connection.
//! - Map SQLite constraint failures to semantic repository errors.
//!
//! # Invariants
//! - Write units run under `BEGIN IMMEDIATE`: the database write lock is held
//!   from the first read, so read-validate-write never interleaves with
//!   another writer, across connections and processes.
//! - Read units run in a deferred transaction for a consistent snapshot.

use crate::db::migrations::latest_version;
use crate::repo::{RepoError, RepoResult, Repositories, UnitOfWork};
use rusqlite::{ffi, Connection, TransactionBehavior};
use uuid::Uuid;

const REQUIRED_TABLES: [&str; 3] = ["accounts", "blogs", "follows"];

/// Repository implementation over a borrowed connection or transaction.
///
/// Implements `AccountRepository`, `BlogRepository` and `FollowRepository`.
pub struct SqliteRepository<'conn> {
    pub(crate) conn: &'conn Connection,
}

impl<'conn> SqliteRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self::new(conn))
    }

    fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

/// Unit of work owning one migrated connection.
///
/// Each thread or caller that needs independent transactions owns its own
/// store; several stores may point at the same database file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Gives the connection back, e.g. for direct inspection in tests.
    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl UnitOfWork for SqliteStore {
    fn write<T, E>(&mut self, work: impl FnOnce(&dyn Repositories) -> Result<T, E>) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;
        let value = work(&SqliteRepository::new(&tx))?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }

    fn read<T, E>(&self, work: impl FnOnce(&dyn Repositories) -> Result<T, E>) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        let tx = self.conn.unchecked_transaction().map_err(RepoError::from)?;
        let value = work(&SqliteRepository::new(&tx))?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }
}

/// Maps write-path SQLite failures to semantic repository errors.
pub(crate) fn map_write_error(err: rusqlite::Error) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        let detail = message.clone().unwrap_or_else(|| failure.to_string());
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                return RepoError::Conflict(detail);
            }
            ffi::SQLITE_CONSTRAINT_TRIGGER => return RepoError::Rejected(detail),
            _ => {}
        }
    }
    RepoError::from(err)
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
