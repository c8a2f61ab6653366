//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define lookup-and-store contracts for accounts, blogs and follows.
//! - Define the transactional boundary (`UnitOfWork`) services run inside.
//! - Isolate SQLite query details from the follow state machine.
//!
//! # Invariants
//! - Lookups signal absence with `Ok(None)`, distinct from storage failures.
//! - Unique-constraint violations surface as `RepoError::Conflict`, never as
//!   opaque database errors.
//! - Every `UnitOfWork` closure either commits fully or leaves no trace.

use crate::db::DbError;
use crate::model::account::AccountId;
use crate::model::blog::BlogId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_repo;
pub mod blog_repo;
pub mod follow_repo;
pub mod sqlite;

pub use account_repo::AccountRepository;
pub use blog_repo::BlogRepository;
pub use follow_repo::FollowRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    AccountNotFound(AccountId),
    BlogNotFound(BlogId),
    FollowNotFound {
        account_id: AccountId,
        blog_id: BlogId,
    },
    /// A unique constraint rejected the write.
    Conflict(String),
    /// A storage-level guard (trigger) rejected the write.
    Rejected(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::AccountNotFound(id) => write!(f, "account not found: {id}"),
            Self::BlogNotFound(id) => write!(f, "blog not found: {id}"),
            Self::FollowNotFound {
                account_id,
                blog_id,
            } => write!(f, "no follow entry for account {account_id} on blog {blog_id}"),
            Self::Conflict(message) => write!(f, "unique constraint violated: {message}"),
            Self::Rejected(message) => write!(f, "write rejected by storage guard: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// All stores the follow state machine reads and writes in one unit of work.
pub trait Repositories: AccountRepository + BlogRepository + FollowRepository {}

impl<T: ?Sized> Repositories for T where T: AccountRepository + BlogRepository + FollowRepository {}

/// Transactional boundary around repository access.
///
/// Implementations must guarantee that a `write` closure observes no
/// concurrent writer between its first read and its commit.
pub trait UnitOfWork {
    /// Runs `work` in a serialized write transaction.
    ///
    /// Commits when `work` returns `Ok`; rolls back otherwise.
    fn write<T, E>(&mut self, work: impl FnOnce(&dyn Repositories) -> Result<T, E>) -> Result<T, E>
    where
        E: From<RepoError>;

    /// Runs `work` against one consistent snapshot.
    fn read<T, E>(&self, work: impl FnOnce(&dyn Repositories) -> Result<T, E>) -> Result<T, E>
    where
        E: From<RepoError>;
}

impl<U: UnitOfWork> UnitOfWork for &mut U {
    fn write<T, E>(&mut self, work: impl FnOnce(&dyn Repositories) -> Result<T, E>) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        (**self).write(work)
    }

    fn read<T, E>(&self, work: impl FnOnce(&dyn Repositories) -> Result<T, E>) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        (**self).read(work)
    }
}
