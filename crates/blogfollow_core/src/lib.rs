//! Core domain logic for the blog follow subsystem.
//! This crate is the single source of truth for follow-relationship invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, LogLevel};
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::account::{Account, AccountId, AccountValidationError, NewAccount, Role};
pub use model::blog::{Blog, BlogDraft, BlogId, BlogValidationError};
pub use model::follow::FollowState;
pub use repo::sqlite::{SqliteRepository, SqliteStore};
pub use repo::{
    AccountRepository, BlogRepository, FollowRepository, RepoError, RepoResult, Repositories,
    UnitOfWork,
};
pub use service::account_service::{AccountService, AccountServiceError};
pub use service::blog_service::{
    BlogService, BlogServiceError, BlogServiceResult, FollowError, FollowRejection, Instance,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
