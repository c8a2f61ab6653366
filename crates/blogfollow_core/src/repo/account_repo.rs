//! Account repository contract and SQLite implementation.
//!
//! Accounts belong to an external account subsystem; the follow state machine
//! only needs identity lookups and a way to seed records.

use crate::model::account::{Account, AccountId, Role};
use crate::repo::sqlite::{map_write_error, parse_uuid, SqliteRepository};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, OptionalExtension, Row};

pub(crate) const ACCOUNT_SELECT_SQL: &str = "SELECT
    a.id AS id,
    a.email AS email,
    a.username AS username,
    a.role AS role,
    a.credential AS credential
FROM accounts a";

/// Repository interface for account lookups and persistence.
pub trait AccountRepository {
    fn find_account_by_id(&self, id: AccountId) -> RepoResult<Option<Account>>;
    fn find_account_by_username(&self, username: &str) -> RepoResult<Option<Account>>;
    fn find_account_by_email(&self, email: &str) -> RepoResult<Option<Account>>;
    /// Persists a new account; a taken id, email or username is a `Conflict`.
    fn insert_account(&self, account: &Account) -> RepoResult<()>;
}

impl AccountRepository for SqliteRepository<'_> {
    fn find_account_by_id(&self, id: AccountId) -> RepoResult<Option<Account>> {
        self.find_account_where("a.id = ?1", id.to_string().as_str())
    }

    fn find_account_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        self.find_account_where("a.username = ?1", username)
    }

    fn find_account_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        self.find_account_where("a.email = ?1", email)
    }

    fn insert_account(&self, account: &Account) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO accounts (id, email, username, role, credential)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    account.id.to_string(),
                    account.email.as_str(),
                    account.username.as_str(),
                    account.role.as_str(),
                    account.credential.as_str(),
                ],
            )
            .map_err(map_write_error)?;
        Ok(())
    }
}

impl SqliteRepository<'_> {
    fn find_account_where(&self, predicate: &str, value: &str) -> RepoResult<Option<Account>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACCOUNT_SELECT_SQL} WHERE {predicate};"))?;
        stmt.query_row([value], |row| Ok(parse_account_row(row)))
            .optional()?
            .transpose()
    }
}

pub(crate) fn parse_account_row(row: &Row<'_>) -> RepoResult<Account> {
    let id_text: String = row.get("id")?;
    let id = AccountId(parse_uuid(&id_text, "accounts.id")?);

    let role_text: String = row.get("role")?;
    let role = Role::parse(&role_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid role `{role_text}` in accounts.role"))
    })?;

    Ok(Account {
        id,
        email: row.get("email")?,
        username: row.get("username")?,
        role,
        credential: row.get("credential")?,
    })
}
