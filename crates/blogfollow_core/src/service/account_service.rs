//! Account use-case service.
//!
//! Accounts are owned by an external account subsystem; this service covers
//! the slice the follow state machine depends on: creating accounts with
//! unique usernames and emails, and looking them up.

use crate::model::account::{Account, AccountId, AccountValidationError, NewAccount};
use crate::repo::{RepoError, UnitOfWork};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for account use-cases.
#[derive(Debug)]
pub enum AccountServiceError {
    Validation(AccountValidationError),
    /// `field` (`username` or `email`) is already taken.
    SaveNotAvailable { field: &'static str, value: String },
    Repo(RepoError),
}

impl Display for AccountServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::SaveNotAvailable { field, value } => {
                write!(f, "account {field} not available: `{value}`")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::SaveNotAvailable { .. } => None,
        }
    }
}

impl From<RepoError> for AccountServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<AccountValidationError> for AccountServiceError {
    fn from(value: AccountValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Account service facade over a transactional store.
pub struct AccountService<S: UnitOfWork> {
    store: S,
}

impl<S: UnitOfWork> AccountService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates an account and assigns its identity.
    ///
    /// Username is checked before email.
    pub fn save(&mut self, input: NewAccount) -> Result<Account, AccountServiceError> {
        input.validate()?;

        let account = self
            .store
            .write(|repos| -> Result<Account, AccountServiceError> {
                if repos.find_account_by_username(&input.username)?.is_some() {
                    return Err(AccountServiceError::SaveNotAvailable {
                        field: "username",
                        value: input.username,
                    });
                }
                if repos.find_account_by_email(&input.email)?.is_some() {
                    return Err(AccountServiceError::SaveNotAvailable {
                        field: "email",
                        value: input.email,
                    });
                }

                let account = input.into_account(AccountId::generate());
                repos.insert_account(&account)?;
                Ok(account)
            })?;

        info!(
            "event=account_save module=service status=ok account_id={} role={}",
            account.id,
            account.role.as_str()
        );
        Ok(account)
    }

    pub fn find_account(&self, id: AccountId) -> Result<Option<Account>, AccountServiceError> {
        self.store
            .read(|repos| -> Result<Option<Account>, AccountServiceError> {
                Ok(repos.find_account_by_id(id)?)
            })
    }

    pub fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, AccountServiceError> {
        self.store
            .read(|repos| -> Result<Option<Account>, AccountServiceError> {
                Ok(repos.find_account_by_username(username)?)
            })
    }
}
