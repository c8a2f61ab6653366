//! Account domain model.
//!
//! # Responsibility
//! - Define the identity unit that owns and follows blogs.
//! - Validate account input before persistence.
//!
//! # Invariants
//! - `id` is assigned once on save and never reused.
//! - Two accounts are equal iff their ids are equal.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email regex"));

/// Stable account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authorization role attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    /// Literal used in storage and serialized forms.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "ROLE_USER",
            Self::Admin => "ROLE_ADMIN",
        }
    }

    /// Parses the storage literal.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ROLE_USER" => Some(Self::User),
            "ROLE_ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Validation failures for account input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    BlankUsername,
    InvalidEmail(String),
}

impl Display for AccountValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankUsername => write!(f, "username must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
        }
    }
}

impl Error for AccountValidationError {}

/// Transient account input, before identity is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub role: Role,
    /// Opaque credential material; verified by the external auth subsystem.
    pub credential: String,
}

impl NewAccount {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        role: Role,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            role,
            credential: credential.into(),
        }
    }

    /// Checks username and email shape.
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.username.trim().is_empty() {
            return Err(AccountValidationError::BlankUsername);
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(AccountValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }

    /// Binds this input to a persisted identity.
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            email: self.email,
            username: self.username,
            role: self.role,
            credential: self.credential,
        }
    }
}

/// Persisted account record.
///
/// The set of followed blogs is a view served by `BlogService::following_blogs`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub username: String,
    pub role: Role,
    #[serde(skip_serializing, default)]
    pub credential: String,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
