//! Blog domain model.
//!
//! # Responsibility
//! - Define the followable unit: name, owner and privacy flag.
//! - Validate editable attributes before persistence.
//!
//! # Invariants
//! - `name` is globally unique (case-sensitive); enforced by storage and
//!   pre-checked by `BlogService`.
//! - `owner` and `is_private` are fixed at creation.
//! - Two blogs are equal iff their `blog_id`s are equal.

use crate::model::account::AccountId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Stable blog identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlogId(pub Uuid);

impl BlogId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for BlogId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures for blog attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogValidationError {
    BlankName,
    BlankTitle,
}

impl Display for BlogValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "blog name must not be blank"),
            Self::BlankTitle => write!(f, "blog title must not be blank"),
        }
    }
}

impl Error for BlogValidationError {}

/// Transient blog, before identity is assigned by `BlogService::save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogDraft {
    pub name: String,
    pub title: String,
    pub description: String,
    pub is_private: bool,
    pub owner: AccountId,
}

impl BlogDraft {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        is_private: bool,
        owner: AccountId,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: description.into(),
            is_private,
            owner,
        }
    }

    pub fn validate(&self) -> Result<(), BlogValidationError> {
        validate_attributes(&self.name, &self.title)
    }

    /// Binds this draft to a persisted identity.
    pub fn into_blog(self, blog_id: BlogId) -> Blog {
        Blog {
            blog_id,
            name: self.name,
            title: self.title,
            description: self.description,
            is_private: self.is_private,
            owner: self.owner,
        }
    }
}

/// Persisted blog record.
///
/// Followers and pending requests are views served by `BlogService`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub blog_id: BlogId,
    pub name: String,
    pub title: String,
    pub description: String,
    pub is_private: bool,
    pub owner: AccountId,
}

impl Blog {
    pub fn validate(&self) -> Result<(), BlogValidationError> {
        validate_attributes(&self.name, &self.title)
    }

    pub fn is_owned_by(&self, account_id: AccountId) -> bool {
        self.owner == account_id
    }
}

impl PartialEq for Blog {
    fn eq(&self, other: &Self) -> bool {
        self.blog_id == other.blog_id
    }
}

impl Eq for Blog {}

impl Hash for Blog {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.blog_id.hash(state);
    }
}

fn validate_attributes(name: &str, title: &str) -> Result<(), BlogValidationError> {
    if name.trim().is_empty() {
        return Err(BlogValidationError::BlankName);
    }
    if title.trim().is_empty() {
        return Err(BlogValidationError::BlankTitle);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BlogDraft, BlogId, BlogValidationError};
    use crate::model::account::AccountId;
    use std::collections::HashSet;

    fn draft() -> BlogDraft {
        BlogDraft::new(
            "MyBlog",
            "AdriBlog",
            "This is the blog of Adri",
            false,
            AccountId::generate(),
        )
    }

    #[test]
    fn validate_rejects_blank_name_before_title() {
        let mut blank = draft();
        blank.name = " ".to_string();
        blank.title = String::new();
        assert_eq!(blank.validate(), Err(BlogValidationError::BlankName));
    }

    #[test]
    fn validate_rejects_blank_title() {
        let mut blank = draft();
        blank.title = "\t".to_string();
        assert_eq!(blank.validate(), Err(BlogValidationError::BlankTitle));
    }

    #[test]
    fn equality_and_hash_use_blog_id_only() {
        let id = BlogId::generate();
        let blog = draft().into_blog(id);
        let mut edited = blog.clone();
        edited.title = "Renamed".to_string();
        assert_eq!(blog, edited);

        let mut set = HashSet::new();
        set.insert(blog);
        assert!(!set.insert(edited));
    }

    #[test]
    fn ownership_check_compares_owner_id() {
        let owner = AccountId::generate();
        let mut draft = draft();
        draft.owner = owner;
        let blog = draft.into_blog(BlogId::generate());
        assert!(blog.is_owned_by(owner));
        assert!(!blog.is_owned_by(AccountId::generate()));
    }
}
