//! Blog use-case service: persistence of blogs and the follow state machine.
//!
//! # Responsibility
//! - Save/update blogs under the global name-uniqueness rule.
//! - Drive every (account, blog) pair through `None`, `Pending` and
//!   `Following` via follow, unfollow, accept and deny.
//! - Serve the follower, request and following views.
//!
//! # Invariants
//! - Identifiers are resolved (account first, then blog) before any state is
//!   inspected, so `InstanceNotFound` always wins over `Follow`.
//! - Each operation is one `UnitOfWork`: resolution, validation and mutation
//!   commit together; a rejected transition writes nothing.
//! - A blog owner is never in its own followers or requests.
//! - `Pending` is only entered for private blogs.
//!
//! `accept_follow_request` and `deny_follow_request` take the id of the
//! account whose request is being resolved, not the owner's.

use crate::model::account::{Account, AccountId};
use crate::model::blog::{Blog, BlogDraft, BlogId, BlogValidationError};
use crate::model::follow::FollowState;
use crate::repo::{RepoError, Repositories, UnitOfWork};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BlogServiceResult<T> = Result<T, BlogServiceError>;

/// Record kind referenced by an unresolved identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instance {
    Account(AccountId),
    Blog(BlogId),
}

impl Display for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Account(id) => write!(f, "account {id}"),
            Self::Blog(id) => write!(f, "blog {id}"),
        }
    }
}

/// Why a follow transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowRejection {
    /// The account owns the blog.
    OwnBlog,
    AlreadyFollowing,
    AlreadyRequested,
    NoPendingRequest,
    NotFollowing,
}

impl FollowRejection {
    fn as_str(self) -> &'static str {
        match self {
            Self::OwnBlog => "own_blog",
            Self::AlreadyFollowing => "already_following",
            Self::AlreadyRequested => "already_requested",
            Self::NoPendingRequest => "no_pending_request",
            Self::NotFollowing => "not_following",
        }
    }
}

/// Illegal transition for one (account, blog) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowError {
    pub account_id: AccountId,
    pub blog_id: BlogId,
    pub reason: FollowRejection,
}

impl Display for FollowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let reason = match self.reason {
            FollowRejection::OwnBlog => "account owns the blog",
            FollowRejection::AlreadyFollowing => "account already follows the blog",
            FollowRejection::AlreadyRequested => "account already has a pending request",
            FollowRejection::NoPendingRequest => "account has no pending request",
            FollowRejection::NotFollowing => "account does not follow the blog",
        };
        write!(
            f,
            "follow transition refused for account {} on blog {}: {reason}",
            self.account_id, self.blog_id
        )
    }
}

impl Error for FollowError {}

/// Service error for blog and follow use-cases.
#[derive(Debug)]
pub enum BlogServiceError {
    /// Another blog already uses this name.
    SaveNotAvailable { name: String },
    /// A referenced account or blog does not exist.
    InstanceNotFound(Instance),
    /// The transition is illegal in the pair's current state.
    Follow(FollowError),
    Validation(BlogValidationError),
    Repo(RepoError),
}

impl Display for BlogServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SaveNotAvailable { name } => write!(f, "blog name not available: `{name}`"),
            Self::InstanceNotFound(instance) => write!(f, "{instance} not found"),
            Self::Follow(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BlogServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Follow(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for BlogServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::AccountNotFound(id) => Self::InstanceNotFound(Instance::Account(id)),
            RepoError::BlogNotFound(id) => Self::InstanceNotFound(Instance::Blog(id)),
            other => Self::Repo(other),
        }
    }
}

impl From<BlogValidationError> for BlogServiceError {
    fn from(value: BlogValidationError) -> Self {
        Self::Validation(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Follow,
    Unfollow,
    Accept,
    Deny,
}

impl Transition {
    fn as_str(self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Unfollow => "unfollow",
            Self::Accept => "accept_follow_request",
            Self::Deny => "deny_follow_request",
        }
    }

    /// Decides the target state of a pair, or why the move is illegal.
    fn target(
        self,
        blog: &Blog,
        account_id: AccountId,
        current: FollowState,
    ) -> Result<FollowState, FollowRejection> {
        let is_owner = blog.is_owned_by(account_id);
        match (self, current) {
            (Self::Follow | Self::Accept | Self::Deny, _) if is_owner => {
                Err(FollowRejection::OwnBlog)
            }
            (Self::Follow, FollowState::None) if blog.is_private => Ok(FollowState::Pending),
            (Self::Follow, FollowState::None) => Ok(FollowState::Following),
            (Self::Follow, FollowState::Pending) => Err(FollowRejection::AlreadyRequested),
            (Self::Follow, FollowState::Following) => Err(FollowRejection::AlreadyFollowing),
            (Self::Unfollow, FollowState::Following) => Ok(FollowState::None),
            (Self::Unfollow, _) => Err(FollowRejection::NotFollowing),
            (Self::Accept, FollowState::Pending) => Ok(FollowState::Following),
            (Self::Deny, FollowState::Pending) => Ok(FollowState::None),
            (Self::Accept | Self::Deny, _) => Err(FollowRejection::NoPendingRequest),
        }
    }
}

/// Blog service facade over a transactional store.
pub struct BlogService<S: UnitOfWork> {
    store: S,
}

impl<S: UnitOfWork> BlogService<S> {
    /// Creates a service using the provided unit of work.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persists a new blog and assigns its identity.
    ///
    /// # Errors
    /// - `Validation` for a blank name or title.
    /// - `InstanceNotFound` when the owner account does not exist.
    /// - `SaveNotAvailable` when another blog already uses the name.
    pub fn save(&mut self, draft: BlogDraft) -> BlogServiceResult<Blog> {
        draft.validate()?;

        let result = self.store.write(|repos| -> BlogServiceResult<Blog> {
            require_account(repos, draft.owner)?;
            if repos.find_blog_by_name(&draft.name)?.is_some() {
                return Err(BlogServiceError::SaveNotAvailable { name: draft.name });
            }

            let blog = draft.into_blog(BlogId::generate());
            repos
                .insert_blog(&blog)
                .map_err(|err| name_conflict(err, &blog.name))?;
            Ok(blog)
        });

        match &result {
            Ok(blog) => info!(
                "event=blog_save module=service status=ok blog_id={} owner_id={} private={}",
                blog.blog_id, blog.owner, blog.is_private
            ),
            Err(err) => log_failure("blog_save", err),
        }
        result
    }

    /// Persists edited name, title and description of an existing blog.
    ///
    /// Owner and privacy are immutable; the stored values are kept whatever
    /// `blog` carries. Returns the blog as stored.
    ///
    /// # Errors
    /// - `Validation` for a blank name or title.
    /// - `InstanceNotFound` when no blog has this id.
    /// - `SaveNotAvailable` when a different blog already uses the name.
    pub fn update(&mut self, blog: &Blog) -> BlogServiceResult<Blog> {
        blog.validate()?;

        let result = self.store.write(|repos| -> BlogServiceResult<Blog> {
            let stored = require_blog(repos, blog.blog_id)?;
            if let Some(holder) = repos.find_blog_by_name(&blog.name)? {
                if holder.blog_id != blog.blog_id {
                    return Err(BlogServiceError::SaveNotAvailable {
                        name: blog.name.clone(),
                    });
                }
            }

            let updated = Blog {
                name: blog.name.clone(),
                title: blog.title.clone(),
                description: blog.description.clone(),
                ..stored
            };
            repos
                .update_blog(&updated)
                .map_err(|err| name_conflict(err, &updated.name))?;
            Ok(updated)
        });

        match &result {
            Ok(updated) => info!(
                "event=blog_update module=service status=ok blog_id={}",
                updated.blog_id
            ),
            Err(err) => log_failure("blog_update", err),
        }
        result
    }

    /// Follows a blog: immediately when public, as a pending request when
    /// private.
    ///
    /// # Errors
    /// - `InstanceNotFound` for an unknown account or blog.
    /// - `Follow` when the account owns the blog or the pair is not `None`.
    pub fn follow(&mut self, account_id: AccountId, blog_id: BlogId) -> BlogServiceResult<()> {
        self.transition(Transition::Follow, account_id, blog_id)
    }

    /// Stops following a blog.
    ///
    /// # Errors
    /// - `InstanceNotFound` for an unknown account or blog.
    /// - `Follow` when the pair is not `Following`.
    pub fn unfollow(&mut self, account_id: AccountId, blog_id: BlogId) -> BlogServiceResult<()> {
        self.transition(Transition::Unfollow, account_id, blog_id)
    }

    /// Turns the pending request of `account_id` into an active follow.
    ///
    /// The account is appended to the end of the follower views.
    ///
    /// # Errors
    /// - `InstanceNotFound` for an unknown account or blog.
    /// - `Follow` when the account owns the blog or has no pending request.
    pub fn accept_follow_request(
        &mut self,
        account_id: AccountId,
        blog_id: BlogId,
    ) -> BlogServiceResult<()> {
        self.transition(Transition::Accept, account_id, blog_id)
    }

    /// Drops the pending request of `account_id`.
    ///
    /// # Errors
    /// - `InstanceNotFound` for an unknown account or blog.
    /// - `Follow` when the account owns the blog or has no pending request.
    pub fn deny_follow_request(
        &mut self,
        account_id: AccountId,
        blog_id: BlogId,
    ) -> BlogServiceResult<()> {
        self.transition(Transition::Deny, account_id, blog_id)
    }

    /// Exact, case-sensitive name lookup. No match is `Ok(None)`.
    pub fn find_blog_by_name(&self, name: &str) -> BlogServiceResult<Option<Blog>> {
        self.store
            .read(|repos| -> BlogServiceResult<Option<Blog>> {
                Ok(repos.find_blog_by_name(name)?)
            })
    }

    /// Lookup by identity. No match is `Ok(None)`.
    pub fn find_blog(&self, blog_id: BlogId) -> BlogServiceResult<Option<Blog>> {
        self.store
            .read(|repos| -> BlogServiceResult<Option<Blog>> {
                Ok(repos.find_blog_by_id(blog_id)?)
            })
    }

    /// Blogs whose name contains `fragment` literally, in creation order.
    pub fn find_blogs(&self, fragment: &str) -> BlogServiceResult<Vec<Blog>> {
        self.store.read(|repos| -> BlogServiceResult<Vec<Blog>> {
            Ok(repos.find_blogs_by_name_containing(fragment)?)
        })
    }

    /// Returns whether `account_id` actively follows `blog_id`.
    pub fn is_follower(&self, account_id: AccountId, blog_id: BlogId) -> BlogServiceResult<bool> {
        Ok(self.follow_state(account_id, blog_id)? == FollowState::Following)
    }

    /// Returns whether `account_id` has a pending request on `blog_id`.
    pub fn is_follow_request(
        &self,
        account_id: AccountId,
        blog_id: BlogId,
    ) -> BlogServiceResult<bool> {
        Ok(self.follow_state(account_id, blog_id)? == FollowState::Pending)
    }

    /// Current state of one pair. The owner always reads `None`.
    pub fn follow_state(
        &self,
        account_id: AccountId,
        blog_id: BlogId,
    ) -> BlogServiceResult<FollowState> {
        self.store.read(|repos| -> BlogServiceResult<FollowState> {
            resolve_pair(repos, account_id, blog_id)?;
            Ok(repos.follow_state(account_id, blog_id)?)
        })
    }

    /// Followers of a blog in the order their follows were established.
    pub fn followers(&self, blog_id: BlogId) -> BlogServiceResult<Vec<Account>> {
        self.store.read(|repos| -> BlogServiceResult<Vec<Account>> {
            require_blog(repos, blog_id)?;
            Ok(repos.list_followers(blog_id)?)
        })
    }

    /// Pending requesters of a blog in request order.
    pub fn follow_requests(&self, blog_id: BlogId) -> BlogServiceResult<Vec<Account>> {
        self.store.read(|repos| -> BlogServiceResult<Vec<Account>> {
            require_blog(repos, blog_id)?;
            Ok(repos.list_follow_requests(blog_id)?)
        })
    }

    /// Blogs an account follows in the order the follows were established.
    pub fn following_blogs(&self, account_id: AccountId) -> BlogServiceResult<Vec<Blog>> {
        self.store.read(|repos| -> BlogServiceResult<Vec<Blog>> {
            require_account(repos, account_id)?;
            Ok(repos.list_following_blogs(account_id)?)
        })
    }

    fn transition(
        &mut self,
        transition: Transition,
        account_id: AccountId,
        blog_id: BlogId,
    ) -> BlogServiceResult<()> {
        let result = self
            .store
            .write(|repos| -> BlogServiceResult<(FollowState, FollowState)> {
                let blog = resolve_pair(repos, account_id, blog_id)?;
                let current = repos.follow_state(account_id, blog_id)?;
                let target = transition
                    .target(&blog, account_id, current)
                    .map_err(|reason| {
                        BlogServiceError::Follow(FollowError {
                            account_id,
                            blog_id,
                            reason,
                        })
                    })?;

                if current != FollowState::None {
                    repos.delete_follow(account_id, blog_id)?;
                }
                if target != FollowState::None {
                    repos.insert_follow(account_id, blog_id, target)?;
                }
                Ok((current, target))
            });

        match result {
            Ok((from, to)) => {
                info!(
                    "event=follow_transition module=service status=ok op={} account_id={account_id} blog_id={blog_id} from={from} to={to}",
                    transition.as_str()
                );
                Ok(())
            }
            Err(BlogServiceError::Follow(err)) => {
                info!(
                    "event=follow_transition module=service status=rejected op={} account_id={account_id} blog_id={blog_id} reason={}",
                    transition.as_str(),
                    err.reason.as_str()
                );
                Err(BlogServiceError::Follow(err))
            }
            Err(err) => {
                log_failure(transition.as_str(), &err);
                Err(err)
            }
        }
    }
}

fn require_account(repos: &dyn Repositories, account_id: AccountId) -> BlogServiceResult<Account> {
    repos
        .find_account_by_id(account_id)?
        .ok_or(BlogServiceError::InstanceNotFound(Instance::Account(
            account_id,
        )))
}

fn require_blog(repos: &dyn Repositories, blog_id: BlogId) -> BlogServiceResult<Blog> {
    repos
        .find_blog_by_id(blog_id)?
        .ok_or(BlogServiceError::InstanceNotFound(Instance::Blog(blog_id)))
}

fn resolve_pair(
    repos: &dyn Repositories,
    account_id: AccountId,
    blog_id: BlogId,
) -> BlogServiceResult<Blog> {
    require_account(repos, account_id)?;
    require_blog(repos, blog_id)
}

/// Storage-level unique violation on the blog name, e.g. a racing writer.
fn name_conflict(err: RepoError, name: &str) -> BlogServiceError {
    match err {
        RepoError::Conflict(_) => BlogServiceError::SaveNotAvailable {
            name: name.to_string(),
        },
        other => other.into(),
    }
}

fn log_failure(event: &str, err: &BlogServiceError) {
    match err {
        BlogServiceError::Repo(inner) => {
            error!("event={event} module=service status=error error={inner}");
        }
        other => info!("event={event} module=service status=rejected error={other}"),
    }
}
