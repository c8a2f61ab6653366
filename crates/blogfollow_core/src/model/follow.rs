//! Per-(account, blog) follow state.
//!
//! # Invariants
//! - `Pending` is only reachable for private blogs.
//! - A blog owner is always `None` with respect to its own blog.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Relationship status between one account and one blog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowState {
    /// No follower entry and no pending request.
    None,
    /// Request sent to a private blog, awaiting accept/deny.
    Pending,
    /// Active follower.
    Following,
}

impl FollowState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::Following => "following",
        }
    }
}

impl Display for FollowState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
