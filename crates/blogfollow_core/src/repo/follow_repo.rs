//! Follow relation repository contract and SQLite implementation.
//!
//! The relation is stored once, keyed by `(account_id, blog_id)`, with a
//! `state` column and a monotonically increasing `seq`. A blog's followers,
//! a blog's pending requests and an account's followed blogs are all filtered
//! views over that one table, so they can never disagree.
//!
//! # Invariants
//! - At most one row per pair: followers and requests are disjoint.
//! - Rows are inserted or deleted, never updated; a state change is a delete
//!   plus an insert, which moves the pair to the end of its view.
//! - Storage triggers reject owner rows and pending rows on public blogs.

use crate::model::account::{Account, AccountId};
use crate::model::blog::{Blog, BlogId};
use crate::model::follow::FollowState;
use crate::repo::account_repo::{parse_account_row, ACCOUNT_SELECT_SQL};
use crate::repo::blog_repo::{parse_blog_row, BLOG_SELECT_SQL};
use crate::repo::sqlite::{map_write_error, SqliteRepository};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, OptionalExtension};

/// Repository interface for the follow relation.
pub trait FollowRepository {
    /// Current state of one pair; `FollowState::None` when no row exists.
    fn follow_state(&self, account_id: AccountId, blog_id: BlogId) -> RepoResult<FollowState>;
    /// Records a `Pending` or `Following` row for a pair that has none.
    fn insert_follow(
        &self,
        account_id: AccountId,
        blog_id: BlogId,
        state: FollowState,
    ) -> RepoResult<()>;
    /// Removes the pair's row and returns the state it held.
    fn delete_follow(&self, account_id: AccountId, blog_id: BlogId) -> RepoResult<FollowState>;
    /// Followers of a blog in establishment order.
    fn list_followers(&self, blog_id: BlogId) -> RepoResult<Vec<Account>>;
    /// Pending requesters of a blog in request order.
    fn list_follow_requests(&self, blog_id: BlogId) -> RepoResult<Vec<Account>>;
    /// Blogs an account follows in establishment order.
    fn list_following_blogs(&self, account_id: AccountId) -> RepoResult<Vec<Blog>>;
}

impl FollowRepository for SqliteRepository<'_> {
    fn follow_state(&self, account_id: AccountId, blog_id: BlogId) -> RepoResult<FollowState> {
        let state: Option<String> = self
            .conn
            .query_row(
                "SELECT state FROM follows WHERE account_id = ?1 AND blog_id = ?2;",
                params![account_id.to_string(), blog_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match state {
            None => Ok(FollowState::None),
            Some(value) => parse_follow_state(&value),
        }
    }

    fn insert_follow(
        &self,
        account_id: AccountId,
        blog_id: BlogId,
        state: FollowState,
    ) -> RepoResult<()> {
        let state_text = follow_state_to_db(state).ok_or_else(|| {
            RepoError::InvalidData("cannot persist follow state `none`".to_string())
        })?;

        self.conn
            .execute(
                "INSERT INTO follows (account_id, blog_id, state) VALUES (?1, ?2, ?3);",
                params![account_id.to_string(), blog_id.to_string(), state_text],
            )
            .map_err(map_write_error)?;
        Ok(())
    }

    fn delete_follow(&self, account_id: AccountId, blog_id: BlogId) -> RepoResult<FollowState> {
        let previous = self.follow_state(account_id, blog_id)?;
        if previous == FollowState::None {
            return Err(RepoError::FollowNotFound {
                account_id,
                blog_id,
            });
        }

        self.conn.execute(
            "DELETE FROM follows WHERE account_id = ?1 AND blog_id = ?2;",
            params![account_id.to_string(), blog_id.to_string()],
        )?;
        Ok(previous)
    }

    fn list_followers(&self, blog_id: BlogId) -> RepoResult<Vec<Account>> {
        self.list_accounts_in_state(blog_id, FollowState::Following)
    }

    fn list_follow_requests(&self, blog_id: BlogId) -> RepoResult<Vec<Account>> {
        self.list_accounts_in_state(blog_id, FollowState::Pending)
    }

    fn list_following_blogs(&self, account_id: AccountId) -> RepoResult<Vec<Blog>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BLOG_SELECT_SQL}
             INNER JOIN follows f ON f.blog_id = b.blog_id
             WHERE f.account_id = ?1
               AND f.state = 'following'
             ORDER BY f.seq ASC;"
        ))?;
        let mut rows = stmt.query([account_id.to_string()])?;
        let mut blogs = Vec::new();
        while let Some(row) = rows.next()? {
            blogs.push(parse_blog_row(row)?);
        }
        Ok(blogs)
    }
}

impl SqliteRepository<'_> {
    fn list_accounts_in_state(
        &self,
        blog_id: BlogId,
        state: FollowState,
    ) -> RepoResult<Vec<Account>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ACCOUNT_SELECT_SQL}
             INNER JOIN follows f ON f.account_id = a.id
             WHERE f.blog_id = ?1
               AND f.state = ?2
             ORDER BY f.seq ASC;"
        ))?;
        let mut rows = stmt.query(params![blog_id.to_string(), follow_state_to_db(state)])?;
        let mut accounts = Vec::new();
        while let Some(row) = rows.next()? {
            accounts.push(parse_account_row(row)?);
        }
        Ok(accounts)
    }
}

fn follow_state_to_db(state: FollowState) -> Option<&'static str> {
    match state {
        FollowState::None => None,
        FollowState::Pending => Some("pending"),
        FollowState::Following => Some("following"),
    }
}

fn parse_follow_state(value: &str) -> RepoResult<FollowState> {
    match value {
        "pending" => Ok(FollowState::Pending),
        "following" => Ok(FollowState::Following),
        other => Err(RepoError::InvalidData(format!(
            "invalid follow state `{other}` in follows.state"
        ))),
    }
}
