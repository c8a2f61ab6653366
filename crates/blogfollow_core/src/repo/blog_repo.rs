//! Blog repository contract and SQLite implementation.
//!
//! # Invariants
//! - Name matching is case-sensitive (`BINARY` collation).
//! - Substring search is literal: no wildcard or escape interpretation.
//! - Multi-row reads are ordered by creation sequence.

use crate::model::account::AccountId;
use crate::model::blog::{Blog, BlogId};
use crate::repo::sqlite::{bool_to_int, map_write_error, parse_uuid, SqliteRepository};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, OptionalExtension, Row};

pub(crate) const BLOG_SELECT_SQL: &str = "SELECT
    b.blog_id AS blog_id,
    b.name AS name,
    b.title AS title,
    b.description AS description,
    b.is_private AS is_private,
    b.owner_id AS owner_id
FROM blogs b";

/// Repository interface for blog lookups and persistence.
pub trait BlogRepository {
    fn find_blog_by_id(&self, blog_id: BlogId) -> RepoResult<Option<Blog>>;
    /// Exact, case-sensitive name match.
    fn find_blog_by_name(&self, name: &str) -> RepoResult<Option<Blog>>;
    /// Blogs whose name contains `fragment`, in creation order.
    fn find_blogs_by_name_containing(&self, fragment: &str) -> RepoResult<Vec<Blog>>;
    /// Persists a new blog; a taken name is a `Conflict`.
    fn insert_blog(&self, blog: &Blog) -> RepoResult<()>;
    /// Rewrites name, title and description. Owner and privacy are untouched.
    fn update_blog(&self, blog: &Blog) -> RepoResult<()>;
}

impl BlogRepository for SqliteRepository<'_> {
    fn find_blog_by_id(&self, blog_id: BlogId) -> RepoResult<Option<Blog>> {
        self.find_blog_where("b.blog_id = ?1", blog_id.to_string().as_str())
    }

    fn find_blog_by_name(&self, name: &str) -> RepoResult<Option<Blog>> {
        self.find_blog_where("b.name = ?1", name)
    }

    fn find_blogs_by_name_containing(&self, fragment: &str) -> RepoResult<Vec<Blog>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BLOG_SELECT_SQL}
             WHERE instr(b.name, ?1) > 0
             ORDER BY b.seq ASC;"
        ))?;
        let mut rows = stmt.query([fragment])?;
        let mut blogs = Vec::new();
        while let Some(row) = rows.next()? {
            blogs.push(parse_blog_row(row)?);
        }
        Ok(blogs)
    }

    fn insert_blog(&self, blog: &Blog) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO blogs (blog_id, name, title, description, is_private, owner_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    blog.blog_id.to_string(),
                    blog.name.as_str(),
                    blog.title.as_str(),
                    blog.description.as_str(),
                    bool_to_int(blog.is_private),
                    blog.owner.to_string(),
                ],
            )
            .map_err(map_write_error)?;
        Ok(())
    }

    fn update_blog(&self, blog: &Blog) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE blogs
                 SET
                    name = ?2,
                    title = ?3,
                    description = ?4,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE blog_id = ?1;",
                params![
                    blog.blog_id.to_string(),
                    blog.name.as_str(),
                    blog.title.as_str(),
                    blog.description.as_str(),
                ],
            )
            .map_err(map_write_error)?;

        if changed == 0 {
            return Err(RepoError::BlogNotFound(blog.blog_id));
        }
        Ok(())
    }
}

impl SqliteRepository<'_> {
    fn find_blog_where(&self, predicate: &str, value: &str) -> RepoResult<Option<Blog>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BLOG_SELECT_SQL} WHERE {predicate};"))?;
        stmt.query_row([value], |row| Ok(parse_blog_row(row)))
            .optional()?
            .transpose()
    }
}

pub(crate) fn parse_blog_row(row: &Row<'_>) -> RepoResult<Blog> {
    let blog_id_text: String = row.get("blog_id")?;
    let blog_id = BlogId(parse_uuid(&blog_id_text, "blogs.blog_id")?);

    let owner_text: String = row.get("owner_id")?;
    let owner = AccountId(parse_uuid(&owner_text, "blogs.owner_id")?);

    let is_private = match row.get::<_, i64>("is_private")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_private value `{other}` in blogs.is_private"
            )));
        }
    };

    Ok(Blog {
        blog_id,
        name: row.get("name")?,
        title: row.get("title")?,
        description: row.get("description")?,
        is_private,
        owner,
    })
}
