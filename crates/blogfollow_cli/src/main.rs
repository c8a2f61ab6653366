//! CLI probe over a blog follow database.
//!
//! # Responsibility
//! - Verify `blogfollow_core` linkage and schema bootstrap from a shell.
//! - List blogs whose name contains an optional fragment.
//!
//! Settings come from `BLOGFOLLOW_DB_PATH`, `BLOGFOLLOW_LOG_LEVEL` and
//! `BLOGFOLLOW_LOG_DIR`.

use blogfollow_core::db::open_db;
use blogfollow_core::{init_logging, BlogService, CoreConfig, SqliteStore};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("blogfollow: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)?;
    }

    let fragment = std::env::args().nth(1).unwrap_or_default();
    let service = BlogService::new(SqliteStore::try_new(open_db(&config.db_path)?)?);
    let blogs = service.find_blogs(&fragment)?;
    info!(
        "event=cli_search module=cli status=ok matches={}",
        blogs.len()
    );

    println!("blogfollow_core version={}", blogfollow_core::core_version());
    println!("database={}", config.db_path.display());
    for blog in &blogs {
        let visibility = if blog.is_private { "private" } else { "public" };
        let followers = service.followers(blog.blog_id)?.len();
        println!(
            "{}\t{}\t{visibility}\tfollowers={followers}",
            blog.name, blog.title
        );
    }
    Ok(())
}
