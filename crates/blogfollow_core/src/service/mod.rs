//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own the transactional boundary of each use-case via `UnitOfWork`.
//! - Keep callers decoupled from storage details.

pub mod account_service;
pub mod blog_service;
