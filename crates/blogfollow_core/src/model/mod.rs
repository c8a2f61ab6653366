//! Domain records for the blog follow subsystem.
//!
//! # Responsibility
//! - Define accounts, blogs and the per-pair follow state.
//! - Keep validation rules next to the records they guard.
//!
//! # Invariants
//! - Records are identified by stable ids; equality and hashing use the id
//!   only, never attribute values.
//! - Association collections are not stored on records. They are derived
//!   from the follow relation by the repository layer.

pub mod account;
pub mod blog;
pub mod follow;
