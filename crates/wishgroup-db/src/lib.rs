//! Wishgroup Database — SurrealDB connection management, schema
//! migrations, role seeding and repository implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - One-time role seeding ([`seed_roles`])
//! - Implementations of the `wishgroup-core` repository traits

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, seed_roles};
