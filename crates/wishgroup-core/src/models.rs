//! Domain models for wishgroup.
//!
//! These are the core types shared across all crates. Wire names follow
//! the public API (camelCase, `uuid` as the id key); read-only secrets are
//! never serialized.

pub mod group;
pub mod invitation;
pub mod role;
pub mod user;
pub mod wishlist;
