//! Wishgroup Core — domain models, error taxonomy and repository trait
//! definitions shared across all crates.
//!
//! This crate has no I/O: persistence lives in `wishgroup-db`, the
//! authorization logic in `wishgroup-auth` and the HTTP surface in
//! `wishgroup-server`.

pub mod error;
pub mod include;
pub mod models;
pub mod repository;

pub use error::{FieldError, WishgroupError, WishgroupResult};
