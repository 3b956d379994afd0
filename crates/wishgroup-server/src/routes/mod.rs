//! HTTP handlers, one module per resource family.

pub mod auth;
pub mod groups;
pub mod invitations;
pub mod users;
pub mod wishlists;

use axum::Json;
use serde::Serialize;
use wishgroup_core::error::WishgroupError;

use crate::error::ApiError;

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

/// Unauthenticated health probe.
pub async fn health() -> Json<impl Serialize> {
    Json(Health { status: "ok" })
}

/// Fallback for unknown paths.
pub async fn endpoint_not_found() -> ApiError {
    ApiError(WishgroupError::EndpointNotFound)
}
