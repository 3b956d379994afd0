//! The capability gate as route-group middleware.
//!
//! Runs before any resource is loaded: extract and verify the bearer
//! token, check the verb-appropriate permission list against the token's
//! snapshot, then resolve the live user once and stash it in request
//! extensions for the handler. A missing or invalid credential is 401; a
//! valid credential with an insufficient permission set is 403.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::Method;
use http::header::AUTHORIZATION;
use surrealdb::Connection;
use wishgroup_auth::{AuthError, check_permissions, token};
use wishgroup_core::models::role::permissions;
use wishgroup_core::models::user::User;

use crate::error::ApiError;
use crate::state::AppState;

/// The verb-split permission requirements of one resource family's
/// routes: reads (GET/HEAD) take the first list, every other verb the
/// second.
#[derive(Debug, Clone, Copy)]
pub struct RoutePermissions {
    pub read: &'static [&'static str],
    pub write: &'static [&'static str],
}

impl RoutePermissions {
    fn required(&self, method: &Method) -> &'static [&'static str] {
        match *method {
            Method::GET | Method::HEAD => self.read,
            _ => self.write,
        }
    }
}

pub const GROUP_PERMISSIONS: RoutePermissions = RoutePermissions {
    read: &[permissions::GROUP_READ],
    write: &[permissions::GROUP_WRITE],
};

pub const INVITATION_PERMISSIONS: RoutePermissions = RoutePermissions {
    read: &[permissions::INVITATION_READ],
    write: &[permissions::INVITATION_WRITE],
};

pub const WISHLIST_PERMISSIONS: RoutePermissions = RoutePermissions {
    read: &[permissions::WISHLIST_READ],
    write: &[permissions::WISHLIST_WRITE],
};

pub const USER_PERMISSIONS: RoutePermissions = RoutePermissions {
    read: &[permissions::USER_READ],
    write: &[permissions::USER_WRITE],
};

/// The live user behind the verified token, available to handlers via
/// `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub async fn capability_gate<C: Connection + Clone>(
    State((state, perms)): State<(AppState<C>, RoutePermissions)>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::NoAuthToken)?;

    let raw = token::extract_bearer(header)?;
    let claims = token::verify(raw, &state.auth)?;

    check_permissions(perms.required(request.method()), &claims.permissions)?;

    // Live lookup: the identity may have been deleted since issuance.
    let user = state.resolver().resolve_by_token(&claims).await?;
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
