//! User profile handlers.

use axum::Extension;
use axum::Json;
use axum::extract::State;
use surrealdb::Connection;
use wishgroup_core::error::WishgroupError;
use wishgroup_core::models::user::UserWithRole;
use wishgroup_core::repository::RoleRepository;

use crate::error::ApiResult;
use crate::gate::CurrentUser;
use crate::state::AppState;

/// The caller's own profile, with its role embedded.
pub async fn me<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<UserWithRole>> {
    let role = state
        .roles()
        .get_by_id(user.role_id)
        .await?
        .ok_or_else(|| WishgroupError::application("Could not find Role for user"))?;

    Ok(Json(UserWithRole { user, role }))
}
