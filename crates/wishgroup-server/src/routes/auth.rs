//! Federated-login token exchange.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use tracing::instrument;
use wishgroup_auth::token;
use wishgroup_core::error::WishgroupError;
use wishgroup_core::models::user::User;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FederatedQuery {
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Exchange a provider access token for a capability token.
///
/// The provider verifies the token and yields a profile; the user is
/// created on first login with the default `user` role.
#[instrument(skip_all)]
pub async fn federated<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Query(query): Query<FederatedQuery>,
) -> ApiResult<Json<LoginResponse>> {
    let access_token = query
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| WishgroupError::bad_request("No access token"))?;

    let profile = state.provider.verify(&access_token).await?;
    let user = state.resolver().resolve_or_create(profile).await?;
    let role = state.resolver().role_of(&user).await?;
    let token = token::issue(&user, &role, &state.auth)?;

    Ok(Json(LoginResponse { token, user }))
}
