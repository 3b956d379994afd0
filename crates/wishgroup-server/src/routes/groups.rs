//! Group handlers.
//!
//! Reads require membership (or admin standing); management operations
//! require the group's admin. Outsiders get the hidden not-found answer.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use surrealdb::Connection;
use uuid::Uuid;
use wishgroup_auth::policy;
use wishgroup_core::error::{FieldError, WishgroupError};
use wishgroup_core::include::GroupInclude;
use wishgroup_core::models::group::{CreateGroup, Group, GroupDetails, UpdateGroup};
use wishgroup_core::repository::GroupRepository;

use crate::error::ApiResult;
use crate::gate::CurrentUser;
use crate::scope::{ensure_allowed, parse_resource_uuid};
use crate::state::AppState;
use crate::validate::{Validator, require_for_create, require_for_replace};

/// Create/update body. Read-only fields (`uuid`, `creatorUuid`,
/// timestamps) have no slot here, so senders may include them with no
/// effect.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBody {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub admin_uuid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IncludeQuery {
    pub include: Option<String>,
}

fn includes(query: &IncludeQuery) -> Vec<GroupInclude> {
    query
        .include
        .as_deref()
        .map(GroupInclude::from_csv)
        .unwrap_or_default()
}

fn check_shape(name: Option<&str>, icon: Option<&str>) -> ApiResult<()> {
    let mut v = Validator::new();
    if let Some(name) = name {
        v.len("name", name, 1, 48);
    }
    if let Some(icon) = icon {
        v.len("icon", icon, 1, 255);
    }
    v.finish()
}

/// Parse a body-supplied admin reference and confirm it names a live
/// user.
async fn resolve_admin<C: Connection + Clone>(
    state: &AppState<C>,
    raw: &str,
) -> ApiResult<Uuid> {
    let Ok(admin_id) = Uuid::parse_str(raw) else {
        return Err(WishgroupError::validation(vec![FieldError::new(
            "adminUuid",
            "Validation isUUID on adminUuid failed",
        )])
        .into());
    };

    if !state.groups().user_exists(admin_id).await? {
        return Err(WishgroupError::validation(vec![FieldError::new(
            "adminUuid",
            "Unknown UUID",
        )])
        .into());
    }

    Ok(admin_id)
}

/// `POST /` — the caller becomes creator, admin and first member.
pub async fn create<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<GroupBody>,
) -> ApiResult<(StatusCode, Json<Group>)> {
    require_for_create(
        "Group",
        &[("name", body.name.is_some()), ("icon", body.icon.is_some())],
    )?;
    check_shape(body.name.as_deref(), body.icon.as_deref())?;

    let group = state
        .groups()
        .create(CreateGroup {
            name: body.name.unwrap_or_default(),
            icon: body.icon.unwrap_or_default(),
            creator_id: user.id,
            admin_id: user.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(group)))
}

/// `GET /` — all groups, with requested associations.
pub async fn query<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Json<Vec<GroupDetails>>> {
    let details = state.groups().list(&includes(&query)).await?;
    Ok(Json(details))
}

/// `GET /{uuid}` — membership-scoped read.
pub async fn read<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(uuid): Path<String>,
    Query(query): Query<IncludeQuery>,
) -> ApiResult<Json<GroupDetails>> {
    let id = parse_resource_uuid(&uuid)?;

    let scope = state.groups().scope(id, user.id).await?;
    ensure_allowed(policy::read_group_resource(scope), id)?;

    let details = state
        .groups()
        .get_by_id(id, &includes(&query))
        .await?
        .ok_or_else(|| WishgroupError::resource_not_found(id))?;

    Ok(Json(details))
}

/// `PUT /{uuid}` — full replace, admin only.
pub async fn replace<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(uuid): Path<String>,
    Json(body): Json<GroupBody>,
) -> ApiResult<Json<Group>> {
    let id = parse_resource_uuid(&uuid)?;

    require_for_replace(
        "Group",
        &[
            ("name", body.name.is_some()),
            ("icon", body.icon.is_some()),
            ("adminUuid", body.admin_uuid.is_some()),
        ],
    )?;
    check_shape(body.name.as_deref(), body.icon.as_deref())?;

    let scope = state.groups().scope(id, user.id).await?;
    ensure_allowed(policy::manage_group_resource(scope), id)?;

    let admin_id = resolve_admin(&state, body.admin_uuid.as_deref().unwrap_or_default()).await?;

    let group = state
        .groups()
        .update(
            id,
            UpdateGroup {
                name: body.name,
                icon: body.icon,
                admin_id: Some(admin_id),
            },
        )
        .await?;

    Ok(Json(group))
}

/// `PATCH /{uuid}` — partial update, admin only.
pub async fn patch<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(uuid): Path<String>,
    Json(body): Json<GroupBody>,
) -> ApiResult<Json<Group>> {
    let id = parse_resource_uuid(&uuid)?;

    check_shape(body.name.as_deref(), body.icon.as_deref())?;

    let scope = state.groups().scope(id, user.id).await?;
    ensure_allowed(policy::manage_group_resource(scope), id)?;

    let admin_id = match body.admin_uuid.as_deref() {
        Some(raw) => Some(resolve_admin(&state, raw).await?),
        None => None,
    };

    let group = state
        .groups()
        .update(
            id,
            UpdateGroup {
                name: body.name,
                icon: body.icon,
                admin_id,
            },
        )
        .await?;

    Ok(Json(group))
}

/// `DELETE /{uuid}` — admin only; cascades to edges and children.
pub async fn remove<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(uuid): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_resource_uuid(&uuid)?;

    let scope = state.groups().scope(id, user.id).await?;
    ensure_allowed(policy::manage_group_resource(scope), id)?;

    state.groups().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
