//! Wishlist item handlers.
//!
//! Creation requires membership of the target group, reads require
//! membership of the item's group, and mutation is restricted to the
//! item's creator — strictly narrower than membership.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use surrealdb::Connection;
use uuid::Uuid;
use wishgroup_auth::policy;
use wishgroup_core::error::{FieldError, WishgroupError};
use wishgroup_core::include::WishListInclude;
use wishgroup_core::models::wishlist::{
    CreateWishList, UpdateWishList, WishList, WishListDetails,
};
use wishgroup_core::repository::{GroupRepository, WishListRepository};

use crate::error::ApiResult;
use crate::gate::CurrentUser;
use crate::scope::{ensure_allowed, parse_resource_uuid};
use crate::state::AppState;
use crate::validate::{Validator, require_for_create, require_for_replace};

/// Create/update body. `creatorUuid` and (on update) `groupUuid` are
/// read-only by omission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishListBody {
    pub description: Option<String>,
    pub rank: Option<i64>,
    pub group_uuid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishListQuery {
    pub group_uuid: Option<String>,
    pub include: Option<String>,
}

fn includes(raw: Option<&str>) -> Vec<WishListInclude> {
    raw.map(WishListInclude::from_csv).unwrap_or_default()
}

/// Shape checks; returns the validated rank when one was supplied.
fn check_shape(description: Option<&str>, rank: Option<i64>) -> ApiResult<Option<u32>> {
    let mut v = Validator::new();
    if let Some(description) = description {
        v.len("description", description, 1, 512);
    }
    if let Some(rank) = rank {
        v.int_range("rank", rank, 1, 255);
    }
    v.finish()?;
    Ok(rank.map(|r| r as u32))
}

fn parse_body_group_uuid(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        WishgroupError::validation(vec![FieldError::new(
            "groupUuid",
            "Validation isUUID on groupUuid failed",
        )])
        .into()
    })
}

/// `POST /` — members of the target group only.
pub async fn create<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<WishListBody>,
) -> ApiResult<(StatusCode, Json<WishList>)> {
    require_for_create(
        "WishList",
        &[
            ("description", body.description.is_some()),
            ("rank", body.rank.is_some()),
            ("groupUuid", body.group_uuid.is_some()),
        ],
    )?;
    let rank = check_shape(body.description.as_deref(), body.rank)?;
    let group_id = parse_body_group_uuid(body.group_uuid.as_deref().unwrap_or_default())?;

    let scope = state.groups().scope(group_id, user.id).await?;
    ensure_allowed(policy::create_in_group(scope), group_id)?;

    let wishlist = state
        .wishlists()
        .create(CreateWishList {
            group_id,
            creator_id: user.id,
            description: body.description.unwrap_or_default(),
            rank: rank.unwrap_or_default(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(wishlist)))
}

/// `GET /?groupUuid=` — a group's wishlist; members only.
pub async fn query<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<WishListQuery>,
) -> ApiResult<Json<Vec<WishListDetails>>> {
    let Some(raw_group) = query.group_uuid.as_deref().filter(|g| !g.is_empty()) else {
        return Err(WishgroupError::missing_properties(vec![FieldError::new(
            "groupUuid",
            "WishList.groupUuid cannot be null",
        )])
        .into());
    };
    let group_id = parse_resource_uuid(raw_group)?;

    let scope = state.groups().scope(group_id, user.id).await?;
    ensure_allowed(policy::read_group_resource(scope), group_id)?;

    let details = state
        .wishlists()
        .list_by_group(group_id, &includes(query.include.as_deref()))
        .await?;

    Ok(Json(details))
}

/// `GET /{uuid}` — members of the item's group only.
pub async fn read<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(uuid): Path<String>,
    Query(query): Query<WishListQuery>,
) -> ApiResult<Json<WishListDetails>> {
    let id = parse_resource_uuid(&uuid)?;

    let details = state
        .wishlists()
        .get_by_id(id, &includes(query.include.as_deref()))
        .await?
        .ok_or_else(|| WishgroupError::resource_not_found(id))?;

    let scope = state
        .groups()
        .scope(details.wishlist.group_id, user.id)
        .await?;
    ensure_allowed(policy::read_group_resource(scope), id)?;

    Ok(Json(details))
}

/// `PUT /{uuid}` — full replace; creator only.
pub async fn replace<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(uuid): Path<String>,
    Json(body): Json<WishListBody>,
) -> ApiResult<Json<WishList>> {
    let id = parse_resource_uuid(&uuid)?;

    require_for_replace(
        "WishList",
        &[
            ("description", body.description.is_some()),
            ("rank", body.rank.is_some()),
        ],
    )?;
    let rank = check_shape(body.description.as_deref(), body.rank)?;

    let existing = state
        .wishlists()
        .get_by_id(id, &[])
        .await?
        .ok_or_else(|| WishgroupError::resource_not_found(id))?;

    let scope = state
        .groups()
        .scope(existing.wishlist.group_id, user.id)
        .await?;
    ensure_allowed(
        policy::mutate_as_creator(scope, existing.wishlist.creator_id, user.id),
        id,
    )?;

    let wishlist = state
        .wishlists()
        .update(
            id,
            UpdateWishList {
                description: body.description,
                rank,
            },
        )
        .await?;

    Ok(Json(wishlist))
}

/// `PATCH /{uuid}` — partial update; creator only.
pub async fn patch<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(uuid): Path<String>,
    Json(body): Json<WishListBody>,
) -> ApiResult<Json<WishList>> {
    let id = parse_resource_uuid(&uuid)?;

    let rank = check_shape(body.description.as_deref(), body.rank)?;

    let existing = state
        .wishlists()
        .get_by_id(id, &[])
        .await?
        .ok_or_else(|| WishgroupError::resource_not_found(id))?;

    let scope = state
        .groups()
        .scope(existing.wishlist.group_id, user.id)
        .await?;
    ensure_allowed(
        policy::mutate_as_creator(scope, existing.wishlist.creator_id, user.id),
        id,
    )?;

    let wishlist = state
        .wishlists()
        .update(
            id,
            UpdateWishList {
                description: body.description,
                rank,
            },
        )
        .await?;

    Ok(Json(wishlist))
}

/// `DELETE /{uuid}` — creator only.
pub async fn remove<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(uuid): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_resource_uuid(&uuid)?;

    let existing = state
        .wishlists()
        .get_by_id(id, &[])
        .await?
        .ok_or_else(|| WishgroupError::resource_not_found(id))?;

    let scope = state
        .groups()
        .scope(existing.wishlist.group_id, user.id)
        .await?;
    ensure_allowed(
        policy::mutate_as_creator(scope, existing.wishlist.creator_id, user.id),
        id,
    )?;

    state.wishlists().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
