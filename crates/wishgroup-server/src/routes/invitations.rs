//! Invitation handlers.
//!
//! Reads require membership of the invitation's group; create, update
//! and delete require the group's admin. The invitation token and expiry
//! never appear in responses.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{Duration, Utc};
use serde::Deserialize;
use surrealdb::Connection;
use uuid::Uuid;
use wishgroup_auth::{policy, token};
use wishgroup_core::error::{FieldError, WishgroupError};
use wishgroup_core::include::InvitationInclude;
use wishgroup_core::models::invitation::{
    CreateInvitation, Invitation, InvitationDetails, UpdateInvitation,
};
use wishgroup_core::repository::{GroupRepository, InvitationRepository};

use crate::error::ApiResult;
use crate::gate::CurrentUser;
use crate::scope::{ensure_allowed, parse_resource_uuid};
use crate::state::AppState;
use crate::validate::{Validator, require_for_create, require_for_replace};

/// How long an invitation stays redeemable.
const INVITATION_TTL_WEEKS: i64 = 2;

/// Create/update body. The read-only fields (`groupUuid` on update,
/// `sentAt`, `timesSent`, `creatorUuid`, `token`, `expiresAt`) have no
/// updatable slot, so senders may include them with no effect.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationBody {
    pub email: Option<String>,
    pub group_uuid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationQuery {
    pub group_uuid: Option<String>,
    pub include: Option<String>,
}

fn includes(raw: Option<&str>) -> Vec<InvitationInclude> {
    raw.map(InvitationInclude::from_csv).unwrap_or_default()
}

fn check_email(email: Option<&str>) -> ApiResult<()> {
    let mut v = Validator::new();
    if let Some(email) = email {
        v.email("email", email);
    }
    v.finish()
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

/// `POST /` — invite an address into a group; group admin only.
pub async fn create<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<InvitationBody>,
) -> ApiResult<(StatusCode, Json<Invitation>)> {
    require_for_create(
        "Invitation",
        &[
            ("email", body.email.is_some()),
            ("groupUuid", body.group_uuid.is_some()),
        ],
    )?;
    check_email(body.email.as_deref())?;
    let group_id = parse_body_group_uuid(body.group_uuid.as_deref().unwrap_or_default())?;

    let scope = state.groups().scope(group_id, user.id).await?;
    ensure_allowed(policy::manage_group_resource(scope), group_id)?;

    let now = Utc::now();
    let invitation = state
        .invitations()
        .create(CreateInvitation {
            group_id,
            creator_id: user.id,
            email: body.email.unwrap_or_default(),
            token: token::generate_invitation_token(),
            times_sent: 1,
            sent_at: now,
            expires_at: now + Duration::weeks(INVITATION_TTL_WEEKS),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(invitation)))
}

/// `GET /?groupUuid=` — a group's invitations; members only.
pub async fn query<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<InvitationQuery>,
) -> ApiResult<Json<Vec<InvitationDetails>>> {
    let Some(raw_group) = query.group_uuid.as_deref().filter(|g| !g.is_empty()) else {
        return Err(WishgroupError::missing_properties(vec![FieldError::new(
            "groupUuid",
            "Invitation.groupUuid cannot be null",
        )])
        .into());
    };
    let group_id = parse_resource_uuid(raw_group)?;

    let scope = state.groups().scope(group_id, user.id).await?;
    ensure_allowed(policy::read_group_resource(scope), group_id)?;

    let details = state
        .invitations()
        .list_by_group(group_id, &includes(query.include.as_deref()))
        .await?;

    Ok(Json(details))
}

/// `GET /{uuid}` — members of the invitation's group only.
pub async fn read<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(uuid): Path<String>,
    Query(query): Query<InvitationQuery>,
) -> ApiResult<Json<InvitationDetails>> {
    let id = parse_resource_uuid(&uuid)?;

    let details = state
        .invitations()
        .get_by_id(id, &includes(query.include.as_deref()))
        .await?
        .ok_or_else(|| WishgroupError::resource_not_found(id))?;

    let scope = state
        .groups()
        .scope(details.invitation.group_id, user.id)
        .await?;
    ensure_allowed(policy::read_group_resource(scope), id)?;

    Ok(Json(details))
}

/// `PUT /{uuid}` — full replace; only the invitee email is writable.
pub async fn replace<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(uuid): Path<String>,
    Json(body): Json<InvitationBody>,
) -> ApiResult<Json<Invitation>> {
    let id = parse_resource_uuid(&uuid)?;

    require_for_replace("Invitation", &[("email", body.email.is_some())])?;
    check_email(body.email.as_deref())?;

    let existing = state
        .invitations()
        .get_by_id(id, &[])
        .await?
        .ok_or_else(|| WishgroupError::resource_not_found(id))?;

    let scope = state
        .groups()
        .scope(existing.invitation.group_id, user.id)
        .await?;
    ensure_allowed(policy::manage_group_resource(scope), id)?;

    let invitation = state
        .invitations()
        .update(id, UpdateInvitation { email: body.email })
        .await?;

    Ok(Json(invitation))
}

/// `PATCH /{uuid}` — partial update; admin only.
pub async fn patch<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(uuid): Path<String>,
    Json(body): Json<InvitationBody>,
) -> ApiResult<Json<Invitation>> {
    let id = parse_resource_uuid(&uuid)?;

    check_email(body.email.as_deref())?;

    let existing = state
        .invitations()
        .get_by_id(id, &[])
        .await?
        .ok_or_else(|| WishgroupError::resource_not_found(id))?;

    let scope = state
        .groups()
        .scope(existing.invitation.group_id, user.id)
        .await?;
    ensure_allowed(policy::manage_group_resource(scope), id)?;

    let invitation = state
        .invitations()
        .update(id, UpdateInvitation { email: body.email })
        .await?;

    Ok(Json(invitation))
}

/// `DELETE /{uuid}` — admin only.
pub async fn remove<C: Connection + Clone>(
    State(state): State<AppState<C>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(uuid): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_resource_uuid(&uuid)?;

    let existing = state
        .invitations()
        .get_by_id(id, &[])
        .await?
        .ok_or_else(|| WishgroupError::resource_not_found(id))?;

    let scope = state
        .groups()
        .scope(existing.invitation.group_id, user.id)
        .await?;
    ensure_allowed(policy::manage_group_resource(scope), id)?;

    state.invitations().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
