//! Group domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::invitation::Invitation;
use super::user::User;
use super::wishlist::WishList;

/// A collaboration group. The creator is enrolled as a member at creation
/// time and `creator_id` never changes afterwards; `admin_id` is mutable
/// and gates all management operations. The admin is not required to be a
/// member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    #[serde(rename = "creatorUuid")]
    pub creator_id: Uuid,
    #[serde(rename = "adminUuid")]
    pub admin_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateGroup {
    pub name: String,
    pub icon: String,
    pub creator_id: Uuid,
    pub admin_id: Uuid,
}

/// Partial update. `uuid` and `creator_id` are read-only by omission:
/// callers may send them but they have no field to land in.
#[derive(Debug, Clone, Default)]
pub struct UpdateGroup {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub admin_id: Option<Uuid>,
}

/// A group with its eagerly-loaded associations, shaped by the `include`
/// query parameter. Absent associations are omitted from the payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDetails {
    #[serde(flatten)]
    pub group: Group,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
    #[serde(rename = "wishLists", skip_serializing_if = "Option::is_none")]
    pub wish_lists: Option<Vec<WishList>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitations: Option<Vec<Invitation>>,
}

impl GroupDetails {
    /// A bare group with no associations loaded.
    pub fn bare(group: Group) -> Self {
        Self {
            group,
            admin: None,
            creator: None,
            users: None,
            wish_lists: None,
            invitations: None,
        }
    }
}
