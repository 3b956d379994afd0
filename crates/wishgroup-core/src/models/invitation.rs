//! Invitation domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::group::Group;
use super::user::User;

/// An invitation of an email address into a group. The `(email, group_id)`
/// pair is unique: no duplicate outstanding invite for the same address and
/// group. `token` and `expires_at` are write-once secrets and never leave
/// the server on a read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    #[serde(rename = "groupUuid")]
    pub group_id: Uuid,
    #[serde(rename = "creatorUuid")]
    pub creator_id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub times_sent: u32,
    pub sent_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateInvitation {
    pub group_id: Uuid,
    pub creator_id: Uuid,
    pub email: String,
    pub token: String,
    pub times_sent: u32,
    pub sent_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Partial update. Everything except the invitee email is read-only
/// (`group_id`, `sent_at`, `times_sent`, `creator_id`, `token`,
/// `expires_at`); those fields are dropped from payloads by omission.
#[derive(Debug, Clone, Default)]
pub struct UpdateInvitation {
    pub email: Option<String>,
}

/// An invitation with its eagerly-loaded associations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDetails {
    #[serde(flatten)]
    pub invitation: Invitation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<User>,
}

impl InvitationDetails {
    pub fn bare(invitation: Invitation) -> Self {
        Self {
            invitation,
            group: None,
            creator: None,
        }
    }
}
