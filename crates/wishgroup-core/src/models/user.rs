//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A durable user identity. Created on first successful federated login;
/// the email is immutable after creation, the name fields are not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub email: String,
    /// Every user holds exactly one role.
    #[serde(rename = "roleUuid")]
    pub role_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub email: String,
    pub role_id: Uuid,
}

/// A user together with its resolved role, as served by `GET /users/me`.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithRole {
    #[serde(flatten)]
    pub user: User,
    pub role: super::role::Role,
}
