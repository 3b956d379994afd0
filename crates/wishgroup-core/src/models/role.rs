//! Role domain model and the fixed permission vocabulary.
//!
//! Roles are seeded once at startup and are read-only for the lifetime of
//! the process; request handling never mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flat permission strings. One string names one allowed action on one
/// resource family; there is no hierarchy.
pub mod permissions {
    pub const GROUP_READ: &str = "group:read";
    pub const GROUP_WRITE: &str = "group:write";
    pub const INVITATION_READ: &str = "invitation:read";
    pub const INVITATION_WRITE: &str = "invitation:write";
    pub const WISHLIST_READ: &str = "wishlist:read";
    pub const WISHLIST_WRITE: &str = "wishlist:write";
    pub const USER_READ: &str = "user:read";
    pub const USER_WRITE: &str = "user:write";

    pub const ALL: &[&str] = &[
        GROUP_READ,
        GROUP_WRITE,
        INVITATION_READ,
        INVITATION_WRITE,
        WISHLIST_READ,
        WISHLIST_WRITE,
        USER_READ,
        USER_WRITE,
    ];
}

/// A named bundle of permission strings assigned to exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    pub name: String,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateRole {
    pub name: String,
    pub permissions: Vec<String>,
}

impl CreateRole {
    /// `admin` holds the full permission set, including `user:write`.
    pub fn admin() -> Self {
        Self {
            name: Role::ADMIN.into(),
            permissions: permissions::ALL.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// `user` is the default role for real accounts: everything except
    /// `user:write`.
    pub fn user() -> Self {
        Self {
            name: Role::USER.into(),
            permissions: permissions::ALL
                .iter()
                .filter(|p| **p != permissions::USER_WRITE)
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// `guest` is authenticated but capability-less.
    pub fn guest() -> Self {
        Self {
            name: Role::GUEST.into(),
            permissions: Vec::new(),
        }
    }
}

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const USER: &'static str = "user";
    pub const GUEST: &'static str = "guest";
}
