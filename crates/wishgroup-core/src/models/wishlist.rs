//! Wishlist item domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::group::Group;
use super::user::User;

/// One ranked wish inside a group. Any member may read it; only the
/// creator may change or remove it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishList {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    #[serde(rename = "groupUuid")]
    pub group_id: Uuid,
    #[serde(rename = "creatorUuid")]
    pub creator_id: Uuid,
    pub description: String,
    pub rank: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateWishList {
    pub group_id: Uuid,
    pub creator_id: Uuid,
    pub description: String,
    pub rank: u32,
}

/// Partial update. `group_id` and `creator_id` are read-only by omission.
#[derive(Debug, Clone, Default)]
pub struct UpdateWishList {
    pub description: Option<String>,
    pub rank: Option<u32>,
}

/// A wishlist item with its eagerly-loaded associations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishListDetails {
    #[serde(flatten)]
    pub wishlist: WishList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<User>,
}

impl WishListDetails {
    pub fn bare(wishlist: WishList) -> Self {
        Self {
            wishlist,
            group: None,
            creator: None,
        }
    }
}
