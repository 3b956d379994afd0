//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lookups the authorization layer
//! may need to hide return `Ok(None)` for a missing row so that the policy
//! code — not the storage code — decides what the caller learns.

use uuid::Uuid;

use crate::error::WishgroupResult;
use crate::include::{GroupInclude, InvitationInclude, WishListInclude};
use crate::models::{
    group::{CreateGroup, Group, GroupDetails, UpdateGroup},
    invitation::{CreateInvitation, Invitation, InvitationDetails, UpdateInvitation},
    role::{CreateRole, Role},
    user::{CreateUser, User},
    wishlist::{CreateWishList, UpdateWishList, WishList, WishListDetails},
};

/// Live membership facts for one (caller, group) pair, re-queried per
/// request since membership can change after token issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupScope {
    /// Whether the group row exists at all.
    pub exists: bool,
    /// Whether a membership edge exists for the caller.
    pub is_member: bool,
    /// Whether the group's `admin_id` is the caller.
    pub is_admin: bool,
}

impl GroupScope {
    /// The scope of a group id that resolves to nothing.
    pub fn missing() -> Self {
        Self {
            exists: false,
            is_member: false,
            is_admin: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

pub trait RoleRepository: Send + Sync {
    fn create(&self, input: CreateRole) -> impl Future<Output = WishgroupResult<Role>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WishgroupResult<Option<Role>>> + Send;
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = WishgroupResult<Option<Role>>> + Send;
}

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = WishgroupResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WishgroupResult<Option<User>>> + Send;
    fn get_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = WishgroupResult<Option<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Groups and membership
// ---------------------------------------------------------------------------

pub trait GroupRepository: Send + Sync {
    /// Create a group and atomically enroll the creator as a member.
    fn create(&self, input: CreateGroup) -> impl Future<Output = WishgroupResult<Group>> + Send;

    fn get_by_id(
        &self,
        id: Uuid,
        includes: &[GroupInclude],
    ) -> impl Future<Output = WishgroupResult<Option<GroupDetails>>> + Send;

    fn list(
        &self,
        includes: &[GroupInclude],
    ) -> impl Future<Output = WishgroupResult<Vec<GroupDetails>>> + Send;

    fn update(
        &self,
        id: Uuid,
        input: UpdateGroup,
    ) -> impl Future<Output = WishgroupResult<Group>> + Send;

    /// Delete the group together with its membership edges, invitations
    /// and wishlist items.
    fn delete(&self, id: Uuid) -> impl Future<Output = WishgroupResult<()>> + Send;

    /// Add a user to a group (creates a `member_of` edge).
    fn add_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = WishgroupResult<()>> + Send;

    /// Remove a user from a group.
    fn remove_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = WishgroupResult<()>> + Send;

    /// Point reads backing the resource-scope policy.
    fn scope(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = WishgroupResult<GroupScope>> + Send;

    /// Whether a user id refers to a live user row. Backs foreign-key
    /// validation of `admin_id` updates.
    fn user_exists(&self, user_id: Uuid) -> impl Future<Output = WishgroupResult<bool>> + Send;
}

// ---------------------------------------------------------------------------
// Invitations
// ---------------------------------------------------------------------------

pub trait InvitationRepository: Send + Sync {
    /// Create an invitation. A duplicate `(email, group_id)` pair fails
    /// with a validation error naming both properties.
    fn create(
        &self,
        input: CreateInvitation,
    ) -> impl Future<Output = WishgroupResult<Invitation>> + Send;

    fn get_by_id(
        &self,
        id: Uuid,
        includes: &[InvitationInclude],
    ) -> impl Future<Output = WishgroupResult<Option<InvitationDetails>>> + Send;

    fn list_by_group(
        &self,
        group_id: Uuid,
        includes: &[InvitationInclude],
    ) -> impl Future<Output = WishgroupResult<Vec<InvitationDetails>>> + Send;

    fn update(
        &self,
        id: Uuid,
        input: UpdateInvitation,
    ) -> impl Future<Output = WishgroupResult<Invitation>> + Send;

    fn delete(&self, id: Uuid) -> impl Future<Output = WishgroupResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Wishlist items
// ---------------------------------------------------------------------------

pub trait WishListRepository: Send + Sync {
    fn create(
        &self,
        input: CreateWishList,
    ) -> impl Future<Output = WishgroupResult<WishList>> + Send;

    fn get_by_id(
        &self,
        id: Uuid,
        includes: &[WishListInclude],
    ) -> impl Future<Output = WishgroupResult<Option<WishListDetails>>> + Send;

    fn list_by_group(
        &self,
        group_id: Uuid,
        includes: &[WishListInclude],
    ) -> impl Future<Output = WishgroupResult<Vec<WishListDetails>>> + Send;

    fn update(
        &self,
        id: Uuid,
        input: UpdateWishList,
    ) -> impl Future<Output = WishgroupResult<WishList>> + Send;

    fn delete(&self, id: Uuid) -> impl Future<Output = WishgroupResult<()>> + Send;
}
