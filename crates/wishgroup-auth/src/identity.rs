//! Identity resolution — mapping verified credentials to durable users.

use async_trait::async_trait;
use tracing::info;
use wishgroup_core::error::{WishgroupError, WishgroupResult};
use wishgroup_core::models::role::Role;
use wishgroup_core::models::user::{CreateUser, User};
use wishgroup_core::repository::{RoleRepository, UserRepository};

use crate::error::AuthError;
use crate::token::TokenClaims;

/// A verified profile handed over by an external identity provider.
#[derive(Debug, Clone)]
pub struct ExternalProfile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
}

/// The seam for the federated-login collaborator. The OAuth handshake
/// itself happens elsewhere; implementations only turn a provider access
/// token into a verified profile.
#[async_trait]
pub trait ExternalIdentityProvider: Send + Sync {
    async fn verify(&self, access_token: &str) -> WishgroupResult<ExternalProfile>;
}

/// Resolves identities from federated profiles and verified tokens.
///
/// Generic over repository implementations so the auth layer has no
/// dependency on the database crate.
pub struct IdentityResolver<U: UserRepository, R: RoleRepository> {
    users: U,
    roles: R,
}

impl<U: UserRepository, R: RoleRepository> IdentityResolver<U, R> {
    pub fn new(users: U, roles: R) -> Self {
        Self { users, roles }
    }

    /// Look up a user by email, creating it with the default `user` role
    /// on first login. Idempotent on email.
    pub async fn resolve_or_create(&self, profile: ExternalProfile) -> WishgroupResult<User> {
        if let Some(user) = self.users.get_by_email(&profile.email).await? {
            return Ok(user);
        }

        // This state should never happen: the default role is seeded at
        // startup. Missing seed data is an integrity bug, not a caller
        // mistake.
        let role = self
            .roles
            .get_by_name(Role::USER)
            .await?
            .ok_or_else(|| WishgroupError::application("Could not find default role for user"))?;

        let user = self
            .users
            .create(CreateUser {
                first_name: profile.first_name,
                last_name: profile.last_name,
                display_name: profile.display_name,
                email: profile.email,
                role_id: role.id,
            })
            .await?;

        info!(user_id = %user.id, "created user on first federated login");
        Ok(user)
    }

    /// Load the live user behind a verified token payload. A dangling
    /// uuid means the user was deleted after issuance.
    pub async fn resolve_by_token(&self, claims: &TokenClaims) -> WishgroupResult<User> {
        self.users
            .get_by_id(claims.data.uuid)
            .await?
            .ok_or_else(|| AuthError::UnknownUser.into())
    }

    /// The role behind a user, for token issuance. A user without a
    /// resolvable role is a data integrity bug.
    pub async fn role_of(&self, user: &User) -> WishgroupResult<Role> {
        self.roles
            .get_by_id(user.role_id)
            .await?
            .ok_or_else(|| WishgroupError::application("Could not find Role for generating token"))
    }
}
