//! Shared application state.

use std::sync::Arc;

use surrealdb::{Connection, Surreal};
use wishgroup_auth::{AuthConfig, ExternalIdentityProvider, IdentityResolver};
use wishgroup_db::repository::{
    SurrealGroupRepository, SurrealInvitationRepository, SurrealRoleRepository,
    SurrealUserRepository, SurrealWishListRepository,
};

/// Per-request handler context: the database handle, the immutable auth
/// configuration and the federated identity provider. Repositories are
/// cheap views over the shared connection and constructed on demand.
pub struct AppState<C: Connection> {
    db: Surreal<C>,
    pub auth: AuthConfig,
    pub provider: Arc<dyn ExternalIdentityProvider>,
}

impl<C: Connection> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            auth: self.auth.clone(),
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<C: Connection> AppState<C> {
    pub fn new(
        db: Surreal<C>,
        auth: AuthConfig,
        provider: Arc<dyn ExternalIdentityProvider>,
    ) -> Self {
        Self { db, auth, provider }
    }

    pub fn roles(&self) -> SurrealRoleRepository<C> {
        SurrealRoleRepository::new(self.db.clone())
    }

    pub fn users(&self) -> SurrealUserRepository<C> {
        SurrealUserRepository::new(self.db.clone())
    }

    pub fn groups(&self) -> SurrealGroupRepository<C> {
        SurrealGroupRepository::new(self.db.clone())
    }

    pub fn invitations(&self) -> SurrealInvitationRepository<C> {
        SurrealInvitationRepository::new(self.db.clone())
    }

    pub fn wishlists(&self) -> SurrealWishListRepository<C> {
        SurrealWishListRepository::new(self.db.clone())
    }

    pub fn resolver(
        &self,
    ) -> IdentityResolver<SurrealUserRepository<C>, SurrealRoleRepository<C>> {
        IdentityResolver::new(self.users(), self.roles())
    }
}
