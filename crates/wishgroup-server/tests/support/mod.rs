//! Shared in-process test harness: in-memory database, stub identity
//! provider, and request helpers driving the router directly.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Method, Request, Response};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use tower::ServiceExt;
use wishgroup_auth::{AuthConfig, ExternalIdentityProvider, ExternalProfile, token};
use wishgroup_core::error::{WishgroupError, WishgroupResult};
use wishgroup_core::models::user::{CreateUser, User};
use wishgroup_core::repository::{RoleRepository, UserRepository};
use wishgroup_db::repository::{SurrealRoleRepository, SurrealUserRepository};
use wishgroup_server::create_router;
use wishgroup_server::state::AppState;

pub const TEST_SECRET: &str = "test-secret";

/// Provider stub: access tokens of the form `valid:<email>` verify to a
/// fixed profile for that email; anything else is rejected.
pub struct StubProvider;

#[async_trait]
impl ExternalIdentityProvider for StubProvider {
    async fn verify(&self, access_token: &str) -> WishgroupResult<ExternalProfile> {
        match access_token.strip_prefix("valid:") {
            Some(email) => Ok(ExternalProfile {
                email: email.to_string(),
                first_name: "Fed".into(),
                last_name: "User".into(),
                display_name: "Fed User".into(),
            }),
            None => Err(WishgroupError::bad_request("Invalid access token")),
        }
    }
}

pub struct TestUser {
    pub user: User,
    pub token: String,
}

pub struct TestApp {
    pub router: Router,
    pub db: Surreal<Db>,
    pub auth: AuthConfig,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        wishgroup_db::run_migrations(&db).await.unwrap();
        wishgroup_db::seed_roles(&db).await.unwrap();

        let auth = AuthConfig {
            jwt_secret: TEST_SECRET.into(),
            ..AuthConfig::default()
        };

        let state = AppState::new(db.clone(), auth.clone(), Arc::new(StubProvider));
        let router = create_router(state);

        Self { router, db, auth }
    }

    /// Create a user with the named role and issue it a valid token.
    pub async fn user_with_role(&self, name: &str, email: &str, role_name: &str) -> TestUser {
        let roles = SurrealRoleRepository::new(self.db.clone());
        let role = roles.get_by_name(role_name).await.unwrap().unwrap();

        let users = SurrealUserRepository::new(self.db.clone());
        let user = users
            .create(CreateUser {
                first_name: name.to_string(),
                last_name: "Tester".into(),
                display_name: format!("{name} Tester"),
                email: email.to_string(),
                role_id: role.id,
            })
            .await
            .unwrap();

        let token = token::issue(&user, &role, &self.auth).unwrap();
        TestUser { user, token }
    }

    pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
        self.request(Method::GET, path, user, Option::<()>::None)
            .await
    }

    pub async fn post(
        &self,
        path: &str,
        user: Option<&TestUser>,
        body: impl Serialize,
    ) -> Response<Body> {
        self.request(Method::POST, path, user, Some(body)).await
    }

    pub async fn put(
        &self,
        path: &str,
        user: Option<&TestUser>,
        body: impl Serialize,
    ) -> Response<Body> {
        self.request(Method::PUT, path, user, Some(body)).await
    }

    pub async fn patch(
        &self,
        path: &str,
        user: Option<&TestUser>,
        body: impl Serialize,
    ) -> Response<Body> {
        self.request(Method::PATCH, path, user, Some(body)).await
    }

    pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
        self.request(Method::DELETE, path, user, Option::<()>::None)
            .await
    }

    /// Send with a raw Authorization header value instead of a TestUser.
    pub async fn get_with_auth(&self, path: &str, auth_header: &str) -> Response<Body> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .header("authorization", auth_header)
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn request<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        user: Option<&TestUser>,
        body: Option<T>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(test_user) = user {
            builder = builder.header("authorization", format!("Bearer {}", test_user.token));
        }

        let request_body = match body {
            Some(b) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_string(&b).unwrap())
            }
            None => Body::empty(),
        };

        let request = builder.body(request_body).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as raw bytes (for 204 assertions).
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}
