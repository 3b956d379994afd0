//! Credential handling: the token exchange, the capability gate's 401
//! class, and the 403 class for capability-less callers.

mod support;

use http::StatusCode;
use serde_json::json;
use support::{TestApp, body_json};
use wishgroup_auth::{AuthConfig, token};

#[tokio::test]
async fn health_probe_is_open() {
    let app = TestApp::spawn().await;
    let response = app.get("/api", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn unknown_endpoint_is_a_named_404() {
    let app = TestApp::spawn().await;
    let response = app.get("/api/v1/nothing-here", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({
            "message": "Endpoint not found",
            "name": "EndpointNotFoundError",
            "status": 404
        })
    );
}

#[tokio::test]
async fn federated_login_creates_a_user_and_issues_a_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/auth/federated?access_token=valid:fed@example.com", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "fed@example.com");
    let jwt = body["token"].as_str().unwrap().to_string();

    // The issued token carries the default user role's permission set.
    let auth = AuthConfig {
        jwt_secret: support::TEST_SECRET.into(),
        ..AuthConfig::default()
    };
    let claims = token::verify(&jwt, &auth).unwrap();
    assert_eq!(claims.roles, vec!["user".to_string()]);
    assert_eq!(claims.permissions.len(), 7);

    // And it actually works against a protected route.
    let me = app
        .get_with_auth("/api/v1/users/me", &format!("Bearer {jwt}"))
        .await;
    assert_eq!(me.status(), StatusCode::OK);
}

#[tokio::test]
async fn federated_login_is_idempotent_on_email() {
    let app = TestApp::spawn().await;

    let first = body_json(
        app.get("/api/auth/federated?access_token=valid:same@example.com", None)
            .await,
    )
    .await;
    let second = body_json(
        app.get("/api/auth/federated?access_token=valid:same@example.com", None)
            .await,
    )
    .await;

    assert_eq!(first["user"]["uuid"], second["user"]["uuid"]);
}

#[tokio::test]
async fn federated_login_rejects_unverifiable_tokens() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/auth/federated?access_token=garbage", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["name"], "BadRequestError");
    assert_eq!(body["message"], "Invalid access token");

    let missing = app.get("/api/auth/federated", None).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(missing).await["message"], "No access token");
}

#[tokio::test]
async fn missing_credential_is_401_no_auth_token() {
    let app = TestApp::spawn().await;
    let response = app.get("/api/v1/users/me", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({
            "message": "No auth token",
            "name": "UnauthorizedError",
            "status": 401
        })
    );
}

#[tokio::test]
async fn non_bearer_scheme_is_401_no_auth_token() {
    let app = TestApp::spawn().await;
    let response = app
        .get_with_auth("/api/v1/users/me", "Basic dXNlcjpwYXNz")
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "No auth token");
}

#[tokio::test]
async fn garbage_token_is_401_malformed() {
    let app = TestApp::spawn().await;
    let response = app.get_with_auth("/api/v1/users/me", "Bearer xxx").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({
            "message": "jwt malformed",
            "name": "UnauthorizedError",
            "status": 401
        })
    );
}

#[tokio::test]
async fn expired_token_is_401_expired() {
    let app = TestApp::spawn().await;
    let fresh = app
        .user_with_role("Expiry", "expiry@example.com", "user")
        .await;

    // Same secret, zero lifetime: exp == iat.
    let expired_config = AuthConfig {
        jwt_secret: support::TEST_SECRET.into(),
        token_lifetime_secs: 0,
        ..AuthConfig::default()
    };
    let roles = wishgroup_db::repository::SurrealRoleRepository::new(app.db.clone());
    let role = {
        use wishgroup_core::repository::RoleRepository;
        roles.get_by_name("user").await.unwrap().unwrap()
    };
    let expired = token::issue(&fresh.user, &role, &expired_config).unwrap();

    let response = app
        .get_with_auth("/api/v1/users/me", &format!("Bearer {expired}"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "jwt expired");
}

#[tokio::test]
async fn foreign_signature_is_401_invalid_signature() {
    let app = TestApp::spawn().await;
    let victim = app
        .user_with_role("Forged", "forged@example.com", "user")
        .await;

    let foreign_config = AuthConfig {
        jwt_secret: "some-other-secret".into(),
        ..AuthConfig::default()
    };
    let roles = wishgroup_db::repository::SurrealRoleRepository::new(app.db.clone());
    let role = {
        use wishgroup_core::repository::RoleRepository;
        roles.get_by_name("user").await.unwrap().unwrap()
    };
    let forged = token::issue(&victim.user, &role, &foreign_config).unwrap();

    let response = app
        .get_with_auth("/api/v1/users/me", &format!("Bearer {forged}"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "invalid signature");
}

#[tokio::test]
async fn guest_gets_403_on_every_gated_route() {
    let app = TestApp::spawn().await;
    let guest = app
        .user_with_role("Guest", "guest@example.com", "guest")
        .await;

    for path in [
        "/api/v1/users/me",
        "/api/v1/groups",
        "/api/v1/invitations",
        "/api/v1/wishlists",
    ] {
        let response = app.get(path, Some(&guest)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "GET {path}");
        assert_eq!(
            body_json(response).await,
            json!({
                "message": "Forbidden",
                "name": "ForbiddenError",
                "status": 403
            }),
            "GET {path}"
        );
    }

    let response = app
        .post("/api/v1/groups", Some(&guest), json!({ "name": "x", "icon": "y" }))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn me_returns_the_profile_with_role() {
    let app = TestApp::spawn().await;
    let user = app.user_with_role("John", "john@example.com", "user").await;

    let response = app.get("/api/v1/users/me", Some(&user)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["email"], "john@example.com");
    assert_eq!(body["displayName"], "John Tester");
    assert_eq!(body["role"]["name"], "user");
    assert_eq!(body["uuid"], user.user.id.to_string());
}

#[tokio::test]
async fn deleted_user_token_no_longer_resolves() {
    let app = TestApp::spawn().await;
    let user = app.user_with_role("Gone", "gone@example.com", "user").await;

    app.db
        .query("DELETE type::record('user', $id)")
        .bind(("id", user.user.id.to_string()))
        .await
        .unwrap();

    let response = app.get("/api/v1/users/me", Some(&user)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "Could not find user in token"
    );
}
