//! Group routes: creation side effects, membership-scoped reads with
//! existence hiding, and admin-gated mutations.

mod support;

use http::StatusCode;
use serde_json::json;
use support::{TestApp, TestUser, body_bytes, body_json};
use wishgroup_core::repository::GroupRepository;
use wishgroup_db::repository::SurrealGroupRepository;

async fn create_group(app: &TestApp, user: &TestUser, name: &str) -> serde_json::Value {
    let response = app
        .post(
            "/api/v1/groups",
            Some(user),
            json!({ "name": name, "icon": "https://icons.example.com/g.png" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn create_returns_201_and_enrolls_the_creator() {
    let app = TestApp::spawn().await;
    let user = app.user_with_role("Maker", "maker@example.com", "user").await;

    let body = create_group(&app, &user, "My Group").await;
    assert_eq!(body["name"], "My Group");
    assert_eq!(body["creatorUuid"], user.user.id.to_string());
    assert_eq!(body["adminUuid"], user.user.id.to_string());

    let group_id = body["uuid"].as_str().unwrap().parse().unwrap();
    let groups = SurrealGroupRepository::new(app.db.clone());
    let scope = groups.scope(group_id, user.user.id).await.unwrap();
    assert!(scope.is_member && scope.is_admin);
}

#[tokio::test]
async fn create_ignores_caller_supplied_uuid_and_unknown_fields() {
    let app = TestApp::spawn().await;
    let user = app.user_with_role("Maker", "maker@example.com", "user").await;

    let response = app
        .post(
            "/api/v1/groups",
            Some(&user),
            json!({
                "name": "Clean",
                "icon": "https://icons.example.com/c.png",
                "uuid": "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee",
                "what": "ewgh"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_ne!(body["uuid"], "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee");
    assert!(body.get("what").is_none());
}

#[tokio::test]
async fn create_validates_field_lengths() {
    let app = TestApp::spawn().await;
    let user = app.user_with_role("Maker", "maker@example.com", "user").await;

    let response = app
        .post(
            "/api/v1/groups",
            Some(&user),
            json!({ "name": "y".repeat(50), "icon": "x".repeat(300) }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({
            "errors": [
                { "message": "Validation len on name failed", "property": "name" },
                { "message": "Validation len on icon failed", "property": "icon" }
            ],
            "message": "Validation error",
            "name": "BadRequestError",
            "status": 400
        })
    );
}

#[tokio::test]
async fn list_is_capability_gated_only() {
    let app = TestApp::spawn().await;
    let user = app.user_with_role("Lister", "lister@example.com", "user").await;
    let other = app.user_with_role("Other", "other@example.com", "user").await;

    create_group(&app, &user, "One").await;
    create_group(&app, &user, "Two").await;

    let response = app.get("/api/v1/groups", Some(&other)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn read_resolves_requested_associations() {
    let app = TestApp::spawn().await;
    let user = app.user_with_role("Reader", "reader@example.com", "user").await;
    let group = create_group(&app, &user, "Assoc").await;
    let id = group["uuid"].as_str().unwrap();

    let response = app
        .get(
            &format!("/api/v1/groups/{id}?include=admin,creator,users,bogus"),
            Some(&user),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["admin"]["email"], "reader@example.com");
    assert_eq!(body["creator"]["email"], "reader@example.com");
    assert_eq!(body["users"].as_array().unwrap().len(), 1);
    assert!(body.get("wishLists").is_none());
    assert!(body.get("bogus").is_none());
}

#[tokio::test]
async fn read_hides_existing_groups_from_non_members() {
    let app = TestApp::spawn().await;
    let owner = app.user_with_role("Owner", "owner@example.com", "user").await;
    let outsider = app
        .user_with_role("Outsider", "outsider@example.com", "user")
        .await;

    let group = create_group(&app, &owner, "Secret").await;
    let id = group["uuid"].as_str().unwrap();

    let response = app.get(&format!("/api/v1/groups/{id}"), Some(&outsider)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({
            "message": format!("Resource not found with UUID: {id}"),
            "name": "ResourceNotFoundError",
            "status": 404
        })
    );
}

#[tokio::test]
async fn nonexistent_and_malformed_ids_share_the_404_shape() {
    let app = TestApp::spawn().await;
    let user = app.user_with_role("Seeker", "seeker@example.com", "user").await;

    let missing = app
        .get(
            "/api/v1/groups/43bbb558-8fce-43d7-9e88-faa1581fd3ee",
            Some(&user),
        )
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(missing).await,
        json!({
            "message": "Resource not found with UUID: 43bbb558-8fce-43d7-9e88-faa1581fd3ee",
            "name": "ResourceNotFoundError",
            "status": 404
        })
    );

    let malformed = app.get("/api/v1/groups/aabbcc", Some(&user)).await;
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(malformed).await,
        json!({
            "message": "Invalid format UUID: aabbcc",
            "name": "ResourceNotFoundError",
            "status": 404
        })
    );
}

#[tokio::test]
async fn put_requires_every_mandatory_field() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("Admin", "admin@example.com", "user").await;
    let group = create_group(&app, &admin, "Replace me").await;
    let id = group["uuid"].as_str().unwrap();

    let response = app
        .put(
            &format!("/api/v1/groups/{id}"),
            Some(&admin),
            json!({
                "icon": "https://icons.example.com/p.png",
                "adminUuid": admin.user.id.to_string()
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({
            "errors": [
                { "message": "Group.name cannot be null", "property": "name" }
            ],
            "message": "Missing properties in request",
            "name": "BadRequestError",
            "status": 400
        })
    );

    // Nothing persisted.
    let read = app.get(&format!("/api/v1/groups/{id}"), Some(&admin)).await;
    assert_eq!(body_json(read).await["name"], "Replace me");
}

#[tokio::test]
async fn put_rejects_an_unknown_admin_reference() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("Admin", "admin@example.com", "user").await;
    let group = create_group(&app, &admin, "FK check").await;
    let id = group["uuid"].as_str().unwrap();

    let response = app
        .put(
            &format!("/api/v1/groups/{id}"),
            Some(&admin),
            json!({
                "name": "renamed",
                "icon": "https://icons.example.com/p.png",
                "adminUuid": "dc9bdceb-8a0c-437b-ad2a-81e2ffa68807"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({
            "errors": [
                { "message": "Unknown UUID", "property": "adminUuid" }
            ],
            "message": "Validation error",
            "name": "BadRequestError",
            "status": 400
        })
    );
}

#[tokio::test]
async fn put_replaces_and_keeps_readonly_fields() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("Admin", "admin@example.com", "user").await;
    let next_admin = app.user_with_role("Next", "next@example.com", "user").await;
    let group = create_group(&app, &admin, "Before").await;
    let id = group["uuid"].as_str().unwrap();

    let response = app
        .put(
            &format!("/api/v1/groups/{id}"),
            Some(&admin),
            json!({
                "name": "After",
                "icon": "https://icons.example.com/new.png",
                "adminUuid": next_admin.user.id.to_string(),
                "creatorUuid": next_admin.user.id.to_string(),
                "uuid": "2f9db767-3019-4120-a07e-1d79da925021",
                "zork": "bork"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["name"], "After");
    assert_eq!(body["uuid"], id);
    assert_eq!(body["adminUuid"], next_admin.user.id.to_string());
    // creatorUuid is read-only: the sent value has no effect.
    assert_eq!(body["creatorUuid"], admin.user.id.to_string());
}

#[tokio::test]
async fn member_without_admin_gets_401_on_mutations() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("Admin", "admin@example.com", "user").await;
    let member = app.user_with_role("Member", "member@example.com", "user").await;

    let group = create_group(&app, &admin, "Shared").await;
    let id: uuid::Uuid = group["uuid"].as_str().unwrap().parse().unwrap();

    let groups = SurrealGroupRepository::new(app.db.clone());
    groups.add_member(id, member.user.id).await.unwrap();

    let put = app
        .put(
            &format!("/api/v1/groups/{id}"),
            Some(&member),
            json!({
                "name": "Hijack",
                "icon": "https://icons.example.com/h.png",
                "adminUuid": member.user.id.to_string()
            }),
        )
        .await;
    assert_eq!(put.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(put).await,
        json!({
            "message": "Unauthorized",
            "name": "UnauthorizedError",
            "status": 401
        })
    );

    let delete = app.delete(&format!("/api/v1/groups/{id}"), Some(&member)).await;
    assert_eq!(delete.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn outsider_mutations_are_hidden_as_404() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("Admin", "admin@example.com", "user").await;
    let outsider = app
        .user_with_role("Outsider", "outsider@example.com", "user")
        .await;

    let group = create_group(&app, &admin, "Opaque").await;
    let id = group["uuid"].as_str().unwrap();

    let delete = app.delete(&format!("/api/v1/groups/{id}"), Some(&outsider)).await;
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(delete).await["name"], "ResourceNotFoundError");
}

#[tokio::test]
async fn patch_changes_only_sent_fields() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("Admin", "admin@example.com", "user").await;
    let group = create_group(&app, &admin, "Patchable").await;
    let id = group["uuid"].as_str().unwrap();

    let response = app
        .patch(
            &format!("/api/v1/groups/{id}"),
            Some(&admin),
            json!({ "name": "Patched" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["name"], "Patched");
    assert_eq!(body["icon"], group["icon"]);
    assert_eq!(body["adminUuid"], group["adminUuid"]);
}

#[tokio::test]
async fn delete_returns_204_and_removes_the_group() {
    let app = TestApp::spawn().await;
    let admin = app.user_with_role("Admin", "admin@example.com", "user").await;
    let group = create_group(&app, &admin, "Doomed").await;
    let id = group["uuid"].as_str().unwrap();

    let response = app.delete(&format!("/api/v1/groups/{id}"), Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());

    let read = app.get(&format!("/api/v1/groups/{id}"), Some(&admin)).await;
    assert_eq!(read.status(), StatusCode::NOT_FOUND);
}
