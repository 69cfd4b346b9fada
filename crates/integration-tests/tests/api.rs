//! End-to-end tests through the planner router.
//!
//! Requests go through `routes::app` in-process against a scratch
//! `PostgreSQL` database, so every layer from JSON parsing to the store runs.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

use shopping_planner_integration_tests::{FailingNotifier, state_with_notifier, test_state};
use shopping_planner_server::routes;

/// Send a JSON request and return the status and parsed body.
async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send_with(app, method, uri, token, body, &[]).await
}

async fn send_with(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Register a user and return their token.
async fn register(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "fullName": name, "email": email, "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_owned()
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_register_and_login(pool: PgPool) {
    let app = routes::app(test_state(pool, false));

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "fullName": "Ana Lopez", "email": "Ana@Example.com", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["user"]["fullName"], "Ana Lopez");
    assert!(body["user"].get("passwordHash").is_none());
    assert_eq!(body["familyId"], Value::Null);

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "fullName": "Ana Again", "email": "ana@example.com", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "fullName": "Ben", "email": "ben@example.com", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "ana@example.com", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "ana@example.com", "password": "wrong horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_family_scoped_reads_without_family(pool: PgPool) {
    let app = routes::app(test_state(pool, false));
    let ana = register(&app, "Ana", "ana@example.com").await;

    let (status, body) = send(&app, Method::GET, "/lists/current", Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "list": null, "items": [] }));

    let (status, body) = send(&app, Method::GET, "/lists/archives", Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, Method::GET, "/invites", Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, Method::GET, "/family/members", Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, Method::GET, "/family/me", Some(&ana), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = send(
        &app,
        Method::POST,
        "/lists/items",
        Some(&ana),
        Some(json!({ "name": "Milk" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Leaving without a family still succeeds.
    let (status, body) = send(&app, Method::POST, "/family/leave", Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_weekly_list_flow(pool: PgPool) {
    let app = routes::app(test_state(pool, true));
    let ana = register(&app, "Ana", "ana@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/family/create",
        Some(&ana),
        Some(json!({ "nickname": "Lopez" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["family"]["nickname"], "Lopez");
    let family_token = body["family"]["token"].as_str().unwrap().to_owned();
    assert!(family_token.starts_with("FAM-"));

    // The token from before the family still works; the family is read
    // from the store.
    let (status, body) = send(&app, Method::GET, "/lists/current", Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["list"]["id"].is_number());
    let list_id = body["list"]["id"].as_i64().unwrap();

    let (status, milk) = send(
        &app,
        Method::POST,
        "/lists/items",
        Some(&ana),
        Some(json!({ "name": "Milk", "quantity": "2 l" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(milk["status"], "pending");
    let (_, bread) = send(
        &app,
        Method::POST,
        "/lists/items",
        Some(&ana),
        Some(json!({ "name": "Bread" })),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/lists/items",
        Some(&ana),
        Some(json!({ "name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let milk_uri = format!("/lists/items/{}", milk["id"]);
    let (status, body) = send(
        &app,
        Method::PATCH,
        &milk_uri,
        Some(&ana),
        Some(json!({ "status": "bought" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "bought");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &milk_uri,
        Some(&ana),
        Some(json!({ "status": "lost" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    // Wrong day.
    let (status, body) = send_with(
        &app,
        Method::POST,
        "/lists/archive-week",
        Some(&ana),
        None,
        &[("x-current-day", "Tuesday")],
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_state");

    let (status, body) = send_with(
        &app,
        Method::POST,
        "/lists/archive-week",
        Some(&ana),
        None,
        &[("x-current-day", "Saturday")],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_ne!(body["newList"]["id"].as_i64().unwrap(), list_id);

    let (_, archives) = send(&app, Method::GET, "/lists/archives", Some(&ana), None).await;
    assert_eq!(archives.as_array().unwrap().len(), 1);
    assert_eq!(archives[0]["id"].as_i64().unwrap(), list_id);

    let (status, split) = send(
        &app,
        Method::GET,
        &format!("/lists/{list_id}/items"),
        Some(&ana),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(split["bought"][0]["id"], milk["id"]);
    assert_eq!(split["skipped"][0]["id"], bread["id"]);
    assert_eq!(split["skipped"][0]["status"], "skipped");

    let (_, current) = send(&app, Method::GET, "/lists/current", Some(&ana), None).await;
    assert_eq!(current["items"], json!([]));

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/lists/items/{}", bread["id"]),
        Some(&ana),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "deleted": true }));
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_day_override_ignored_unless_enabled(pool: PgPool) {
    let app = routes::app(test_state(pool, false));
    let ana = register(&app, "Ana", "ana@example.com").await;
    send(
        &app,
        Method::POST,
        "/family/create",
        Some(&ana),
        Some(json!({ "nickname": "Lopez" })),
    )
    .await;

    // Claiming a bogus day would be rejected if the header were read.
    let (status, _) = send_with(
        &app,
        Method::POST,
        "/lists/archive-week",
        Some(&ana),
        None,
        &[("x-current-day", "Caturday")],
    )
    .await;
    assert_ne!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_invite_and_join_flow(pool: PgPool) {
    let app = routes::app(test_state(pool, false));
    let ana = register(&app, "Ana", "ana@example.com").await;
    let ben = register(&app, "Ben", "ben@example.com").await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/family/create",
        Some(&ana),
        Some(json!({ "nickname": "Lopez" })),
    )
    .await;
    let family_id = created["family"]["id"].clone();

    let (status, body) = send(
        &app,
        Method::POST,
        "/invites",
        Some(&ana),
        Some(json!({ "email": "nobody@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    let (status, invite) = send(
        &app,
        Method::POST,
        "/invites",
        Some(&ana),
        Some(json!({ "email": "ben@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, inbox) = send(&app, Method::GET, "/notifications", Some(&ben), None).await;
    assert_eq!(inbox[0]["token"], invite["token"]);
    assert_eq!(inbox[0]["read"], false);

    let (status, body) = send(
        &app,
        Method::POST,
        "/notifications/mark-read",
        Some(&ben),
        Some(json!({ "id": inbox[0]["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, joined) = send(
        &app,
        Method::POST,
        "/invites/join",
        Some(&ben),
        Some(json!({ "token": invite["token"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(joined["familyId"], family_id);
    let ben_refreshed = joined["token"].as_str().unwrap().to_owned();

    let (status, body) = send(
        &app,
        Method::POST,
        "/invites/join",
        Some(&ben_refreshed),
        Some(json!({ "token": invite["token"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (_, members) = send(&app, Method::GET, "/family/members", Some(&ben), None).await;
    let roles: Vec<&str> = members
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, ["admin", "member"]);

    let (status, left) = send(&app, Method::POST, "/family/leave", Some(&ben), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(left["familyId"], Value::Null);

    let (status, _) = send(&app, Method::GET, "/family/me", Some(&ben), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../server/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_invite_succeeds_when_delivery_fails(pool: PgPool) {
    let app = routes::app(state_with_notifier(pool, Arc::new(FailingNotifier)));
    let ana = register(&app, "Ana", "ana@example.com").await;
    let ben = register(&app, "Ben", "ben@example.com").await;
    send(
        &app,
        Method::POST,
        "/family/create",
        Some(&ana),
        Some(json!({ "nickname": "Lopez" })),
    )
    .await;

    let (status, invite) = send(
        &app,
        Method::POST,
        "/invites",
        Some(&ana),
        Some(json!({ "email": "ben@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, inbox) = send(&app, Method::GET, "/notifications", Some(&ben), None).await;
    assert_eq!(inbox, json!([]));

    let (_, invites) = send(&app, Method::GET, "/invites", Some(&ana), None).await;
    assert_eq!(invites[0]["id"], invite["id"]);
}
