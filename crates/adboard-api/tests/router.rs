use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use argon2::{Argon2, PasswordHash, PasswordVerifier};

use adboard_api::{AppState, AppStateInner, router};
use adboard_db::Database;

fn app() -> Router {
    app_with_state().0
}

fn app_with_state() -> (Router, AppState) {
    let db = Database::open_in_memory().expect("in-memory database");
    let state = AppStateInner::new(db);
    (router(state.clone()), state)
}

fn stored_password(state: &AppState, id: i64) -> String {
    state
        .db
        .with_conn(|conn| {
            Ok(conn.query_row("SELECT password FROM users WHERE id = ?1", [id], |r| r.get(0))?)
        })
        .unwrap()
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_user(app: &Router, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/users/",
        Some(json!({ "name": name, "password": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn user_lifecycle() {
    let app = app();
    let id = create_user(&app, "User1").await;

    let (status, body) = send(&app, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "name": "User1" }));

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/users/{id}"),
        Some(json!({ "name": "user1_v2", "password": "5678" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "name": "user1_v2" }));

    let (status, body) = send(&app, Method::DELETE, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success" }));

    let (status, body) = send(&app, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "error", "reason": "object not found" }));
}

#[tokio::test]
async fn duplicate_user_name_conflicts() {
    let app = app();
    create_user(&app, "User1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/",
        Some(json!({ "name": "User1", "password": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
    assert_eq!(body["reason"], "user with this name already exists");
}

#[tokio::test]
async fn renaming_onto_existing_name_conflicts() {
    let app = app();
    create_user(&app, "User1").await;
    let second = create_user(&app, "User2").await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/users/{second}"),
        Some(json!({ "name": "User1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, Method::GET, &format!("/users/{second}"), None).await;
    assert_eq!(body["name"], "User2");
}

#[tokio::test]
async fn validation_lists_every_field() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/users/", Some(json!({ "name": 7 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let reason = body["reason"].as_array().unwrap();
    assert_eq!(reason.len(), 2);
    assert_eq!(reason[0]["loc"], json!(["name"]));
    assert_eq!(reason[0]["type"], "type_error.str");
    assert_eq!(reason[1]["loc"], json!(["password"]));
    assert_eq!(reason[1]["type"], "value_error.missing");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/users/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "error");
    assert!(body["reason"].is_string());
}

#[tokio::test]
async fn missing_ids_are_not_found() {
    let app = app();
    for uri in ["/users/99999", "/advertisements/99999"] {
        let (status, _) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {uri}");

        let (status, _) = send(&app, Method::PATCH, uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "PATCH {uri}");

        let (status, _) = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "DELETE {uri}");
    }
}

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/users/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["reason"], "object not found");
}

#[tokio::test]
async fn advertisement_round_trip() {
    let app = app();
    let owner = create_user(&app, "User1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/advertisements/",
        Some(json!({ "header": "H1", "description": "D1", "owner_id": owner })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/advertisements/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["header"], "H1");
    assert_eq!(body["description"], "D1");
    assert_eq!(body["owner_id"], owner);
    assert!(body["created_at"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn empty_patch_changes_nothing() {
    let app = app();
    let owner = create_user(&app, "User1").await;
    let (_, body) = send(
        &app,
        Method::POST,
        "/advertisements/",
        Some(json!({ "header": "H1", "description": "D1", "owner_id": owner })),
    )
    .await;
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::PATCH, &format!("/advertisements/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "success", "header": "H1", "description": "D1" })
    );

    let (status, body) = send(&app, Method::PATCH, &format!("/users/{owner}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "name": "User1" }));
}

#[tokio::test]
async fn owner_existence_is_not_checked() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/advertisements/",
        Some(json!({ "header": "H1", "description": "D1", "owner_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/advertisements/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["header"], "H1");
    assert_eq!(body["description"], "D1");
    assert_eq!(body["owner_id"], 1);
    assert!(!body["created_at"].is_null());
}

#[tokio::test]
async fn passwords_are_stored_hashed_and_rehashed_on_patch() {
    let (app, state) = app_with_state();
    let id = create_user(&app, "User1").await;

    let first = stored_password(&state, id);
    assert!(first.starts_with("$argon2id$"));
    let parsed = PasswordHash::new(&first).unwrap();
    assert!(Argon2::default().verify_password(b"1234", &parsed).is_ok());

    // Renaming alone keeps the hash.
    send(&app, Method::PATCH, &format!("/users/{id}"), Some(json!({ "name": "User2" }))).await;
    assert_eq!(stored_password(&state, id), first);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/users/{id}"),
        Some(json!({ "password": "5678" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "name": "User2" }));

    let second = stored_password(&state, id);
    assert_ne!(second, first);
    let parsed = PasswordHash::new(&second).unwrap();
    assert!(Argon2::default().verify_password(b"5678", &parsed).is_ok());
}

#[tokio::test]
async fn empty_strings_follow_create_and_patch_rules() {
    let (app, state) = app_with_state();
    let (status, body) = send(
        &app,
        Method::POST,
        "/users/",
        Some(json!({ "name": "", "password": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();
    let hash = stored_password(&state, id);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/users/{id}"),
        Some(json!({ "name": "User1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "User1");

    // An empty string on patch leaves the field alone.
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/users/{id}"),
        Some(json!({ "name": "", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "User1");
    assert_eq!(stored_password(&state, id), hash);
}

#[tokio::test]
async fn duplicate_header_conflicts() {
    let app = app();
    let owner = create_user(&app, "User1").await;
    let ad = json!({ "header": "H1", "description": "D1", "owner_id": owner });

    let (status, _) = send(&app, Method::POST, "/advertisements/", Some(ad.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, Method::POST, "/advertisements/", Some(ad)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["reason"], "advertisement with this header already exists");
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({ "name": "User1", "password": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "error", "reason": "object not found" }));
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}
