//! Integration tests for the `/api/v1/qr-codes` endpoints and the stored
//! raster lifecycle.

mod common;

use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use common::{body_bytes, body_json, delete, get, post_json, put_json};
use serde_json::{json, Value};
use sqlx::PgPool;
use tempfile::TempDir;

/// Filesystem location of a public `/qr-images/...` path.
fn on_disk(public: &Path, image_path: &str) -> PathBuf {
    public.join(image_path.trim_start_matches('/'))
}

async fn create_qr(app: axum::Router, body: Value) -> Value {
    let response = post_json(app, "/api/v1/qr-codes", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_stores_image_and_serves_it(pool: PgPool) {
    let public = TempDir::new().unwrap();
    let app = common::build_test_app(pool, public.path());

    let qr = create_qr(
        app.clone(),
        json!({ "title": "  Home  ", "content": "https://example.com" }),
    )
    .await;

    assert_eq!(qr["title"], "Home");
    assert!(qr.get("category").is_none());
    let image_path = qr["image_path"].as_str().unwrap();
    assert!(image_path.starts_with("/qr-images/qr_"));
    assert!(image_path.ends_with(".png"));
    assert!(on_disk(public.path(), image_path).exists());

    let response = get(app, image_path).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert!(body_bytes(response).await.starts_with(b"\x89PNG"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_embeds_category(pool: PgPool) {
    let public = TempDir::new().unwrap();
    let app = common::build_test_app(pool, public.path());

    let response = post_json(
        app.clone(),
        "/api/v1/categories",
        json!({ "name": "Links", "color": "#EF4444" }),
    )
    .await;
    let category_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let qr = create_qr(
        app,
        json!({ "title": "t", "content": "hello", "category_id": category_id }),
    )
    .await;
    assert_eq!(qr["category"]["id"], category_id);
    assert_eq!(qr["category"]["name"], "Links");
    assert_eq!(qr["category"]["color"], "#EF4444");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_validates_input(pool: PgPool) {
    let public = TempDir::new().unwrap();
    let app = common::build_test_app(pool, public.path());

    for body in [
        json!({ "title": "t", "content": "   " }),
        json!({ "title": "", "content": "x" }),
        json!({ "title": "t", "content": "x".repeat(2954) }),
        json!({ "title": "t", "content": "a\u{0}b" }),
    ] {
        let response = post_json(app.clone(), "/api/v1/qr-codes", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    // Nothing was written for rejected input.
    assert!(!public.path().join("qr-images").exists());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_unknown_category_removes_image(pool: PgPool) {
    let public = TempDir::new().unwrap();
    let app = common::build_test_app(pool, public.path());

    let response = post_json(
        app,
        "/api/v1/qr-codes",
        json!({ "title": "t", "content": "hello", "category_id": 999999 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let leftovers = std::fs::read_dir(public.path().join("qr-images"))
        .unwrap()
        .count();
    assert_eq!(leftovers, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_with_identical_content_keeps_image(pool: PgPool) {
    let public = TempDir::new().unwrap();
    let app = common::build_test_app(pool, public.path());

    let qr = create_qr(app.clone(), json!({ "title": "Old", "content": "same" })).await;
    let id = qr["id"].as_i64().unwrap();

    let response = put_json(
        app,
        &format!("/api/v1/qr-codes/{id}"),
        json!({ "title": "New", "content": "same", "description": "now described" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["title"], "New");
    assert_eq!(updated["description"], "now described");
    assert_eq!(updated["image_path"], qr["image_path"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_with_new_content_replaces_image(pool: PgPool) {
    let public = TempDir::new().unwrap();
    let app = common::build_test_app(pool, public.path());

    let qr = create_qr(app.clone(), json!({ "title": "t", "content": "before" })).await;
    let id = qr["id"].as_i64().unwrap();
    let old_path = qr["image_path"].as_str().unwrap().to_string();

    let response = put_json(
        app,
        &format!("/api/v1/qr-codes/{id}"),
        json!({ "title": "t", "content": "after" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await["data"].clone();
    let new_path = updated["image_path"].as_str().unwrap();
    assert_ne!(new_path, old_path);
    assert_eq!(updated["content"], "after");
    assert!(on_disk(public.path(), new_path).exists());
    assert!(!on_disk(public.path(), &old_path).exists());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_unknown_id_returns_404(pool: PgPool) {
    let public = TempDir::new().unwrap();
    let app = common::build_test_app(pool, public.path());

    let response = put_json(
        app,
        "/api/v1/qr-codes/999999",
        json!({ "title": "t", "content": "x" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_removes_row_and_image(pool: PgPool) {
    let public = TempDir::new().unwrap();
    let app = common::build_test_app(pool, public.path());

    let qr = create_qr(app.clone(), json!({ "title": "t", "content": "bye" })).await;
    let id = qr["id"].as_i64().unwrap();
    let image_path = qr["image_path"].as_str().unwrap();

    let response = delete(app.clone(), &format!("/api/v1/qr-codes/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!on_disk(public.path(), image_path).exists());

    let response = get(app, &format!("/api/v1/qr-codes/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_succeeds_when_image_already_missing(pool: PgPool) {
    let public = TempDir::new().unwrap();
    let app = common::build_test_app(pool, public.path());

    let qr = create_qr(app.clone(), json!({ "title": "t", "content": "orphan" })).await;
    let id = qr["id"].as_i64().unwrap();
    std::fs::remove_file(on_disk(public.path(), qr["image_path"].as_str().unwrap())).unwrap();

    let response = delete(app.clone(), &format!("/api/v1/qr-codes/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/qr-codes/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filter_search_recent_and_count(pool: PgPool) {
    let public = TempDir::new().unwrap();
    let app = common::build_test_app(pool, public.path());

    let response = post_json(app.clone(), "/api/v1/categories", json!({ "name": "Menus" })).await;
    let menus = body_json(response).await["data"]["id"].as_i64().unwrap();

    create_qr(
        app.clone(),
        json!({ "title": "Lunch", "content": "https://food.example/lunch", "category_id": menus }),
    )
    .await;
    create_qr(app.clone(), json!({ "title": "Wifi", "content": "WIFI:S:Cafe;T:WPA;P:x;;" })).await;
    create_qr(
        app.clone(),
        json!({ "title": "Dinner", "content": "https://food.example/dinner", "category_id": menus }),
    )
    .await;

    let json = body_json(get(app.clone(), "/api/v1/qr-codes").await).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Dinner", "Wifi", "Lunch"]);

    let json =
        body_json(get(app.clone(), &format!("/api/v1/qr-codes?category_id={menus}")).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json = body_json(get(app.clone(), "/api/v1/qr-codes?search=FOOD").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json = body_json(get(app.clone(), "/api/v1/qr-codes/recent?limit=1").await).await;
    let recent = json["data"].as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["title"], "Dinner");

    let json = body_json(get(app.clone(), "/api/v1/qr-codes/count").await).await;
    assert_eq!(json["data"]["total"], 3);

    let response = get(app, "/api/v1/qr-codes?category_id=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
