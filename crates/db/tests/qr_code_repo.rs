//! Integration tests for the QR code repository.

use qrvault_db::models::category::CreateCategory;
use qrvault_db::models::qr_code::{CreateQrCode, UpdateQrCode};
use qrvault_db::repositories::{CategoryRepo, QrCodeRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_qr_code(title: &str, content: &str, category_id: Option<i64>) -> CreateQrCode {
    CreateQrCode {
        title: title.to_string(),
        content: content.to_string(),
        description: None,
        category_id,
    }
}

async fn create_category(pool: &PgPool, name: &str) -> i64 {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: name.to_string(),
            description: None,
            color: Some("#10B981".into()),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_find(pool: PgPool) {
    let category_id = create_category(&pool, "Links").await;
    let created = QrCodeRepo::create(
        &pool,
        &new_qr_code("Home", "https://example.com", Some(category_id)),
        Some("/qr-images/qr_1_abc123.png"),
    )
    .await
    .unwrap();
    assert_eq!(created.image_path.as_deref(), Some("/qr-images/qr_1_abc123.png"));

    let found = QrCodeRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(found.qr.title, "Home");
    let category = found.category.expect("category joined");
    assert_eq!(category.id, category_id);
    assert_eq!(category.name, "Links");
    assert_eq!(category.color, "#10B981");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_uncategorized_has_no_category(pool: PgPool) {
    let created = QrCodeRepo::create(&pool, &new_qr_code("Plain", "hello", None), None)
        .await
        .unwrap();
    let found = QrCodeRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert!(found.category.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_category_is_fk_violation(pool: PgPool) {
    let err = QrCodeRepo::create(&pool, &new_qr_code("Bad", "x", Some(999_999)), None)
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23503"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_newest_first_with_filter(pool: PgPool) {
    let menus = create_category(&pool, "Menus").await;
    let first = QrCodeRepo::create(&pool, &new_qr_code("first", "1", Some(menus)), None)
        .await
        .unwrap();
    let second = QrCodeRepo::create(&pool, &new_qr_code("second", "2", None), None)
        .await
        .unwrap();
    let third = QrCodeRepo::create(&pool, &new_qr_code("third", "3", Some(menus)), None)
        .await
        .unwrap();

    let all: Vec<i64> = QrCodeRepo::list(&pool, None)
        .await
        .unwrap()
        .iter()
        .map(|q| q.qr.id)
        .collect();
    assert_eq!(all, vec![third.id, second.id, first.id]);

    let filtered: Vec<i64> = QrCodeRepo::list(&pool, Some(menus))
        .await
        .unwrap()
        .iter()
        .map(|q| q.qr.id)
        .collect();
    assert_eq!(filtered, vec![third.id, first.id]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_is_case_insensitive(pool: PgPool) {
    QrCodeRepo::create(&pool, &new_qr_code("Lunch Menu", "https://a.example", None), None)
        .await
        .unwrap();
    QrCodeRepo::create(
        &pool,
        &CreateQrCode {
            title: "Wifi".into(),
            content: "WIFI:S:Cafe;T:WPA;P:secret;;".into(),
            description: Some("Guest network for the MENU bar".into()),
            category_id: None,
        },
        None,
    )
    .await
    .unwrap();
    QrCodeRepo::create(&pool, &new_qr_code("Other", "nothing", None), None)
        .await
        .unwrap();

    let hits = QrCodeRepo::search(&pool, "menu").await.unwrap();
    assert_eq!(hits.len(), 2);

    let literal = QrCodeRepo::search(&pool, "%").await.unwrap();
    assert!(literal.is_empty(), "wildcards match literally");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_recent_and_count(pool: PgPool) {
    for i in 0..5 {
        QrCodeRepo::create(&pool, &new_qr_code(&format!("qr{i}"), "x", None), None)
            .await
            .unwrap();
    }

    assert_eq!(QrCodeRepo::count(&pool).await.unwrap(), 5);

    let recent = QrCodeRepo::recent(&pool, Some(2)).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].qr.title, "qr4");

    let clamped = QrCodeRepo::recent(&pool, Some(0)).await.unwrap();
    assert_eq!(clamped.len(), 1);

    let default = QrCodeRepo::recent(&pool, None).await.unwrap();
    assert_eq!(default.len(), 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_replaces_all_fields(pool: PgPool) {
    let category_id = create_category(&pool, "Old").await;
    let created = QrCodeRepo::create(
        &pool,
        &CreateQrCode {
            title: "Before".into(),
            content: "before".into(),
            description: Some("desc".into()),
            category_id: Some(category_id),
        },
        Some("/qr-images/before.png"),
    )
    .await
    .unwrap();

    let updated = QrCodeRepo::update(
        &pool,
        created.id,
        &UpdateQrCode {
            title: "After".into(),
            content: "after".into(),
            description: None,
            category_id: None,
        },
        Some("/qr-images/after.png"),
    )
    .await
    .unwrap()
    .expect("row exists");

    assert_eq!(updated.title, "After");
    assert_eq!(updated.content, "after");
    assert!(updated.description.is_none());
    assert!(updated.category_id.is_none());
    assert_eq!(updated.image_path.as_deref(), Some("/qr-images/after.png"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete(pool: PgPool) {
    let created = QrCodeRepo::create(&pool, &new_qr_code("Gone", "x", None), None)
        .await
        .unwrap();
    assert!(QrCodeRepo::delete(&pool, created.id).await.unwrap());
    assert!(QrCodeRepo::find_row(&pool, created.id).await.unwrap().is_none());
    assert!(!QrCodeRepo::delete(&pool, created.id).await.unwrap());
}
