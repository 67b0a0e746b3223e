pub mod categories;
pub mod content;
pub mod health;
pub mod qr_codes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                                      list, create
/// /categories/stats                                QR totals per category
/// /categories/{id}                                 get, update, delete
///
/// /qr-codes                                        list (?category_id, ?search), create
/// /qr-codes/recent                                 most recent (?limit)
/// /qr-codes/count                                  total
/// /qr-codes/{id}                                   get, update, delete
/// /qr-codes/{id}/export                            download (?format, ?width, ?margin,
///                                                  ?darkColor, ?lightColor, ?errorLevel)
///
/// /content/analyze                                 validate + classify (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::router())
        .nest("/qr-codes", qr_codes::router())
        .nest("/content", content::router())
}
