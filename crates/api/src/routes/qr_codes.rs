//! Route definitions for the `/qr-codes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{export, qr_codes};
use crate::state::AppState;

/// Routes mounted at `/qr-codes`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /recent        -> recent
/// GET    /count         -> count
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// GET    /{id}/export   -> export
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(qr_codes::list).post(qr_codes::create))
        .route("/recent", get(qr_codes::recent))
        .route("/count", get(qr_codes::count))
        .route(
            "/{id}",
            get(qr_codes::get_by_id)
                .put(qr_codes::update)
                .delete(qr_codes::delete),
        )
        .route("/{id}/export", get(export::export))
}
