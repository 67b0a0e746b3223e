use axum::routing::post;
use axum::Router;

use crate::handlers::content;
use crate::state::AppState;

/// Routes mounted at `/content`.
///
/// ```text
/// POST   /analyze     -> analyze
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/analyze", post(content::analyze))
}
