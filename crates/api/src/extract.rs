//! Request extractors that reject with [`AppError`] so malformed input gets
//! the same JSON error envelope as every other failure.

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;
use qrvault_core::types::DbId;

use crate::error::AppError;

/// A numeric `{id}` path segment.
///
/// Non-numeric ids are rejected with 400 before the handler runs.
///
/// ```ignore
/// async fn get_by_id(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<...>
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub DbId);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        raw.parse::<DbId>()
            .map(IdPath)
            .map_err(|_| AppError::BadRequest(format!("Invalid id '{raw}'")))
    }
}

/// `axum::Json` with an [`AppError`] rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Query` with an [`AppError`] rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
