//! Handlers for the `/qr-codes` resource.
//!
//! Every QR code owns one PNG raster in the image store. The raster and the
//! row are not updated atomically: the raster is written first, the row
//! second, and stale rasters are removed best-effort afterwards.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use qrvault_core::content::{validate_content, validate_title};
use qrvault_core::error::CoreError;
use qrvault_core::image_store::unique_filename;
use qrvault_core::qr::QrOptions;
use qrvault_core::types::DbId;
use qrvault_db::models::qr_code::{
    CreateQrCode, QrCodeListParams, QrCodeWithCategory, UpdateQrCode,
};
use qrvault_db::repositories::QrCodeRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery, IdPath};
use crate::response::DataResponse;
use crate::state::AppState;

/// Prefix of stored raster filenames.
const IMAGE_PREFIX: &str = "qr";

/// Query parameters for `GET /qr-codes/recent`.
#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub limit: Option<i64>,
}

/// Response body for `GET /qr-codes/count`.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub total: i64,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "QR code",
        id,
    })
}

/// Validate title and content, returning the trimmed title and the
/// description with blanks folded to `None`.
fn normalize(
    title: &str,
    content: &str,
    description: Option<String>,
) -> AppResult<(String, Option<String>)> {
    validate_title(title)?;
    validate_content(content).map_err(CoreError::from)?;
    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    Ok((title.trim().to_string(), description))
}

/// Re-read a row with its category after a write.
async fn load(state: &AppState, id: DbId) -> AppResult<QrCodeWithCategory> {
    QrCodeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// GET /api/v1/qr-codes
///
/// `search` takes precedence over listing; `category_id` narrows either.
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<QrCodeListParams>,
) -> AppResult<Json<DataResponse<Vec<QrCodeWithCategory>>>> {
    let term = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let qr_codes = match term {
        Some(term) => {
            let mut hits = QrCodeRepo::search(&state.pool, term).await?;
            if let Some(category_id) = params.category_id {
                hits.retain(|q| q.qr.category_id == Some(category_id));
            }
            hits
        }
        None => QrCodeRepo::list(&state.pool, params.category_id).await?,
    };
    Ok(Json(DataResponse::new(qr_codes)))
}

/// GET /api/v1/qr-codes/recent
pub async fn recent(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<RecentParams>,
) -> AppResult<Json<DataResponse<Vec<QrCodeWithCategory>>>> {
    let qr_codes = QrCodeRepo::recent(&state.pool, params.limit).await?;
    Ok(Json(DataResponse::new(qr_codes)))
}

/// GET /api/v1/qr-codes/count
pub async fn count(State(state): State<AppState>) -> AppResult<Json<DataResponse<CountResponse>>> {
    let total = QrCodeRepo::count(&state.pool).await?;
    Ok(Json(DataResponse::new(CountResponse { total })))
}

/// GET /api/v1/qr-codes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<DataResponse<QrCodeWithCategory>>> {
    let qr = load(&state, id).await?;
    Ok(Json(DataResponse::new(qr)))
}

/// POST /api/v1/qr-codes
///
/// Validates, renders and stores the raster, then inserts the row. If the
/// insert fails the raster is removed again.
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateQrCode>,
) -> AppResult<(StatusCode, Json<DataResponse<QrCodeWithCategory>>)> {
    let (title, description) = normalize(&input.title, &input.content, input.description)?;
    let input = CreateQrCode {
        title,
        description,
        ..input
    };

    let image_path = state
        .images
        .save(
            &input.content,
            &unique_filename(IMAGE_PREFIX),
            &QrOptions::default(),
        )
        .await?;

    let created = match QrCodeRepo::create(&state.pool, &input, Some(&image_path)).await {
        Ok(created) => created,
        Err(e) => {
            state.images.delete(&image_path).await;
            return Err(e.into());
        }
    };
    tracing::info!(id = created.id, image_path = %image_path, "QR code created");

    let qr = load(&state, created.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(qr))))
}

/// PUT /api/v1/qr-codes/{id}
///
/// The raster is regenerated only when the content changes; otherwise the
/// stored `image_path` is kept as is.
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppJson(input): AppJson<UpdateQrCode>,
) -> AppResult<Json<DataResponse<QrCodeWithCategory>>> {
    let (title, description) = normalize(&input.title, &input.content, input.description)?;
    let input = UpdateQrCode {
        title,
        description,
        ..input
    };

    let existing = QrCodeRepo::find_row(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if existing.content == input.content {
        QrCodeRepo::update(&state.pool, id, &input, existing.image_path.as_deref())
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(id, "QR code updated");
        return Ok(Json(DataResponse::new(load(&state, id).await?)));
    }

    let new_path = state
        .images
        .save(
            &input.content,
            &unique_filename(IMAGE_PREFIX),
            &QrOptions::default(),
        )
        .await?;

    let updated = match QrCodeRepo::update(&state.pool, id, &input, Some(&new_path)).await {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            state.images.delete(&new_path).await;
            return Err(not_found(id));
        }
        Err(e) => {
            state.images.delete(&new_path).await;
            return Err(e.into());
        }
    };

    if let Some(old_path) = existing.image_path.as_deref() {
        state.images.delete(old_path).await;
    }
    tracing::info!(id = updated.id, image_path = %new_path, "QR code updated with new image");

    Ok(Json(DataResponse::new(load(&state, id).await?)))
}

/// DELETE /api/v1/qr-codes/{id}
///
/// Removes the raster best-effort, then the row. A missing or undeletable
/// file never blocks the row delete.
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<StatusCode> {
    let existing = QrCodeRepo::find_row(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(image_path) = existing.image_path.as_deref() {
        let outcome = state.images.delete(image_path).await;
        tracing::debug!(id, ?outcome, "QR image cleanup");
    }

    if QrCodeRepo::delete(&state.pool, id).await? {
        tracing::info!(id, "QR code deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
