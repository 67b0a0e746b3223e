//! Handler for `GET /qr-codes/{id}/export`.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use qrvault_core::error::CoreError;
use qrvault_core::export::{export_qr, ExportFormat};
use qrvault_core::qr::{QrOptions, QrOverrides};
use qrvault_db::repositories::QrCodeRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppQuery, IdPath};
use crate::state::AppState;

/// Query parameters for the export endpoint. `format` is required; omitted
/// style fields fall back to the renderer defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    pub format: Option<String>,
    pub width: Option<u32>,
    pub margin: Option<u32>,
    pub dark_color: Option<String>,
    pub light_color: Option<String>,
    pub error_level: Option<String>,
}

/// GET /api/v1/qr-codes/{id}/export
///
/// Renders the QR code on demand and streams it back as an attachment.
/// Nothing is cached; every request re-renders.
pub async fn export(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppQuery(params): AppQuery<ExportParams>,
) -> AppResult<Response> {
    let format: ExportFormat = params
        .format
        .as_deref()
        .ok_or_else(|| {
            CoreError::UnsupportedFormat("format is required. Use one of: png, svg, pdf".into())
        })?
        .parse()?;
    let opts = QrOptions::from_overrides(&QrOverrides {
        width: params.width,
        margin: params.margin,
        dark_color: params.dark_color.as_deref(),
        light_color: params.light_color.as_deref(),
        error_level: params.error_level.as_deref(),
    })?;

    let qr = QrCodeRepo::find_row(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "QR code",
            id,
        }))?;

    // Rasterising and PDF layout are CPU-bound.
    let artifact = tokio::task::spawn_blocking(move || {
        export_qr(
            &qr.content,
            format,
            &qr.title,
            qr.description.as_deref(),
            &opts,
        )
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Export task failed: {e}")))??;

    tracing::info!(
        id,
        %format,
        bytes = artifact.buffer.len(),
        filename = %artifact.filename,
        "QR code exported"
    );

    let headers = [
        (CONTENT_TYPE, artifact.mime_type.to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.filename),
        ),
        (CONTENT_LENGTH, artifact.buffer.len().to_string()),
    ];
    Ok((headers, Body::from(artifact.buffer)).into_response())
}
