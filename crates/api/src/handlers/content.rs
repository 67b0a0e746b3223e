//! Handler for `POST /content/analyze`: validation, classification and
//! density estimate for a candidate payload, without storing anything.

use axum::Json;
use qrvault_core::content::{
    classify_content, estimate_size, validate_content, ContentKind, SizeEstimate,
};
use qrvault_core::qr::EcLevel;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub content: String,
    /// `L`, `M`, `Q` or `H`; defaults to `M`.
    pub error_level: Option<String>,
}

/// Why a payload would be rejected.
#[derive(Debug, Serialize)]
pub struct ContentIssue {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContentAnalysis {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<ContentIssue>,
    pub kind: ContentKind,
    pub label: &'static str,
    /// Length in characters.
    pub length: usize,
    pub error_level: EcLevel,
    pub size_estimate: SizeEstimate,
}

/// POST /api/v1/content/analyze
///
/// Invalid content is reported in the body with 200; only a malformed
/// request (e.g. an unknown error level) is a 400.
pub async fn analyze(
    AppJson(input): AppJson<AnalyzeRequest>,
) -> AppResult<Json<DataResponse<ContentAnalysis>>> {
    let error_level: EcLevel = match input.error_level.as_deref() {
        Some(level) => level.parse()?,
        None => EcLevel::default(),
    };

    let issue = validate_content(&input.content).err().map(|e| ContentIssue {
        code: e.code(),
        message: e.to_string(),
    });
    let kind = classify_content(&input.content);

    Ok(Json(DataResponse::new(ContentAnalysis {
        valid: issue.is_none(),
        issue,
        kind,
        label: kind.label(),
        length: input.content.chars().count(),
        error_level,
        size_estimate: estimate_size(&input.content, error_level),
    })))
}
