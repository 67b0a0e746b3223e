//! QR code entity model and DTOs.

use qrvault_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `qr_codes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QrCode {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub category_id: Option<DbId>,
    /// Public path of the stored raster, e.g. `/qr-images/qr_1700000000000_ab12cd.png`.
    pub image_path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Category fields embedded in QR code listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub id: DbId,
    pub name: String,
    pub color: String,
}

/// A `qr_codes` row LEFT JOINed with its category.
#[derive(Debug, Clone, FromRow)]
pub struct QrCodeJoinRow {
    #[sqlx(flatten)]
    pub qr: QrCode,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

/// QR code with its category, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct QrCodeWithCategory {
    #[serde(flatten)]
    pub qr: QrCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
}

impl From<QrCodeJoinRow> for QrCodeWithCategory {
    fn from(row: QrCodeJoinRow) -> Self {
        let category = match (row.qr.category_id, row.category_name, row.category_color) {
            (Some(id), Some(name), Some(color)) => Some(CategorySummary { id, name, color }),
            _ => None,
        };
        Self { qr: row.qr, category }
    }
}

/// DTO for creating a new QR code. The image path is assigned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQrCode {
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
}

/// DTO for replacing a QR code. Omitted optional fields are cleared.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQrCode {
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
}

/// Query parameters for `GET /api/v1/qr-codes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QrCodeListParams {
    /// Only QR codes filed under this category.
    pub category_id: Option<DbId>,
    /// Case-insensitive match on title, content or description.
    pub search: Option<String>,
}
