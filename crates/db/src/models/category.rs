//! Category entity model and DTOs.

use qrvault_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// `#RRGGBB`.
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `#3B82F6` if omitted.
    pub color: Option<String>,
}

/// DTO for replacing a category. An omitted color resets to the default.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategory {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Number of QR codes filed under each category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryStats {
    pub category_id: DbId,
    pub category_name: String,
    pub category_color: String,
    pub total_qr_codes: i64,
}
