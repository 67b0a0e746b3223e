//! Repository for the `qr_codes` table.
//!
//! Listing queries LEFT JOIN `categories` so that each QR code carries its
//! category name and color when it has one.

use qrvault_core::types::DbId;
use sqlx::PgPool;

use crate::models::qr_code::{
    CreateQrCode, QrCode, QrCodeJoinRow, QrCodeWithCategory, UpdateQrCode,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, description, content, category_id, image_path, created_at, updated_at";

/// Joined select prefix; `q` is `qr_codes`, `c` is `categories`.
const JOINED_SELECT: &str = "SELECT q.id, q.title, q.description, q.content, q.category_id,
            q.image_path, q.created_at, q.updated_at,
            c.name AS category_name, c.color AS category_color
     FROM qr_codes q
     LEFT JOIN categories c ON c.id = q.category_id";

/// Default number of rows returned by [`QrCodeRepo::recent`].
pub const DEFAULT_RECENT_LIMIT: i64 = 10;

/// Maximum number of rows returned by [`QrCodeRepo::recent`].
pub const MAX_RECENT_LIMIT: i64 = 100;

/// Provides CRUD operations for QR codes.
pub struct QrCodeRepo;

impl QrCodeRepo {
    /// List QR codes newest first, optionally restricted to one category.
    pub async fn list(
        pool: &PgPool,
        category_id: Option<DbId>,
    ) -> Result<Vec<QrCodeWithCategory>, sqlx::Error> {
        let rows = match category_id {
            Some(category_id) => {
                let query = format!(
                    "{JOINED_SELECT}
                     WHERE q.category_id = $1
                     ORDER BY q.created_at DESC, q.id DESC"
                );
                sqlx::query_as::<_, QrCodeJoinRow>(&query)
                    .bind(category_id)
                    .fetch_all(pool)
                    .await?
            }
            None => {
                let query = format!("{JOINED_SELECT} ORDER BY q.created_at DESC, q.id DESC");
                sqlx::query_as::<_, QrCodeJoinRow>(&query)
                    .fetch_all(pool)
                    .await?
            }
        };
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Case-insensitive substring search over title, content and description.
    pub async fn search(
        pool: &PgPool,
        term: &str,
    ) -> Result<Vec<QrCodeWithCategory>, sqlx::Error> {
        let query = format!(
            "{JOINED_SELECT}
             WHERE q.title ILIKE $1 OR q.content ILIKE $1 OR q.description ILIKE $1
             ORDER BY q.created_at DESC, q.id DESC"
        );
        let rows = sqlx::query_as::<_, QrCodeJoinRow>(&query)
            .bind(format!("%{}%", escape_like(term)))
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// The most recently created QR codes.
    ///
    /// `limit` defaults to [`DEFAULT_RECENT_LIMIT`] and is clamped to
    /// `1..=MAX_RECENT_LIMIT`.
    pub async fn recent(
        pool: &PgPool,
        limit: Option<i64>,
    ) -> Result<Vec<QrCodeWithCategory>, sqlx::Error> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT);
        let query = format!("{JOINED_SELECT} ORDER BY q.created_at DESC, q.id DESC LIMIT $1");
        let rows = sqlx::query_as::<_, QrCodeJoinRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Total number of QR codes.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM qr_codes")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Find a QR code with its category.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<QrCodeWithCategory>, sqlx::Error> {
        let query = format!("{JOINED_SELECT} WHERE q.id = $1");
        let row = sqlx::query_as::<_, QrCodeJoinRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Find the plain `qr_codes` row, without the category join.
    pub async fn find_row(pool: &PgPool, id: DbId) -> Result<Option<QrCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM qr_codes WHERE id = $1");
        sqlx::query_as::<_, QrCode>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new QR code, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateQrCode,
        image_path: Option<&str>,
    ) -> Result<QrCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO qr_codes (title, description, content, category_id, image_path)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QrCode>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.content)
            .bind(input.category_id)
            .bind(image_path)
            .fetch_one(pool)
            .await
    }

    /// Replace every editable field of a QR code, including `image_path`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQrCode,
        image_path: Option<&str>,
    ) -> Result<Option<QrCode>, sqlx::Error> {
        let query = format!(
            "UPDATE qr_codes SET
                title = $2,
                description = $3,
                content = $4,
                category_id = $5,
                image_path = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QrCode>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.content)
            .bind(input.category_id)
            .bind(image_path)
            .fetch_optional(pool)
            .await
    }

    /// Delete a QR code by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM qr_codes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
