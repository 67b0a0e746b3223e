//! Repository for the `categories` table.

use qrvault_core::category::DEFAULT_CATEGORY_COLOR;
use qrvault_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, CategoryStats, CreateCategory, UpdateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, color, created_at, updated_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List all categories ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY name ASC");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Find a category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new category, returning the created row.
    ///
    /// If `color` is `None` in the input, defaults to `#3B82F6`.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, description, color)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR))
            .fetch_one(pool)
            .await
    }

    /// Replace every editable field of a category.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = $2,
                description = $3,
                color = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR))
            .fetch_optional(pool)
            .await
    }

    /// Delete a category by ID. Returns `true` if a row was removed.
    ///
    /// Callers check [`CategoryRepo::count_qr_codes`] first; QR codes that
    /// still reference the category would otherwise be detached.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of QR codes filed under a category.
    pub async fn count_qr_codes(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM qr_codes WHERE category_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// QR code totals per category, most used first. Empty categories are
    /// included with a total of zero.
    pub async fn stats(pool: &PgPool) -> Result<Vec<CategoryStats>, sqlx::Error> {
        sqlx::query_as::<_, CategoryStats>(
            "SELECT c.id AS category_id,
                    c.name AS category_name,
                    c.color AS category_color,
                    COUNT(q.id) AS total_qr_codes
             FROM categories c
             LEFT JOIN qr_codes q ON q.category_id = c.id
             GROUP BY c.id, c.name, c.color
             ORDER BY total_qr_codes DESC, c.name ASC",
        )
        .fetch_all(pool)
        .await
    }
}
