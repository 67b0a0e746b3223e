//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use qrvault_core::category::{validate_category_name, validate_hex_color};
use qrvault_core::error::CoreError;
use qrvault_db::models::category::{Category, CategoryStats, CreateCategory, UpdateCategory};
use qrvault_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, IdPath};
use crate::response::DataResponse;
use crate::state::AppState;

/// Trim the name and check every field of a create/update body.
fn normalize(
    name: &str,
    description: Option<String>,
    color: Option<String>,
) -> AppResult<(String, Option<String>, Option<String>)> {
    let name = validate_category_name(name)?.to_string();
    if let Some(color) = color.as_deref() {
        validate_hex_color(color)?;
    }
    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    Ok((name, description, color))
}

/// GET /api/v1/categories
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(categories)))
}

/// GET /api/v1/categories/stats
pub async fn stats(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CategoryStats>>>> {
    let stats = CategoryRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse::new(stats)))
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let (name, description, color) = normalize(&input.name, input.description, input.color)?;
    let input = CreateCategory {
        name,
        description,
        color,
    };

    let category = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(id = category.id, name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(category))))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(Json(DataResponse::new(category)))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppJson(input): AppJson<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    let (name, description, color) = normalize(&input.name, input.description, input.color)?;
    let input = UpdateCategory {
        name,
        description,
        color,
    };

    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    tracing::info!(id, "Category updated");
    Ok(Json(DataResponse::new(category)))
}

/// DELETE /api/v1/categories/{id}
///
/// Refused with 409 while any QR code is still filed under the category.
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath) -> AppResult<StatusCode> {
    if CategoryRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }

    let in_use = CategoryRepo::count_qr_codes(&state.pool, id).await?;
    if in_use > 0 {
        tracing::info!(id, in_use, "Category delete refused");
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot delete category: {in_use} QR code(s) are still assigned to it"
        ))));
    }

    let deleted = CategoryRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(id, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))
    }
}
