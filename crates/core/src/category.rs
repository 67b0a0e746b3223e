//! Category field rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Color assigned to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3B82F6";

/// Maximum length of a category name.
pub const MAX_CATEGORY_NAME_CHARS: usize = 100;

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid regex"));

/// Validate a category name and return it trimmed.
pub fn validate_category_name(name: &str) -> Result<&str, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Category name is required".into()));
    }
    if trimmed.chars().count() > MAX_CATEGORY_NAME_CHARS {
        return Err(CoreError::Validation(format!(
            "Category name must not exceed {MAX_CATEGORY_NAME_CHARS} characters"
        )));
    }
    Ok(trimmed)
}

/// Validate a `#RRGGBB` color.
pub fn validate_hex_color(color: &str) -> Result<(), CoreError> {
    if HEX_COLOR_RE.is_match(color) {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Color must be a hexadecimal value in the form #RRGGBB".into(),
        ))
    }
}
