//! Field-level argument validation shared by tool definitions.

use super::error::{ApiError, ApiResult};

/// Fail when a required identifier-like field is empty.
pub fn require_id(value: &str, field: &str) -> ApiResult<()> {
    if value.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Fail when a field is empty or outside its enumerated allowed set.
pub fn require_one_of(value: &str, field: &str, allowed: &[&str]) -> ApiResult<()> {
    if value.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    if !allowed.contains(&value) {
        return Err(ApiError::validation(format!(
            "{field} must be one of: {}",
            allowed.join("|")
        )));
    }
    Ok(())
}
