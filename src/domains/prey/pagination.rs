//! Pagination normalization shared by every list tool.
//!
//! The upstream API pages with `page` (>= 1, default 1) and `page_size`
//! (1..=100, default 20). Values at or below zero fall back to the default;
//! a `page_size` above the maximum is a validation error, never a silent
//! clamp.

use serde_json::{Value, json};

use super::error::{ApiError, ApiResult};

pub const MIN_PAGE_SIZE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Non-positive pages become 1; anything else passes through.
pub fn normalize_page(page: i64) -> i64 {
    if page <= 0 { 1 } else { page }
}

/// Non-positive sizes become the default; sizes above the maximum fail.
pub fn normalize_page_size(size: i64) -> ApiResult<i64> {
    if size <= 0 {
        return Ok(DEFAULT_PAGE_SIZE);
    }
    if size > MAX_PAGE_SIZE {
        return Err(ApiError::validation(format!(
            "page_size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}"
        )));
    }
    Ok(size)
}

/// Append normalized `page` and `page_size` to a query set.
pub fn add_pagination(
    mut query: Vec<(String, String)>,
    page: i64,
    page_size: i64,
) -> ApiResult<Vec<(String, String)>> {
    let page = normalize_page(page);
    let page_size = normalize_page_size(page_size)?;
    query.push(("page".to_string(), page.to_string()));
    query.push(("page_size".to_string(), page_size.to_string()));
    Ok(query)
}

/// Normalized pagination metadata for the response envelope.
pub fn meta(page: i64, page_size: i64) -> ApiResult<Value> {
    let page_size = normalize_page_size(page_size)?;
    Ok(json!({
        "page": normalize_page(page),
        "page_size": page_size,
    }))
}
