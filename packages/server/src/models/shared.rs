use serde::Serialize;

use crate::error::AppError;

/// Pagination metadata included in paginated list responses.
#[derive(Serialize)]
pub struct Pagination {
    /// Current page number (1-based).
    pub page: u64,
    pub per_page: u64,
    /// Total number of matching items across all pages.
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page.max(1)),
        }
    }
}

/// Clamp raw pagination query values to sane bounds.
pub fn normalize_paging(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(20).clamp(1, 100);
    (page, per_page)
}

/// Validate that a required string field is non-empty after trimming.
pub fn validate_required(value: &str, name: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} is required")));
    }
    Ok(())
}
