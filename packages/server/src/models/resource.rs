use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::shared::validate_required;

#[derive(Serialize)]
pub struct ResourceDto {
    pub id: i32,
    pub title: String,
    /// Markdown text, or a `/uploads/books/...` path for scanned PDFs.
    pub content: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_by: i32,
    pub creator_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceDto {
    pub fn new(r: crate::entity::resource::Model, creator_name: Option<String>) -> Self {
        Self {
            id: r.id,
            title: r.title,
            content: r.content,
            description: r.description,
            category: r.category,
            created_by: r.created_by,
            creator_name,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateResourceRequest {
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    /// Defaults to "General".
    pub category: Option<String>,
}

pub fn validate_create_resource(payload: &CreateResourceRequest) -> Result<(), AppError> {
    validate_required(&payload.title, "title")?;
    validate_required(&payload.content, "content")?;
    Ok(())
}

#[derive(Serialize)]
pub struct ResourceResponse {
    pub success: bool,
    pub resource: ResourceDto,
}

#[derive(Serialize)]
pub struct ResourcesResponse {
    pub success: bool,
    pub resources: Vec<ResourceDto>,
}
