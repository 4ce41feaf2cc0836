use chrono::{DateTime, Utc};
use common::{SubmissionStatus, SubmissionType};
use serde::{Deserialize, Serialize};

use super::shared::Pagination;
use crate::error::AppError;

#[derive(Serialize)]
pub struct SubmissionDto {
    pub id: i32,
    pub student_id: i32,
    pub student_name: Option<String>,
    pub project_id: Option<i32>,
    pub project_name: Option<String>,
    pub filename: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub notes: Option<String>,
    pub status: SubmissionStatus,
    pub submission_type: SubmissionType,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<i32>,
    pub reviewer_name: Option<String>,
    pub review_notes: Option<String>,
}

impl SubmissionDto {
    pub fn new(
        s: crate::entity::submission::Model,
        student_name: Option<String>,
        project_name: Option<String>,
        reviewer_name: Option<String>,
    ) -> Self {
        Self {
            id: s.id,
            student_id: s.student_id,
            student_name,
            project_id: s.project_id,
            project_name,
            filename: s.filename,
            file_size: s.file_size,
            mime_type: s.mime_type,
            notes: s.notes,
            status: s.status,
            submission_type: s.submission_type,
            submitted_at: s.submitted_at,
            reviewed_at: s.reviewed_at,
            reviewed_by: s.reviewed_by,
            reviewer_name,
            review_notes: s.review_notes,
        }
    }
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub submission: SubmissionDto,
}

#[derive(Serialize)]
pub struct SubmissionsResponse {
    pub success: bool,
    pub submissions: Vec<SubmissionDto>,
}

/// Query parameters for a student's own per-project submission list.
#[derive(Deserialize)]
pub struct MySubmissionsQuery {
    pub submission_type: Option<SubmissionType>,
}

/// Query parameters for the staff-wide submission list.
#[derive(Deserialize)]
pub struct AdminSubmissionsQuery {
    pub project_id: Option<i32>,
    pub student_id: Option<i32>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Serialize)]
pub struct AdminSubmissionsResponse {
    pub success: bool,
    pub submissions: Vec<SubmissionDto>,
    pub pagination: Pagination,
}

/// Request body for reviewing a submission.
#[derive(Deserialize)]
pub struct ReviewRequest {
    pub status: SubmissionStatus,
    pub review_notes: Option<String>,
}

pub fn validate_review_request(payload: &ReviewRequest) -> Result<(), AppError> {
    if !SubmissionStatus::REVIEWER_SETTABLE.contains(&payload.status) {
        return Err(AppError::Validation(format!(
            "Status must be one of: {}",
            SubmissionStatus::REVIEWER_SETTABLE
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }
    Ok(())
}

/// Inline view of a submission's file content. Binary files come back
/// base64-encoded with `is_binary` set.
#[derive(Serialize)]
pub struct SubmissionContentResponse {
    pub success: bool,
    pub content: String,
    pub is_binary: bool,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_cannot_reset_to_submitted() {
        let bad = ReviewRequest {
            status: SubmissionStatus::Submitted,
            review_notes: None,
        };
        assert!(validate_review_request(&bad).is_err());

        for status in SubmissionStatus::REVIEWER_SETTABLE {
            let ok = ReviewRequest {
                status: *status,
                review_notes: Some("looks good".into()),
            };
            assert!(validate_review_request(&ok).is_ok());
        }
    }
}
