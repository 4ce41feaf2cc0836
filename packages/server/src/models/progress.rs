use chrono::{DateTime, Utc};
use common::ProgressStatus;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct ProgressDto {
    pub id: i32,
    pub student_id: i32,
    pub project_id: i32,
    pub status: ProgressStatus,
    pub progress_percentage: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub mentor_feedback: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::project_progress::Model> for ProgressDto {
    fn from(p: crate::entity::project_progress::Model) -> Self {
        Self {
            id: p.id,
            student_id: p.student_id,
            project_id: p.project_id,
            status: p.status,
            progress_percentage: p.progress_percentage,
            started_at: p.started_at,
            completed_at: p.completed_at,
            notes: p.notes,
            mentor_feedback: p.mentor_feedback,
            updated_at: p.updated_at,
        }
    }
}

/// Request body for `POST /progress`.
///
/// The percentage and status are always recomputed from the answer ledger;
/// any client-supplied values are ignored, so they are not even declared here.
#[derive(Deserialize)]
pub struct UpdateProgressRequest {
    pub project_id: i32,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct ProgressResponse {
    pub success: bool,
    pub progress: ProgressDto,
}

#[derive(Serialize)]
pub struct ProgressListResponse {
    pub success: bool,
    pub progress: Vec<ProgressDto>,
}

/// Per-step completion breakdown within a project.
#[derive(Serialize)]
pub struct StepProgressDto {
    pub step_id: i32,
    pub step_order: i32,
    pub step_title: String,
    /// A step counts as completed once any of its questions has an answer.
    pub is_completed: bool,
    pub questions_answered: usize,
    pub questions_correct: usize,
    pub total_questions: usize,
    pub points_earned: i32,
    pub points_possible: i32,
}

#[derive(Serialize)]
pub struct ProjectProgressResponse {
    pub success: bool,
    pub progress: ProgressDto,
    pub step_progress: Vec<StepProgressDto>,
    pub overall_percentage: i32,
    pub completed_steps: usize,
    pub total_steps: usize,
}
