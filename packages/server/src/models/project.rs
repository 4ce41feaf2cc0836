use chrono::{DateTime, Utc};
use serde::Serialize;

use super::progress::ProgressDto;

#[derive(Serialize)]
pub struct ProjectDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub project_path: Option<String>,
    pub difficulty: Option<String>,
    pub estimated_minutes: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// The calling student's own progress record; always `null` for staff.
    pub progress: Option<ProgressDto>,
}

impl ProjectDto {
    pub fn new(
        project: crate::entity::project::Model,
        progress: Option<crate::entity::project_progress::Model>,
    ) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            project_path: project.project_path,
            difficulty: project.difficulty,
            estimated_minutes: project.estimated_minutes,
            is_active: project.is_active,
            created_at: project.created_at,
            progress: progress.map(ProgressDto::from),
        }
    }
}

#[derive(Serialize)]
pub struct ProjectsResponse {
    pub success: bool,
    pub projects: Vec<ProjectDto>,
}

#[derive(Serialize)]
pub struct ProjectResponse {
    pub success: bool,
    pub project: ProjectDto,
}

/// Question options keyed the way they are displayed.
#[derive(Serialize)]
pub struct QuestionOptionsDto {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: Option<String>,
    #[serde(rename = "D")]
    pub d: Option<String>,
}

/// Question payload for students. The correct option is deliberately absent.
#[derive(Serialize)]
pub struct StepQuestionDto {
    pub id: i32,
    pub step_id: i32,
    pub prompt: String,
    pub options: QuestionOptionsDto,
    pub points: i32,
}

impl From<crate::entity::step_question::Model> for StepQuestionDto {
    fn from(q: crate::entity::step_question::Model) -> Self {
        Self {
            id: q.id,
            step_id: q.step_id,
            prompt: q.prompt,
            options: QuestionOptionsDto {
                a: q.option_a,
                b: q.option_b,
                c: q.option_c,
                d: q.option_d,
            },
            points: q.points,
        }
    }
}

#[derive(Serialize)]
pub struct StepDto {
    pub id: i32,
    pub project_id: i32,
    pub order_index: i32,
    pub title: String,
    pub content: String,
    pub code_snippets: Option<serde_json::Value>,
    pub full_code: Option<String>,
    pub is_released: bool,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<StepQuestionDto>,
}

impl StepDto {
    pub fn new(
        step: crate::entity::project_step::Model,
        questions: Vec<crate::entity::step_question::Model>,
    ) -> Self {
        Self {
            id: step.id,
            project_id: step.project_id,
            order_index: step.order_index,
            title: step.title,
            content: step.content,
            code_snippets: step.code_snippets,
            full_code: step.full_code,
            is_released: step.is_released,
            created_at: step.created_at,
            questions: questions.into_iter().map(StepQuestionDto::from).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct StepsResponse {
    pub success: bool,
    pub steps: Vec<StepDto>,
}

/// Result of executing a project's `index.py` on the server.
#[derive(Serialize)]
pub struct RunProjectResponse {
    pub success: bool,
    /// Captured stdout of the run.
    pub output: String,
    /// The script's source, for display alongside the output.
    pub code: String,
}
