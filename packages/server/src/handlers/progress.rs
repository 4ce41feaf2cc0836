use axum::{
    Json,
    extract::{Path, State},
};
use common::ProgressStatus;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{project, project_progress, project_step, step_answer, step_question};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::progress::{
    ProgressDto, ProgressListResponse, ProgressResponse, ProjectProgressResponse,
    StepProgressDto, UpdateProgressRequest,
};
use crate::progress as progress_math;
use crate::state::AppState;

/// Per-step breakdown computed straight from the answer ledger.
async fn step_breakdown<C: ConnectionTrait>(
    db: &C,
    student_id: i32,
    project_id: i32,
) -> Result<Vec<StepProgressDto>, AppError> {
    let steps = project_step::Entity::find()
        .filter(project_step::Column::ProjectId.eq(project_id))
        .filter(project_step::Column::IsReleased.eq(true))
        .order_by_asc(project_step::Column::OrderIndex)
        .all(db)
        .await?;

    let mut out = Vec::with_capacity(steps.len());
    for step in steps {
        let questions = step_question::Entity::find()
            .filter(step_question::Column::StepId.eq(step.id))
            .all(db)
            .await?;

        let mut answered = 0;
        let mut correct = 0;
        let mut points_earned = 0;
        let points_possible: i32 = questions.iter().map(|q| q.points).sum();

        for question in &questions {
            let answer = step_answer::Entity::find()
                .filter(step_answer::Column::StudentId.eq(student_id))
                .filter(step_answer::Column::QuestionId.eq(question.id))
                .one(db)
                .await?;
            if let Some(answer) = answer {
                answered += 1;
                if answer.is_correct {
                    correct += 1;
                }
                points_earned += answer.points_awarded;
            }
        }

        out.push(StepProgressDto {
            step_id: step.id,
            step_order: step.order_index,
            step_title: step.title,
            is_completed: answered > 0,
            questions_answered: answered,
            questions_correct: correct,
            total_questions: questions.len(),
            points_earned,
            points_possible,
        });
    }
    Ok(out)
}

/// Upsert the (student, project) progress row from a computed percentage.
/// Writes only when the stored percentage or status actually changed, so
/// repeated reads are no-ops. `started_at` and `completed_at` are set once.
async fn sync_progress_row<C: ConnectionTrait>(
    db: &C,
    student_id: i32,
    project_id: i32,
    pct: i32,
    notes: Option<String>,
) -> Result<project_progress::Model, AppError> {
    let status = progress_math::derive_status(pct);
    let now = chrono::Utc::now();

    let existing = project_progress::Entity::find()
        .filter(project_progress::Column::StudentId.eq(student_id))
        .filter(project_progress::Column::ProjectId.eq(project_id))
        .one(db)
        .await?;

    let Some(row) = existing else {
        let created = project_progress::ActiveModel {
            student_id: Set(student_id),
            project_id: Set(project_id),
            status: Set(status),
            progress_percentage: Set(pct),
            started_at: Set((status != ProgressStatus::NotStarted).then_some(now)),
            completed_at: Set((status == ProgressStatus::Completed).then_some(now)),
            notes: Set(notes),
            mentor_feedback: Set(None),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        return Ok(created);
    };

    let unchanged =
        row.progress_percentage == pct && row.status == status && notes.is_none();
    if unchanged {
        return Ok(row);
    }

    let started_at = row.started_at;
    let completed_at = row.completed_at;
    let mut active: project_progress::ActiveModel = row.into();
    active.progress_percentage = Set(pct);
    active.status = Set(status);
    if status != ProgressStatus::NotStarted && started_at.is_none() {
        active.started_at = Set(Some(now));
    }
    if status == ProgressStatus::Completed && completed_at.is_none() {
        active.completed_at = Set(Some(now));
    }
    if let Some(notes) = notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(now);
    Ok(active.update(db).await?)
}

/// All of the calling student's progress rows.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn my_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ProgressListResponse>, AppError> {
    auth_user.require_student()?;

    let rows = project_progress::Entity::find()
        .filter(project_progress::Column::StudentId.eq(auth_user.user_id))
        .all(&state.db)
        .await?;

    Ok(Json(ProgressListResponse {
        success: true,
        progress: rows.into_iter().map(ProgressDto::from).collect(),
    }))
}

/// Recompute and store progress for a project. The percentage is always
/// derived from the ledger; clients cannot set it.
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn update_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(payload): AppJson<UpdateProgressRequest>,
) -> Result<Json<ProgressResponse>, AppError> {
    auth_user.require_student()?;

    let txn = state.db.begin().await?;

    project::Entity::find_by_id(payload.project_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".into()))?;

    let breakdown = step_breakdown(&txn, auth_user.user_id, payload.project_id).await?;
    let completed = breakdown.iter().filter(|s| s.is_completed).count();
    let pct = progress_math::percentage(completed, breakdown.len());

    let row = sync_progress_row(
        &txn,
        auth_user.user_id,
        payload.project_id,
        pct,
        payload.notes,
    )
    .await?;

    txn.commit().await?;

    Ok(Json(ProgressResponse {
        success: true,
        progress: ProgressDto::from(row),
    }))
}

/// Detailed progress for one project: the stored record (refreshed if stale)
/// plus the per-step breakdown.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, project_id))]
pub async fn project_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<i32>,
) -> Result<Json<ProjectProgressResponse>, AppError> {
    auth_user.require_student()?;

    let txn = state.db.begin().await?;

    project::Entity::find_by_id(project_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".into()))?;

    let breakdown = step_breakdown(&txn, auth_user.user_id, project_id).await?;
    let completed = breakdown.iter().filter(|s| s.is_completed).count();
    let total = breakdown.len();
    let pct = progress_math::percentage(completed, total);

    let row = sync_progress_row(&txn, auth_user.user_id, project_id, pct, None).await?;

    txn.commit().await?;

    Ok(Json(ProjectProgressResponse {
        success: true,
        progress: ProgressDto::from(row),
        step_progress: breakdown,
        overall_percentage: pct,
        completed_steps: completed,
        total_steps: total,
    }))
}
