use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{project_step, step_answer, step_question};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::answer::{
    AnswerRequest, AnswerResponse, QuestionResultDto, StepAnswersResponse,
};
use crate::scoring::{self, PriorAnswer};
use crate::state::AppState;

async fn step_questions<C: ConnectionTrait>(
    db: &C,
    step_id: i32,
) -> Result<Vec<step_question::Model>, AppError> {
    project_step::Entity::find_by_id(step_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Step".into()))?;

    let questions = step_question::Entity::find()
        .filter(step_question::Column::StepId.eq(step_id))
        .order_by_asc(step_question::Column::Id)
        .all(db)
        .await?;
    Ok(questions)
}

/// Grade a batch of answers for one step and upsert the ledger rows.
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, step_id))]
pub async fn answer_step(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(step_id): Path<i32>,
    AppJson(payload): AppJson<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    auth_user.require_student()?;

    let selections = payload.parsed()?;

    let txn = state.db.begin().await?;
    let questions = step_questions(&txn, step_id).await?;

    let mut results = Vec::new();
    let mut total_points = 0;
    let mut max_points = 0;

    // Ids not belonging to this step are silently skipped.
    for question in questions {
        max_points += question.points;
        let Some(selected) = selections.get(&question.id) else {
            continue;
        };
        let is_correct = scoring::is_correct_selection(selected, &question.correct_option);

        let existing = step_answer::Entity::find()
            .filter(step_answer::Column::StudentId.eq(auth_user.user_id))
            .filter(step_answer::Column::QuestionId.eq(question.id))
            .one(&txn)
            .await?;

        let prior = existing.as_ref().map(|a| PriorAnswer {
            was_correct: a.is_correct,
            points_awarded: a.points_awarded,
        });
        let award = scoring::grade(question.points, is_correct, prior);
        let now = chrono::Utc::now();

        match existing {
            Some(row) => {
                let mut active: step_answer::ActiveModel = row.into();
                active.selected_option = Set(selected.clone());
                active.is_correct = Set(is_correct);
                active.points_awarded = Set(award.points_awarded);
                active.answered_at = Set(now);
                active.update(&txn).await?;
            }
            None => {
                step_answer::ActiveModel {
                    student_id: Set(auth_user.user_id),
                    question_id: Set(question.id),
                    selected_option: Set(selected.clone()),
                    is_correct: Set(is_correct),
                    points_awarded: Set(award.points_awarded),
                    answered_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }

        total_points += award.points_awarded;
        results.push(QuestionResultDto {
            question_id: question.id,
            selected_option: selected.clone(),
            is_correct,
            points_awarded: award.points_awarded,
            max_points: question.points,
            is_retry: award.is_retry,
            was_previously_correct: award.was_previously_correct,
        });
    }

    txn.commit().await?;

    let all_correct = !results.is_empty() && results.iter().all(|r| r.is_correct);

    Ok(Json(AnswerResponse {
        success: true,
        results,
        total_points,
        max_points,
        all_correct,
    }))
}

/// Previously recorded answers for a step, for pre-filling the form.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, step_id))]
pub async fn get_step_answers(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(step_id): Path<i32>,
) -> Result<Json<StepAnswersResponse>, AppError> {
    auth_user.require_student()?;

    let questions = step_questions(&state.db, step_id).await?;

    let mut answers = HashMap::new();
    let mut results = Vec::new();
    let mut total_points = 0;
    let mut max_points = 0;

    for question in questions {
        max_points += question.points;
        let answer = step_answer::Entity::find()
            .filter(step_answer::Column::StudentId.eq(auth_user.user_id))
            .filter(step_answer::Column::QuestionId.eq(question.id))
            .one(&state.db)
            .await?;
        let Some(answer) = answer else { continue };

        answers.insert(question.id, answer.selected_option.clone());
        total_points += answer.points_awarded;
        results.push(QuestionResultDto {
            question_id: question.id,
            selected_option: answer.selected_option,
            is_correct: answer.is_correct,
            points_awarded: answer.points_awarded,
            max_points: question.points,
            is_retry: false,
            was_previously_correct: None,
        });
    }

    let all_correct = !results.is_empty() && results.iter().all(|r| r.is_correct);
    let has_answers = !answers.is_empty();

    Ok(Json(StepAnswersResponse {
        success: true,
        answers,
        results,
        total_points,
        max_points,
        all_correct,
        has_answers,
    }))
}
