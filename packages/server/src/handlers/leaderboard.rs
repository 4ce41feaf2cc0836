use std::collections::HashMap;

use axum::{Json, extract::State};
use common::Role;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{step_answer, user};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::leaderboard::{LeaderboardEntry, LeaderboardResponse};
use crate::state::AppState;

/// Rank `(student_id, username, full_name, points)` rows: points descending,
/// username ascending on ties, ranks 1-based.
pub fn rank_students(mut rows: Vec<(i32, String, String, i64)>) -> Vec<LeaderboardEntry> {
    rows.sort_by(|a, b| b.3.cmp(&a.3).then_with(|| a.1.cmp(&b.1)));
    rows.into_iter()
        .enumerate()
        .map(|(i, (student_id, username, full_name, total_points))| LeaderboardEntry {
            rank: i + 1,
            student_id,
            username,
            full_name,
            total_points,
        })
        .collect()
}

/// Points leaderboard over all active students.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn leaderboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let students = user::Entity::find()
        .filter(user::Column::Role.eq(Role::Student))
        .filter(user::Column::IsActive.eq(true))
        .all(&state.db)
        .await?;

    // SUM over int4 comes back as int8 from Postgres.
    let summed: Vec<(i32, Option<i64>)> = step_answer::Entity::find()
        .select_only()
        .column(step_answer::Column::StudentId)
        .column_as(step_answer::Column::PointsAwarded.sum(), "total_points")
        .group_by(step_answer::Column::StudentId)
        .into_tuple()
        .all(&state.db)
        .await?;
    let totals: HashMap<i32, i64> = summed
        .into_iter()
        .map(|(student_id, points)| (student_id, points.unwrap_or(0)))
        .collect();

    let rows = students
        .into_iter()
        .map(|s| {
            let points = totals.get(&s.id).copied().unwrap_or(0);
            (s.id, s.username, s.full_name, points)
        })
        .collect();

    let board = rank_students(rows);

    let (current_user_rank, current_user_points) = if auth_user.is_student() {
        board
            .iter()
            .find(|e| e.student_id == auth_user.user_id)
            .map(|e| (Some(e.rank), Some(e.total_points)))
            .unwrap_or((None, None))
    } else {
        (None, None)
    };

    Ok(Json(LeaderboardResponse {
        success: true,
        leaderboard: board,
        current_user_rank,
        current_user_points,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, username: &str, points: i64) -> (i32, String, String, i64) {
        (id, username.to_string(), format!("Student {id}"), points)
    }

    #[test]
    fn orders_by_points_descending() {
        let board = rank_students(vec![row(1, "ana", 5), row(2, "ben", 20), row(3, "cy", 10)]);
        let order: Vec<i32> = board.iter().map(|e| e.student_id).collect();
        assert_eq!(order, [2, 3, 1]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[2].rank, 3);
    }

    #[test]
    fn ties_break_by_username_ascending() {
        let board = rank_students(vec![row(1, "zoe", 10), row(2, "abe", 10)]);
        assert_eq!(board[0].username, "abe");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].username, "zoe");
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn students_with_no_answers_rank_last_with_zero() {
        let board = rank_students(vec![row(1, "ana", 0), row(2, "ben", 3)]);
        assert_eq!(board[1].student_id, 1);
        assert_eq!(board[1].total_points, 0);
    }
}
