use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger of graded answers, one row per (student, question). Retries update
/// the row in place; `points_awarded` is the final score for that question.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "step_answer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub student_id: i32,
    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::user::Entity>,

    pub question_id: i32,
    #[sea_orm(belongs_to, from = "question_id", to = "id")]
    pub question: HasOne<super::step_question::Entity>,

    pub selected_option: String,
    pub is_correct: bool,
    pub points_awarded: i32,
    pub answered_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
