use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_step")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub project_id: i32,
    #[sea_orm(belongs_to, from = "project_id", to = "id")]
    pub project: HasOne<super::project::Entity>,

    /// 1-based position within the project; unique per project.
    pub order_index: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// JSON array of {title, code, explanation} examples shown alongside
    /// the step text.
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub code_snippets: Option<serde_json::Value>,
    /// Full program listing, revealed only on request.
    #[sea_orm(column_type = "Text", nullable)]
    pub full_code: Option<String>,
    /// Unreleased steps are invisible to students.
    pub is_released: bool,

    #[sea_orm(has_many)]
    pub questions: HasMany<super::step_question::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
