use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Repository or folder the project's code lives in, if any.
    pub project_path: Option<String>,
    pub difficulty: Option<String>,
    /// Rough completion estimate in minutes.
    pub estimated_minutes: Option<i32>,
    pub is_active: bool,

    #[sea_orm(has_many)]
    pub steps: HasMany<super::project_step::Entity>,

    #[sea_orm(has_many)]
    pub progress_records: HasMany<super::project_progress::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
