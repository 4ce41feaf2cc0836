use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "step_question")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub step_id: i32,
    #[sea_orm(belongs_to, from = "step_id", to = "id")]
    pub step: HasOne<super::project_step::Entity>,

    #[sea_orm(column_type = "Text")]
    pub prompt: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    /// One of "A".."D". Never serialized to students.
    pub correct_option: String,
    pub points: i32,

    #[sea_orm(has_many)]
    pub answers: HasMany<super::step_answer::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
