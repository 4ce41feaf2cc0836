use common::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string, never the plaintext.
    pub password: String,
    pub full_name: String,
    pub gender: Option<String>,
    /// Cohort label (e.g. "V1", "V2").
    pub batch: Option<String>,
    pub role: Role,
    pub is_active: bool,

    #[sea_orm(has_many)]
    pub answers: HasMany<super::step_answer::Entity>,

    #[sea_orm(has_many)]
    pub progress: HasMany<super::project_progress::Entity>,

    #[sea_orm(has_many)]
    pub submissions: HasMany<super::submission::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
