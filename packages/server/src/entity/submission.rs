use common::{SubmissionStatus, SubmissionType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub student_id: i32,
    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::user::Entity>,

    /// NULL for final-project submissions.
    pub project_id: Option<i32>,
    #[sea_orm(belongs_to, from = "project_id", to = "id")]
    pub project: HasOne<super::project::Entity>,

    /// Original (sanitized) filename as uploaded by the student.
    pub filename: String,
    /// Namespaced name the file is stored under, unique per upload.
    #[sea_orm(unique)]
    pub stored_name: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub status: SubmissionStatus,
    pub submission_type: SubmissionType,

    pub submitted_at: DateTimeUtc,
    pub reviewed_at: Option<DateTimeUtc>,
    /// User id of the reviewing mentor/manager. Plain column, not a relation,
    /// since `student` already claims the user foreign key.
    pub reviewed_by: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub review_notes: Option<String>,
}

impl ActiveModelBehavior for ActiveModel {}
