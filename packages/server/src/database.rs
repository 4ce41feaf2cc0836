use std::time::Duration;

use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};

use crate::entity::{project_progress, project_step, step_answer};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;

    ensure_indexes(&db).await?;

    Ok(db)
}

/// Composite unique indexes the schema registry does not derive from the
/// entity definitions.
async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmts = [
        // One recorded answer per student per question.
        Index::create()
            .if_not_exists()
            .name("uq_step_answer_student_question")
            .table(step_answer::Entity)
            .col(step_answer::Column::StudentId)
            .col(step_answer::Column::QuestionId)
            .unique()
            .to_string(PostgresQueryBuilder),
        // One progress row per student per project.
        Index::create()
            .if_not_exists()
            .name("uq_project_progress_student_project")
            .table(project_progress::Entity)
            .col(project_progress::Column::StudentId)
            .col(project_progress::Column::ProjectId)
            .unique()
            .to_string(PostgresQueryBuilder),
        // Step ordering is unique within a project.
        Index::create()
            .if_not_exists()
            .name("uq_project_step_order")
            .table(project_step::Entity)
            .col(project_step::Column::ProjectId)
            .col(project_step::Column::OrderIndex)
            .unique()
            .to_string(PostgresQueryBuilder),
    ];

    for stmt in stmts {
        db.execute_unprepared(&stmt).await?;
    }

    Ok(())
}
