use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

use crate::common::{TestApp, routes};
use server::entity::project_progress;

async fn progress_row(app: &TestApp, project_id: i32) -> project_progress::Model {
    project_progress::Entity::find()
        .filter(project_progress::Column::ProjectId.eq(project_id))
        .one(&app.db)
        .await
        .unwrap()
        .expect("progress row should exist")
}

#[tokio::test]
async fn step_counts_as_completed_once_any_question_is_answered() {
    let app = TestApp::spawn().await;
    let token = app.create_student("progress_step").await;
    let (project_id, steps) = app
        .seed_project("Step completion", &[&[("A", 5), ("B", 5)], &[("C", 5)]])
        .await;
    let (step_id, question_ids) = &steps[0];

    // Before any answers, nothing is completed.
    let res = app
        .get_with_token(&routes::project_progress(project_id), &token)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["completed_steps"], json!(0));
    assert_eq!(res.body["total_steps"], json!(2));

    // One answer (even a wrong one) out of two questions completes the step.
    let res = app
        .post_with_token(
            &routes::step_answer(*step_id),
            &json!({ "answers": { (question_ids[0].to_string()): "D" } }),
            &token,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let res = app
        .get_with_token(&routes::project_progress(project_id), &token)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["completed_steps"], json!(1));
    assert_eq!(res.body["overall_percentage"], json!(50));
    let step = &res.body["step_progress"][0];
    assert_eq!(step["is_completed"], json!(true));
    assert_eq!(step["questions_answered"], json!(1));
}

#[tokio::test]
async fn rereading_progress_does_not_rewrite_the_row() {
    let app = TestApp::spawn().await;
    let token = app.create_student("progress_idem").await;
    let (project_id, steps) = app
        .seed_project("Idempotent reads", &[&[("A", 5)], &[("B", 5)]])
        .await;
    let (step_id, question_ids) = &steps[0];

    let res = app
        .post_with_token(
            &routes::step_answer(*step_id),
            &json!({ "answers": { (question_ids[0].to_string()): "A" } }),
            &token,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let first = app
        .get_with_token(&routes::project_progress(project_id), &token)
        .await;
    assert_eq!(first.status, 200, "{}", first.text);
    assert_eq!(first.body["overall_percentage"], json!(50));
    let after_first = progress_row(&app, project_id).await;

    let second = app
        .get_with_token(&routes::project_progress(project_id), &token)
        .await;
    assert_eq!(second.status, 200, "{}", second.text);
    assert_eq!(second.body["overall_percentage"], json!(50));
    let after_second = progress_row(&app, project_id).await;

    // The percentage did not change, so the second read wrote nothing.
    assert_eq!(after_first.updated_at, after_second.updated_at);
    assert_eq!(after_first.progress_percentage, 50);
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn completing_every_step_marks_the_project_completed() {
    let app = TestApp::spawn().await;
    let token = app.create_student("progress_done").await;
    let (project_id, steps) = app
        .seed_project("Full completion", &[&[("A", 5)]])
        .await;
    let (step_id, question_ids) = &steps[0];

    let res = app
        .post_with_token(
            &routes::step_answer(*step_id),
            &json!({ "answers": { (question_ids[0].to_string()): "A" } }),
            &token,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let res = app
        .get_with_token(&routes::project_progress(project_id), &token)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["overall_percentage"], json!(100));
    assert_eq!(res.body["progress"]["status"], json!("completed"));

    let row = progress_row(&app, project_id).await;
    assert!(row.completed_at.is_some());
}
