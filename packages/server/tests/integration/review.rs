use ::common::Role;
use sea_orm::EntityTrait;
use serde_json::json;

use crate::common::{TestApp, routes};
use server::entity::submission;

async fn uploaded_submission_id(app: &TestApp, student_token: &str, project_id: i32) -> i32 {
    let res = app
        .upload_with_token(
            &routes::project_submit(project_id),
            "solution.py",
            b"print('hello')".to_vec(),
            student_token,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    res.body["submission"]["id"].as_i64().unwrap() as i32
}

#[tokio::test]
async fn mentor_review_records_reviewer_and_timestamp() {
    let app = TestApp::spawn().await;
    let student = app.create_student("review_student").await;
    let mentor = app.create_user_with_role("review_mentor", Role::Mentor).await;
    let (project_id, _) = app.seed_project("Review flow", &[&[("A", 5)]]).await;
    let submission_id = uploaded_submission_id(&app, &student, project_id).await;

    let res = app
        .post_with_token(
            &routes::submission_review(submission_id),
            &json!({ "status": "approved", "review_notes": "Nice work" }),
            &mentor,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["submission"]["status"], json!("approved"));
    assert_eq!(res.body["submission"]["review_notes"], json!("Nice work"));
    let mentor_id = app.user_id("review_mentor").await;
    assert_eq!(res.body["submission"]["reviewed_by"], json!(mentor_id));

    let row = submission::Entity::find_by_id(submission_id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.reviewed_by, Some(mentor_id));
    assert!(row.reviewed_at.is_some());
}

#[tokio::test]
async fn review_cannot_set_status_back_to_submitted() {
    let app = TestApp::spawn().await;
    let student = app.create_student("review_resubmit").await;
    let mentor = app
        .create_user_with_role("review_resubmit_mentor", Role::Mentor)
        .await;
    let (project_id, _) = app.seed_project("Review statuses", &[&[("A", 5)]]).await;
    let submission_id = uploaded_submission_id(&app, &student, project_id).await;

    let res = app
        .post_with_token(
            &routes::submission_review(submission_id),
            &json!({ "status": "submitted" }),
            &mentor,
        )
        .await;

    assert_eq!(res.status, 400, "{}", res.text);
}

#[tokio::test]
async fn students_cannot_review() {
    let app = TestApp::spawn().await;
    let student = app.create_student("review_not_staff").await;
    let (project_id, _) = app.seed_project("Review authz", &[&[("A", 5)]]).await;
    let submission_id = uploaded_submission_id(&app, &student, project_id).await;

    let res = app
        .post_with_token(
            &routes::submission_review(submission_id),
            &json!({ "status": "approved" }),
            &student,
        )
        .await;

    assert_eq!(res.status, 403, "{}", res.text);
}
