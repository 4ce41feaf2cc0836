use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

use crate::common::{TestApp, routes};
use server::entity::step_answer;

#[tokio::test]
async fn grades_and_records_a_valid_answer() {
    let app = TestApp::spawn().await;
    let token = app.create_student("answers_valid").await;
    let (_, steps) = app
        .seed_project("Grading basics", &[&[("B", 10)]])
        .await;
    let (step_id, question_ids) = &steps[0];

    let res = app
        .post_with_token(
            &routes::step_answer(*step_id),
            &json!({ "answers": { (question_ids[0].to_string()): "b" } }),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["results"].as_array().unwrap().len(), 1);
    assert_eq!(res.body["results"][0]["is_correct"], json!(true));
    assert_eq!(res.body["total_points"], json!(10));
    assert_eq!(res.body["all_correct"], json!(true));
}

#[tokio::test]
async fn unparseable_keys_are_skipped_not_rejected() {
    let app = TestApp::spawn().await;
    let token = app.create_student("answers_badkey").await;
    let (_, steps) = app
        .seed_project("Key parsing", &[&[("A", 5)]])
        .await;
    let (step_id, question_ids) = &steps[0];

    let res = app
        .post_with_token(
            &routes::step_answer(*step_id),
            &json!({ "answers": {
                "twelve": "A",
                (question_ids[0].to_string()): "a",
            } }),
            &token,
        )
        .await;

    // The garbage key is dropped; the real one still grades.
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["results"].as_array().unwrap().len(), 1);
    assert_eq!(
        res.body["results"][0]["question_id"],
        json!(question_ids[0])
    );
}

#[tokio::test]
async fn blank_selections_are_not_graded_or_recorded() {
    let app = TestApp::spawn().await;
    let token = app.create_student("answers_blank").await;
    let (_, steps) = app
        .seed_project("Blank selections", &[&[("A", 5), ("C", 5)]])
        .await;
    let (step_id, question_ids) = &steps[0];
    let blank_qid = question_ids[0];
    let answered_qid = question_ids[1];

    let res = app
        .post_with_token(
            &routes::step_answer(*step_id),
            &json!({ "answers": {
                (blank_qid.to_string()): "",
                (answered_qid.to_string()): "c",
            } }),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["results"].as_array().unwrap().len(), 1);
    assert_eq!(res.body["results"][0]["question_id"], json!(answered_qid));

    // No ledger row for the question with the blank selection.
    let stray = step_answer::Entity::find()
        .filter(step_answer::Column::QuestionId.eq(blank_qid))
        .one(&app.db)
        .await
        .unwrap();
    assert!(stray.is_none());
}

#[tokio::test]
async fn empty_answer_map_is_a_validation_error() {
    let app = TestApp::spawn().await;
    let token = app.create_student("answers_empty").await;
    let (_, steps) = app.seed_project("Empty map", &[&[("A", 5)]]).await;

    let res = app
        .post_with_token(
            &routes::step_answer(steps[0].0),
            &json!({ "answers": {} }),
            &token,
        )
        .await;

    assert_eq!(res.status, 400, "{}", res.text);
}
