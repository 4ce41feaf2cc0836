use ::common::Role;
use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn totals_are_summed_per_student_and_ranked() {
    let app = TestApp::spawn().await;
    let alice = app.create_student("board_alice").await;
    let bob = app.create_student("board_bob").await;
    let (_, steps) = app
        .seed_project("Ranked work", &[&[("A", 10), ("B", 4)]])
        .await;
    let (step_id, question_ids) = &steps[0];

    // Alice answers both questions correctly: 14 points.
    let res = app
        .post_with_token(
            &routes::step_answer(*step_id),
            &json!({ "answers": {
                (question_ids[0].to_string()): "A",
                (question_ids[1].to_string()): "B",
            } }),
            &alice,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    // Bob gets only the first one right: 10 points.
    let res = app
        .post_with_token(
            &routes::step_answer(*step_id),
            &json!({ "answers": {
                (question_ids[0].to_string()): "A",
                (question_ids[1].to_string()): "C",
            } }),
            &bob,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let res = app.get_with_token(routes::LEADERBOARD, &bob).await;
    assert_eq!(res.status, 200, "{}", res.text);

    let board = res.body["leaderboard"].as_array().unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0]["username"], json!("board_alice"));
    assert_eq!(board[0]["total_points"], json!(14));
    assert_eq!(board[0]["rank"], json!(1));
    assert_eq!(board[1]["username"], json!("board_bob"));
    assert_eq!(board[1]["total_points"], json!(10));

    assert_eq!(res.body["current_user_rank"], json!(2));
    assert_eq!(res.body["current_user_points"], json!(10));
}

#[tokio::test]
async fn students_without_answers_appear_with_zero_points() {
    let app = TestApp::spawn().await;
    let token = app.create_student("board_idle").await;

    let res = app.get_with_token(routes::LEADERBOARD, &token).await;
    assert_eq!(res.status, 200, "{}", res.text);

    let board = res.body["leaderboard"].as_array().unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0]["total_points"], json!(0));
    assert_eq!(res.body["current_user_rank"], json!(1));
}

#[tokio::test]
async fn staff_callers_get_no_personal_rank() {
    let app = TestApp::spawn().await;
    let _student = app.create_student("board_watched").await;
    let mentor = app.create_user_with_role("board_mentor", Role::Mentor).await;

    let res = app.get_with_token(routes::LEADERBOARD, &mentor).await;
    assert_eq!(res.status, 200, "{}", res.text);

    assert_eq!(res.body["current_user_rank"], json!(null));
    assert_eq!(res.body["current_user_points"], json!(null));
    // The mentor is not on the board either.
    let board = res.body["leaderboard"].as_array().unwrap();
    assert!(board.iter().all(|e| e["username"] != json!("board_mentor")));
}
