use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;

use crate::common::{TestApp, routes};
use server::entity::project;

async fn set_project_script(app: &TestApp, project_id: i32, dir_name: &str, script: &str) {
    let script_dir = app.projects_dir.join(dir_name);
    std::fs::create_dir_all(&script_dir).unwrap();
    std::fs::write(script_dir.join("index.py"), script).unwrap();

    let row = project::Entity::find_by_id(project_id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    let mut active: project::ActiveModel = row.into();
    active.project_path = Set(Some(dir_name.to_string()));
    active.update(&app.db).await.unwrap();
}

#[tokio::test]
async fn runs_the_script_and_returns_output_and_source() {
    let app = TestApp::spawn().await;
    let token = app.create_student("run_student").await;
    let (project_id, _) = app.seed_project("Runnable demo", &[&[("A", 5)]]).await;
    let script = "print(6 * 7)\n";
    set_project_script(&app, project_id, "runnable-demo", script).await;

    let res = app
        .post_with_token(&routes::project_run(project_id), &json!({}), &token)
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["success"], json!(true));
    assert_eq!(res.body["output"].as_str().unwrap().trim(), "42");
    assert_eq!(res.body["code"], json!(script));
}

#[tokio::test]
async fn failing_script_surfaces_stderr_as_a_bad_request() {
    let app = TestApp::spawn().await;
    let token = app.create_student("run_crash").await;
    let (project_id, _) = app.seed_project("Crashing demo", &[&[("A", 5)]]).await;
    set_project_script(
        &app,
        project_id,
        "crashing-demo",
        "raise RuntimeError('boom')\n",
    )
    .await;

    let res = app
        .post_with_token(&routes::project_run(project_id), &json!({}), &token)
        .await;

    assert_eq!(res.status, 400, "{}", res.text);
    assert!(res.text.contains("boom"), "{}", res.text);
}

#[tokio::test]
async fn long_running_script_is_killed_at_the_limit() {
    let app = TestApp::spawn().await;
    let token = app.create_student("run_slow").await;
    let (project_id, _) = app.seed_project("Slow demo", &[&[("A", 5)]]).await;
    // The test server caps runs at two seconds.
    set_project_script(
        &app,
        project_id,
        "slow-demo",
        "import time\ntime.sleep(30)\n",
    )
    .await;

    let res = app
        .post_with_token(&routes::project_run(project_id), &json!({}), &token)
        .await;

    assert_eq!(res.status, 400, "{}", res.text);
    assert!(res.text.contains("timed out"), "{}", res.text);
}

#[tokio::test]
async fn project_without_runnable_sources_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.create_student("run_pathless").await;
    let (project_id, _) = app.seed_project("Text-only demo", &[&[("A", 5)]]).await;

    let res = app
        .post_with_token(&routes::project_run(project_id), &json!({}), &token)
        .await;

    assert_eq!(res.status, 404, "{}", res.text);
}
