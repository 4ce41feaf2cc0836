use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::json;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(project_routes())
        .merge(progress_routes())
        .merge(submission_routes(config))
        .merge(resource_routes())
        .route("/health", get(health))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "success": true, "status": "ok" }))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
        .route("/students", get(handlers::auth::list_students))
        .route(
            "/admin/students/{id}/reset-password",
            post(handlers::auth::reset_student_password),
        )
}

fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(handlers::project::list_projects))
        .route("/projects/{id}", get(handlers::project::get_project))
        .route("/projects/{id}/steps", get(handlers::project::list_steps))
        .route("/projects/{id}/run", post(handlers::project::run_project))
        .route("/steps/{id}/answer", post(handlers::answer::answer_step))
        .route("/steps/{id}/answers", get(handlers::answer::get_step_answers))
}

fn progress_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/progress",
            get(handlers::progress::my_progress).post(handlers::progress::update_progress),
        )
        .route(
            "/projects/{id}/progress",
            get(handlers::progress::project_progress),
        )
        .route("/leaderboard", get(handlers::leaderboard::leaderboard))
}

fn submission_routes(config: &AppConfig) -> Router<AppState> {
    // Multipart uploads get a larger body cap than the JSON endpoints.
    let uploads = Router::new()
        .route(
            "/projects/{id}/submit",
            post(handlers::submission::submit_project),
        )
        .route(
            "/final-project/submit",
            post(handlers::submission::submit_final_project),
        )
        .layer(handlers::submission::submission_body_limit(
            config.uploads.max_size,
        ));

    let listing = Router::new()
        .route(
            "/projects/{id}/submissions",
            get(handlers::submission::my_project_submissions),
        )
        .route("/submissions", get(handlers::submission::my_submissions))
        .route(
            "/final-project/submissions",
            get(handlers::submission::my_final_project_submissions),
        )
        .route(
            "/submissions/{id}/content",
            get(handlers::submission::submission_content),
        )
        .route(
            "/submissions/{id}/download",
            get(handlers::submission::download_submission),
        )
        .route(
            "/admin/submissions",
            get(handlers::submission::list_all_submissions),
        )
        .route(
            "/submissions/{id}/review",
            post(handlers::submission::review_submission),
        );

    uploads.merge(listing)
}

fn resource_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/resources",
            get(handlers::resource::list_resources).post(handlers::resource::create_resource),
        )
        .route("/resources/{id}", get(handlers::resource::get_resource))
}
