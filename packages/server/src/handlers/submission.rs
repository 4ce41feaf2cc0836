use std::collections::{HashMap, HashSet};

use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use common::storage::UploadStore;
use common::{SubmissionStatus, SubmissionType};
use sea_orm::*;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::entity::{project, submission, user};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::{Pagination, normalize_paging};
use crate::models::submission::{
    AdminSubmissionsQuery, AdminSubmissionsResponse, MySubmissionsQuery, ReviewRequest,
    SubmissionContentResponse, SubmissionDto, SubmissionsResponse, SubmitResponse,
    validate_review_request,
};
use crate::state::AppState;
use crate::utils::filename;

/// Body limit for upload routes: the configured file cap plus slack for the
/// other multipart fields.
pub fn submission_body_limit(max_size: u64) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_size as usize + 4096)
}

/// Resolve student/project/reviewer display names for a page of submissions.
async fn hydrate_dtos<C: ConnectionTrait>(
    db: &C,
    rows: Vec<submission::Model>,
) -> Result<Vec<SubmissionDto>, AppError> {
    let mut user_ids: HashSet<i32> = rows.iter().map(|s| s.student_id).collect();
    user_ids.extend(rows.iter().filter_map(|s| s.reviewed_by));
    let project_ids: HashSet<i32> = rows.iter().filter_map(|s| s.project_id).collect();

    let users: HashMap<i32, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.full_name))
        .collect();
    let projects: HashMap<i32, String> = project::Entity::find()
        .filter(project::Column::Id.is_in(project_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    Ok(rows
        .into_iter()
        .map(|s| {
            let student_name = users.get(&s.student_id).cloned();
            let project_name = s.project_id.and_then(|id| projects.get(&id).cloned());
            let reviewer_name = s.reviewed_by.and_then(|id| users.get(&id).cloned());
            SubmissionDto::new(s, student_name, project_name, reviewer_name)
        })
        .collect())
}

#[derive(Debug)]
struct UploadedFile {
    filename: String,
    stored_name: String,
    size: i64,
    mime_type: String,
}

/// Mime type for a stored submission, derived from the sanitized filename.
/// The client-supplied part content type is not trusted.
fn mime_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}

/// Drain the multipart body: stream the `file` field into the upload store
/// and collect the text fields.
async fn receive_upload(
    uploads: &UploadStore,
    allowed_extensions: &[String],
    student_id: i32,
    scope: &str,
    mut multipart: Multipart,
) -> Result<(UploadedFile, Option<String>, Option<SubmissionType>), AppError> {
    let mut uploaded: Option<UploadedFile> = None;
    let mut notes: Option<String> = None;
    let mut submission_type: Option<SubmissionType> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let original = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| AppError::Validation("No file selected".into()))?;

                let sanitized = filename::validate_upload(&original, allowed_extensions)
                    .map_err(|e| match e {
                        filename::FilenameError::ExtensionNotAllowed => {
                            AppError::Validation(format!(
                                "File type not allowed. Allowed: {}",
                                allowed_extensions.join(", ")
                            ))
                        }
                        other => AppError::Validation(other.message().into()),
                    })?;

                let mime_type = mime_for(&sanitized);

                let stored_name = filename::stored_name(
                    student_id,
                    scope,
                    chrono::Utc::now().naive_utc(),
                    &sanitized,
                );

                let mut writer = uploads.begin().await?;
                loop {
                    match field.chunk().await {
                        Ok(Some(chunk)) => {
                            if let Err(err) = writer.write_chunk(&chunk).await {
                                writer.abort().await;
                                return Err(err.into());
                            }
                        }
                        Ok(None) => break,
                        Err(e) => {
                            writer.abort().await;
                            return Err(AppError::Validation(format!("Upload read error: {e}")));
                        }
                    }
                }
                let stored = writer.finish(&stored_name).await?;

                uploaded = Some(UploadedFile {
                    filename: sanitized,
                    stored_name,
                    size: stored.size as i64,
                    mime_type,
                });
            }
            Some("notes") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read notes: {e}")))?;
                notes = Some(text);
            }
            Some("submission_type") => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read submission_type: {e}"))
                })?;
                let parsed = text
                    .parse::<SubmissionType>()
                    .map_err(|_| AppError::Validation(format!("Invalid submission_type: {text}")))?;
                submission_type = Some(parsed);
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let uploaded = uploaded.ok_or_else(|| AppError::Validation("No file provided".into()))?;
    Ok((uploaded, notes, submission_type))
}

async fn record_submission(
    state: &AppState,
    auth_user: &AuthUser,
    project_id: Option<i32>,
    uploaded: UploadedFile,
    notes: Option<String>,
    submission_type: SubmissionType,
    message: &str,
) -> Result<SubmitResponse, AppError> {
    let txn = state.db.begin().await?;

    let row = submission::ActiveModel {
        student_id: Set(auth_user.user_id),
        project_id: Set(project_id),
        filename: Set(uploaded.filename),
        stored_name: Set(uploaded.stored_name),
        file_size: Set(Some(uploaded.size)),
        mime_type: Set(Some(uploaded.mime_type)),
        notes: Set(notes),
        status: Set(SubmissionStatus::Submitted),
        submission_type: Set(submission_type),
        submitted_at: Set(chrono::Utc::now()),
        reviewed_at: Set(None),
        reviewed_by: Set(None),
        review_notes: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let dtos = hydrate_dtos(&txn, vec![row]).await?;
    txn.commit().await?;

    let submission = dtos
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal("Submission vanished after insert".into()))?;

    Ok(SubmitResponse {
        success: true,
        message: message.into(),
        submission,
    })
}

/// Student uploads a file for a project.
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.user_id, project_id))]
pub async fn submit_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<i32>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_student()?;

    project::Entity::find_by_id(project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".into()))?;

    let scope = project_id.to_string();
    let (uploaded, notes, submission_type) = receive_upload(
        &state.uploads,
        &state.config.uploads.allowed_extensions,
        auth_user.user_id,
        &scope,
        multipart,
    )
    .await?;

    let submission_type = submission_type.unwrap_or(SubmissionType::Project);
    if submission_type == SubmissionType::FinalProject {
        return Err(AppError::Validation(
            "Use the final-project endpoint for final_project submissions".into(),
        ));
    }

    let response = record_submission(
        &state,
        &auth_user,
        Some(project_id),
        uploaded,
        notes,
        submission_type,
        "Project submitted successfully",
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Student uploads the course-wide final project; not tied to any project.
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.user_id))]
pub async fn submit_final_project(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_student()?;

    let (uploaded, notes, _) = receive_upload(
        &state.uploads,
        &state.config.uploads.allowed_extensions,
        auth_user.user_id,
        "final",
        multipart,
    )
    .await?;

    let response = record_submission(
        &state,
        &auth_user,
        None,
        uploaded,
        notes,
        SubmissionType::FinalProject,
        "Final project submitted successfully",
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Student's own submissions for one project, newest first.
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id, project_id))]
pub async fn my_project_submissions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<i32>,
    Query(query): Query<MySubmissionsQuery>,
) -> Result<Json<SubmissionsResponse>, AppError> {
    auth_user.require_student()?;

    let mut find = submission::Entity::find()
        .filter(submission::Column::StudentId.eq(auth_user.user_id))
        .filter(submission::Column::ProjectId.eq(project_id));
    if let Some(kind) = query.submission_type {
        find = find.filter(submission::Column::SubmissionType.eq(kind));
    }
    let rows = find
        .order_by_desc(submission::Column::SubmittedAt)
        .all(&state.db)
        .await?;

    Ok(Json(SubmissionsResponse {
        success: true,
        submissions: hydrate_dtos(&state.db, rows).await?,
    }))
}

/// All of the student's own submissions.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn my_submissions(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<SubmissionsResponse>, AppError> {
    auth_user.require_student()?;

    let rows = submission::Entity::find()
        .filter(submission::Column::StudentId.eq(auth_user.user_id))
        .order_by_desc(submission::Column::SubmittedAt)
        .all(&state.db)
        .await?;

    Ok(Json(SubmissionsResponse {
        success: true,
        submissions: hydrate_dtos(&state.db, rows).await?,
    }))
}

/// Student's final-project submissions.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn my_final_project_submissions(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<SubmissionsResponse>, AppError> {
    auth_user.require_student()?;

    let rows = submission::Entity::find()
        .filter(submission::Column::StudentId.eq(auth_user.user_id))
        .filter(submission::Column::SubmissionType.eq(SubmissionType::FinalProject))
        .order_by_desc(submission::Column::SubmittedAt)
        .all(&state.db)
        .await?;

    Ok(Json(SubmissionsResponse {
        success: true,
        submissions: hydrate_dtos(&state.db, rows).await?,
    }))
}

/// Load a submission, enforcing that students only reach their own.
async fn find_accessible(
    state: &AppState,
    auth_user: &AuthUser,
    submission_id: i32,
) -> Result<submission::Model, AppError> {
    let row = submission::Entity::find_by_id(submission_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission".into()))?;

    if auth_user.is_student() && row.student_id != auth_user.user_id {
        return Err(AppError::PermissionDenied("Access denied".into()));
    }
    Ok(row)
}

/// Inline view of a submission's content; binary files come back base64.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, submission_id))]
pub async fn submission_content(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(submission_id): Path<i32>,
) -> Result<Json<SubmissionContentResponse>, AppError> {
    let row = find_accessible(&state, &auth_user, submission_id).await?;

    let mut file = state.uploads.open(&row.stored_name).await?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read submission: {e}")))?;

    let response = match String::from_utf8(bytes) {
        Ok(text) => SubmissionContentResponse {
            success: true,
            content: text,
            is_binary: false,
            filename: row.filename,
            mime_type: row.mime_type,
        },
        Err(err) => SubmissionContentResponse {
            success: true,
            content: BASE64.encode(err.into_bytes()),
            is_binary: true,
            filename: row.filename,
            mime_type: None,
        },
    };

    Ok(Json(response))
}

/// Build a safe ASCII `Content-Disposition` attachment value.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let name = if ascii_safe.is_empty() {
        "download".to_string()
    } else {
        ascii_safe
    };
    format!("attachment; filename=\"{name}\"")
}

/// Stream a submission file back as an attachment.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, submission_id))]
pub async fn download_submission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(submission_id): Path<i32>,
) -> Result<Response, AppError> {
    let row = find_accessible(&state, &auth_user, submission_id).await?;

    let file = state.uploads.open(&row.stored_name).await?;
    let body = Body::from_stream(ReaderStream::new(file));

    let content_type = row
        .mime_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&row.filename),
        );
    if let Some(size) = row.file_size {
        builder = builder.header(header::CONTENT_LENGTH, size.to_string());
    }

    builder
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

/// Staff-wide submission list with optional project/student filters.
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn list_all_submissions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<AdminSubmissionsQuery>,
) -> Result<Json<AdminSubmissionsResponse>, AppError> {
    auth_user.require_reviewer()?;

    let (page, per_page) = normalize_paging(query.page, query.per_page);

    let mut find = submission::Entity::find();
    if let Some(project_id) = query.project_id {
        find = find.filter(submission::Column::ProjectId.eq(project_id));
    }
    if let Some(student_id) = query.student_id {
        find = find.filter(submission::Column::StudentId.eq(student_id));
    }

    let paginator = find
        .order_by_desc(submission::Column::SubmittedAt)
        .paginate(&state.db, per_page);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page - 1).await?;

    Ok(Json(AdminSubmissionsResponse {
        success: true,
        submissions: hydrate_dtos(&state.db, rows).await?,
        pagination: Pagination::new(page, per_page, total),
    }))
}

/// Mentor/manager records a review verdict on a submission.
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, submission_id))]
pub async fn review_submission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(submission_id): Path<i32>,
    AppJson(payload): AppJson<ReviewRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    auth_user.require_reviewer()?;
    validate_review_request(&payload)?;

    let txn = state.db.begin().await?;

    let row = submission::Entity::find_by_id(submission_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission".into()))?;

    let mut active: submission::ActiveModel = row.into();
    active.status = Set(payload.status);
    active.review_notes = Set(payload.review_notes);
    active.reviewed_by = Set(Some(auth_user.user_id));
    active.reviewed_at = Set(Some(chrono::Utc::now()));
    let updated = active.update(&txn).await?;

    let dtos = hydrate_dtos(&txn, vec![updated]).await?;
    txn.commit().await?;

    let submission = dtos
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal("Submission vanished after update".into()))?;

    Ok(Json(SubmitResponse {
        success: true,
        message: "Submission reviewed".into(),
        submission,
    }))
}
