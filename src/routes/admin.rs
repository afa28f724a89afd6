use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use lectern_catalog::{CourseInput, WebinarInput};
use lectern_feedback::{Feedback, FeedbackStatus, ModerateInput, RespondInput};
use lectern_identity::Session;
use lectern_question::{Question, QuestionStatus, Reply, ReplyInput, ResolveInput};
use lectern_registration::{Cursor, Dashboard, ImportInput, PAGE_SIZE, load_dashboard};
use lectern_shared::kind::EntityKind;
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, routes::AppState};

pub async fn create_course(
    State(app): State<AppState>,
    Extension(session): Extension<Session>,
    Json(input): Json<CourseInput>,
) -> Result<impl IntoResponse, AppError> {
    let id = app.catalog_command.create_course(input).await?;
    tracing::info!(admin_id = %session.user_id, course_id = %id, "admin created course");

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn create_webinar(
    State(app): State<AppState>,
    Extension(session): Extension<Session>,
    Json(input): Json<WebinarInput>,
) -> Result<impl IntoResponse, AppError> {
    let id = app.catalog_command.create_webinar(input).await?;
    tracing::info!(admin_id = %session.user_id, webinar_id = %id, "admin created webinar");

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn update_course(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CourseInput>,
) -> Result<impl IntoResponse, AppError> {
    app.catalog_command.update_course(id, input).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_webinar(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<WebinarInput>,
) -> Result<impl IntoResponse, AppError> {
    app.catalog_command.update_webinar(id, input).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn archive(app: &AppState, kind: EntityKind, id: String) -> Result<StatusCode, AppError> {
    app.catalog_command.archive(kind, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn archive_course(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    archive(&app, EntityKind::Course, id).await
}

pub async fn archive_webinar(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    archive(&app, EntityKind::Webinar, id).await
}

/// GET /admin/analytics/{kind} - registration counts per entity, scaled for bars
pub async fn analytics(
    State(app): State<AppState>,
    Path(kind): Path<EntityKind>,
) -> Result<Json<Dashboard>, AppError> {
    let dashboard = load_dashboard(
        &app.catalog_query,
        &app.registration_query,
        kind,
        app.config.analytics.retry,
    )
    .await?;

    Ok(Json(dashboard))
}

#[derive(Debug, Deserialize)]
pub struct RegistrationsQuery {
    pub after: Option<String>,
    pub limit: Option<u64>,
}

/// GET /admin/registrations - raw log, oldest first, keyset paginated
pub async fn registrations(
    State(app): State<AppState>,
    Query(query): Query<RegistrationsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let after = query
        .after
        .as_deref()
        .map(str::parse::<Cursor>)
        .transpose()?;

    let page = app
        .registration_query
        .list_page(after.as_ref(), query.limit.unwrap_or(PAGE_SIZE))
        .await?;

    Ok(Json(json!({
        "events": page.events,
        "next": page.next.map(|cursor| cursor.to_string()),
    })))
}

pub async fn import(
    State(app): State<AppState>,
    Extension(session): Extension<Session>,
    Json(input): Json<ImportInput>,
) -> Result<impl IntoResponse, AppError> {
    let imported = app.registration_command.import(input).await?;
    tracing::info!(admin_id = %session.user_id, imported, "admin imported registrations");

    Ok((StatusCode::CREATED, Json(json!({ "imported": imported }))))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackQueue {
    pub status: Option<FeedbackStatus>,
    pub limit: Option<u64>,
}

/// GET /admin/feedback - reviews awaiting or past moderation, newest first
pub async fn feedback(
    State(app): State<AppState>,
    Query(query): Query<FeedbackQueue>,
) -> Result<Json<Vec<Feedback>>, AppError> {
    Ok(Json(
        app.feedback_query
            .list(query.status, query.limit.unwrap_or(lectern_feedback::MAX_LIMIT))
            .await?,
    ))
}

pub async fn moderate_feedback(
    State(app): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(input): Json<ModerateInput>,
) -> Result<impl IntoResponse, AppError> {
    app.feedback_command.moderate(id, &session, input).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn respond_feedback(
    State(app): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(input): Json<RespondInput>,
) -> Result<impl IntoResponse, AppError> {
    app.feedback_command.respond(id, &session, input).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct QuestionQueue {
    pub status: Option<QuestionStatus>,
    pub limit: Option<u64>,
}

/// GET /admin/questions - every learner question, longest waiting first
pub async fn questions(
    State(app): State<AppState>,
    Query(query): Query<QuestionQueue>,
) -> Result<Json<Vec<Question>>, AppError> {
    Ok(Json(
        app.question_query
            .list(query.status, query.limit.unwrap_or(lectern_question::MAX_LIMIT))
            .await?,
    ))
}

pub async fn reply_question(
    State(app): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(input): Json<ReplyInput>,
) -> Result<(StatusCode, Json<Reply>), AppError> {
    let reply = app.question_command.reply(id, &session, input).await?;

    Ok((StatusCode::CREATED, Json(reply)))
}

pub async fn resolve_question(
    State(app): State<AppState>,
    Path(id): Path<String>,
    input: Option<Json<ResolveInput>>,
) -> Result<impl IntoResponse, AppError> {
    let input = input.map(|Json(input)| input).unwrap_or_default();
    app.question_command.resolve(id, input).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn close_question(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app.question_command.close(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
