use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use lectern_identity::{Gate, GatedAction, gate};
use lectern_question::{AskInput, Question, QuestionThread};

use crate::{
    auth::{AuthUser, MaybeAuthUser},
    error::AppError,
    routes::AppState,
};

/// GET /questions - questions asked by the signed-in user
pub async fn list(
    State(app): State<AppState>,
    AuthUser(session): AuthUser,
) -> Result<Json<Vec<Question>>, AppError> {
    Ok(Json(
        app.question_query.list_by_user(&session.user_id).await?,
    ))
}

/// POST /questions - asks a question as the signed-in user
pub async fn action(
    State(app): State<AppState>,
    MaybeAuthUser(session): MaybeAuthUser,
    body: Result<Json<AskInput>, JsonRejection>,
) -> Result<Response, AppError> {
    let session = match gate(session.as_ref(), &GatedAction::AskQuestion) {
        Gate::Proceed(session) => session,
        Gate::Defer { redirect } => return Ok(Redirect::to(&redirect).into_response()),
    };

    let Json(input) = match body {
        Ok(body) => body,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let question = app.question_command.ask(session, input).await?;

    Ok((StatusCode::CREATED, Json(question)).into_response())
}

/// GET /questions/{id} - the thread, for its author or staff
pub async fn thread(
    State(app): State<AppState>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<QuestionThread>, AppError> {
    let thread = app
        .question_query
        .find_thread(&id)
        .await?
        .filter(|thread| session.is_admin() || thread.question.user_id == session.user_id);

    // Other users' questions read as missing.
    let Some(thread) = thread else {
        return Err(lectern_shared::Error::NotFound(format!("question {id}")).into());
    };

    Ok(Json(thread))
}
