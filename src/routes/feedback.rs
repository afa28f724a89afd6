use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use lectern_feedback::{Feedback, FeedbackInput};
use lectern_identity::{Gate, GatedAction, gate};
use lectern_shared::kind::EntityKind;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::{AuthUser, MaybeAuthUser},
    error::AppError,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    20
}

/// GET /feedback/{kind}/{id} - approved reviews and their rating summary
pub async fn list(
    State(app): State<AppState>,
    Path((kind, id)): Path<(EntityKind, String)>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    if !app.catalog_query.exists(kind, &id, true).await? {
        return Err(lectern_shared::Error::NotFound(format!("{kind} {id}")).into());
    }

    let summary = app.feedback_query.summary(kind, &id).await?;
    let feedback = app
        .feedback_query
        .list_for_item(kind, &id, query.limit)
        .await?;

    Ok(Json(json!({
        "summary": summary,
        "feedback": feedback,
    })))
}

/// POST /feedback/{kind}/{id} - reviews the item as the signed-in user
pub async fn action(
    State(app): State<AppState>,
    MaybeAuthUser(session): MaybeAuthUser,
    Path((kind, id)): Path<(EntityKind, String)>,
    body: Result<Json<FeedbackInput>, JsonRejection>,
) -> Result<Response, AppError> {
    let action = GatedAction::Review {
        kind,
        entity_id: id.to_owned(),
    };

    let session = match gate(session.as_ref(), &action) {
        Gate::Proceed(session) => session,
        Gate::Defer { redirect } => return Ok(Redirect::to(&redirect).into_response()),
    };

    let Json(input) = match body {
        Ok(body) => body,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let feedback = app.feedback_command.create(session, kind, id, input).await?;

    Ok((StatusCode::CREATED, Json(feedback)).into_response())
}

/// GET /me/feedback - every review the signed-in user wrote, any status
pub async fn mine(
    State(app): State<AppState>,
    AuthUser(session): AuthUser,
) -> Result<Json<Vec<Feedback>>, AppError> {
    Ok(Json(
        app.feedback_query.list_by_user(&session.user_id).await?,
    ))
}
