use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use lectern_community::{Post, PostInput};
use lectern_identity::{Gate, GatedAction, gate};
use serde::Deserialize;

use crate::{auth::MaybeAuthUser, error::AppError, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    20
}

pub async fn feed(
    State(app): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(app.community_query.list_posts(query.limit).await?))
}

pub async fn action(
    State(app): State<AppState>,
    MaybeAuthUser(session): MaybeAuthUser,
    body: Result<Json<PostInput>, JsonRejection>,
) -> Result<Response, AppError> {
    let session = match gate(session.as_ref(), &GatedAction::CreatePost) {
        Gate::Proceed(session) => session,
        Gate::Defer { redirect } => return Ok(Redirect::to(&redirect).into_response()),
    };

    // Anonymous visitors are sent to login whatever they posted.
    let Json(input) = match body {
        Ok(body) => body,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let post = app.community_command.create_post(session, input).await?;

    Ok((StatusCode::CREATED, Json(post)).into_response())
}
