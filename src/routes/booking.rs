use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use lectern_identity::{Gate, GatedAction, gate};
use lectern_shared::kind::EntityKind;
use serde_json::json;

use crate::{auth::MaybeAuthUser, error::AppError, routes::AppState};

/// GET /book/{kind}/{id} - what the visitor is about to book
pub async fn page(
    State(app): State<AppState>,
    MaybeAuthUser(session): MaybeAuthUser,
    Path((kind, id)): Path<(EntityKind, String)>,
) -> Result<Response, AppError> {
    let action = GatedAction::BookSeat {
        kind,
        entity_id: id.to_owned(),
    };

    let session = match gate(session.as_ref(), &action) {
        Gate::Proceed(session) => session,
        Gate::Defer { redirect } => return Ok(Redirect::to(&redirect).into_response()),
    };

    let entity = match kind {
        EntityKind::Course => app
            .catalog_query
            .find_course(&id)
            .await?
            .filter(|course| course.archived_at.is_none())
            .map(serde_json::to_value),
        EntityKind::Webinar => app
            .catalog_query
            .find_webinar(&id)
            .await?
            .filter(|webinar| webinar.archived_at.is_none())
            .map(serde_json::to_value),
    };

    let Some(entity) = entity.transpose().map_err(lectern_shared::Error::from)? else {
        return Err(lectern_shared::Error::NotFound(format!("{kind} {id}")).into());
    };

    let registered = app
        .registration_query
        .is_registered(&session.user_id, kind, &id)
        .await?;

    Ok(Json(json!({
        "kind": kind,
        "entity": entity,
        "registered": registered,
    }))
    .into_response())
}

/// POST /book/{kind}/{id} - records the seat for the signed-in user
pub async fn action(
    State(app): State<AppState>,
    MaybeAuthUser(session): MaybeAuthUser,
    Path((kind, id)): Path<(EntityKind, String)>,
) -> Result<Response, AppError> {
    let action = GatedAction::BookSeat {
        kind,
        entity_id: id.to_owned(),
    };

    let session = match gate(session.as_ref(), &action) {
        Gate::Proceed(session) => session,
        Gate::Defer { redirect } => return Ok(Redirect::to(&redirect).into_response()),
    };

    let event = app
        .registration_command
        .book(session.user_id.to_owned(), kind, id)
        .await?;

    Ok((StatusCode::CREATED, Json(event)).into_response())
}
