use std::collections::HashMap;

use axum::{Json, extract::State};
use lectern_identity::Session;
use lectern_shared::{format_timestamp, kind::EntityKind};
use serde::Serialize;

use crate::{auth::AuthUser, error::AppError, routes::AppState};

pub async fn profile(AuthUser(session): AuthUser) -> Json<Session> {
    Json(session)
}

#[derive(Debug, Serialize)]
pub struct MyRegistration {
    pub id: String,
    pub kind: EntityKind,
    pub entity_id: Option<String>,
    /// `None` once the entity no longer exists in the catalog.
    pub title: Option<String>,
    pub registered_at: Option<i64>,
    pub registered: String,
}

/// GET /me/registrations - the signed-in user's bookings, newest first
pub async fn registrations(
    State(app): State<AppState>,
    AuthUser(session): AuthUser,
) -> Result<Json<Vec<MyRegistration>>, AppError> {
    let events = app
        .registration_query
        .list_by_user(&session.user_id)
        .await?;

    let mut titles = HashMap::new();
    for kind in [EntityKind::Course, EntityKind::Webinar] {
        for entity in app.catalog_query.list(kind, true).await? {
            titles.insert((kind, entity.id), entity.title);
        }
    }

    let registrations = events
        .into_iter()
        .map(|event| {
            let registered_at = event.timestamp();
            let title = event
                .entity_id
                .as_ref()
                .and_then(|id| titles.get(&(event.kind, id.to_owned())).cloned());

            MyRegistration {
                id: event.id,
                kind: event.kind,
                entity_id: event.entity_id,
                title,
                registered_at,
                registered: format_timestamp(registered_at),
            }
        })
        .collect();

    Ok(Json(registrations))
}
