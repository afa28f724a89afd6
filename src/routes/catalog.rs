use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use lectern_catalog::{Course, Webinar};

use crate::{error::AppError, routes::AppState};

pub async fn courses(State(app): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    Ok(Json(app.catalog_query.list_courses().await?))
}

pub async fn webinars(State(app): State<AppState>) -> Result<Json<Vec<Webinar>>, AppError> {
    Ok(Json(app.catalog_query.list_webinars().await?))
}

pub async fn course(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(course) = app.catalog_query.find_course(&id).await? else {
        return Err(lectern_shared::Error::NotFound(format!("course {id}")).into());
    };

    Ok(Json(course))
}

pub async fn webinar(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Some(webinar) = app.catalog_query.find_webinar(&id).await? else {
        return Err(lectern_shared::Error::NotFound(format!("webinar {id}")).into());
    };

    Ok(Json(webinar))
}
