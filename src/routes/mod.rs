use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use sqlx::SqlitePool;

mod admin;
mod auth;
mod booking;
mod catalog;
mod community;
mod feedback;
mod health;
mod me;
mod questions;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub pool: SqlitePool,
    pub catalog_command: lectern_catalog::Command,
    pub catalog_query: lectern_catalog::Query,
    pub registration_command: lectern_registration::Command,
    pub registration_query: lectern_registration::Query,
    pub identity_command: lectern_identity::Command,
    pub identity_query: lectern_identity::Query,
    pub community_command: lectern_community::Command,
    pub community_query: lectern_community::Query,
    pub feedback_command: lectern_feedback::Command,
    pub feedback_query: lectern_feedback::Query,
    pub question_command: lectern_question::Command,
    pub question_query: lectern_question::Query,
}

impl AppState {
    pub fn new(config: crate::config::Config, state: lectern_shared::State) -> Self {
        Self {
            config,
            pool: state.read_db.clone(),
            catalog_command: lectern_catalog::Command(state.clone()),
            catalog_query: lectern_catalog::Query(state.read_db.clone()),
            registration_command: lectern_registration::Command(state.clone()),
            registration_query: lectern_registration::Query(state.read_db.clone()),
            identity_command: lectern_identity::Command(state.clone()),
            identity_query: lectern_identity::Query(state.read_db.clone()),
            community_command: lectern_community::Command(state.clone()),
            community_query: lectern_community::Query(state.read_db.clone()),
            feedback_command: lectern_feedback::Command(state.clone()),
            feedback_query: lectern_feedback::Query(state.read_db.clone()),
            question_command: lectern_question::Command(state.clone()),
            question_query: lectern_question::Query(state.read_db.clone()),
        }
    }
}

pub async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Not found", "retryable": false})),
    )
}

pub fn router(app_state: AppState) -> Router {
    let admin = Router::new()
        .route("/admin/courses", post(admin::create_course))
        .route("/admin/courses/{id}", put(admin::update_course))
        .route("/admin/courses/{id}/archive", post(admin::archive_course))
        .route("/admin/webinars", post(admin::create_webinar))
        .route("/admin/webinars/{id}", put(admin::update_webinar))
        .route("/admin/webinars/{id}/archive", post(admin::archive_webinar))
        .route("/admin/analytics/{kind}", get(admin::analytics))
        .route("/admin/registrations", get(admin::registrations))
        .route("/admin/registrations/import", post(admin::import))
        .route("/admin/feedback", get(admin::feedback))
        .route("/admin/feedback/{id}/moderate", put(admin::moderate_feedback))
        .route("/admin/feedback/{id}/response", put(admin::respond_feedback))
        .route("/admin/questions", get(admin::questions))
        .route("/admin/questions/{id}/replies", post(admin::reply_question))
        .route("/admin/questions/{id}/resolve", post(admin::resolve_question))
        .route("/admin/questions/{id}/close", post(admin::close_question))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            crate::auth::admin_middleware,
        ));

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .merge(
            Router::new()
                .route("/signup", post(auth::signup))
                .route("/login", post(auth::login))
                .route("/logout", post(auth::logout))
                .route("/me", get(me::profile))
                .route("/me/registrations", get(me::registrations))
                .route("/courses", get(catalog::courses))
                .route("/courses/{id}", get(catalog::course))
                .route("/webinars", get(catalog::webinars))
                .route("/webinars/{id}", get(catalog::webinar))
                .route(
                    "/book/{kind}/{id}",
                    get(booking::page).post(booking::action),
                )
                .route("/community", get(community::feed).post(community::action))
                .route(
                    "/feedback/{kind}/{id}",
                    get(feedback::list).post(feedback::action),
                )
                .route("/me/feedback", get(feedback::mine))
                .route("/questions", get(questions::list).post(questions::action))
                .route("/questions/{id}", get(questions::thread))
                .merge(admin)
                .fallback(fallback)
                .with_state(app_state),
        )
}
