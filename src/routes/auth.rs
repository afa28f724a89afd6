use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::CookieJar;
use lectern_identity::{SignInInput, SignUpInput, resolve_continuation};
use serde::Deserialize;

use crate::{
    auth::{build_cookie, removal_cookie},
    error::AppError,
    routes::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub redirect: Option<String>,
}

pub async fn signup(
    State(app): State<AppState>,
    Query(query): Query<RedirectQuery>,
    jar: CookieJar,
    Json(input): Json<SignUpInput>,
) -> Result<impl IntoResponse, AppError> {
    let session = app.identity_command.sign_up(input).await?;
    let cookie = build_cookie(&app.config.jwt, session.user_id)?;

    Ok((
        jar.add(cookie),
        Redirect::to(&resolve_continuation(query.redirect.as_deref())),
    ))
}

/// Signs in, then sends the user back to the page that asked them to.
pub async fn login(
    State(app): State<AppState>,
    Query(query): Query<RedirectQuery>,
    jar: CookieJar,
    Json(input): Json<SignInInput>,
) -> Result<impl IntoResponse, AppError> {
    let session = match app.identity_command.sign_in(input).await {
        Ok(session) => session,
        Err(lectern_shared::Error::User(message)) => {
            return Err(AppError::Unauthorized(message));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %session.user_id, "user signed in");

    let cookie = build_cookie(&app.config.jwt, session.user_id)?;

    Ok((
        jar.add(cookie),
        Redirect::to(&resolve_continuation(query.redirect.as_deref())),
    ))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.remove(removal_cookie()), Redirect::to("/"))
}
