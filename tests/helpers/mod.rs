//! Shared setup for route tests: a migrated SQLite file per test and the
//! full router built on top of it.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use lectern::config::{
    AnalyticsConfig, Config, DatabaseConfig, JwtConfig, ObservabilityConfig, RootConfig,
    ServerConfig,
};
use lectern_registration::RetryPolicy;
use lectern_shared::State;
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: State,
    pub config: Config,
    _dir: TempDir,
}

pub fn test_config(url: String) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        },
        database: DatabaseConfig {
            url,
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            expiration_days: 7,
            issuer: "lectern".to_owned(),
            audience: "lectern-web".to_owned(),
        },
        root: RootConfig::default(),
        observability: ObservabilityConfig::default(),
        analytics: AnalyticsConfig {
            retry: RetryPolicy {
                max_attempts: 1,
                base_backoff_ms: 1,
            },
        },
    }
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let url = format!("sqlite:{}", dir.child("lectern.sqlite3").display());
    let pool = lectern::db::create_pool(&url, 1).await?;

    let mut conn = pool.acquire().await?;
    lectern_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;
    drop(conn);

    let config = test_config(url);
    let router = lectern::create_app(config.clone(), pool.clone());

    Ok(TestApp {
        router,
        state: State::single(pool),
        config,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Signs a user up through the route and returns the `Cookie` header
    /// value carrying their session.
    pub async fn sign_up(&self, email: &str) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/signup",
                None,
                serde_json::json!({ "email": email, "password": "correct horse" }),
            ))
            .await;

        session_cookie(&response).expect("signup sets the session cookie")
    }

    pub async fn sign_up_admin(&self, email: &str) -> String {
        let cookie = self.sign_up(email).await;
        lectern_identity::Command(self.state.clone())
            .set_role(email, lectern_shared::user::Role::Admin)
            .await
            .unwrap();

        cookie
    }

    pub async fn create_course(&self, title: &str) -> String {
        let id = lectern_catalog::Command(self.state.clone())
            .create_course(lectern_catalog::CourseInput {
                title: title.to_owned(),
                description: String::new(),
                duration: "6 weeks".to_owned(),
                price_cents: 4900,
                modules: vec![],
            })
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(3)).await;

        id
    }
}

pub fn request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder.body(Body::empty()).unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(lectern::auth::AUTH_COOKIE_NAME))
        .and_then(|value| value.split(';').next())
        .map(str::to_owned)
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    serde_json::from_slice(&bytes).unwrap()
}
