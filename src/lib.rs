pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod observability;
pub mod routes;

pub use routes::{AppState, router};

/// Router over an already migrated database, with one pool serving reads and
/// writes. Used by integration tests and tools that skip the CLI.
pub fn create_app(config: config::Config, pool: sqlx::SqlitePool) -> axum::Router {
    let state = lectern_shared::State::single(pool);

    router(AppState::new(config, state))
}
