use std::{path::PathBuf, str::FromStr};

use lectern_catalog::{CourseInput, WebinarInput};
use lectern_shared::State;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    lectern_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;

    Ok(State {
        read_db: pool.clone(),
        write_db: pool,
    })
}

#[allow(dead_code)]
pub fn course_input(title: impl Into<String>) -> CourseInput {
    CourseInput {
        title: title.into(),
        description: "Hands-on sessions".to_owned(),
        duration: "6 weeks".to_owned(),
        price_cents: 4900,
        modules: vec!["Ownership".to_owned(), "Traits".to_owned()],
    }
}

#[allow(dead_code)]
pub fn webinar_input(title: impl Into<String>) -> WebinarInput {
    WebinarInput {
        title: title.into(),
        description: String::new(),
        duration: "90 minutes".to_owned(),
        price_cents: 0,
        platform: "zoom".to_owned(),
        starts_at: Some(1_700_000_000_000),
    }
}

/// Creation timestamps have millisecond precision; spacing inserts keeps
/// listing order deterministic.
#[allow(dead_code)]
pub async fn tick() {
    tokio::time::sleep(std::time::Duration::from_millis(3)).await;
}
