use std::{path::PathBuf, str::FromStr};

use lectern_catalog::CourseInput;
use lectern_shared::State;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
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
pub async fn create_course(state: &State, title: impl Into<String>) -> anyhow::Result<String> {
    let command = lectern_catalog::Command(state.clone());
    let id = command
        .create_course(CourseInput {
            title: title.into(),
            description: String::new(),
            duration: "4 weeks".to_owned(),
            price_cents: 1900,
            modules: vec![],
        })
        .await?;

    tokio::time::sleep(std::time::Duration::from_millis(3)).await;

    Ok(id)
}

/// Write pool shaped like the server's: one connection shared by every writer.
#[allow(dead_code)]
pub async fn single_writer(path: PathBuf) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?;

    Ok(SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await?)
}
