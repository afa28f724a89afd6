use std::{path::PathBuf, str::FromStr};

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
pub async fn sign_up(
    state: &State,
    email: &str,
    display_name: Option<&str>,
) -> anyhow::Result<lectern_identity::Session> {
    let command = lectern_identity::Command(state.clone());

    Ok(command
        .sign_up(lectern_identity::SignUpInput {
            email: email.to_owned(),
            password: "correct horse".to_owned(),
            display_name: display_name.map(str::to_owned),
        })
        .await?)
}
