use clap::ValueEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Role {
    User,
    Admin,
}

impl From<Role> for lectern_shared::user::Role {
    fn from(value: Role) -> Self {
        match value {
            Role::User => lectern_shared::user::Role::User,
            Role::Admin => lectern_shared::user::Role::Admin,
        }
    }
}

pub async fn set_role(
    config: lectern::config::Config,
    email: String,
    role: Role,
) -> anyhow::Result<()> {
    let pool = lectern::db::create_pool(&config.database.url, 1).await?;
    let command = lectern_identity::Command(lectern_shared::State::single(pool.clone()));

    let result = command.set_role(&email, role.into()).await;
    pool.close().await;

    match result {
        Ok(()) => {
            tracing::info!("{email} is now {:?}", role);
            Ok(())
        }
        Err(lectern_shared::Error::NotFound(_)) => {
            tracing::error!("user {email} not found");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
