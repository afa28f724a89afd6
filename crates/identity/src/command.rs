use std::ops::Deref;

use argon2::{
    Argon2, PasswordHash, PasswordVerifier,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use lectern_shared::{State, user::Role};
use serde::Deserialize;
use ulid::Ulid;
use validator::Validate;

use crate::{
    Session,
    repository::{self, CreateInput, FindType},
};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> lectern_shared::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    Ok(argon2
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

#[derive(Clone)]
pub struct Command(pub State);

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub async fn sign_up(&self, mut input: SignUpInput) -> lectern_shared::Result<Session> {
        input.email = normalize_email(&input.email);
        input.validate()?;

        let email = input.email.to_owned();
        if repository::find(&self.write_db, FindType::Email(email.to_owned()))
            .await?
            .is_some()
        {
            lectern_shared::user!("An account with this email already exists");
        }

        let display_name = input
            .display_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());

        let session = Session {
            user_id: Ulid::new().to_string(),
            email,
            display_name,
            role: Role::User,
        };

        repository::create(
            &self.write_db,
            CreateInput {
                id: session.user_id.to_owned(),
                email: session.email.to_owned(),
                display_name: session.display_name.to_owned(),
                password: hash_password(&input.password)?,
                role: session.role,
            },
        )
        .await?;

        tracing::info!(user_id = %session.user_id, "user signed up");

        Ok(session)
    }

    /// Malformed input, unknown emails and wrong passwords fail with the
    /// same message.
    pub async fn sign_in(&self, mut input: SignInInput) -> lectern_shared::Result<Session> {
        input.email = normalize_email(&input.email);
        if input.validate().is_err() {
            lectern_shared::user!("{INVALID_CREDENTIALS}");
        }

        let Some(user) = repository::find(&self.read_db, FindType::Email(input.email)).await?
        else {
            lectern_shared::user!("{INVALID_CREDENTIALS}");
        };

        let parsed_hash = PasswordHash::new(&user.password)?;
        let argon2 = Argon2::default();

        if argon2
            .verify_password(input.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            lectern_shared::user!("{INVALID_CREDENTIALS}");
        }

        Ok(user.into())
    }

    pub async fn set_role(
        &self,
        email: impl AsRef<str>,
        role: Role,
    ) -> lectern_shared::Result<()> {
        let email = normalize_email(email.as_ref());
        let Some(user) =
            repository::find(&self.write_db, FindType::Email(email.to_owned())).await?
        else {
            lectern_shared::not_found!("user {email}");
        };

        repository::update_role(&self.write_db, &user.id, role).await?;

        tracing::info!(user_id = %user.id, %role, "role updated");

        Ok(())
    }

    /// Makes sure the configured root account exists and is an admin.
    pub async fn ensure_root(
        &self,
        email: impl AsRef<str>,
        password: impl AsRef<str>,
    ) -> lectern_shared::Result<()> {
        let email = normalize_email(email.as_ref());
        match repository::find(&self.write_db, FindType::Email(email.to_owned())).await? {
            Some(user) if user.role.0 == Role::Admin => Ok(()),
            Some(user) => repository::update_role(&self.write_db, user.id, Role::Admin).await,
            None => {
                repository::create(
                    &self.write_db,
                    CreateInput {
                        id: Ulid::new().to_string(),
                        email,
                        display_name: None,
                        password: hash_password(password.as_ref())?,
                        role: Role::Admin,
                    },
                )
                .await?;

                tracing::info!("root account created");

                Ok(())
            }
        }
    }
}
