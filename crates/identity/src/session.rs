use std::ops::Deref;

use lectern_shared::user::Role;
use serde::Serialize;

use crate::repository::{self, FindType, UserRow};

/// The signed-in user, passed explicitly to every operation that needs one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Display name, or the local part of the email when none was given.
    pub fn author_name(&self) -> String {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_owned(),
        }
    }
}

impl From<UserRow> for Session {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.id,
            email: row.email,
            display_name: row.display_name,
            role: row.role.0,
        }
    }
}

#[derive(Clone)]
pub struct Query(pub sqlx::SqlitePool);

impl Deref for Query {
    type Target = sqlx::SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Query {
    pub async fn find_session(
        &self,
        user_id: impl Into<String>,
    ) -> lectern_shared::Result<Option<Session>> {
        Ok(repository::find(&self.0, FindType::Id(user_id.into()))
            .await?
            .map(Into::into))
    }

    pub async fn find_by_email(
        &self,
        email: impl AsRef<str>,
    ) -> lectern_shared::Result<Option<Session>> {
        let email = crate::normalize_email(email.as_ref());

        Ok(repository::find(&self.0, FindType::Email(email))
            .await?
            .map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(display_name: Option<&str>) -> Session {
        Session {
            user_id: "1".to_owned(),
            email: "ada@lectern.localhost".to_owned(),
            display_name: display_name.map(str::to_owned),
            role: Role::User,
        }
    }

    #[test]
    fn author_name_falls_back_to_email() {
        assert_eq!(session(Some("Ada L.")).author_name(), "Ada L.");
        assert_eq!(session(Some("  ")).author_name(), "ada");
        assert_eq!(session(None).author_name(), "ada");
        assert!(!session(None).is_admin());
    }
}
