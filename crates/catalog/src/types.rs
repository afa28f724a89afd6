use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub price_cents: i64,
    #[sqlx(json)]
    pub modules: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub archived_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Webinar {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub price_cents: i64,
    pub platform: String,
    pub starts_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub archived_at: Option<i64>,
}

/// Kind-independent view of a catalog row, enough to rank and label it.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct EntitySummary {
    pub id: String,
    pub title: String,
    pub price_cents: i64,
    pub created_at: i64,
    pub archived_at: Option<i64>,
}

impl EntitySummary {
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CourseInput {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub duration: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub price_cents: i64,
    #[serde(default)]
    #[validate(length(max = 100), custom(function = "validate_modules"))]
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WebinarInput {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub duration: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub price_cents: i64,
    #[validate(length(min = 1, max = 50))]
    pub platform: String,
    #[serde(default)]
    pub starts_at: Option<i64>,
}

#[allow(clippy::ptr_arg)]
fn validate_modules(modules: &Vec<String>) -> Result<(), ValidationError> {
    let valid = modules
        .iter()
        .all(|m| !m.trim().is_empty() && m.chars().count() <= 200);

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("module_title"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str) -> CourseInput {
        CourseInput {
            title: title.to_owned(),
            description: String::new(),
            duration: "6 weeks".to_owned(),
            price_cents: 4900,
            modules: vec!["Foundations".to_owned()],
        }
    }

    #[test]
    fn course_title_length_is_bounded() {
        assert!(course("Rust").validate().is_ok());
        assert!(course("Ru").validate().is_err());
        assert!(course(&"x".repeat(201)).validate().is_err());
    }

    #[test]
    fn blank_module_titles_are_rejected() {
        let mut input = course("Rust in practice");
        input.modules.push("   ".to_owned());

        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("modules"));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut input = course("Rust in practice");
        input.price_cents = -1;

        assert!(input.validate().is_err());
    }
}
