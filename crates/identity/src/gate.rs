use lectern_shared::kind::EntityKind;

use crate::Session;

/// Something a visitor can only do once signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatedAction {
    BookSeat { kind: EntityKind, entity_id: String },
    CreatePost,
    Review { kind: EntityKind, entity_id: String },
    AskQuestion,
}

impl GatedAction {
    /// Path the visitor returns to after signing in.
    pub fn path(&self) -> String {
        match self {
            GatedAction::BookSeat { kind, entity_id } => {
                format!("/book/{kind}/{}", urlencoding::encode(entity_id))
            }
            GatedAction::CreatePost => "/community".to_owned(),
            GatedAction::Review { kind, entity_id } => {
                format!("/feedback/{kind}/{}", urlencoding::encode(entity_id))
            }
            GatedAction::AskQuestion => "/questions".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate<'a> {
    Proceed(&'a Session),
    Defer { redirect: String },
}

pub fn gate<'a>(session: Option<&'a Session>, action: &GatedAction) -> Gate<'a> {
    match session {
        Some(session) => Gate::Proceed(session),
        None => Gate::Defer {
            redirect: login_redirect(&action.path()),
        },
    }
}

pub fn login_redirect(continuation: &str) -> String {
    format!("/login?redirect={}", urlencoding::encode(continuation))
}

/// Keeps `redirect` only when it points inside this site, `/` otherwise.
pub fn resolve_continuation(redirect: Option<&str>) -> String {
    match redirect.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && !path.chars().any(char::is_control) =>
        {
            path.to_owned()
        }
        _ => "/".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use lectern_shared::user::Role;

    use super::*;

    fn book(entity_id: &str) -> GatedAction {
        GatedAction::BookSeat {
            kind: EntityKind::Course,
            entity_id: entity_id.to_owned(),
        }
    }

    #[test]
    fn anonymous_visitors_are_sent_to_login() {
        assert_eq!(
            gate(None, &book("42")),
            Gate::Defer {
                redirect: "/login?redirect=%2Fbook%2Fcourse%2F42".to_owned()
            }
        );
        assert_eq!(
            gate(None, &GatedAction::CreatePost),
            Gate::Defer {
                redirect: "/login?redirect=%2Fcommunity".to_owned()
            }
        );
        assert_eq!(
            gate(None, &GatedAction::AskQuestion),
            Gate::Defer {
                redirect: "/login?redirect=%2Fquestions".to_owned()
            }
        );
    }

    #[test]
    fn signed_in_visitors_proceed() {
        let session = Session {
            user_id: "1".to_owned(),
            email: "ada@lectern.localhost".to_owned(),
            display_name: None,
            role: Role::User,
        };

        assert_eq!(gate(Some(&session), &book("42")), Gate::Proceed(&session));
    }

    #[test]
    fn entity_ids_are_escaped_in_paths() {
        assert_eq!(book("a/b").path(), "/book/course/a%2Fb");

        let review = GatedAction::Review {
            kind: EntityKind::Webinar,
            entity_id: "a b".to_owned(),
        };
        assert_eq!(review.path(), "/feedback/webinar/a%20b");
    }

    #[test]
    fn only_local_continuations_are_honoured() {
        assert_eq!(resolve_continuation(Some("/book/course/42")), "/book/course/42");
        assert_eq!(resolve_continuation(Some("/community?page=2")), "/community?page=2");
        assert_eq!(resolve_continuation(None), "/");
        assert_eq!(resolve_continuation(Some("")), "/");
        assert_eq!(resolve_continuation(Some("https://evil.example")), "/");
        assert_eq!(resolve_continuation(Some("//evil.example")), "/");
        assert_eq!(resolve_continuation(Some("/\\evil.example")), "/");
        assert_eq!(resolve_continuation(Some("book/course/42")), "/");
    }
}
