//! Query keys used by the screens.
//!
//! Per-viewer lists carry the role and user id so that results never leak
//! between sessions. Namespace roots (`decks_root()` etc.) are the prefixes
//! mutations invalidate.

use crate::query::QueryKey;

pub fn decks_root() -> QueryKey {
    QueryKey::root("decks")
}

/// `['decks', role, user_id]`
pub fn decks(role: Option<&str>, user_id: Option<i64>) -> QueryKey {
    decks_root().with(role).with(user_id)
}

/// `['deck', id]`
pub fn deck(deck_id: &str) -> QueryKey {
    QueryKey::root("deck").with(deck_id)
}

/// `['flashcards', deck_id]`
pub fn flashcards(deck_id: &str) -> QueryKey {
    QueryKey::root("flashcards").with(deck_id)
}

pub fn courses() -> QueryKey {
    QueryKey::root("courses")
}

pub fn course(course_id: &str) -> QueryKey {
    QueryKey::root("course").with(course_id)
}

pub fn lessons_root() -> QueryKey {
    QueryKey::root("lessons")
}

/// `['lessons', course_id]`
pub fn lessons(course_id: &str) -> QueryKey {
    lessons_root().with(course_id)
}

pub fn all_lessons() -> QueryKey {
    QueryKey::root("all-lessons")
}

pub fn users_root() -> QueryKey {
    QueryKey::root("users")
}

/// `['users', role_filter]`
pub fn users(role_filter: Option<&str>) -> QueryKey {
    users_root().with(role_filter)
}

pub fn my_students() -> QueryKey {
    QueryKey::root("my-students")
}

pub fn assignments_root() -> QueryKey {
    QueryKey::root("assignments")
}

/// `['assignments', role, user_id]`
pub fn assignments(role: Option<&str>, user_id: Option<i64>) -> QueryKey {
    assignments_root().with(role).with(user_id)
}

pub fn assignment(assignment_id: i64) -> QueryKey {
    QueryKey::root("assignment").with(assignment_id)
}
