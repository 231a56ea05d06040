//! Headless CRUD screens.
//!
//! Each controller owns an [`AppContext`] and exposes the reads and
//! mutations one screen performs: reads go through the query cache, writes
//! are checked against the role gate and validated before anything is sent,
//! and successful writes invalidate the keys the screen reads from. Errors
//! come back as [`ApiError`](lms_admin_shared::ApiError); `user_message()`
//! is the inline alert text.

mod ai;
mod assignments;
mod courses;
mod deck_detail;
mod decks;
mod lessons;
mod users;

use std::future::Future;

use lms_admin_shared::ApiError;

pub use ai::{AiDeckCreator, AiFlashcardCreator};
pub use assignments::{AssignmentFormOptions, AssignmentsPage};
pub use courses::CoursesPage;
pub use deck_detail::DeckDetailPage;
pub use decks::{DeckSummary, DecksPage};
pub use lessons::LessonsPage;
pub use users::UsersPage;

use crate::api_client::ApiClient;
use crate::app::AppContext;
use crate::query::QueryKey;

/// Read `key` through the cache, calling `call` with a client on a miss.
pub(crate) async fn cached<T, F, Fut>(app: &AppContext, key: QueryKey, call: F) -> Result<T, ApiError>
where
    T: Clone + 'static,
    F: Fn(ApiClient) -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let client = app.client().clone();
    app.queries.fetch(key, move || call(client.clone())).await
}

/// Position for an item appended after `len` existing ones, 1-based.
pub(crate) fn append_position(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX).saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_position_saturates() {
        assert_eq!(append_position(0), 1);
        assert_eq!(append_position(2), 3);
        assert_eq!(append_position(u32::MAX as usize), u32::MAX);
        assert_eq!(append_position(usize::MAX), u32::MAX);
    }
}
