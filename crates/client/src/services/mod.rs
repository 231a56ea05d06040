//! Typed wrappers, one per backend endpoint.
//!
//! Each module adds an `impl ApiClient` block. Wrappers only translate
//! shapes (envelope unwrapping, path building); errors propagate unchanged.

mod ai;
mod assignments;
mod auth;
mod courses;
mod decks;
mod lessons;
mod users;

use serde::Deserialize;

/// List bodies seen across the content service: an `items` envelope, a
/// named key, or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody<T> {
    Bare(Vec<T>),
    Keyed(KeyedList<T>),
}

/// Envelope keys, in the order they are preferred when several are present.
#[derive(Debug, Deserialize)]
pub(crate) struct KeyedList<T> {
    items: Option<Vec<T>>,
    courses: Option<Vec<T>>,
    decks: Option<Vec<T>>,
    lessons: Option<Vec<T>>,
    flashcards: Option<Vec<T>>,
}

impl<T> ListBody<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) => items,
            ListBody::Keyed(list) => list
                .items
                .or(list.courses)
                .or(list.decks)
                .or(list.lessons)
                .or(list.flashcards)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_body_accepts_every_shape() {
        let bare: ListBody<u32> = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(bare.into_items(), vec![1, 2]);

        let items: ListBody<u32> =
            serde_json::from_value(json!({"items": [3], "total": 1, "page": 1})).unwrap();
        assert_eq!(items.into_items(), vec![3]);

        let named: ListBody<u32> = serde_json::from_value(json!({"lessons": [4, 5]})).unwrap();
        assert_eq!(named.into_items(), vec![4, 5]);

        let empty: ListBody<u32> = serde_json::from_value(json!({"total": 0})).unwrap();
        assert!(empty.into_items().is_empty());
    }

    #[test]
    fn list_body_prefers_items_over_named_keys() {
        let both: ListBody<u32> =
            serde_json::from_value(json!({"items": [1], "courses": [2, 3]})).unwrap();
        assert_eq!(both.into_items(), vec![1]);

        let named: ListBody<u32> =
            serde_json::from_value(json!({"decks": [7], "flashcards": [8]})).unwrap();
        assert_eq!(named.into_items(), vec![7]);
    }
}
