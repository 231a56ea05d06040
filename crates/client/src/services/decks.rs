use lms_admin_shared::{
    ApiError, CreateDeckRequest, CreateFlashcardRequest, Deck, DeckList, Flashcard,
    FlashcardList, UpdateDeckRequest, UpdateFlashcardRequest,
};

use super::ListBody;
use crate::api_client::{segment, ApiClient};

impl ApiClient {
    // --- Decks ---

    /// `GET /api/decks/`, with the `items` envelope exposed as `decks`.
    pub async fn get_decks(&self) -> Result<DeckList, ApiError> {
        let body: ListBody<Deck> = self.get_json("/api/decks/").await?;
        Ok(DeckList {
            decks: body.into_items(),
        })
    }

    pub async fn get_deck(&self, deck_id: &str) -> Result<Deck, ApiError> {
        self.get_json(&format!("/api/decks/{}", segment(deck_id))).await
    }

    pub async fn create_deck(&self, payload: &CreateDeckRequest) -> Result<Deck, ApiError> {
        self.post_json("/api/decks/", payload).await
    }

    pub async fn update_deck(&self, deck_id: &str, payload: &UpdateDeckRequest) -> Result<Deck, ApiError> {
        self.put_json(&format!("/api/decks/{}", segment(deck_id)), payload)
            .await
    }

    pub async fn delete_deck(&self, deck_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/api/decks/{}", segment(deck_id))).await
    }

    // --- Flashcards ---

    /// `GET /api/decks/:id/flashcards` answers with a bare array.
    pub async fn get_flashcards(&self, deck_id: &str) -> Result<FlashcardList, ApiError> {
        let body: ListBody<Flashcard> = self
            .get_json(&format!("/api/decks/{}/flashcards", segment(deck_id)))
            .await?;
        Ok(FlashcardList {
            flashcards: body.into_items(),
        })
    }

    pub async fn create_flashcard(&self, payload: &CreateFlashcardRequest) -> Result<Flashcard, ApiError> {
        self.post_json(
            &format!("/api/decks/{}/flashcards", segment(&payload.deck_id)),
            payload,
        )
        .await
    }

    pub async fn update_flashcard(
        &self,
        flashcard_id: &str,
        payload: &UpdateFlashcardRequest,
    ) -> Result<Flashcard, ApiError> {
        self.put_json(
            &format!("/api/decks/flashcards/{}", segment(flashcard_id)),
            payload,
        )
        .await
    }

    pub async fn delete_flashcard(&self, flashcard_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/api/decks/flashcards/{}", segment(flashcard_id)))
            .await
    }
}
