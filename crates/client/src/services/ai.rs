//! AI generation service. Lives on its own host, so every path is built from
//! `AppConfig::ai_service_url` rather than the gateway.

use lms_admin_shared::{
    ApiError, DeckDescription, FlashcardGenerationRequest, FlashcardGenerationResponse,
    SingleFlashcardRequest, SingleFlashcardResponse,
};

use crate::api_client::ApiClient;

impl ApiClient {
    /// Generate one detailed vocabulary card.
    pub async fn generate_single_flashcard(
        &self,
        request: &SingleFlashcardRequest,
    ) -> Result<SingleFlashcardResponse, ApiError> {
        let url = self.config().ai_url("generate-single-flashcard");
        self.post_json(&url, request).await
    }

    /// Generate a whole deck server-side; the response names the new deck.
    pub async fn generate_flashcards(
        &self,
        request: &FlashcardGenerationRequest,
    ) -> Result<FlashcardGenerationResponse, ApiError> {
        let url = self.config().ai_url("generate-flashcards");
        self.post_json(&url, request).await
    }

    pub async fn generate_deck_description(&self, deck_name: &str) -> Result<DeckDescription, ApiError> {
        let url = self.config().ai_url("generate-deck-description");
        self.post_with_query(&url, &[("deck_name", deck_name)]).await
    }
}
