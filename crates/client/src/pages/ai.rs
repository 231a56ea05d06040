use lms_admin_shared::{
    ApiError, CreateFlashcardRequest, DeckDescription, Flashcard, FlashcardGenerationRequest,
    FlashcardGenerationResponse, SingleFlashcardRequest, SingleFlashcardResponse, Validate,
};

use super::DeckDetailPage;
use crate::app::AppContext;
use crate::query_keys;
use crate::roles::RoleGate;
use crate::wordclass::flashcard_from_generated;

/// Generate single vocabulary cards and save them into a deck.
#[derive(Debug, Clone)]
pub struct AiFlashcardCreator {
    app: AppContext,
}

impl AiFlashcardCreator {
    pub fn new(app: AppContext) -> Self {
        Self { app }
    }

    pub async fn generate(&self, request: &SingleFlashcardRequest) -> Result<SingleFlashcardResponse, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        request.validate()?;
        self.app.client().generate_single_flashcard(request).await
    }

    /// Save a generated card at the end of `deck_id`, with its headword,
    /// clipped fields and guessed word class.
    pub async fn save_to_deck(
        &self,
        deck_id: &str,
        card: &SingleFlashcardResponse,
    ) -> Result<Flashcard, ApiError> {
        let page = DeckDetailPage::new(self.app.clone(), deck_id);
        self.app.require(&RoleGate::teacher_or_admin())?;
        // Order 0 appends once the card has passed validation.
        let payload = CreateFlashcardRequest {
            order: 0,
            ..flashcard_from_generated(deck_id, card, 1)
        };
        crate::log_debug!(
            "saving generated card '{}' as {:?}",
            payload.front,
            payload.wordclass
        );
        page.create_flashcard(payload).await
    }
}

/// Generate a whole deck server-side.
#[derive(Debug, Clone)]
pub struct AiDeckCreator {
    app: AppContext,
}

impl AiDeckCreator {
    pub fn new(app: AppContext) -> Self {
        Self { app }
    }

    pub async fn describe(&self, deck_name: &str) -> Result<DeckDescription, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        if deck_name.trim().is_empty() {
            return Ok(DeckDescription::default());
        }
        self.app.client().generate_deck_description(deck_name.trim()).await
    }

    pub async fn generate(
        &self,
        request: &FlashcardGenerationRequest,
    ) -> Result<FlashcardGenerationResponse, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        request.validate()?;
        let resp = self
            .app
            .queries
            .mutate(
                self.app.client().generate_flashcards(request),
                &[query_keys::decks_root()],
            )
            .await?;
        crate::log_info!(
            "generated deck {} with {} cards",
            resp.deck_id,
            resp.flashcards_count
        );
        Ok(resp)
    }
}
