use futures_util::future::try_join;
use lms_admin_shared::{
    ApiError, CreateFlashcardRequest, Deck, Flashcard, FlashcardList, UpdateFlashcardRequest,
    Validate,
};

use super::{append_position, cached};
use crate::app::AppContext;
use crate::query::QueryKey;
use crate::query_keys;
use crate::roles::RoleGate;

/// One deck and its cards.
#[derive(Debug, Clone)]
pub struct DeckDetailPage {
    app: AppContext,
    deck_id: String,
}

impl DeckDetailPage {
    pub fn new(app: AppContext, deck_id: impl Into<String>) -> Self {
        Self {
            app,
            deck_id: deck_id.into(),
        }
    }

    pub fn deck_id(&self) -> &str {
        &self.deck_id
    }

    pub fn deck_key(&self) -> QueryKey {
        query_keys::deck(&self.deck_id)
    }

    pub fn flashcards_key(&self) -> QueryKey {
        query_keys::flashcards(&self.deck_id)
    }

    /// Every key a card change makes stale. The deck list is included for
    /// its card counts.
    fn stale_keys(&self) -> [QueryKey; 3] {
        [
            self.flashcards_key(),
            self.deck_key(),
            query_keys::decks_root(),
        ]
    }

    pub async fn load_deck(&self) -> Result<Deck, ApiError> {
        let id = self.deck_id.clone();
        cached(&self.app, self.deck_key(), move |c| {
            let id = id.clone();
            async move { c.get_deck(&id).await }
        })
        .await
    }

    /// Cards in display order.
    pub async fn load_flashcards(&self) -> Result<Vec<Flashcard>, ApiError> {
        let id = self.deck_id.clone();
        let list: FlashcardList = cached(&self.app, self.flashcards_key(), move |c| {
            let id = id.clone();
            async move { c.get_flashcards(&id).await }
        })
        .await?;
        let mut cards = list.flashcards;
        cards.sort_by_key(|card| card.order);
        Ok(cards)
    }

    /// Deck and cards, fetched side by side.
    pub async fn load(&self) -> Result<(Deck, Vec<Flashcard>), ApiError> {
        try_join(self.load_deck(), self.load_flashcards()).await
    }

    /// Add a card to this deck. An `order` of 0 means "append".
    pub async fn create_flashcard(&self, mut payload: CreateFlashcardRequest) -> Result<Flashcard, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        payload.deck_id = self.deck_id.clone();
        let append = payload.order == 0;
        if append {
            payload.order = 1;
        }
        payload.validate()?;
        if append {
            payload.order = self.next_order().await;
        }

        self.app
            .queries
            .mutate(self.app.client().create_flashcard(&payload), &self.stale_keys())
            .await
    }

    pub async fn update_flashcard(
        &self,
        flashcard_id: &str,
        payload: UpdateFlashcardRequest,
    ) -> Result<Flashcard, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        payload.validate()?;
        self.app
            .queries
            .mutate(
                self.app.client().update_flashcard(flashcard_id, &payload),
                &self.stale_keys(),
            )
            .await
    }

    pub async fn delete_flashcard(&self, flashcard_id: &str) -> Result<(), ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        self.app
            .queries
            .mutate(self.app.client().delete_flashcard(flashcard_id), &self.stale_keys())
            .await
    }

    /// One past the current card count; 1 when the count is unknown.
    pub async fn next_order(&self) -> u32 {
        match self.load_flashcards().await {
            Ok(cards) => append_position(cards.len()),
            Err(e) => {
                crate::log_warn!("could not count cards in {}: {}", self.deck_id, e.user_message());
                1
            }
        }
    }
}
