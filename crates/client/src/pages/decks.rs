use lms_admin_shared::{ApiError, CreateDeckRequest, Deck, DeckList, UpdateDeckRequest, Validate};

use super::cached;
use crate::app::AppContext;
use crate::query::QueryKey;
use crate::query_keys;
use crate::roles::{can_manage_deck, RoleGate};

/// Totals shown above the deck grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeckSummary {
    pub total: usize,
    pub shared: usize,
    pub flashcards: u32,
}

impl DeckSummary {
    pub fn of(decks: &[Deck]) -> Self {
        Self {
            total: decks.len(),
            shared: decks.iter().filter(|d| d.is_shared()).count(),
            flashcards: decks.iter().map(|d| d.total_flashcards).sum(),
        }
    }
}

/// Deck list screen.
#[derive(Debug, Clone)]
pub struct DecksPage {
    app: AppContext,
}

impl DecksPage {
    pub fn new(app: AppContext) -> Self {
        Self { app }
    }

    /// `['decks', role, user_id]`; the backend filters by viewer.
    pub fn key(&self) -> QueryKey {
        query_keys::decks(self.app.role().as_deref(), self.app.user_id())
    }

    /// Decks visible to the viewer. Nothing is fetched while signed out.
    pub async fn load(&self) -> Result<Vec<Deck>, ApiError> {
        if !self.app.auth.is_authenticated() {
            return Ok(Vec::new());
        }
        let list: DeckList = cached(&self.app, self.key(), |c| async move { c.get_decks().await }).await?;
        Ok(list.decks)
    }

    pub fn can_create(&self) -> bool {
        RoleGate::teacher_or_admin().allows(self.app.role().as_deref())
    }

    pub fn can_manage(&self, deck: &Deck) -> bool {
        can_manage_deck(self.app.auth.user().as_ref(), deck)
    }

    /// Create a deck owned by the signed-in user.
    pub async fn create_deck(&self, mut payload: CreateDeckRequest) -> Result<Deck, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        payload.instructor_id = self.app.current_user()?.id;
        payload.validate()?;

        let deck = self
            .app
            .queries
            .mutate(
                self.app.client().create_deck(&payload),
                &[query_keys::decks_root()],
            )
            .await?;
        crate::log_info!("created deck {} ({})", deck.title, deck.id);
        Ok(deck)
    }

    pub async fn update_deck(&self, deck: &Deck, payload: UpdateDeckRequest) -> Result<Deck, ApiError> {
        self.require_manage(deck)?;
        payload.validate()?;
        self.app
            .queries
            .mutate(
                self.app.client().update_deck(&deck.id, &payload),
                &[query_keys::decks_root(), query_keys::deck(&deck.id)],
            )
            .await
    }

    pub async fn delete_deck(&self, deck: &Deck) -> Result<(), ApiError> {
        self.require_manage(deck)?;
        self.app
            .queries
            .mutate(
                self.app.client().delete_deck(&deck.id),
                &[
                    query_keys::decks_root(),
                    query_keys::deck(&deck.id),
                    query_keys::flashcards(&deck.id),
                ],
            )
            .await
    }

    fn require_manage(&self, deck: &Deck) -> Result<(), ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        if self.can_manage(deck) {
            Ok(())
        } else {
            Err(ApiError::Forbidden {
                required: vec!["ADMIN".to_string(), "deck owner".to_string()],
            })
        }
    }
}
