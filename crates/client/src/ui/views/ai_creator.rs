use dioxus::prelude::*;
use lms_admin_shared::{SingleFlashcardRequest, SingleFlashcardResponse};

use super::{teacher_or_admin, ErrorAlert};
use crate::app::AppContext;
use crate::pages::AiFlashcardCreator;
use crate::ui::{ProtectedRoute, Route, UiState};
use crate::wordclass::{classify, extract_word_from_question};

/// Generate one vocabulary card, preview it, then save it into the deck.
#[component]
pub fn AiCreator(deck_id: String) -> Element {
    rsx! {
        ProtectedRoute { allowed_roles: teacher_or_admin(),
            AiCreatorForm { deck_id: deck_id.clone() }
        }
    }
}

#[component]
fn AiCreatorForm(deck_id: String) -> Element {
    let app = use_context::<AppContext>();
    let ui = use_context::<UiState>();
    let nav = use_navigator();
    let creator = AiFlashcardCreator::new(app);

    let mut word = use_signal(String::new);
    let mut difficulty = use_signal(|| "medium".to_string());
    let mut preview = use_signal(|| None::<SingleFlashcardResponse>);
    let mut error = use_signal(|| None::<String>);
    let mut is_busy = use_signal(|| false);

    let generate = {
        let creator = creator.clone();
        move |e: FormEvent| {
            e.prevent_default();
            let creator = creator.clone();
            let request = SingleFlashcardRequest {
                word_or_topic: word.read().trim().to_string(),
                difficulty: difficulty.read().clone(),
                ..Default::default()
            };
            is_busy.set(true);
            error.set(None);
            spawn(async move {
                match creator.generate(&request).await {
                    Ok(card) => preview.set(Some(card)),
                    Err(err) => error.set(Some(err.user_message())),
                }
                is_busy.set(false);
            });
        }
    };

    let save = {
        let deck_id = deck_id.clone();
        move |_| {
            let Some(card) = preview.read().clone() else {
                return;
            };
            let creator = creator.clone();
            let deck_id = deck_id.clone();
            is_busy.set(true);
            spawn(async move {
                match creator.save_to_deck(&deck_id, &card).await {
                    Ok(_) => {
                        ui.data_changed();
                        nav.push(Route::DeckDetail { deck_id });
                    }
                    Err(err) => error.set(Some(err.user_message())),
                }
                is_busy.set(false);
            });
        }
    };

    let card_view = preview.read().clone().map(|card| {
        let headword = extract_word_from_question(&card.question);
        let class = classify(&headword, &card);
        let examples = card.examples.join("; ");
        rsx! {
            div { class: "border rounded p-4 space-y-2",
                h2 { class: "text-xl font-semibold", "{headword} " span { class: "text-sm text-gray-500", "({class})" } }
                p { "{card.answer}" }
                if !card.explanation.is_empty() {
                    p { class: "text-sm text-gray-600", "{card.explanation}" }
                }
                if !examples.is_empty() {
                    p { class: "text-sm italic", "{examples}" }
                }
                button {
                    class: "px-4 py-2 bg-green-600 text-white rounded disabled:opacity-50",
                    disabled: is_busy(),
                    onclick: save,
                    "Save to deck"
                }
            }
        }
    });

    rsx! {
        div { class: "space-y-6 max-w-xl",
            Link { class: "text-sm text-indigo-600", to: Route::DeckDetail { deck_id: deck_id.clone() }, "Back to deck" }
            h1 { class: "text-2xl font-bold", "AI flashcard" }
            form { class: "flex gap-2", onsubmit: generate,
                input {
                    class: "flex-1 border rounded px-3 py-2",
                    placeholder: "Word or topic",
                    value: "{word}",
                    oninput: move |e: FormEvent| word.set(e.value()),
                }
                select {
                    class: "border rounded px-3 py-2",
                    value: "{difficulty}",
                    onchange: move |e: FormEvent| difficulty.set(e.value()),
                    option { value: "easy", "Easy" }
                    option { value: "medium", "Medium" }
                    option { value: "hard", "Hard" }
                }
                button {
                    r#type: "submit",
                    class: "px-4 py-2 bg-indigo-600 text-white rounded disabled:opacity-50",
                    disabled: is_busy(),
                    if is_busy() { "Working..." } else { "Generate" }
                }
            }
            if let Some(err) = error() {
                ErrorAlert { message: err }
            }
            {card_view}
        }
    }
}
