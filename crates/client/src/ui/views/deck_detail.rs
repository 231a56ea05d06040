use dioxus::prelude::*;
use lms_admin_shared::{CreateFlashcardRequest, Flashcard};

use super::{teacher_or_admin, ErrorAlert};
use crate::app::AppContext;
use crate::pages::DeckDetailPage;
use crate::ui::{use_cached_resource, RoleBasedComponent, Route, UiState};

#[component]
pub fn DeckDetail(deck_id: String) -> Element {
    let app = use_context::<AppContext>();
    let ui = use_context::<UiState>();
    let mut action_error = use_signal(|| None::<String>);

    // Route params arrive as props; keep a signal so the resource re-runs.
    let mut current = use_signal(|| deck_id.clone());
    if *current.peek() != deck_id {
        current.set(deck_id.clone());
    }

    let detail = use_cached_resource({
        let app = app.clone();
        move || {
            let page = DeckDetailPage::new(app.clone(), current());
            async move { page.load().await }
        }
    });

    let on_delete = {
        let app = app.clone();
        move |card_id: String| {
            let page = DeckDetailPage::new(app.clone(), current.peek().clone());
            spawn(async move {
                match page.delete_flashcard(&card_id).await {
                    Ok(()) => ui.data_changed(),
                    Err(e) => action_error.set(Some(e.user_message())),
                }
            });
        }
    };

    let body = match &*detail.read() {
        Some(Ok((deck, cards))) => rsx! {
            div { class: "space-y-1",
                h1 { class: "text-2xl font-bold", "{deck.title}" }
                p { class: "text-gray-600", "{deck.description}" }
            }
            RoleBasedComponent { allowed_roles: teacher_or_admin(),
                div { class: "flex gap-3",
                    Link {
                        class: "px-3 py-1 border rounded text-sm",
                        to: Route::AiCreator { deck_id: deck.id.clone() },
                        "Generate with AI"
                    }
                }
                NewFlashcardForm { deck_id: deck.id.clone() }
            }
            if cards.is_empty() {
                p { class: "text-gray-500", "This deck has no cards." }
            }
            ol { class: "divide-y border rounded",
                for card in cards.iter().cloned() {
                    FlashcardRow { key: "{card.id}", card: card.clone(), on_delete: on_delete.clone() }
                }
            }
        },
        Some(Err(e)) => rsx! { ErrorAlert { message: e.user_message() } },
        None => rsx! { p { class: "text-gray-500", "Loading deck..." } },
    };

    rsx! {
        div { class: "space-y-6",
            Link { class: "text-sm text-indigo-600", to: Route::Decks {}, "Back to decks" }
            if let Some(err) = action_error() {
                ErrorAlert { message: err }
            }
            {body}
        }
    }
}

#[component]
fn FlashcardRow(card: Flashcard, on_delete: EventHandler<String>) -> Element {
    let wordclass = card.wordclass.clone().unwrap_or_default();
    let id = card.id.clone();

    rsx! {
        li { class: "flex items-start gap-4 px-4 py-3",
            span { class: "text-xs text-gray-400 w-6", "{card.order}" }
            div { class: "flex-1",
                p { class: "font-medium", "{card.front} " span { class: "text-xs text-gray-500", "{wordclass}" } }
                p { class: "text-sm text-gray-600", "{card.back}" }
                if let Some(example) = card.example.clone() {
                    p { class: "text-xs italic text-gray-500", "{example}" }
                }
            }
            RoleBasedComponent { allowed_roles: teacher_or_admin(),
                button {
                    class: "text-sm text-red-600",
                    onclick: move |_| on_delete.call(id.clone()),
                    "Delete"
                }
            }
        }
    }
}

#[component]
fn NewFlashcardForm(deck_id: String) -> Element {
    let app = use_context::<AppContext>();
    let ui = use_context::<UiState>();
    let mut front = use_signal(String::new);
    let mut back = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let handle_submit = move |e: FormEvent| {
        e.prevent_default();
        let page = DeckDetailPage::new(app.clone(), deck_id.clone());
        let payload = CreateFlashcardRequest {
            deck_id: deck_id.clone(),
            front: front.read().trim().to_string(),
            back: back.read().trim().to_string(),
            ..Default::default()
        };
        error.set(None);

        spawn(async move {
            match page.create_flashcard(payload).await {
                Ok(_) => {
                    front.set(String::new());
                    back.set(String::new());
                    ui.data_changed();
                }
                Err(err) => error.set(Some(err.user_message())),
            }
        });
    };

    rsx! {
        form { class: "flex gap-2 items-start", onsubmit: handle_submit,
            input {
                class: "flex-1 border rounded px-3 py-2",
                placeholder: "Front",
                value: "{front}",
                oninput: move |e: FormEvent| front.set(e.value()),
            }
            input {
                class: "flex-1 border rounded px-3 py-2",
                placeholder: "Back",
                value: "{back}",
                oninput: move |e: FormEvent| back.set(e.value()),
            }
            button { r#type: "submit", class: "px-4 py-2 bg-indigo-600 text-white rounded", "Add card" }
            if let Some(err) = error() {
                ErrorAlert { message: err }
            }
        }
    }
}
