use dioxus::prelude::*;
use lms_admin_shared::{CreateDeckRequest, Deck, Difficulty};

use super::{teacher_or_admin, ErrorAlert};
use crate::app::AppContext;
use crate::pages::{DeckSummary, DecksPage};
use crate::ui::{use_cached_resource, RoleBasedComponent, Route, UiState};

#[component]
pub fn Decks() -> Element {
    let app = use_context::<AppContext>();
    let ui = use_context::<UiState>();
    let page = DecksPage::new(app);
    let mut action_error = use_signal(|| None::<String>);

    let decks = use_cached_resource({
        let page = page.clone();
        move || {
            let page = page.clone();
            async move { page.load().await }
        }
    });

    let on_delete = {
        let page = page.clone();
        move |deck: Deck| {
            let page = page.clone();
            spawn(async move {
                match page.delete_deck(&deck).await {
                    Ok(()) => ui.data_changed(),
                    Err(e) => action_error.set(Some(e.user_message())),
                }
            });
        }
    };

    let body = match &*decks.read() {
        Some(Ok(list)) => {
            let summary = DeckSummary::of(list);
            rsx! {
                p { class: "text-sm text-gray-500",
                    "{summary.total} decks, {summary.shared} shared, {summary.flashcards} cards"
                }
                if list.is_empty() {
                    p { class: "text-gray-500", "No decks yet." }
                }
                ul { class: "divide-y border rounded",
                    for deck in list.iter().cloned() {
                        DeckRow {
                            key: "{deck.id}",
                            can_manage: page.can_manage(&deck),
                            deck: deck.clone(),
                            on_delete: on_delete.clone(),
                        }
                    }
                }
            }
        }
        Some(Err(e)) => rsx! { ErrorAlert { message: e.user_message() } },
        None => rsx! { p { class: "text-gray-500", "Loading decks..." } },
    };

    rsx! {
        div { class: "space-y-6",
            h1 { class: "text-2xl font-bold", "Flashcard Decks" }
            RoleBasedComponent { allowed_roles: teacher_or_admin(),
                CreateDeckForm {}
            }
            if let Some(err) = action_error() {
                ErrorAlert { message: err }
            }
            {body}
        }
    }
}

#[component]
fn DeckRow(deck: Deck, can_manage: bool, on_delete: EventHandler<Deck>) -> Element {
    let difficulty = deck.difficulty.map(|d| d.as_str()).unwrap_or("-");
    let visibility = if deck.is_shared() { "shared" } else { "private" };
    let target = deck.clone();

    rsx! {
        li { class: "flex items-center gap-4 px-4 py-3",
            Link { class: "font-medium", to: Route::DeckDetail { deck_id: deck.id.clone() }, "{deck.title}" }
            span { class: "text-xs text-gray-500", "{difficulty} / {visibility} / {deck.total_flashcards} cards" }
            if can_manage {
                button {
                    class: "ml-auto text-sm text-red-600",
                    onclick: move |_| on_delete.call(target.clone()),
                    "Delete"
                }
            }
        }
    }
}

#[component]
fn CreateDeckForm() -> Element {
    let page = DecksPage::new(use_context::<AppContext>());
    let ui = use_context::<UiState>();
    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut difficulty = use_signal(String::new);
    let mut is_public = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut is_saving = use_signal(|| false);

    let handle_submit = move |e: FormEvent| {
        e.prevent_default();
        let page = page.clone();
        let payload = CreateDeckRequest {
            title: title.read().trim().to_string(),
            description: description.read().trim().to_string(),
            difficulty: Difficulty::parse(&difficulty.read()),
            instructor_id: 0,
            is_public: Some(is_public()),
            is_published: None,
            category: None,
            tags: Vec::new(),
        };
        is_saving.set(true);
        error.set(None);

        spawn(async move {
            match page.create_deck(payload).await {
                Ok(_) => {
                    title.set(String::new());
                    description.set(String::new());
                    difficulty.set(String::new());
                    ui.data_changed();
                }
                Err(err) => error.set(Some(err.user_message())),
            }
            is_saving.set(false);
        });
    };

    rsx! {
        form { class: "border rounded p-4 space-y-3", onsubmit: handle_submit,
            h2 { class: "font-semibold", "New deck" }
            input {
                class: "w-full border rounded px-3 py-2",
                placeholder: "Title",
                value: "{title}",
                oninput: move |e: FormEvent| title.set(e.value()),
            }
            textarea {
                class: "w-full border rounded px-3 py-2",
                placeholder: "Description",
                value: "{description}",
                oninput: move |e: FormEvent| description.set(e.value()),
            }
            div { class: "flex gap-4 items-center",
                select {
                    class: "border rounded px-3 py-2",
                    value: "{difficulty}",
                    onchange: move |e: FormEvent| difficulty.set(e.value()),
                    option { value: "", "Difficulty..." }
                    option { value: "easy", "Easy" }
                    option { value: "medium", "Medium" }
                    option { value: "hard", "Hard" }
                }
                label { class: "flex items-center gap-2 text-sm",
                    input {
                        r#type: "checkbox",
                        checked: is_public(),
                        onchange: move |e: FormEvent| is_public.set(e.checked()),
                    }
                    "Shared with other instructors"
                }
            }
            if let Some(err) = error() {
                ErrorAlert { message: err }
            }
            button {
                r#type: "submit",
                class: "px-4 py-2 bg-indigo-600 text-white rounded disabled:opacity-50",
                disabled: is_saving(),
                "Create deck"
            }
        }
    }
}
