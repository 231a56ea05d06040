use dioxus::prelude::*;

use super::ErrorAlert;
use crate::app::AppContext;
use crate::ui::{Route, UiState};

#[component]
pub fn Login() -> Element {
    let app = use_context::<AppContext>();
    let ui = use_context::<UiState>();
    let nav = use_navigator();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_loading = use_signal(|| false);

    // Already signed in (restored session)
    let auth = app.auth.clone();
    use_effect(move || {
        ui.session.read();
        if auth.is_authenticated() {
            nav.replace(Route::Dashboard {});
        }
    });

    let handle_submit = move |e: FormEvent| {
        e.prevent_default();
        let app = app.clone();
        let user = username.read().clone();
        let pass = password.read().clone();
        is_loading.set(true);
        error.set(None);

        spawn(async move {
            match app.auth.login(&user, &pass).await {
                Ok(_) => {
                    ui.session_changed();
                    nav.push(Route::Dashboard {});
                }
                Err(err) => {
                    error.set(Some(err.user_message()));
                }
            }
            is_loading.set(false);
        });
    };

    rsx! {
        div { class: "min-h-screen flex items-center justify-center bg-gray-100",
            form { class: "bg-white rounded-lg shadow p-8 w-full max-w-sm space-y-4",
                onsubmit: handle_submit,
                h1 { class: "text-2xl font-bold", "Sign in" }
                input {
                    class: "w-full border rounded px-3 py-2",
                    r#type: "text",
                    placeholder: "Username",
                    value: "{username}",
                    oninput: move |e: FormEvent| username.set(e.value()),
                }
                input {
                    class: "w-full border rounded px-3 py-2",
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |e: FormEvent| password.set(e.value()),
                }
                if let Some(err) = error() {
                    ErrorAlert { message: err }
                }
                button {
                    r#type: "submit",
                    class: "w-full bg-indigo-600 text-white rounded py-2 disabled:opacity-50",
                    disabled: is_loading(),
                    if is_loading() { "Signing in..." } else { "Sign in" }
                }
            }
        }
    }
}
