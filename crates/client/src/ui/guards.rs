//! Role-gated rendering. Hiding is a convenience; the backend still
//! decides what each role may do.

use dioxus::prelude::*;

use super::{Route, UiState};
use crate::app::AppContext;
use crate::roles::has_role;

/// Renders `children` only for the allowed roles, `fallback` otherwise.
#[component]
pub fn RoleBasedComponent(
    allowed_roles: Vec<String>,
    fallback: Option<Element>,
    children: Element,
) -> Element {
    let app = use_context::<AppContext>();
    let ui = use_context::<UiState>();
    ui.session.read();

    let allowed: Vec<&str> = allowed_roles.iter().map(String::as_str).collect();
    if has_role(app.role().as_deref(), &allowed) {
        children
    } else {
        fallback.unwrap_or_else(|| rsx! {})
    }
}

/// Sends signed-out visitors to login. With `allowed_roles` set, other
/// roles see an access notice instead of the screen.
#[component]
pub fn ProtectedRoute(#[props(default)] allowed_roles: Vec<String>, children: Element) -> Element {
    let app = use_context::<AppContext>();
    let ui = use_context::<UiState>();
    let nav = use_navigator();
    ui.session.read();

    let auth = app.auth.clone();
    use_effect(move || {
        ui.session.read();
        if !auth.is_authenticated() {
            nav.replace(Route::Login {});
        }
    });

    let signed_in = app.auth.is_authenticated();

    if !signed_in {
        return rsx! {
            div { class: "p-8 text-gray-500", "Redirecting to login..." }
        };
    }

    let allowed: Vec<&str> = allowed_roles.iter().map(String::as_str).collect();
    if !allowed.is_empty() && !has_role(app.role().as_deref(), &allowed) {
        return rsx! {
            div { class: "p-8",
                h2 { class: "text-xl font-bold mb-2", "Access denied" }
                p { class: "text-gray-500", "Your role cannot open this page." }
            }
        };
    }

    children
}
