use dioxus::prelude::*;

use crate::app::AppContext;
use crate::roles::RolePermission;
use crate::ui::{Route, UiState};

#[component]
pub fn Dashboard() -> Element {
    let app = use_context::<AppContext>();
    let ui = use_context::<UiState>();
    ui.session.read();

    let name = app.auth.user().map(|u| u.full_name).unwrap_or_default();
    let perms = RolePermission::from_auth(&app.auth);
    let role = perms.user_role();

    rsx! {
        div { class: "space-y-4",
            h1 { class: "text-2xl font-bold", "Welcome, {name}" }
            p { class: "text-gray-600", "Signed in as {role}" }
            div { class: "flex gap-3",
                Link { class: "px-4 py-2 border rounded", to: Route::Decks {}, "Manage decks" }
                Link { class: "px-4 py-2 border rounded", to: Route::Courses {}, "Manage courses" }
                if perms.is_teacher_or_admin() {
                    Link { class: "px-4 py-2 border rounded", to: Route::Users {}, "Manage users" }
                }
            }
        }
    }
}
