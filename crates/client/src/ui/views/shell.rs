use dioxus::prelude::*;

use super::teacher_or_admin;
use crate::app::AppContext;
use crate::ui::{ProtectedRoute, RoleBasedComponent, Route, UiState};

/// Top bar plus the routed screen; also turns out-of-router navigation
/// requests (expired session) into router moves.
#[component]
pub fn Shell() -> Element {
    let app = use_context::<AppContext>();
    let ui = use_context::<UiState>();
    let nav = use_navigator();
    ui.session.read();

    use_effect(move || {
        let target = ui.redirect.read().clone();
        if let Some(path) = target {
            let mut redirect = ui.redirect;
            redirect.set(None);
            ui.session_changed();
            nav.replace(path.parse::<Route>().unwrap_or(Route::Login {}));
        }
    });

    let logout = {
        let app = app.clone();
        move |_| {
            let app = app.clone();
            spawn(async move {
                app.logout().await;
                ui.session_changed();
                nav.replace(Route::Login {});
            });
        }
    };

    let app_name = app.config.app_name.clone();
    let who = app
        .auth
        .user()
        .map(|u| format!("{} ({})", u.full_name, u.role))
        .unwrap_or_default();

    rsx! {
        div { class: "min-h-screen flex flex-col",
            header { class: "flex items-center gap-6 px-6 py-3 border-b bg-white",
                span { class: "font-bold", "{app_name}" }
                nav { class: "flex gap-4 text-sm",
                    Link { to: Route::Dashboard {}, "Home" }
                    Link { to: Route::Decks {}, "Decks" }
                    Link { to: Route::Courses {}, "Courses" }
                    Link { to: Route::Assignments {}, "Assignments" }
                    RoleBasedComponent { allowed_roles: teacher_or_admin(),
                        Link { to: Route::Users {}, "Users" }
                    }
                }
                div { class: "ml-auto flex items-center gap-3 text-sm",
                    span { class: "text-gray-600", "{who}" }
                    button { class: "px-3 py-1 border rounded", onclick: logout, "Logout" }
                }
            }
            main { class: "flex-1 p-6",
                ProtectedRoute {
                    Outlet::<Route> {}
                }
            }
        }
    }
}
