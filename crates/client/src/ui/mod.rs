//! Dioxus front end over the page controllers.
//!
//! Layout and styling are plain utility classes; the screens exist to drive
//! the controllers in [`crate::pages`], not to be pretty.

mod guards;
mod hooks;
mod routes;
mod views;

use std::rc::Rc;

use dioxus::prelude::*;

use crate::app::AppContext;
use crate::config::AppConfig;
use crate::navigation::Navigator;

pub use guards::{ProtectedRoute, RoleBasedComponent};
pub use hooks::use_cached_resource;
pub use routes::Route;

/// Reactive handles the non-reactive session and cache are mirrored into.
#[derive(Clone, Copy)]
pub struct UiState {
    /// Path requested from outside the router (session expiry).
    pub redirect: Signal<Option<String>>,
    /// Bumped on login, logout and expiry.
    pub session: Signal<u64>,
    /// Bumped after mutations so cached reads re-run.
    pub data: Signal<u64>,
}

impl UiState {
    pub fn session_changed(&self) {
        let mut session = self.session;
        *session.write() += 1;
    }

    pub fn data_changed(&self) {
        let mut data = self.data;
        *data.write() += 1;
    }
}

/// Turns navigation requests into a signal the router shell acts on.
pub struct RouterNavigator {
    redirect: Signal<Option<String>>,
}

impl RouterNavigator {
    pub fn new(redirect: Signal<Option<String>>) -> Self {
        Self { redirect }
    }
}

impl Navigator for RouterNavigator {
    fn navigate(&self, path: &str) {
        let mut redirect = self.redirect;
        redirect.set(Some(path.to_string()));
    }
}

/// Root component: builds the app context once and mounts the router.
#[component]
pub fn App() -> Element {
    let redirect = use_signal(|| None::<String>);
    let session = use_signal(|| 0u64);
    let data = use_signal(|| 0u64);

    let app = use_hook(move || {
        AppContext::boot(
            AppConfig::from_env(),
            Rc::new(RouterNavigator::new(redirect)),
        )
    });

    use_context_provider(move || app.clone());
    use_context_provider(move || UiState {
        redirect,
        session,
        data,
    });

    rsx! {
        Router::<Route> {}
    }
}
