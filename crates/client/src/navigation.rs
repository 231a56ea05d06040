//! Navigation side effects triggered outside the router (session expiry).

use std::cell::RefCell;

/// Path of the login screen.
pub const LOGIN_PATH: &str = "/login";

/// Something that can move the user to another screen.
pub trait Navigator {
    fn navigate(&self, path: &str);

    fn to_login(&self) {
        self.navigate(LOGIN_PATH);
    }
}

/// Drops every request. Used by headless callers with no screens.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, path: &str) {
        crate::log_debug!("navigation to {path} ignored (headless)");
    }
}

/// Keeps the requested paths; the host polls `take()` to act on them.
#[derive(Debug, Default)]
pub struct PendingNavigator {
    requested: RefCell<Vec<String>>,
}

impl PendingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All paths requested since the last call, oldest first.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.requested.borrow_mut())
    }

    pub fn last(&self) -> Option<String> {
        self.requested.borrow().last().cloned()
    }
}

impl Navigator for PendingNavigator {
    fn navigate(&self, path: &str) {
        self.requested.borrow_mut().push(path.to_string());
    }
}

/// Full page load to the login screen, as a plain browser redirect.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

#[cfg(target_arch = "wasm32")]
impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(path) {
                crate::log_error!("redirect to {path} failed: {e:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_navigator_records_login_redirects() {
        let nav = PendingNavigator::new();
        nav.to_login();
        nav.navigate("/decks");
        assert_eq!(nav.last().as_deref(), Some("/decks"));
        assert_eq!(nav.take(), vec![LOGIN_PATH.to_string(), "/decks".to_string()]);
        assert!(nav.take().is_empty());
    }
}
