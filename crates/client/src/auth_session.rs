//! Authentication session management with persisted token.
//!
//! [`AuthContext`] is built once at startup and handed down the component
//! tree; there is no module-level session. Its [`SessionState`] is shared with
//! the [`ApiClient`] so a 401 on a read can end the session from inside the
//! HTTP layer.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use lms_admin_shared::{
    ApiError, LoginRequest, RegisterRequest, TokenClaims, UpdateProfileRequest, User, Validate,
};

use crate::api_client::ApiClient;
use crate::config::AppConfig;
use crate::navigation::Navigator;
use crate::storage::TokenStore;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Unauthenticated,
    /// Token validation or a login/registration call is in flight.
    Loading,
    Authenticated,
}

/// The signed-in user and the token that proves it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct AuthState {
    status: AuthStatus,
    session: Option<AuthSession>,
}

/// Session state shared by the auth context and the HTTP client.
pub struct SessionState {
    tokens: TokenStore,
    inner: RefCell<AuthState>,
    revision: Cell<u64>,
    on_end: RefCell<Vec<Box<dyn Fn()>>>,
}

impl SessionState {
    pub fn new(tokens: TokenStore) -> Self {
        Self {
            tokens,
            inner: RefCell::new(AuthState::default()),
            revision: Cell::new(0),
            on_end: RefCell::new(Vec::new()),
        }
    }

    /// Run `hook` whenever a session ends: on expiry, logout, or when a
    /// different user signs in over the current one.
    pub fn on_end(&self, hook: impl Fn() + 'static) {
        self.on_end.borrow_mut().push(Box::new(hook));
    }

    fn ended(&self) {
        for hook in self.on_end.borrow().iter() {
            hook();
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn status(&self) -> AuthStatus {
        self.inner.borrow().status
    }

    pub fn session(&self) -> Option<AuthSession> {
        self.inner.borrow().session.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.borrow().session.as_ref().map(|s| s.user.clone())
    }

    /// Bumped on every state change; UI layers watch it to re-render.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    fn replace(&self, state: AuthState) {
        *self.inner.borrow_mut() = state;
        self.revision.set(self.revision.get().wrapping_add(1));
    }

    fn snapshot(&self) -> AuthState {
        self.inner.borrow().clone()
    }

    fn begin_loading(&self) {
        let mut state = self.snapshot();
        state.status = AuthStatus::Loading;
        self.replace(state);
    }

    fn establish(&self, token: String, user: User) {
        let previous = self.user().map(|u| u.id);
        if previous.is_some_and(|id| id != user.id) {
            self.ended();
        }
        self.tokens.set(&token);
        self.replace(AuthState {
            status: AuthStatus::Authenticated,
            session: Some(AuthSession { token, user }),
        });
    }

    fn set_user(&self, user: User) {
        let mut state = self.snapshot();
        if let Some(session) = state.session.as_mut() {
            session.user = user;
            state.status = AuthStatus::Authenticated;
            self.replace(state);
        }
    }

    /// Drop the persisted token and the in-memory session.
    pub fn expire(&self) {
        self.tokens.clear();
        self.replace(AuthState::default());
        self.ended();
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("status", &self.status())
            .field("revision", &self.revision())
            .finish()
    }
}

/// Decode the (unverified) payload segment of a JWT.
///
/// Signature checking is the backend's job; the client only needs the
/// identity and role to drive what it shows.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn is_expired(claims: &TokenClaims) -> bool {
    claims
        .exp
        .map(|exp| exp <= Utc::now().timestamp())
        .unwrap_or(false)
}

/// Authentication context provided to the app.
#[derive(Clone)]
pub struct AuthContext {
    state: Rc<SessionState>,
    client: ApiClient,
}

impl AuthContext {
    pub fn new(config: Rc<AppConfig>, tokens: TokenStore, navigator: Rc<dyn Navigator>) -> Self {
        let state = Rc::new(SessionState::new(tokens));
        let client = ApiClient::new(config, state.clone(), navigator);
        Self { state, client }
    }

    /// Rebuild the session from a persisted token at startup.
    ///
    /// An unreadable or expired token is discarded.
    pub fn restore(&self) -> AuthStatus {
        let Some(token) = self.state.tokens().get() else {
            return self.state.status();
        };

        self.state.begin_loading();
        let user = decode_claims(&token)
            .filter(|claims| !is_expired(claims))
            .and_then(|claims| User::from_claims(&claims));

        match user {
            Some(user) => {
                crate::log_info!("restored session for {}", user.username);
                self.state.establish(token, user);
            }
            None => {
                crate::log_warn!("stored token is invalid or expired, clearing it");
                self.state.expire();
            }
        }
        self.state.status()
    }

    /// Log in with username and password.
    ///
    /// On failure the previous state is kept and the error is returned as-is;
    /// its `user_message()` is the backend's `detail` text.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let credentials = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        credentials.validate()?;

        let previous = self.state.snapshot();
        self.state.begin_loading();

        match self.client.login(&credentials).await {
            Ok(resp) => match resp.user {
                Some(user) => {
                    crate::log_info!("logged in as {} ({})", user.username, user.role);
                    self.state.establish(resp.access_token, user.clone());
                    Ok(user)
                }
                None => {
                    self.state.replace(previous);
                    Err(ApiError::Deserialize(
                        "access token carries no user claims".to_string(),
                    ))
                }
            },
            Err(e) => {
                crate::log_warn!("login failed: {}", e.user_message());
                self.state.replace(previous);
                Err(e)
            }
        }
    }

    /// Register a new account and sign in with it.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        request.validate()?;

        let previous = self.state.snapshot();
        self.state.begin_loading();

        let resp = match self.client.register(request).await {
            Ok(resp) => resp,
            Err(e) => {
                self.state.replace(previous);
                return Err(e);
            }
        };
        let user = resp
            .user
            .or_else(|| decode_claims(&resp.access_token).and_then(|c| User::from_claims(&c)));
        match user {
            Some(user) => {
                self.state.establish(resp.access_token, user.clone());
                Ok(user)
            }
            None => {
                self.state.replace(previous);
                Err(ApiError::Deserialize(
                    "registration returned no usable token".to_string(),
                ))
            }
        }
    }

    /// End the session. The remote call is best effort; local state is
    /// always cleared.
    pub async fn logout(&self) {
        if self.state.tokens().get().is_some() {
            if let Err(e) = self.client.logout_remote().await {
                crate::log_debug!("remote logout failed, clearing locally anyway: {e}");
            }
        }
        self.state.expire();
        crate::log_info!("logged out");
    }

    /// Update the signed-in user's own profile.
    pub async fn update_profile(&self, update: &UpdateProfileRequest) -> Result<User, ApiError> {
        let user = self.client.update_profile(update).await?;
        self.state.set_user(user.clone());
        Ok(user)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn state(&self) -> &Rc<SessionState> {
        &self.state
    }

    pub fn status(&self) -> AuthStatus {
        self.state.status()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == AuthStatus::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.status() == AuthStatus::Loading
    }

    pub fn user(&self) -> Option<User> {
        self.state.user()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user().map(|u| u.id)
    }

    pub fn token(&self) -> Option<String> {
        self.state.session().map(|s| s.token)
    }

    /// Raw role string, upper-cased. `None` when signed out or role-less.
    pub fn role(&self) -> Option<String> {
        self.user()
            .map(|u| u.role.trim().to_ascii_uppercase())
            .filter(|r| !r.is_empty())
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::NoopNavigator;
    use serde_json::json;

    pub(crate) fn token_for(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    fn context(tokens: TokenStore) -> AuthContext {
        AuthContext::new(
            Rc::new(AppConfig::development()),
            tokens,
            Rc::new(NoopNavigator),
        )
    }

    #[test]
    fn decodes_numeric_and_string_subjects() {
        let claims = decode_claims(&token_for(json!({"sub": 5, "username": "an", "role": "admin"})))
            .unwrap();
        assert_eq!(claims.sub, "5");
        assert_eq!(claims.role, "admin");

        assert!(decode_claims("not-a-token").is_none());
        assert!(decode_claims("a.!!!.c").is_none());
    }

    #[test]
    fn restore_with_valid_token_authenticates() {
        let tokens = TokenStore::in_memory();
        tokens.set(&token_for(json!({"sub": "9", "username": "binh", "role": "teacher"})));
        let auth = context(tokens);

        assert_eq!(auth.restore(), AuthStatus::Authenticated);
        assert_eq!(auth.user_id(), Some(9));
        assert_eq!(auth.role().as_deref(), Some("TEACHER"));
    }

    #[test]
    fn restore_discards_garbage_and_expired_tokens() {
        let tokens = TokenStore::in_memory();
        tokens.set("garbage");
        let auth = context(tokens.clone());
        assert_eq!(auth.restore(), AuthStatus::Unauthenticated);
        assert_eq!(tokens.get(), None);

        let expired = Utc::now().timestamp() - 60;
        tokens.set(&token_for(
            json!({"sub": "1", "username": "c", "role": "ADMIN", "exp": expired}),
        ));
        assert_eq!(auth.restore(), AuthStatus::Unauthenticated);
        assert_eq!(tokens.get(), None);
    }

    #[test]
    fn restore_without_token_stays_signed_out() {
        let auth = context(TokenStore::in_memory());
        assert_eq!(auth.restore(), AuthStatus::Unauthenticated);
        assert!(auth.role().is_none());
        assert_eq!(auth.state().revision(), 0);
    }

    #[test]
    fn end_hooks_fire_on_expiry_and_user_switch() {
        let auth = context(TokenStore::in_memory());
        let ended = Rc::new(Cell::new(0));
        let seen = ended.clone();
        auth.state().on_end(move || seen.set(seen.get() + 1));

        let sign_in = |id: u32| {
            let token = token_for(json!({"sub": id, "username": format!("t{id}"), "role": "TEACHER"}));
            let user = decode_claims(&token).and_then(|c| User::from_claims(&c)).unwrap();
            auth.state().establish(token, user);
        };

        sign_in(5);
        assert_eq!(ended.get(), 0);
        sign_in(5);
        assert_eq!(ended.get(), 0, "same user refreshing their session");
        sign_in(6);
        assert_eq!(ended.get(), 1);
        auth.state().expire();
        assert_eq!(ended.get(), 2);
    }

    #[test]
    fn expire_clears_token_and_user() {
        let tokens = TokenStore::in_memory();
        tokens.set(&token_for(json!({"sub": "2", "username": "d", "role": "STUDENT"})));
        let auth = context(tokens.clone());
        auth.restore();
        assert!(auth.is_authenticated());

        auth.state().expire();
        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
        assert_eq!(tokens.get(), None);
    }
}
