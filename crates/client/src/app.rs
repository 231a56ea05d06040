//! Application context built once at startup and handed to every screen.

use std::rc::Rc;

use lms_admin_shared::{ApiError, Role, User};

use crate::api_client::ApiClient;
use crate::auth_session::{AuthContext, AuthStatus};
use crate::config::AppConfig;
use crate::navigation::Navigator;
use crate::query::QueryClient;
use crate::roles::RoleGate;
use crate::storage::TokenStore;

/// Everything a screen needs: configuration, session and query cache.
#[derive(Clone)]
pub struct AppContext {
    pub config: Rc<AppConfig>,
    pub auth: AuthContext,
    pub queries: QueryClient,
}

impl AppContext {
    pub fn new(config: AppConfig, tokens: TokenStore, navigator: Rc<dyn Navigator>) -> Self {
        let config = Rc::new(config);
        let auth = AuthContext::new(config.clone(), tokens, navigator);
        let queries = QueryClient::new();
        // Cached results belong to the viewer that fetched them.
        let cache = queries.downgrade();
        auth.state().on_end(move || {
            if let Some(queries) = cache.upgrade() {
                queries.clear();
            }
        });
        Self {
            auth,
            queries,
            config,
        }
    }

    /// Install logging, open the persisted token store and restore any
    /// previous session.
    pub fn boot(config: AppConfig, navigator: Rc<dyn Navigator>) -> Self {
        crate::logging::init(&config);
        let app = Self::new(config, TokenStore::persistent(), navigator);
        if app.auth.restore() == AuthStatus::Authenticated {
            crate::log_debug!("session restored from persisted token");
        }
        app
    }

    pub fn client(&self) -> &ApiClient {
        self.auth.client()
    }

    pub fn role(&self) -> Option<String> {
        self.auth.role()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.auth.user_id()
    }

    /// The signed-in user, or `Forbidden` when nobody is.
    pub fn current_user(&self) -> Result<User, ApiError> {
        self.auth.user().ok_or_else(|| ApiError::Forbidden {
            required: [Role::Student, Role::Teacher, Role::Admin]
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
        })
    }

    /// Refuse unless the signed-in role passes `gate`.
    pub fn require(&self, gate: &RoleGate) -> Result<(), ApiError> {
        gate.guard(self.role().as_deref())
    }

    /// End the session. Ending it also forgets every cached result.
    pub async fn logout(&self) {
        self.auth.logout().await;
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("environment", &self.config.environment)
            .field("auth", &self.auth)
            .field("queries", &self.queries)
            .finish()
    }
}
