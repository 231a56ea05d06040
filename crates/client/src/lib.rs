//! LMS admin client
//!
//! Headless client for the LMS admin and teacher screens: HTTP plumbing with
//! session handling, typed service calls, a keyed query cache, role gating
//! and one controller per screen. The Dioxus front end lives behind the
//! `ui` feature.

pub mod api_client;
pub mod app;
pub mod auth_session;
pub mod config;
pub mod logging;
pub mod navigation;
pub mod pages;
pub mod query;
pub mod query_keys;
pub mod roles;
pub mod services;
pub mod storage;
pub mod wordclass;

#[cfg(feature = "ui")]
pub mod ui;

pub use api_client::ApiClient;
pub use app::AppContext;
pub use auth_session::{AuthContext, AuthSession, AuthStatus, SessionState};
pub use config::{AppConfig, Environment};
pub use navigation::{Navigator, NoopNavigator, PendingNavigator};
pub use query::{QueryClient, QueryKey, QueryStatus, WeakQueryClient};
pub use roles::{has_role, RoleGate, RolePermission};
pub use storage::TokenStore;
