//! Shared fixtures: a client pointed at a mock server and signed-in sessions.

#![allow(dead_code)]

use std::rc::Rc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use lms_admin_client::{AppConfig, AppContext, PendingNavigator, TokenStore};
use serde_json::{json, Value};
use wiremock::MockServer;

pub fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        api_base_url: server.uri(),
        ai_service_url: format!("{}/api/v1/ai", server.uri()),
        ..AppConfig::development()
    }
}

/// Unsigned token carrying `id`, `username` and `role`, valid for an hour.
pub fn token_for(id: i64, username: &str, role: &str) -> String {
    let claims = json!({
        "sub": id.to_string(),
        "username": username,
        "role": role,
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

pub struct Harness {
    pub app: AppContext,
    pub nav: Rc<PendingNavigator>,
    pub tokens: TokenStore,
}

/// Signed-out app bound to `server`.
pub fn signed_out(server: &MockServer) -> Harness {
    let tokens = TokenStore::in_memory();
    let nav = Rc::new(PendingNavigator::new());
    let app = AppContext::new(config_for(server), tokens.clone(), nav.clone());
    Harness { app, nav, tokens }
}

/// App with a restored session for a user with `role`.
pub fn signed_in(server: &MockServer, id: i64, role: &str) -> Harness {
    let harness = signed_out(server);
    harness.tokens.set(&token_for(id, &format!("user{id}"), role));
    harness.app.auth.restore();
    harness
}

pub fn deck_json(id: &str, title: &str, instructor_id: i64) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "instructor_id": instructor_id,
        "difficulty": "easy",
        "total_flashcards": 0,
    })
}

pub fn flashcard_json(id: &str, deck_id: &str, order: u32) -> Value {
    json!({
        "id": id,
        "deck_id": deck_id,
        "front": format!("front {order}"),
        "back": format!("back {order}"),
        "order": order,
    })
}

/// Every request the server has seen so far.
pub async fn requests(server: &MockServer) -> Vec<wiremock::Request> {
    server.received_requests().await.unwrap_or_default()
}
