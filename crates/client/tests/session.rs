//! Login, logout and session expiry against a mock backend.

mod common;

use common::{deck_json, requests, signed_in, signed_out, token_for};
use lms_admin_client::navigation::LOGIN_PATH;
use lms_admin_client::pages::UsersPage;
use lms_admin_client::AuthStatus;
use lms_admin_shared::{ApiError, CreateDeckRequest, Difficulty};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn login_reads_user_from_token_and_persists_it() {
    let server = MockServer::start().await;
    let token = token_for(7, "ms.smith", "teacher");
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({"username": "ms.smith", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "bearer",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = signed_out(&server);
    let user = h.app.auth.login("  ms.smith ", "pw").await.unwrap();

    assert_eq!(user.id, 7);
    assert_eq!(h.app.auth.status(), AuthStatus::Authenticated);
    assert_eq!(h.app.role().as_deref(), Some("TEACHER"));
    assert_eq!(h.tokens.get().as_deref(), Some(token.as_str()));
}

#[tokio::test]
async fn failed_login_shows_backend_detail_and_keeps_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Incorrect username or password"})),
        )
        .mount(&server)
        .await;

    let h = signed_out(&server);
    let err = h.app.auth.login("nobody", "wrong").await.unwrap_err();

    assert_eq!(err.user_message(), "Incorrect username or password");
    assert_eq!(h.app.auth.status(), AuthStatus::Unauthenticated);
    assert!(h.tokens.get().is_none());
    // A POST 401 never redirects.
    assert!(h.nav.take().is_empty());
}

#[tokio::test]
async fn blank_credentials_are_rejected_locally() {
    let server = MockServer::start().await;
    let h = signed_out(&server);

    let err = h.app.auth.login("   ", "").await.unwrap_err();

    assert!(matches!(err, ApiError::Invalid(_)));
    assert!(requests(&server).await.is_empty());
}

#[tokio::test]
async fn restore_discards_expired_token() {
    let server = MockServer::start().await;
    let h = signed_out(&server);
    let expired = {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine;
        let claims = json!({"sub": "3", "username": "old", "role": "ADMIN", "exp": 1});
        format!("h.{}.s", URL_SAFE_NO_PAD.encode(claims.to_string()))
    };
    h.tokens.set(&expired);

    assert_eq!(h.app.auth.restore(), AuthStatus::Unauthenticated);
    assert!(h.tokens.get().is_none());
}

#[tokio::test]
async fn logout_drops_token_and_later_requests_are_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/decks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let h = signed_in(&server, 1, "ADMIN");
    h.app.logout().await;

    assert_eq!(h.app.auth.status(), AuthStatus::Unauthenticated);
    assert!(h.tokens.get().is_none());
    assert!(h.app.queries.is_empty());

    h.app.client().get_decks().await.unwrap();
    let seen = requests(&server).await;
    let get = seen
        .iter()
        .find(|r| r.method.as_str() == "GET")
        .expect("deck list request");
    assert!(get.headers.get("authorization").is_none());

    // The logout call itself still carried the old token.
    let logout = seen
        .iter()
        .find(|r| r.url.path() == "/api/v1/auth/logout")
        .expect("logout request");
    assert!(logout.headers.get("authorization").is_some());
}

#[tokio::test]
async fn logout_succeeds_even_when_backend_refuses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let h = signed_in(&server, 1, "TEACHER");
    h.app.logout().await;

    assert_eq!(h.app.auth.status(), AuthStatus::Unauthenticated);
}

#[tokio::test]
async fn unauthorized_get_expires_session_and_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/decks/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .expect(1)
        .mount(&server)
        .await;

    let h = signed_in(&server, 4, "TEACHER");
    let err = h.app.client().get_decks().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(h.app.auth.status(), AuthStatus::Unauthenticated);
    assert!(h.tokens.get().is_none());
    assert_eq!(h.nav.take(), vec![LOGIN_PATH.to_string()]);
}

fn students_json(username: &str) -> serde_json::Value {
    json!({
        "users": [{
            "id": 40,
            "username": username,
            "email": format!("{username}@example.com"),
            "full_name": username,
            "role": "STUDENT",
            "is_active": true,
        }],
        "total": 1,
    })
}

#[tokio::test]
async fn expired_session_leaves_nothing_cached_for_next_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/my-students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(students_json("first_pupil")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/my-students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(students_json("second_pupil")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/decks/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token_for(6, "mr.tran", "TEACHER"),
            "token_type": "bearer",
        })))
        .mount(&server)
        .await;

    let h = signed_in(&server, 5, "TEACHER");
    let page = UsersPage::new(h.app.clone());
    assert_eq!(page.load().await.unwrap()[0].username, "first_pupil");
    assert!(!h.app.queries.is_empty());

    h.app.client().get_decks().await.unwrap_err();
    assert_eq!(h.app.auth.status(), AuthStatus::Unauthenticated);
    assert!(h.app.queries.is_empty());

    h.app.auth.login("mr.tran", "pw").await.unwrap();
    assert_eq!(page.load().await.unwrap()[0].username, "second_pupil");

    let student_reads = requests(&server)
        .await
        .into_iter()
        .filter(|r| r.url.path() == "/api/v1/users/my-students")
        .count();
    assert_eq!(student_reads, 2);
}

#[tokio::test]
async fn unauthorized_write_leaves_session_alone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/decks/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Not allowed"})))
        .mount(&server)
        .await;

    let h = signed_in(&server, 4, "TEACHER");
    let payload = CreateDeckRequest {
        title: "Verbs".into(),
        description: String::new(),
        difficulty: Some(Difficulty::Easy),
        instructor_id: 4,
        is_public: None,
        is_published: None,
        category: None,
        tags: Vec::new(),
    };
    let err = h.app.client().create_deck(&payload).await.unwrap_err();

    assert_eq!(err.user_message(), "Not allowed");
    assert_eq!(h.app.auth.status(), AuthStatus::Authenticated);
    assert!(h.tokens.get().is_some());
    assert!(h.nav.take().is_empty());
}

#[tokio::test]
async fn requests_carry_bearer_token() {
    let server = MockServer::start().await;
    let token = token_for(9, "admin", "ADMIN");
    Mock::given(method("GET"))
        .and(path("/api/decks/d1"))
        .and(wiremock::matchers::header(
            "authorization",
            format!("Bearer {token}").as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(deck_json("d1", "Animals", 9)))
        .expect(1)
        .mount(&server)
        .await;

    let h = signed_out(&server);
    h.tokens.set(&token);
    h.app.auth.restore();

    let deck = h.app.client().get_deck("d1").await.unwrap();
    assert_eq!(deck.title, "Animals");
}
