//! Page controllers end to end: cache reuse, invalidation and role gating.

mod common;

use common::{deck_json, flashcard_json, requests, signed_in, signed_out};
use futures_util::future::join;
use lms_admin_client::pages::{AiFlashcardCreator, CoursesPage, DeckDetailPage, DecksPage, UsersPage};
use lms_admin_client::QueryStatus;
use lms_admin_shared::{
    ApiError, CreateDeckRequest, CreateFlashcardRequest, CreateUserRequest, Difficulty, Role,
    SingleFlashcardResponse,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn new_deck(title: &str, difficulty: Option<Difficulty>) -> CreateDeckRequest {
    CreateDeckRequest {
        title: title.to_string(),
        description: String::new(),
        difficulty,
        instructor_id: 0,
        is_public: None,
        is_published: None,
        category: None,
        tags: Vec::new(),
    }
}

#[tokio::test]
async fn student_cannot_create_deck_and_nothing_is_sent() {
    let server = MockServer::start().await;
    let h = signed_in(&server, 12, "STUDENT");
    let page = DecksPage::new(h.app.clone());

    assert!(!page.can_create());
    let err = page
        .create_deck(new_deck("Mine", Some(Difficulty::Easy)))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden { .. }));
    assert!(requests(&server).await.is_empty());
}

#[tokio::test]
async fn deck_without_difficulty_is_rejected_before_sending() {
    let server = MockServer::start().await;
    let h = signed_in(&server, 5, "TEACHER");
    let page = DecksPage::new(h.app.clone());

    let err = page.create_deck(new_deck("Colours", None)).await.unwrap_err();

    match err {
        ApiError::Invalid(errors) => {
            assert!(errors.messages().iter().any(|m| m.contains("Difficulty")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(requests(&server).await.is_empty());
}

#[tokio::test]
async fn course_envelope_is_exposed_as_courses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses/"))
        .and(query_param("size", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": 1, "title": "Spanish I", "instructor_id": 5},
                {"id": "c2", "title": "Spanish II", "instructor_id": "5"},
            ],
            "total": 2,
        })))
        .mount(&server)
        .await;

    let h = signed_in(&server, 5, "TEACHER");
    let list = h.app.client().get_courses().await.unwrap();

    let ids: Vec<_> = list.courses.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["1", "c2"]);
    assert_eq!(CoursesPage::new(h.app.clone()).load().await.unwrap().len(), 2);
}

#[tokio::test]
async fn concurrent_reads_share_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/decks/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([deck_json("d1", "Animals", 5)]))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = signed_in(&server, 5, "TEACHER");
    let page = DecksPage::new(h.app.clone());

    let (a, b) = join(page.load(), page.load()).await;
    assert_eq!(a.unwrap(), b.unwrap());

    // Served from cache afterwards.
    page.load().await.unwrap();
    assert_eq!(h.app.queries.status(&page.key()), QueryStatus::Success);
}

#[tokio::test]
async fn created_deck_shows_up_on_next_read() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/decks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([deck_json("d1", "Animals", 5)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/decks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            deck_json("d1", "Animals", 5),
            deck_json("d2", "Food", 5),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/decks/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(deck_json("d2", "Food", 5)))
        .expect(1)
        .mount(&server)
        .await;

    let h = signed_in(&server, 5, "TEACHER");
    let page = DecksPage::new(h.app.clone());

    assert_eq!(page.load().await.unwrap().len(), 1);
    let created = page
        .create_deck(new_deck("Food", Some(Difficulty::Medium)))
        .await
        .unwrap();
    assert_eq!(created.id, "d2");

    let titles: Vec<_> = page.load().await.unwrap().into_iter().map(|d| d.title).collect();
    assert_eq!(titles, ["Animals", "Food"]);

    let post = requests(&server)
        .await
        .into_iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("create request");
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["instructor_id"], 5);
    assert_eq!(body["difficulty"], "medium");
}

#[tokio::test]
async fn failed_mutation_keeps_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/decks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([deck_json("d1", "Animals", 5)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/decks/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "title"], "msg": "already exists"}]
        })))
        .mount(&server)
        .await;

    let h = signed_in(&server, 5, "TEACHER");
    let page = DecksPage::new(h.app.clone());
    page.load().await.unwrap();

    let err = page
        .create_deck(new_deck("Animals", Some(Difficulty::Easy)))
        .await
        .unwrap_err();
    assert!(err.user_message().contains("already exists"));
    assert_eq!(h.app.queries.status(&page.key()), QueryStatus::Success);
    page.load().await.unwrap();
}

#[tokio::test]
async fn deleting_a_card_invalidates_deck_and_cards() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/decks/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(deck_json("d1", "Animals", 5)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/decks/d1/flashcards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            flashcard_json("f2", "d1", 2),
            flashcard_json("f1", "d1", 1),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/decks/flashcards/f1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let h = signed_in(&server, 5, "TEACHER");
    let page = DecksPage::new(h.app.clone());
    let detail = DeckDetailPage::new(h.app.clone(), "d1");

    let (deck, cards) = detail.load().await.unwrap();
    assert_eq!(deck.title, "Animals");
    let order: Vec<_> = cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, ["f1", "f2"]);
    h.app.queries.set(page.key(), lms_admin_shared::DeckList::default());

    detail.delete_flashcard("f1").await.unwrap();

    assert_eq!(h.app.queries.status(&detail.deck_key()), QueryStatus::Idle);
    assert_eq!(h.app.queries.status(&detail.flashcards_key()), QueryStatus::Idle);
    assert_eq!(h.app.queries.status(&page.key()), QueryStatus::Idle);
}

#[tokio::test]
async fn new_card_is_appended_after_existing_ones() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/decks/d1/flashcards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            flashcard_json("f1", "d1", 1),
            flashcard_json("f2", "d1", 2),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/decks/d1/flashcards"))
        .respond_with(ResponseTemplate::new(201).set_body_json(flashcard_json("f3", "d1", 3)))
        .expect(1)
        .mount(&server)
        .await;

    let h = signed_in(&server, 1, "ADMIN");
    let detail = DeckDetailPage::new(h.app.clone(), "d1");

    let card = detail
        .create_flashcard(CreateFlashcardRequest {
            front: "gato".into(),
            back: "cat".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(card.id, "f3");

    let post = requests(&server)
        .await
        .into_iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("create request");
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["order"], 3);
    assert_eq!(body["deck_id"], "d1");
}

#[tokio::test]
async fn invalid_card_is_rejected_before_counting_existing_ones() {
    let server = MockServer::start().await;
    let h = signed_in(&server, 1, "ADMIN");
    let detail = DeckDetailPage::new(h.app.clone(), "d1");

    let err = detail
        .create_flashcard(CreateFlashcardRequest {
            front: "  ".into(),
            back: String::new(),
            order: 0,
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Invalid(_)));
    assert!(requests(&server).await.is_empty());
    assert!(h.app.auth.is_authenticated());
}

#[tokio::test]
async fn teacher_sees_own_students_and_only_creates_students() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/my-students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{
                "id": 30,
                "username": "pupil",
                "email": "pupil@example.com",
                "full_name": "A Pupil",
                "role": "STUDENT",
                "is_active": true,
            }],
            "total": 1,
            "page": 1,
            "size": 10,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = signed_in(&server, 5, "TEACHER");
    let page = UsersPage::new(h.app.clone());

    let users = page.load().await.unwrap();
    assert_eq!(users[0].username, "pupil");
    assert_eq!(page.assignable_roles(), vec![Role::Student]);

    let err = page
        .create(CreateUserRequest {
            username: "newteacher".into(),
            email: "t@example.com".into(),
            full_name: "New Teacher".into(),
            password: "secret123".into(),
            role: Role::Teacher,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
    assert_eq!(requests(&server).await.len(), 1);
}

#[tokio::test]
async fn signed_out_deck_list_is_empty_without_network() {
    let server = MockServer::start().await;
    let h = signed_out(&server);

    let decks = DecksPage::new(h.app.clone()).load().await.unwrap();

    assert!(decks.is_empty());
    assert!(requests(&server).await.is_empty());
}

#[tokio::test]
async fn generated_card_is_saved_with_headword_and_word_class() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/ai/generate-single-flashcard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "question": "What does 'explore' mean?",
            "answer": "to travel through an area to learn about it",
            "examples": ["They explored the cave."],
            "explanation": "",
            "tags": [],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/decks/d1/flashcards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/decks/d1/flashcards"))
        .respond_with(ResponseTemplate::new(201).set_body_json(flashcard_json("f1", "d1", 1)))
        .expect(1)
        .mount(&server)
        .await;

    let h = signed_in(&server, 5, "TEACHER");
    let creator = AiFlashcardCreator::new(h.app.clone());

    let card: SingleFlashcardResponse = creator
        .generate(&lms_admin_shared::SingleFlashcardRequest {
            word_or_topic: "explore".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    creator.save_to_deck("d1", &card).await.unwrap();

    let post = requests(&server)
        .await
        .into_iter()
        .find(|r| r.url.path() == "/api/decks/d1/flashcards" && r.method.as_str() == "POST")
        .expect("save request");
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["front"], "explore");
    assert_eq!(body["wordclass"], "verb");
    assert_eq!(body["order"], 1);
    assert_eq!(body["example"], "They explored the cave.");
}
