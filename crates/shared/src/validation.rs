//! Required-field checks run before a payload leaves the client.

use serde::{Deserialize, Serialize};

use crate::models::*;

/// Minimum password length accepted by the auth service.
pub const MIN_PASSWORD_LEN: usize = 6;
/// Upper bound the AI service accepts for one generation run.
pub const MAX_GENERATED_CARDS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn messages(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect()
    }

    fn require(&mut self, field: &str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.push(FieldError::new(field, format!("{label} is required")));
        }
    }

    fn require_some<T>(&mut self, field: &str, value: &Option<T>, label: &str) {
        if value.is_none() {
            self.push(FieldError::new(field, format!("{label} is required")));
        }
    }

    fn not_blank_if_set(&mut self, field: &str, value: &Option<String>, label: &str) {
        if let Some(v) = value {
            self.require(field, v, label);
        }
    }

    fn email(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(FieldError::new(field, "Email is required"));
        } else if !value.contains('@') {
            self.push(FieldError::new(field, "Email is invalid"));
        }
    }

    fn password(&mut self, field: &str, value: &str) {
        if value.chars().count() < MIN_PASSWORD_LEN {
            self.push(FieldError::new(
                field,
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.messages().join(", "))
    }
}

/// Implemented by every payload with client-side rules.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("username", &self.username, "Username");
        errors.require("password", &self.password, "Password");
        errors.into_result()
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("username", &self.username, "Username");
        errors.email("email", &self.email);
        errors.require("full_name", &self.full_name, "Full name");
        errors.password("password", &self.password);
        errors.into_result()
    }
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("username", &self.username, "Username");
        errors.email("email", &self.email);
        errors.require("full_name", &self.full_name, "Full name");
        errors.password("password", &self.password);
        errors.into_result()
    }
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.not_blank_if_set("username", &self.username, "Username");
        if let Some(email) = &self.email {
            errors.email("email", email);
        }
        errors.not_blank_if_set("full_name", &self.full_name, "Full name");
        if let Some(password) = &self.password {
            errors.password("password", password);
        }
        errors.into_result()
    }
}

impl Validate for CreateCourseRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("title", &self.title, "Course title");
        errors.require("instructor_id", &self.instructor_id, "Instructor");
        errors.into_result()
    }
}

impl Validate for UpdateCourseRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.not_blank_if_set("title", &self.title, "Course title");
        errors.into_result()
    }
}

impl Validate for CreateLessonRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("course_id", &self.course_id, "Course");
        errors.require("title", &self.title, "Lesson title");
        errors.into_result()
    }
}

impl Validate for UpdateLessonRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.not_blank_if_set("title", &self.title, "Lesson title");
        errors.into_result()
    }
}

impl Validate for CreateDeckRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("title", &self.title, "Deck title");
        errors.require_some("difficulty", &self.difficulty, "Difficulty");
        errors.into_result()
    }
}

impl Validate for UpdateDeckRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.not_blank_if_set("title", &self.title, "Deck title");
        errors.into_result()
    }
}

impl Validate for CreateFlashcardRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("deck_id", &self.deck_id, "Deck");
        errors.require("front", &self.front, "Front text");
        errors.require("back", &self.back, "Back text");
        if self.order == 0 {
            errors.push(FieldError::new("order", "Order must be at least 1"));
        }
        errors.into_result()
    }
}

impl Validate for UpdateFlashcardRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.not_blank_if_set("front", &self.front, "Front text");
        errors.not_blank_if_set("back", &self.back, "Back text");
        if self.order == Some(0) {
            errors.push(FieldError::new("order", "Order must be at least 1"));
        }
        errors.into_result()
    }
}

impl Validate for CreateAssignmentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.student_id <= 0 {
            errors.push(FieldError::new("student_id", "Student is required"));
        }
        errors.require("content_id", &self.content_id, "Content");
        errors.require("title", &self.title, "Assignment title");
        if self.content_type == ContentType::Deck && !self.supporting_decks.is_empty() {
            errors.push(FieldError::new(
                "supporting_decks",
                "Supporting decks only apply to course assignments",
            ));
        }
        errors.into_result()
    }
}

impl Validate for UpdateAssignmentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.not_blank_if_set("title", &self.title, "Assignment title");
        errors.into_result()
    }
}

impl Validate for SingleFlashcardRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("word_or_topic", &self.word_or_topic, "Word or topic");
        errors.into_result()
    }
}

impl Validate for FlashcardGenerationRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("topic", &self.topic, "Topic");
        errors.require("deck_name", &self.deck_name, "Deck name");
        if self.quantity == 0 || self.quantity > MAX_GENERATED_CARDS {
            errors.push(FieldError::new(
                "quantity",
                format!("Quantity must be between 1 and {MAX_GENERATED_CARDS}"),
            ));
        }
        errors.into_result()
    }
}
