//! Best-effort word-class guess for AI-generated vocabulary cards.
//!
//! This is a heuristic, not a tagger. When nothing matches the result is
//! [`DEFAULT_WORDCLASS`]. Checks run in order:
//! 1. a generated tag that mentions a known class is used verbatim;
//! 2. cue words in the answer and explanation;
//! 3. the word itself and the shape of its definition;
//! 4. the default.

use lms_admin_shared::{CreateFlashcardRequest, SingleFlashcardResponse};
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_WORDCLASS: &str = "noun";

pub const MAX_WORDCLASS_LEN: usize = 50;
pub const MAX_FRONT_LEN: usize = 1000;
pub const MAX_BACK_LEN: usize = 2000;
pub const MAX_DEFINITION_LEN: usize = 2000;
pub const MAX_EXAMPLE_LEN: usize = 1000;

const WORD_CLASSES: [&str; 8] = [
    "noun",
    "verb",
    "adjective",
    "adverb",
    "preposition",
    "conjunction",
    "pronoun",
    "interjection",
];

const VERB_CUES: [&str; 12] = [
    "action",
    "process",
    "activity",
    "act of",
    "to do",
    "to make",
    "to be",
    "to have",
    "to go",
    "to travel",
    "to investigate",
    "to search",
];

const ADJECTIVE_CUES: [&str; 4] = ["adjective", "describing", "quality", "characteristic"];

const NOUN_CUES: [&str; 6] = ["noun", "person", "place", "thing", "object", "concept"];

const KNOWN_VERBS: [&str; 8] = [
    "explore",
    "create",
    "develop",
    "analyze",
    "investigate",
    "travel",
    "study",
    "learn",
];

const KNOWN_ADJECTIVES: [&str; 6] = ["beautiful", "important", "difficult", "easy", "large", "small"];

static QUOTED_MEANING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)what does ['"]([^'"]+)['"] mean\?"#).expect("static regex"));
static BARE_MEANING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)what does ([a-zA-Z]+) mean\?").expect("static regex"));
static ANY_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).expect("static regex"));

/// Pull the headword out of "What does 'x' mean?"-style questions. Falls back
/// to any quoted text, then to the whole question.
pub fn extract_word_from_question(question: &str) -> String {
    [&*QUOTED_MEANING, &*BARE_MEANING, &*ANY_QUOTED]
        .iter()
        .find_map(|re| re.captures(question))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| question.to_string())
}

fn from_tags(tags: &[String]) -> Option<String> {
    tags.iter()
        .find(|tag| {
            let lower = tag.to_lowercase();
            WORD_CLASSES.iter().any(|wc| lower.contains(wc))
        })
        .filter(|tag| !tag.trim().is_empty())
        .cloned()
}

fn from_text_cues(answer: &str, explanation: &str) -> Option<&'static str> {
    if answer.trim().is_empty() {
        return None;
    }
    let answer = answer.to_lowercase();
    let text = format!("{} {}", answer, explanation.to_lowercase());

    let verb = text.contains("to ")
        && (VERB_CUES.iter().any(|cue| text.contains(cue)) || answer.starts_with("to "));
    if verb {
        Some("verb")
    } else if ADJECTIVE_CUES.iter().any(|cue| text.contains(cue)) {
        Some("adjective")
    } else if NOUN_CUES.iter().any(|cue| text.contains(cue)) {
        Some("noun")
    } else {
        None
    }
}

fn from_word_shape(word: &str, definition: &str) -> Option<&'static str> {
    let word = word.trim().to_lowercase();
    let definition = definition.to_lowercase();

    if definition.starts_with("to ")
        || definition.contains("the act of")
        || definition.contains("the process of")
        || KNOWN_VERBS.contains(&word.as_str())
    {
        Some("verb")
    } else if definition.contains("having")
        || definition.contains("characterized by")
        || KNOWN_ADJECTIVES.contains(&word.as_str())
    {
        Some("adjective")
    } else {
        None
    }
}

/// Guess the class of `word` from a generated card.
pub fn classify(word: &str, card: &SingleFlashcardResponse) -> String {
    let class = from_tags(&card.tags)
        .or_else(|| from_text_cues(&card.answer, &card.explanation).map(str::to_string))
        .or_else(|| from_word_shape(word, &card.answer).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_WORDCLASS.to_string());
    truncate(&class, MAX_WORDCLASS_LEN)
}

/// First `max` characters of `s`.
pub fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Turn a generated card into a create payload for `deck_id`, clipped to the
/// content service's column limits. `order` is raised to at least 1.
pub fn flashcard_from_generated(
    deck_id: &str,
    card: &SingleFlashcardResponse,
    order: u32,
) -> CreateFlashcardRequest {
    let front = truncate(&extract_word_from_question(&card.question), MAX_FRONT_LEN);
    let wordclass = classify(&front, card);

    CreateFlashcardRequest {
        deck_id: deck_id.to_string(),
        back: truncate(&card.answer, MAX_BACK_LEN),
        order: order.max(1),
        definition: non_blank(truncate(&card.explanation, MAX_DEFINITION_LEN)),
        example: non_blank(truncate(&card.examples.join("; "), MAX_EXAMPLE_LEN)),
        wordclass: Some(wordclass),
        front,
        ..Default::default()
    }
}
