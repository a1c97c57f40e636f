//! Domain model: [`Question`] records and the [`QuestionSet`] aggregate.
//!
//! A `QuestionSet` is an aggregate root that owns its questions by value —
//! the set is the arena, and membership in [`QuestionSet::questions`] *is*
//! the back-reference. A question cannot dangle or belong to two sets
//! because it cannot exist outside a set's `Vec` at all; `add_question`
//! moves one in, `remove_question` moves one out. Deleting the set drops
//! every question with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of the question prompt, in characters.
pub const MAX_TEXT_LEN: usize = 1_000;
/// Maximum length of the answer field. Generous on purpose: models embed
/// multi-line working into the answer line and we keep it verbatim.
pub const MAX_ANSWER_LEN: usize = 65_535;
/// Maximum length of the explanation field, in characters.
pub const MAX_EXPLANATION_LEN: usize = 2_000;

/// How a question should be presented and answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    /// Two or more enumerable options, one of which is correct.
    #[default]
    MultipleChoice,
    /// Free-form general-knowledge question with no option list.
    General,
}

/// One extracted question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// The question prompt.
    pub text: String,
    /// Multiple-choice or general.
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// Ordered options; empty when `kind` is [`QuestionType::General`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// The correct answer, verbatim as stated by the model (an option
    /// letter, the full option text, or both).
    pub answer: String,
    /// Free-text rationale; empty when the model gave none.
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    /// A general question with no options.
    pub fn general(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: QuestionType::General,
            options: Vec::new(),
            answer: String::new(),
            explanation: String::new(),
        }
    }

    /// A multiple-choice question with the given options.
    pub fn multiple_choice(text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            kind: QuestionType::MultipleChoice,
            options,
            answer: String::new(),
            explanation: String::new(),
        }
    }
}

/// One extraction session's result: a named, timestamped, ordered set of
/// questions.
///
/// Insertion order equals extraction order and defines document rendering
/// order. The set is read-only after assembly except for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSet {
    /// Store-assigned identifier; `0` until the set has been persisted.
    #[serde(default)]
    pub id: u64,
    /// Human-readable label, derived from the source filename or a fixed
    /// literal for pasted images.
    pub title: String,
    /// Set once at assembly time, immutable afterwards.
    pub created_at: DateTime<Utc>,
    /// Owned questions, in extraction order.
    pub questions: Vec<Question>,
}

impl QuestionSet {
    /// Create an empty, unpersisted set stamped with the current time.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            created_at: Utc::now(),
            questions: Vec::new(),
        }
    }

    /// Take ownership of a question, appending it in order.
    pub fn add_question(&mut self, question: Question) {
        self.questions.push(question);
    }

    /// Detach and return the question at `index`, or `None` if out of range.
    ///
    /// The returned question no longer belongs to any set.
    pub fn remove_question(&mut self, index: usize) -> Option<Question> {
        if index < self.questions.len() {
            Some(self.questions.remove(index))
        } else {
            None
        }
    }

    /// Number of questions in the set.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the set holds no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Truncate `s` to at most `max` characters, respecting char boundaries.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}
