//! Core data model types for quiztally.
//!
//! Questionnaires are read-only definitions owned by whoever authors them.
//! Response records are created once at submission and never change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ordered set of questions being answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Questionnaire {
    /// Unique identifier for this questionnaire.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// The questions, in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Questionnaire {
    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Number of questions that carry a correct answer.
    pub fn scored_question_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.answer_key.index().is_some())
            .count()
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    /// Option texts, in presentation order.
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub answer_key: AnswerKey,
}

impl Question {
    /// Position of an option text within this question's options.
    pub fn option_index(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|o| o == option)
    }
}

/// Whether a question can be marked right or wrong.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnswerKey {
    /// No correct answer; answers are collected but never count as correct.
    #[default]
    Unscored,
    /// The option at `index` is the correct one.
    Correct { index: usize },
}

impl AnswerKey {
    pub fn index(&self) -> Option<usize> {
        match self {
            AnswerKey::Unscored => None,
            AnswerKey::Correct { index } => Some(*index),
        }
    }
}

impl From<Option<usize>> for AnswerKey {
    fn from(index: Option<usize>) -> Self {
        match index {
            Some(index) => AnswerKey::Correct { index },
            None => AnswerKey::Unscored,
        }
    }
}

/// Who submitted a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    pub id: String,
    pub name: String,
}

/// One participant's submission to a questionnaire.
///
/// This is also the persisted shape: field names are camelCase and optional
/// fields are omitted when absent, so adding or removing a field breaks
/// existing stored data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub id: Uuid,
    pub questionnaire_id: String,
    /// Title at submission time.
    #[serde(default)]
    pub questionnaire_title: String,
    #[serde(default)]
    pub submitter_id: String,
    #[serde(default)]
    pub submitter_name: String,
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
    pub submitted_at: DateTime<Utc>,
    /// Number of correct answers, when the record has been scored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// Question count of the questionnaire at scoring time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<u32>,
}

impl ResponseRecord {
    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}

/// One participant's choice for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: String,
    /// Empty when the question was not resolved.
    #[serde(default)]
    pub question_text: String,
    pub selected_option: String,
    #[serde(default)]
    pub selected_option_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}
