//! Error types for the response core.
//!
//! Nothing in the core retries. Every failure is returned to the caller, who
//! decides whether to surface it, retry, or discard the submission.

use thiserror::Error;

/// A submission was rejected before anything touched the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The submission did not name a questionnaire.
    #[error("questionnaire id must not be empty")]
    EmptyQuestionnaireId,

    /// The questionnaire supplied for resolution is not the one answered.
    #[error("submission is for questionnaire '{submitted}' but '{supplied}' was supplied")]
    QuestionnaireMismatch { submitted: String, supplied: String },

    /// The chosen option text is not one of the question's options.
    #[error("option '{option}' is not offered by question '{question_id}'")]
    UnknownOption { question_id: String, option: String },
}

/// Reading or writing the persistence medium failed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The medium could not be read.
    #[error("failed to read '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The medium could not be written. Nothing was replaced.
    #[error("failed to write '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The stored value exists but does not decode.
    #[error("stored data under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The collection could not be encoded for writing.
    #[error("failed to encode responses: {0}")]
    Encode(#[source] serde_json::Error),

    /// The write would exceed the medium's byte quota.
    #[error("quota exceeded for '{key}': {size} bytes > {limit} bytes")]
    QuotaExceeded { key: String, size: u64, limit: u64 },
}

/// Any failure surfaced by the response service.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl QuizError {
    /// Returns `true` if the submission was malformed rather than lost.
    pub fn is_validation(&self) -> bool {
        matches!(self, QuizError::Validation(_))
    }
}
