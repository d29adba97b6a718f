//! quiztally-core — Response recording, scoring, and aggregation.
//!
//! This crate defines the questionnaire and response data model, the
//! append-only response store, and the scoring and statistics logic that the
//! quiztally front end builds on.

pub mod config;
pub mod error;
pub mod medium;
pub mod model;
pub mod parser;
pub mod recorder;
pub mod scorer;
pub mod service;
pub mod statistics;
pub mod store;

pub use config::{load_config_from, QuiztallyConfig};
pub use error::{QuizError, StorageError, ValidationError};
pub use medium::{FileMedium, KeyValueMedium, MemoryMedium};
pub use model::{AnswerKey, AnswerRecord, Question, Questionnaire, ResponseRecord, Submitter};
pub use recorder::Submission;
pub use service::QuizService;
pub use statistics::{QuestionStat, ResponseStats};
