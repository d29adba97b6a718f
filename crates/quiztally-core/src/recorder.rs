//! Turning submissions into stored response records.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{QuizError, ValidationError};
use crate::model::{AnswerRecord, Questionnaire, ResponseRecord, Submitter};
use crate::scorer::score_record;
use crate::store::ResponseStore;

/// A participant's answers as handed over by the presentation layer.
#[derive(Debug, Clone)]
pub struct Submission {
    pub questionnaire_id: String,
    /// Title snapshot; filled from the questionnaire when left empty.
    pub questionnaire_title: String,
    pub submitter: Submitter,
    /// Question id to chosen option text. May be partial.
    pub answers: BTreeMap<String, String>,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(
        questionnaire_id: impl Into<String>,
        answers: BTreeMap<String, String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            questionnaire_id: questionnaire_id.into(),
            questionnaire_title: String::new(),
            submitter: Submitter::default(),
            answers,
            submitted_at,
        }
    }

    pub fn with_submitter(mut self, submitter: Submitter) -> Self {
        self.submitter = submitter;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.questionnaire_title = title.into();
        self
    }
}

fn unresolved(question_id: &str, option: &str) -> AnswerRecord {
    AnswerRecord {
        question_id: question_id.to_string(),
        question_text: String::new(),
        selected_option: option.to_string(),
        selected_option_index: 0,
        is_correct: None,
    }
}

/// Validate and normalize a submission into a record with the given id.
///
/// Without a questionnaire the answers stay unresolved and unscored. With one,
/// answers follow the questionnaire's question order (answers to unknown
/// questions last) and the record is scored.
pub fn build_record(
    submission: &Submission,
    questionnaire: Option<&Questionnaire>,
    id: Uuid,
) -> Result<ResponseRecord, ValidationError> {
    if submission.questionnaire_id.trim().is_empty() {
        return Err(ValidationError::EmptyQuestionnaireId);
    }

    let Some(questionnaire) = questionnaire else {
        return Ok(ResponseRecord {
            id,
            questionnaire_id: submission.questionnaire_id.clone(),
            questionnaire_title: submission.questionnaire_title.clone(),
            submitter_id: submission.submitter.id.clone(),
            submitter_name: submission.submitter.name.clone(),
            answers: submission
                .answers
                .iter()
                .map(|(q, o)| unresolved(q, o))
                .collect(),
            submitted_at: submission.submitted_at,
            score: None,
            total_questions: None,
        });
    };

    if submission.questionnaire_id != questionnaire.id {
        return Err(ValidationError::QuestionnaireMismatch {
            submitted: submission.questionnaire_id.clone(),
            supplied: questionnaire.id.clone(),
        });
    }

    let mut answers = Vec::with_capacity(submission.answers.len());
    for question in &questionnaire.questions {
        let Some(option) = submission.answers.get(&question.id) else {
            continue;
        };
        if question.option_index(option).is_none() {
            return Err(ValidationError::UnknownOption {
                question_id: question.id.clone(),
                option: option.clone(),
            });
        }
        answers.push(unresolved(&question.id, option));
    }
    answers.extend(
        submission
            .answers
            .iter()
            .filter(|(q, _)| questionnaire.question(q).is_none())
            .map(|(q, o)| unresolved(q, o)),
    );

    let title = if submission.questionnaire_title.is_empty() {
        questionnaire.title.clone()
    } else {
        submission.questionnaire_title.clone()
    };

    let record = ResponseRecord {
        id,
        questionnaire_id: submission.questionnaire_id.clone(),
        questionnaire_title: title,
        submitter_id: submission.submitter.id.clone(),
        submitter_name: submission.submitter.name.clone(),
        answers,
        submitted_at: submission.submitted_at,
        score: None,
        total_questions: None,
    };
    score_record(&record, questionnaire)
}

/// Records submissions into a response store.
#[derive(Clone)]
pub struct ResponseRecorder {
    store: Arc<ResponseStore>,
}

impl ResponseRecorder {
    pub fn new(store: Arc<ResponseStore>) -> Self {
        Self { store }
    }

    /// Build a record for `submission`, append it, and return it.
    ///
    /// The caller never chooses the id; each record gets a fresh random UUID.
    /// Exactly one append is attempted and failures are not retried.
    pub async fn submit(
        &self,
        submission: &Submission,
        questionnaire: Option<&Questionnaire>,
    ) -> Result<ResponseRecord, QuizError> {
        let record = build_record(submission, questionnaire, Uuid::new_v4())?;
        tracing::debug!(
            "submitting {} answers for questionnaire {} (scored: {})",
            record.answers.len(),
            record.questionnaire_id,
            record.is_scored()
        );
        self.store.append(record.clone()).await?;
        Ok(record)
    }
}
