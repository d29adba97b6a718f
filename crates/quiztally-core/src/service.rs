//! The interface the presentation layer talks to.
//!
//! A [`QuizService`] owns one response store and exposes submission, listing,
//! and statistics. There is no global instance; construct one per medium.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{QuizError, StorageError};
use crate::medium::KeyValueMedium;
use crate::model::{Questionnaire, ResponseRecord};
use crate::recorder::{ResponseRecorder, Submission};
use crate::statistics::{compute_response_stats, compute_scored_response_stats, ResponseStats};
use crate::store::ResponseStore;

/// Response submission, listing, and analytics over one store.
#[derive(Clone)]
pub struct QuizService {
    store: Arc<ResponseStore>,
    recorder: ResponseRecorder,
}

impl QuizService {
    pub fn new(medium: Arc<dyn KeyValueMedium>) -> Self {
        Self::with_store(Arc::new(ResponseStore::new(medium)))
    }

    pub fn with_store(store: Arc<ResponseStore>) -> Self {
        let recorder = ResponseRecorder::new(Arc::clone(&store));
        Self { store, recorder }
    }

    /// Record an anonymous, unscored response.
    pub async fn submit_response(
        &self,
        questionnaire_id: &str,
        answers: BTreeMap<String, String>,
        submitted_at: DateTime<Utc>,
    ) -> Result<ResponseRecord, QuizError> {
        let submission = Submission::new(questionnaire_id, answers, submitted_at);
        self.recorder.submit(&submission, None).await
    }

    /// Record a response, resolving and scoring it when `questionnaire` is given.
    pub async fn submit(
        &self,
        submission: &Submission,
        questionnaire: Option<&Questionnaire>,
    ) -> Result<ResponseRecord, QuizError> {
        self.recorder.submit(submission, questionnaire).await
    }

    /// Every response, newest first.
    pub async fn get_all_responses(&self) -> Result<Vec<ResponseRecord>, StorageError> {
        self.store.get_all().await
    }

    /// Responses to one questionnaire, in the same order as
    /// [`get_all_responses`](Self::get_all_responses).
    pub async fn get_responses_by_questionnaire(
        &self,
        questionnaire_id: &str,
    ) -> Result<Vec<ResponseRecord>, StorageError> {
        let mut records = self.store.get_all().await?;
        records.retain(|r| r.questionnaire_id == questionnaire_id);
        Ok(records)
    }

    /// Statistics from the scores stored with each response.
    pub async fn get_response_stats(
        &self,
        questionnaire_id: &str,
    ) -> Result<ResponseStats, StorageError> {
        let records = self.store.get_all().await?;
        Ok(compute_response_stats(questionnaire_id, &records))
    }

    /// Statistics with unscored responses scored against `questionnaire`.
    pub async fn get_scored_response_stats(
        &self,
        questionnaire: &Questionnaire,
    ) -> Result<ResponseStats, StorageError> {
        let records = self.store.get_all().await?;
        Ok(compute_scored_response_stats(questionnaire, &records))
    }
}
