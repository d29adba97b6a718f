//! The append-only response collection.
//!
//! All responses live in one JSON array under [`RESPONSES_KEY`], newest
//! first. Appending reads the whole array, prepends, and writes it back as a
//! single replace.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::medium::KeyValueMedium;
use crate::model::ResponseRecord;

/// Key under which the response collection is persisted.
pub const RESPONSES_KEY: &str = "questionnaire_responses";

/// Newest-first collection of response records on top of a medium.
///
/// Appends from this value are serialized. Two stores (or two processes)
/// sharing one medium are not coordinated: the last writer wins.
pub struct ResponseStore {
    medium: Arc<dyn KeyValueMedium>,
    key: String,
    append_lock: Mutex<()>,
}

impl ResponseStore {
    pub fn new(medium: Arc<dyn KeyValueMedium>) -> Self {
        Self::with_key(medium, RESPONSES_KEY)
    }

    /// Store the collection under a key other than [`RESPONSES_KEY`].
    pub fn with_key(medium: Arc<dyn KeyValueMedium>, key: impl Into<String>) -> Self {
        Self {
            medium,
            key: key.into(),
            append_lock: Mutex::new(()),
        }
    }

    /// Every stored record, newest first. Empty if nothing was ever stored.
    pub async fn get_all(&self) -> Result<Vec<ResponseRecord>, StorageError> {
        let Some(raw) = self.medium.read(&self.key).await? else {
            return Ok(Vec::new());
        };

        let records: Vec<ResponseRecord> =
            serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                key: self.key.clone(),
                source,
            })?;
        tracing::debug!(
            "read {} responses from {} medium",
            records.len(),
            self.medium.name()
        );
        Ok(records)
    }

    /// Put `record` at the front of the collection.
    ///
    /// On error nothing was written and the collection is unchanged.
    pub async fn append(&self, record: ResponseRecord) -> Result<(), StorageError> {
        let _guard = self.append_lock.lock().await;

        let mut records = self.get_all().await?;
        let id = record.id;
        records.insert(0, record);

        let encoded = serde_json::to_string(&records).map_err(StorageError::Encode)?;
        self.medium.write(&self.key, encoded).await?;

        tracing::info!("recorded response {id} ({} stored)", records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medium::{FileMedium, MemoryMedium};
    use crate::model::AnswerRecord;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn record(questionnaire_id: &str, seconds: i64) -> ResponseRecord {
        ResponseRecord {
            id: Uuid::new_v4(),
            questionnaire_id: questionnaire_id.into(),
            questionnaire_title: String::new(),
            submitter_id: "u1".into(),
            submitter_name: "Ada".into(),
            answers: vec![AnswerRecord {
                question_id: "q1".into(),
                question_text: String::new(),
                selected_option: "A".into(),
                selected_option_index: 0,
                is_correct: None,
            }],
            submitted_at: DateTime::<Utc>::from_timestamp(seconds, 0).unwrap(),
            score: Some(1),
            total_questions: Some(1),
        }
    }

    #[tokio::test]
    async fn empty_store_reads_empty() {
        let store = ResponseStore::new(Arc::new(MemoryMedium::new()));
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_puts_newest_first() {
        let store = ResponseStore::new(Arc::new(MemoryMedium::new()));
        let first = record("geo", 1);
        let second = record("geo", 2);

        store.append(first.clone()).await.unwrap();
        store.append(second.clone()).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all, vec![second, first]);
    }

    #[tokio::test]
    async fn corrupt_data_is_an_error_not_empty() {
        let medium = Arc::new(MemoryMedium::new());
        medium.insert_raw(RESPONSES_KEY, "{not json");
        let store = ResponseStore::new(medium);

        let err = store.get_all().await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));

        // Appending must not paper over the corrupt value either.
        let err = store.append(record("geo", 1)).await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn failed_append_leaves_collection_unchanged() {
        let kept = record("geo", 1);
        let one_record = serde_json::to_string(&vec![kept.clone()]).unwrap().len() as u64;
        let medium = Arc::new(MemoryMedium::new().with_quota(one_record + 16));
        let store = ResponseStore::new(medium);

        store.append(kept.clone()).await.unwrap();

        let err = store.append(record("geo", 2)).await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(store.get_all().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn file_backed_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let r = record("geo", 1);

        let store = ResponseStore::new(Arc::new(FileMedium::new(dir.path())));
        store.append(r.clone()).await.unwrap();
        drop(store);

        let reopened = ResponseStore::new(Arc::new(FileMedium::new(dir.path())));
        assert_eq!(reopened.get_all().await.unwrap(), vec![r]);
    }

    #[tokio::test]
    async fn concurrent_appends_from_one_store_are_all_kept() {
        let store = Arc::new(ResponseStore::new(Arc::new(MemoryMedium::new())));
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.append(record("geo", i)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.get_all().await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn custom_key_is_isolated() {
        let medium: Arc<dyn KeyValueMedium> = Arc::new(MemoryMedium::new());
        let a = ResponseStore::new(Arc::clone(&medium));
        let b = ResponseStore::with_key(Arc::clone(&medium), "archive");
        a.append(record("geo", 1)).await.unwrap();

        assert!(b.get_all().await.unwrap().is_empty());
        assert!(medium.read("archive").await.unwrap().is_none());
        assert_eq!(a.get_all().await.unwrap().len(), 1);
    }
}
