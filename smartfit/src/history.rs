//! In-memory history list for one user
//!
//! Every screen re-fetches; nothing here is persisted. Deletion is
//! pessimistic: the entry leaves the list only after the server confirms.

use serde::Serialize;

use crate::backends::HistoryBackend;
use crate::error::StyleResult;
use crate::types::PredictionHistoryEntry;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryList {
    user_id: String,
    entries: Vec<PredictionHistoryEntry>,
}

impl HistoryList {
    pub fn new(user_id: impl Into<String>, entries: Vec<PredictionHistoryEntry>) -> Self {
        Self {
            user_id: user_id.into(),
            entries,
        }
    }

    /// Fetch the user's history, degrading to an empty list on failure
    pub async fn fetch(backend: &dyn HistoryBackend, user_id: &str) -> Self {
        Self::from_outcome(user_id, backend.list_history(user_id).await)
    }

    /// Build from a list call made elsewhere; a failure shows as empty
    pub fn from_outcome(
        user_id: &str,
        outcome: StyleResult<Vec<PredictionHistoryEntry>>,
    ) -> Self {
        match outcome {
            Ok(entries) => {
                tracing::debug!(user_id, count = entries.len(), "history loaded");
                Self::new(user_id, entries)
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "failed to fetch history, showing empty state");
                Self::new(user_id, Vec::new())
            }
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Most-recent-first
    pub fn entries(&self) -> &[PredictionHistoryEntry] {
        &self.entries
    }

    pub fn get(&self, prediction_key: &str) -> Option<&PredictionHistoryEntry> {
        self.entries
            .iter()
            .find(|e| e.prediction_key == prediction_key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Delete on the server, then drop the entry locally
    ///
    /// On failure the list is left exactly as it was.
    pub async fn delete(
        &mut self,
        backend: &dyn HistoryBackend,
        prediction_key: &str,
    ) -> StyleResult<()> {
        let outcome = backend.delete_history(&self.user_id, prediction_key).await;
        self.apply_deletion(prediction_key, outcome)
    }

    /// Drop the entry only if the server confirmed the deletion
    pub fn apply_deletion(&mut self, prediction_key: &str, outcome: StyleResult<()>) -> StyleResult<()> {
        outcome?;
        self.entries.retain(|e| e.prediction_key != prediction_key);
        tracing::info!(user_id = %self.user_id, prediction_key, "history entry deleted");
        Ok(())
    }
}
