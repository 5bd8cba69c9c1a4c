//! Prediction backend abstraction
//!
//! Screens and flows talk to these traits, never to reqwest directly. The
//! HTTP implementation lives in [`http`]; tests plug in in-memory fakes.

use async_trait::async_trait;

use crate::error::StyleResult;
use crate::request::MultipartPayload;
use crate::types::{PredictionHistoryEntry, StyleRecommendationResult};

pub mod http;

pub use http::StyleClient;

/// Submits scans for prediction
#[async_trait]
pub trait StyleBackend: Send + Sync {
    /// Get the name of this backend
    fn name(&self) -> &str;

    /// Single attempt, no retry
    async fn submit(&self, payload: MultipartPayload) -> StyleResult<StyleRecommendationResult>;
}

/// Reads and deletes stored predictions
#[async_trait]
pub trait HistoryBackend: Send + Sync {
    /// Most-recent-first
    async fn list_history(&self, user_id: &str) -> StyleResult<Vec<PredictionHistoryEntry>>;

    async fn get_detail(
        &self,
        user_id: &str,
        prediction_key: &str,
    ) -> StyleResult<PredictionHistoryEntry>;

    async fn delete_history(&self, user_id: &str, prediction_key: &str) -> StyleResult<()>;
}
