//! At-most-one-in-flight registry
//!
//! Requests are keyed by (operation, id). A second request with a key that
//! is still outstanding is rejected instead of being sent twice, which is
//! what happens when a user double-taps "scan".

use dashmap::DashSet;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::error::{StyleError, StyleResult};

/// Network operations that can be guarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Submit,
    ListHistory,
    GetDetail,
    DeleteHistory,
    News,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::ListHistory => "list_history",
            Self::GetDetail => "get_detail",
            Self::DeleteHistory => "delete_history",
            Self::News => "news",
        }
    }
}

/// Identity of an outstanding request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RequestKey {
    pub operation: Operation,
    /// User id, or the search query for news
    pub id: String,
    /// Prediction key for per-item operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

impl RequestKey {
    pub fn new(operation: Operation, id: impl Into<String>) -> Self {
        Self {
            operation,
            id: id.into(),
            item: None,
        }
    }

    /// Key for an operation on one stored prediction
    pub fn for_item(operation: Operation, user_id: &str, prediction_key: &str) -> Self {
        Self {
            item: Some(prediction_key.to_string()),
            ..Self::new(operation, user_id)
        }
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operation.as_str(), self.id)?;
        if let Some(item) = &self.item {
            write!(f, "/{}", item)?;
        }
        Ok(())
    }
}

/// Shared set of outstanding request keys
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    keys: Arc<DashSet<RequestKey>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, failing with `AlreadyInFlight` if it is outstanding
    pub fn try_acquire(&self, key: RequestKey) -> StyleResult<InFlightGuard> {
        if !self.keys.insert(key.clone()) {
            tracing::debug!(%key, "rejecting duplicate request");
            return Err(StyleError::AlreadyInFlight(key));
        }
        Ok(InFlightGuard {
            key,
            keys: Arc::clone(&self.keys),
        })
    }

    pub fn is_in_flight(&self, key: &RequestKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Releases its key when dropped
#[derive(Debug)]
pub struct InFlightGuard {
    key: RequestKey,
    keys: Arc<DashSet<RequestKey>>,
}

impl InFlightGuard {
    pub fn key(&self) -> &RequestKey {
        &self.key
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.keys.remove(&self.key);
    }
}
