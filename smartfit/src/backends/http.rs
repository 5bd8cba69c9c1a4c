//! HTTP backend
//!
//! Implements [`StyleBackend`] and [`HistoryBackend`] against the prediction
//! service. One `StyleClient` is built by the composition root and shared;
//! reqwest pools connections internally.
//!
//! Routes (relative to the configured base URL):
//! - `POST style_recommendation` (multipart: image, uid, clothing_type)
//! - `GET  get_prediction_history_list?uid=`
//! - `POST get_prediction_history_detail` (multipart: uid, prediction_key)
//! - `POST delete_prediction_history` (multipart: uid, prediction_key)

use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

use super::{HistoryBackend, StyleBackend};
use crate::config::BackendConfig;
use crate::error::{StyleError, StyleResult};
use crate::mapper;
use crate::request::MultipartPayload;
use crate::types::{PredictionHistoryEntry, StyleRecommendationResult};

const STYLE_RECOMMENDATION: &str = "style_recommendation";
const HISTORY_LIST: &str = "get_prediction_history_list";
const HISTORY_DETAIL: &str = "get_prediction_history_detail";
const HISTORY_DELETE: &str = "delete_prediction_history";

/// reqwest-backed prediction service client
#[derive(Debug, Clone)]
pub struct StyleClient {
    client: Client,
    base_url: Url,
    deadline: Duration,
}

impl StyleClient {
    /// Build a client from backend configuration
    pub fn new(config: &BackendConfig) -> StyleResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url,
            deadline: config.request_deadline(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> StyleResult<Url> {
        self.base_url
            .join(path)
            .map_err(|source| StyleError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                source,
            })
    }

    fn item_form(user_id: &str, prediction_key: &str) -> Form {
        Form::new()
            .text("uid", user_id.to_string())
            .text("prediction_key", prediction_key.to_string())
    }
}

/// Parse a base URL, forcing a trailing slash so relative joins append
pub(crate) fn parse_base_url(raw: &str) -> StyleResult<Url> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Url::parse(&normalized).map_err(|source| StyleError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Send a request and classify the outcome
///
/// Returns the body of a 2xx response. Non-2xx becomes `ServerRejected`
/// with the raw body (empty if it could not be read); anything that kept a
/// response from arriving is a `Transport` failure. Transport errors never
/// carry the request URL, which may hold credentials in its query.
pub(crate) async fn execute(request: RequestBuilder, deadline: Duration) -> StyleResult<String> {
    let response = request
        .timeout(deadline)
        .send()
        .await
        .map_err(reqwest::Error::without_url)?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), body = %body, "request rejected by server");
        return Err(StyleError::ServerRejected {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await.map_err(reqwest::Error::without_url)?;
    debug!(status = status.as_u16(), bytes = body.len(), "response received");
    Ok(body)
}

#[async_trait]
impl StyleBackend for StyleClient {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, payload), fields(uid = %payload.uid(), clothing_type = %payload.clothing_type()))]
    async fn submit(&self, payload: MultipartPayload) -> StyleResult<StyleRecommendationResult> {
        let url = self.endpoint(STYLE_RECOMMENDATION)?;
        debug!(%url, "submitting scan");

        let form = payload.into_form()?;
        let body = execute(self.client.post(url).multipart(form), self.deadline).await?;
        mapper::decode(&body)
    }
}

#[async_trait]
impl HistoryBackend for StyleClient {
    #[instrument(skip(self))]
    async fn list_history(&self, user_id: &str) -> StyleResult<Vec<PredictionHistoryEntry>> {
        let url = self.endpoint(HISTORY_LIST)?;
        let request = self.client.get(url).query(&[("uid", user_id)]);
        let body = execute(request, self.deadline).await?;
        mapper::decode_history_list(&body)
    }

    #[instrument(skip(self))]
    async fn get_detail(
        &self,
        user_id: &str,
        prediction_key: &str,
    ) -> StyleResult<PredictionHistoryEntry> {
        let url = self.endpoint(HISTORY_DETAIL)?;
        let request = self
            .client
            .post(url)
            .multipart(Self::item_form(user_id, prediction_key));
        let body = execute(request, self.deadline).await?;
        mapper::decode_history_detail(&body, prediction_key)
    }

    #[instrument(skip(self))]
    async fn delete_history(&self, user_id: &str, prediction_key: &str) -> StyleResult<()> {
        let url = self.endpoint(HISTORY_DELETE)?;
        let request = self
            .client
            .post(url)
            .multipart(Self::item_form(user_id, prediction_key));
        execute(request, self.deadline).await?;
        Ok(())
    }
}
