//! Scan flow state machine
//!
//! One parameterized flow covers every capture-screen variant: the gender
//! and style steps are switched on or off with [`FlowOptions`] rather than
//! being separate screens.
//!
//! ```text
//! SelectingImage ─select_image─▶ AwaitingGender ─choose_gender─▶ AwaitingStyle ─choose_style─▶ Ready
//!        ▲                                                                                    │
//!        └──────────── retry ──── Failed ◀── submit ── Submitting ◀───────── submit ──────────┘
//!                                              └──▶ Showing
//! ```

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::backends::StyleBackend;
use crate::error::{StyleError, StyleResult};
use crate::request::{ClothingStyle, ClothingTag, Gender, MultipartPayload, StyleRequest};
use crate::types::StyleRecommendationResult;

/// Which optional steps the flow asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlowOptions {
    /// Ask for gender before the clothing style
    pub ask_gender: bool,
    /// Ask for a clothing style; when off `default_style` is sent
    pub ask_style: bool,
    /// Style used when the style step is skipped
    pub default_style: ClothingStyle,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            ask_gender: true,
            ask_style: true,
            default_style: ClothingStyle::Streetwear,
        }
    }
}

impl FlowOptions {
    /// Image only; the default style is sent without a gender
    pub fn quick_scan() -> Self {
        Self {
            ask_gender: false,
            ask_style: false,
            ..Self::default()
        }
    }

    pub fn with_default_style(self, default_style: ClothingStyle) -> Self {
        Self {
            default_style,
            ..self
        }
    }
}

/// Why a scan ended without a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanFailure {
    /// Nothing was sent
    Local { message: String },
    /// The network stage failed; the user may retry from image selection
    Network {
        status: Option<u16>,
        message: String,
    },
}

impl ScanFailure {
    fn from_error(error: &StyleError) -> Self {
        if error.is_local() {
            Self::Local {
                message: error.to_string(),
            }
        } else {
            Self::Network {
                status: error.status(),
                message: error.to_string(),
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Local { message } | Self::Network { message, .. } => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    SelectingImage,
    AwaitingGender {
        image: PathBuf,
    },
    AwaitingStyle {
        image: PathBuf,
        gender: Option<Gender>,
    },
    Ready(StyleRequest),
    Submitting(StyleRequest),
    Showing(Box<StyleRecommendationResult>),
    Failed(ScanFailure),
    Cancelled,
}

impl ScanState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectingImage => "selecting_image",
            Self::AwaitingGender { .. } => "awaiting_gender",
            Self::AwaitingStyle { .. } => "awaiting_style",
            Self::Ready(_) => "ready",
            Self::Submitting(_) => "submitting",
            Self::Showing(_) => "showing",
            Self::Failed(_) => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("cannot {action} while {from}")]
    InvalidTransition { from: &'static str, action: &'static str },
}

/// Drives one user through image selection, tagging and submission
#[derive(Debug, Clone)]
pub struct ScanFlow {
    options: FlowOptions,
    user_id: Option<String>,
    state: ScanState,
}

impl ScanFlow {
    pub fn new(options: FlowOptions, user_id: Option<String>) -> Self {
        Self {
            options,
            user_id,
            state: ScanState::SelectingImage,
        }
    }

    /// Resume at `Ready` with a request prepared elsewhere
    pub fn ready(options: FlowOptions, request: StyleRequest) -> Self {
        Self {
            options,
            user_id: Some(request.user_id().to_string()),
            state: ScanState::Ready(request),
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn options(&self) -> FlowOptions {
        self.options
    }

    fn invalid(&self, action: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            from: self.state.name(),
            action,
        }
    }

    /// Accept the cropped image path
    pub fn select_image(&mut self, image: impl Into<PathBuf>) -> Result<&ScanState, FlowError> {
        if !matches!(self.state, ScanState::SelectingImage) {
            return Err(self.invalid("select an image"));
        }
        let image = image.into();
        self.state = if self.options.ask_gender {
            ScanState::AwaitingGender { image }
        } else if self.options.ask_style {
            ScanState::AwaitingStyle {
                image,
                gender: None,
            }
        } else {
            let style = self.options.default_style.as_str();
            ScanState::Ready(self.request_for(image, Some(style)))
        };
        Ok(&self.state)
    }

    pub fn choose_gender(&mut self, gender: Gender) -> Result<&ScanState, FlowError> {
        let ScanState::AwaitingGender { image } = &self.state else {
            return Err(self.invalid("choose a gender"));
        };
        let image = image.clone();
        self.state = if self.options.ask_style {
            ScanState::AwaitingStyle {
                image,
                gender: Some(gender),
            }
        } else {
            // no style step: gendered default
            let tag = ClothingTag::new(self.options.default_style, gender).to_string();
            ScanState::Ready(self.request_for(image, Some(&tag)))
        };
        Ok(&self.state)
    }

    pub fn choose_style(&mut self, style: ClothingStyle) -> Result<&ScanState, FlowError> {
        let ScanState::AwaitingStyle { image, gender } = &self.state else {
            return Err(self.invalid("choose a clothing style"));
        };
        let clothing_type = match gender {
            Some(gender) => ClothingTag::new(style, *gender).to_string(),
            None => style.as_str().to_string(),
        };
        let image = image.clone();
        self.state = ScanState::Ready(self.request_for(image, Some(&clothing_type)));
        Ok(&self.state)
    }

    fn request_for(&self, image: PathBuf, clothing_type: Option<&str>) -> StyleRequest {
        StyleRequest::new(image, self.user_id.as_deref(), clothing_type)
    }

    /// Build the payload and enter `Submitting`
    ///
    /// Returns `None` when the request could not be built (missing image);
    /// the flow is then `Failed` and nothing must be sent.
    pub fn begin_submit(&mut self) -> Result<Option<MultipartPayload>, FlowError> {
        let ScanState::Ready(request) = &self.state else {
            return Err(self.invalid("submit"));
        };
        let request = request.clone();

        match request.build() {
            Ok(payload) => {
                self.state = ScanState::Submitting(request);
                Ok(Some(payload))
            }
            Err(e) => {
                tracing::warn!(error = %e, "scan request could not be built");
                self.state = ScanState::Failed(ScanFailure::from_error(&e));
                Ok(None)
            }
        }
    }

    /// Record the outcome of the submission started by `begin_submit`
    pub fn complete(
        &mut self,
        outcome: StyleResult<StyleRecommendationResult>,
    ) -> Result<&ScanState, FlowError> {
        if !matches!(self.state, ScanState::Submitting(_)) {
            return Err(self.invalid("complete a submission"));
        }
        self.state = match outcome {
            Ok(result) => ScanState::Showing(Box::new(result)),
            Err(e) => {
                tracing::warn!(error = %e, "scan failed");
                ScanState::Failed(ScanFailure::from_error(&e))
            }
        };
        Ok(&self.state)
    }

    /// Build and send the request, single attempt
    ///
    /// A missing image fails locally without touching the backend.
    pub async fn submit(&mut self, backend: &dyn StyleBackend) -> Result<&ScanState, FlowError> {
        let Some(payload) = self.begin_submit()? else {
            return Ok(&self.state);
        };
        tracing::debug!(backend = backend.name(), "submitting scan");
        let outcome = backend.submit(payload).await;
        self.complete(outcome)
    }

    /// Start over from image selection; never resubmits the old image
    pub fn retry(&mut self) -> Result<&ScanState, FlowError> {
        if !matches!(self.state, ScanState::Failed(_)) {
            return Err(self.invalid("retry"));
        }
        self.state = ScanState::SelectingImage;
        Ok(&self.state)
    }

    pub fn cancel(&mut self) -> Result<&ScanState, FlowError> {
        if matches!(self.state, ScanState::Submitting(_) | ScanState::Cancelled) {
            return Err(self.invalid("cancel"));
        }
        self.state = ScanState::Cancelled;
        Ok(&self.state)
    }

    /// The result being shown, if any
    pub fn result(&self) -> Option<&StyleRecommendationResult> {
        match &self.state {
            ScanState::Showing(result) => Some(result),
            _ => None,
        }
    }
}
