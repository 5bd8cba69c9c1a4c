//! SmartFit client library
//!
//! Client side of the "scan → predict → display" flow: builds the multipart
//! request for a cropped photo, sends it to the style recommendation
//! service, and decodes the heterogeneous JSON response into typed results.
//! Also reads and deletes stored predictions and fetches fashion news.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use smartfit::{Config, StyleBackend, StyleClient, StyleRequest};
//!
//! let config = Config::load()?;
//! let client = StyleClient::new(&config.backend)?;
//!
//! let payload = StyleRequest::new("crop.jpg", Some("uid-123"), Some("formal-men")).build()?;
//! let result = client.submit(payload).await?;
//! println!("{}", result.seasonal_color_label);
//! ```
//!
//! # Configuration
//! Set `SMARTFIT_API_URL` env var or configure in `~/.smartfit/config.toml`

pub mod backends;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod flow;
pub mod history;
pub mod inflight;
pub mod mapper;
pub mod news;
pub mod request;
pub mod types;

// Re-export the main client types
pub use backends::{HistoryBackend, StyleBackend, StyleClient};
pub use config::Config;
pub use dispatch::{Dispatcher, Liveness};
pub use error::{StyleError, StyleResult};
pub use flow::{FlowOptions, ScanFlow, ScanState};
pub use history::HistoryList;
pub use inflight::{InFlightRegistry, Operation, RequestKey};
pub use news::{NewsClient, NewsQuery};
pub use request::{ClothingStyle, ClothingTag, Gender, MultipartPayload, StyleRequest};
pub use types::{
    PaletteShape, PredictionHistoryEntry, Product, StyleRecommendationResult, NOT_AVAILABLE,
};
