//! Command handlers module
//!
//! One handler per subcommand. CommandContext holds the resources shared
//! across handlers: the style client is built once per process.

use anyhow::Result;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::oneshot;

use smartfit::{Config, Dispatcher, Liveness, RequestKey, StyleClient, StyleResult};
use smartfit_common::{json_output, OutputFormat};

pub mod history;
pub mod news;
pub mod render;
pub mod scan;

pub use history::{delete, detail, history};
pub use news::news;
pub use scan::{scan, ScanArgs};

/// Shared state for command handlers
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
    pub client: Arc<StyleClient>,
    dispatcher: Dispatcher,
    liveness: Liveness,
}

impl CommandContext {
    pub fn new(config: Config, format: OutputFormat) -> Result<Self> {
        let client = StyleClient::new(&config.backend)?;
        tracing::debug!(base_url = %client.base_url(), "style client ready");

        Ok(Self {
            config,
            format,
            client: Arc::new(client),
            dispatcher: Dispatcher::default(),
            liveness: Liveness::new(),
        })
    }

    /// Explicit user id, else the configured default
    pub fn user_id(&self, user: Option<String>) -> String {
        user.filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| self.config.request.default_user_id.clone())
    }

    /// Run `work` through the dispatcher and wait for its completion
    ///
    /// Returns `None` when the user interrupted the wait; the context is
    /// disposed and the late completion is dropped.
    pub async fn run_guarded<T, W>(&self, key: RequestKey, work: W) -> Result<Option<StyleResult<T>>>
    where
        T: Send + 'static,
        W: Future<Output = StyleResult<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let _detached = self.dispatcher.dispatch(key, &self.liveness, work, move |outcome| {
            let _ = tx.send(outcome);
        })?;

        tokio::select! {
            received = rx => Ok(received.ok()),
            signal = tokio::signal::ctrl_c() => {
                signal?;
                self.liveness.dispose();
                tracing::info!("interrupted, abandoning in-flight request");
                Ok(None)
            }
        }
    }

    /// Print `data` as JSON or as the text produced by `text`
    pub fn emit<T: Serialize>(&self, data: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", json_output(data)?),
            OutputFormat::Text => print!("{}", text(data)),
        }
        Ok(())
    }
}
