//! Background dispatch with completion gating
//!
//! Every network operation runs off the caller's thread and reports back
//! through a callback. The callback only fires while the originating
//! context is still alive; once a screen is gone its late results are
//! dropped instead of being delivered to a disposed view.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::error::StyleResult;
use crate::inflight::{InFlightRegistry, RequestKey};

/// Liveness flag owned by whatever initiated a request
#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Mark the context gone; pending completions will be dropped
    pub fn dispose(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns guarded network work
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    registry: InFlightRegistry,
}

impl Dispatcher {
    pub fn new(registry: InFlightRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &InFlightRegistry {
        &self.registry
    }

    /// Run `work` in the background and hand its outcome to `on_complete`
    ///
    /// Rejected synchronously with `AlreadyInFlight` if `key` is outstanding.
    /// The key is released as soon as `work` finishes, before the callback
    /// runs, so the callback may start a fresh attempt. The handle resolves
    /// to `true` when the callback was invoked, `false` when the context had
    /// been disposed.
    pub fn dispatch<T, W, F>(
        &self,
        key: RequestKey,
        liveness: &Liveness,
        work: W,
        on_complete: F,
    ) -> StyleResult<JoinHandle<bool>>
    where
        T: Send + 'static,
        W: Future<Output = StyleResult<T>> + Send + 'static,
        F: FnOnce(StyleResult<T>) + Send + 'static,
    {
        let guard = self.registry.try_acquire(key)?;
        let liveness = liveness.clone();

        Ok(tokio::spawn(async move {
            let outcome = work.await;
            let key = guard.key().clone();
            drop(guard);

            if liveness.is_alive() {
                on_complete(outcome);
                true
            } else {
                tracing::debug!(%key, "context disposed, dropping completion");
                false
            }
        }))
    }
}
