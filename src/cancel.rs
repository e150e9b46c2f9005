//! Cooperative cancellation shared by the login loop and the fetch wrappers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// A flag that, once raised, stays raised and wakes every waiter.
///
/// Clones share the same flag. The Ctrl+C listener holds one clone, the
/// login loop and the fetch wrappers hold the others.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    inner: Arc<Inner>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake any in-flight call racing [`Self::cancelled`].
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the flag is raised. Returns immediately if it already is.
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a cancel in between is not lost.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Spawn a background task that raises the flag on every Ctrl+C.
    ///
    /// Installing the handler replaces the default terminate-on-interrupt
    /// behaviour, so the login loop gets to observe the flag and unwind.
    pub fn listen_for_interrupt(&self) -> JoinHandle<()> {
        let signal = self.clone();
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!("Failed to listen for ctrl_c signal: {}", e);
                    return;
                }
                tracing::debug!("Interrupt received, cancelling");
                signal.cancel();
            }
        })
    }
}
