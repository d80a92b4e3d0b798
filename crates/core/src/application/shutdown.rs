// Stop signal for background tasks (progress reporter)

use tokio::sync::watch;

/// Receiving side of a stop signal
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Check if stop was requested
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once stop is requested or the sender is gone
    pub async fn wait(&mut self) {
        // Err means the sender was dropped; treat as stop
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}

/// Sending side of a stop signal
pub struct ShutdownSender {
    tx: watch::Sender<bool>,
}

impl ShutdownSender {
    /// Signal stop to every token holder
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }
}

/// Create a stop channel
pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSender { tx }, ShutdownToken { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_returns_after_shutdown() {
        let (tx, mut token) = shutdown_channel();
        assert!(!token.is_shutdown());
        tx.shutdown();
        tokio::time::timeout(Duration::from_secs(1), token.wait())
            .await
            .expect("wait should resolve after shutdown");
        assert!(token.is_shutdown());
    }

    #[tokio::test]
    async fn test_dropped_sender_releases_waiters() {
        let (tx, mut token) = shutdown_channel();
        drop(tx);
        tokio::time::timeout(Duration::from_secs(1), token.wait())
            .await
            .expect("wait should resolve when sender is dropped");
    }
}
