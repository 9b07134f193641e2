//! Cancellation signal shared by dispatch calls and the queue worker.
//!
//! Built on `tokio::sync::watch` in the same way the worker shutdown flag is:
//! one sender flips `false -> true`, any number of receivers observe it.

use tokio::sync::watch;

use super::errors::Cancelled;

/// Owner side. Cancelling is idempotent and never fails, even with no listeners.
#[derive(Debug)]
pub struct CancelSource {
    tx: watch::Sender<bool>,
}

impl CancelSource {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side handed to handlers and behaviors.
///
/// Observation is cooperative: the engine never aborts handler code, handlers
/// decide when to check.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// A signal that is never cancelled.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves once the signal is cancelled. Pends forever if the source is
    /// dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::never()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn never_is_not_cancelled() {
        let signal = CancelSignal::never();
        assert!(!signal.is_cancelled());
        assert!(signal.check().is_ok());
    }

    #[test]
    fn cancel_is_visible_to_existing_and_new_signals() {
        let source = CancelSource::new();
        let before = source.signal();
        source.cancel();
        let after = source.signal();

        assert!(source.is_cancelled());
        assert!(before.is_cancelled());
        assert!(after.is_cancelled());
        assert_eq!(before.check(), Err(Cancelled));
    }

    #[tokio::test]
    async fn cancelled_resolves_after_cancel() {
        let source = CancelSource::new();
        let signal = source.signal();

        let waiter = tokio::spawn(async move { signal.cancelled().await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        source.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn dropped_source_without_cancel_never_fires() {
        let signal = CancelSource::new().signal();
        let result = tokio::time::timeout(Duration::from_millis(50), signal.cancelled()).await;
        assert!(result.is_err());
        assert!(!signal.is_cancelled());
    }
}
