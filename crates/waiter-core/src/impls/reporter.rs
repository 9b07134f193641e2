//! TracingErrorReporter - 失敗した queued notification を `tracing` に出す

use tracing::error;

use crate::domain::{DispatchError, QueueItem};
use crate::ports::ErrorReporter;

/// Default reporter for the queue worker.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, item: &QueueItem, error: &DispatchError) {
        error!(
            notification_type = item.tag().name(),
            error = %error,
            "failed to publish queued notification"
        );
    }
}
