//! Publisher port - Queue Worker から見た Dispatcher

use async_trait::async_trait;

use crate::domain::{CancelSignal, DispatchError, QueueItem};

/// Publishes one type-erased queue item to its notification handlers.
///
/// `Dispatcher` is the production implementation.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish_item(&self, item: &QueueItem, cancel: &CancelSignal) -> Result<(), DispatchError>;
}
