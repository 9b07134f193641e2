//! DomainEventQueue port - Notification を後で publish するためのキュー
//!
//! producer 側だけの抽象。consumer（`EventReader`）は実装ごとに 1 つだけ。

use async_trait::async_trait;

use crate::domain::QueueItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("event queue is closed")]
    Closed,

    #[error("event queue is full")]
    Full,
}

/// Object-safe producer handle, for code that enqueues through `Arc<dyn DomainEventQueue>`.
#[async_trait]
pub trait DomainEventQueue: Send + Sync {
    /// Suspends only when a bounded queue is full.
    async fn enqueue_item(&self, item: QueueItem) -> Result<(), QueueError>;
}
