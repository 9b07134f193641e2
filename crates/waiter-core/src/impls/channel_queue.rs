//! EventQueue - tokio mpsc ベースの Event Queue
//!
//! # 実装詳細
//! - producer 側 (`EventQueue`) は clone して複数タスクから enqueue できる
//! - consumer 側 (`EventReader`) は `Clone` を実装しないので、常に 1 つだけ
//! - unbounded（デフォルト）と bounded（満杯なら producer が待つ）を選べる
//!
//! # 使用例
//! ```ignore
//! let (queue, reader) = EventQueue::unbounded();
//! queue.enqueue(OrderPlaced { id: 1 }).await?;
//! let worker = QueueWorker::new(reader, Arc::new(dispatcher)).start();
//! ```

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::{Notification, QueueItem, WorkerConfig};
use crate::ports::{DomainEventQueue, QueueError};

#[derive(Debug, Clone)]
enum Sender {
    Unbounded(mpsc::UnboundedSender<QueueItem>),
    Bounded(mpsc::Sender<QueueItem>),
}

#[derive(Debug)]
enum Receiver {
    Unbounded(mpsc::UnboundedReceiver<QueueItem>),
    Bounded(mpsc::Receiver<QueueItem>),
}

/// Producer handle. FIFO across all clones, at the point of insertion.
#[derive(Debug, Clone)]
pub struct EventQueue {
    tx: Sender,
}

/// The single consumer of an [`EventQueue`].
#[derive(Debug)]
pub struct EventReader {
    rx: Receiver,
}

impl EventQueue {
    pub fn unbounded() -> (EventQueue, EventReader) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            EventQueue {
                tx: Sender::Unbounded(tx),
            },
            EventReader {
                rx: Receiver::Unbounded(rx),
            },
        )
    }

    /// Bounded queue; a capacity of zero is treated as one.
    pub fn bounded(capacity: usize) -> (EventQueue, EventReader) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            EventQueue {
                tx: Sender::Bounded(tx),
            },
            EventReader {
                rx: Receiver::Bounded(rx),
            },
        )
    }

    pub fn from_config(config: &WorkerConfig) -> (EventQueue, EventReader) {
        match config.queue_capacity {
            Some(capacity) => Self::bounded(capacity),
            None => Self::unbounded(),
        }
    }

    pub async fn enqueue<N: Notification>(&self, notification: N) -> Result<(), QueueError> {
        self.push(QueueItem::new(notification)).await
    }

    /// Never suspends. On a full bounded queue returns `QueueError::Full`.
    pub fn try_enqueue<N: Notification>(&self, notification: N) -> Result<(), QueueError> {
        let item = QueueItem::new(notification);
        match &self.tx {
            Sender::Unbounded(tx) => tx.send(item).map_err(|_| QueueError::Closed),
            Sender::Bounded(tx) => tx.try_send(item).map_err(|err| match err {
                TrySendError::Full(_) => QueueError::Full,
                TrySendError::Closed(_) => QueueError::Closed,
            }),
        }
    }

    /// True once the reader has been dropped.
    pub fn is_closed(&self) -> bool {
        match &self.tx {
            Sender::Unbounded(tx) => tx.is_closed(),
            Sender::Bounded(tx) => tx.is_closed(),
        }
    }

    async fn push(&self, item: QueueItem) -> Result<(), QueueError> {
        match &self.tx {
            Sender::Unbounded(tx) => tx.send(item).map_err(|_| QueueError::Closed),
            Sender::Bounded(tx) => tx.send(item).await.map_err(|_| QueueError::Closed),
        }
    }
}

#[async_trait]
impl DomainEventQueue for EventQueue {
    async fn enqueue_item(&self, item: QueueItem) -> Result<(), QueueError> {
        self.push(item).await
    }
}

impl EventReader {
    /// Waits for the next item. `None` once every producer is gone and the
    /// buffer is drained.
    pub async fn recv(&mut self) -> Option<QueueItem> {
        match &mut self.rx {
            Receiver::Unbounded(rx) => rx.recv().await,
            Receiver::Bounded(rx) => rx.recv().await,
        }
    }

    pub fn try_recv(&mut self) -> Option<QueueItem> {
        match &mut self.rx {
            Receiver::Unbounded(rx) => rx.try_recv().ok(),
            Receiver::Bounded(rx) => rx.try_recv().ok(),
        }
    }

    pub fn len(&self) -> usize {
        match &self.rx {
            Receiver::Unbounded(rx) => rx.len(),
            Receiver::Bounded(rx) => rx.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
