//! QueueWorker - Event Queue を drain するバックグラウンドループ
//!
//! # フロー
//! 1. `EventReader::recv()` で次の item を待つ（空なら cancel と競合させて待機）
//! 2. `Publisher::publish_item()` で notification handler に配送
//! 3. 失敗したら `ErrorReporter` に報告し、`FailurePolicy` に従って続行 / 停止
//!
//! # 停止
//! - cancel は item と item の間でしか見ない。処理中の publish は必ず最後まで走る
//! - どの理由で止まっても `EventReader` を返すので、残りの item は失われない

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info};

use crate::domain::{
    CancelSignal, CancelSource, DispatchError, FailurePolicy, HandlerPanicked, WorkerConfig,
};
use crate::impls::{EventReader, TracingErrorReporter};
use crate::ports::{ErrorReporter, Publisher};

/// QueueWorker は EventReader を 1 つだけ所有して drain する
///
/// # 使用例
/// ```ignore
/// let (queue, reader) = EventQueue::unbounded();
/// let worker = QueueWorker::new(reader, Arc::new(dispatcher.clone())).start();
/// queue.enqueue(OrderPlaced { id: 1 }).await?;
/// let exit = worker.stop().await?;
/// ```
pub struct QueueWorker {
    reader: EventReader,
    publisher: Arc<dyn Publisher>,
    reporter: Arc<dyn ErrorReporter>,
    policy: FailurePolicy,
}

/// Why the loop ended.
#[derive(Debug)]
pub enum ExitReason {
    Cancelled,
    /// Every producer was dropped and the buffer is empty.
    QueueClosed,
    /// `FailurePolicy::Abort` and an item failed.
    Aborted(DispatchError),
}

/// Returned by the loop on every exit.
#[derive(Debug)]
pub struct WorkerExit {
    pub reader: EventReader,
    pub reason: ExitReason,
    pub delivered: u64,
    pub failed: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("queue worker task failed: {0}")]
    Join(#[from] JoinError),
}

impl QueueWorker {
    pub fn new(reader: EventReader, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            reader,
            publisher,
            reporter: Arc::new(TracingErrorReporter),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_config(self, config: &WorkerConfig) -> Self {
        self.with_policy(config.failure_policy)
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Spawn the loop on the current tokio runtime.
    pub fn start(self) -> WorkerHandle {
        let cancel = CancelSource::new();
        let signal = cancel.signal();
        let task = tokio::spawn(self.run(signal));
        WorkerHandle {
            cancel: CancelOnDrop(cancel),
            task,
        }
    }

    /// Drive the loop on the caller's task until cancellation, queue closure
    /// or an aborting failure.
    pub async fn run(self, cancel: CancelSignal) -> WorkerExit {
        let QueueWorker {
            mut reader,
            publisher,
            reporter,
            policy,
        } = self;
        let mut delivered = 0;
        let mut failed = 0;
        info!(?policy, "queue worker started");

        let reason = loop {
            // cancel を先に見る。cancel 済みなら item が残っていても取り出さない
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                item = reader.recv() => Some(item),
            };
            let item = match next {
                None => break ExitReason::Cancelled,
                Some(None) => break ExitReason::QueueClosed,
                Some(Some(item)) => item,
            };

            // panic も 1 件分の失敗として扱う。worker ごと落ちると残りの item を失う
            let outcome = AssertUnwindSafe(publisher.publish_item(&item, &cancel))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    Err(DispatchError::Handler(Box::new(HandlerPanicked::from_payload(
                        payload.as_ref(),
                    ))))
                });

            match outcome {
                Ok(()) => {
                    delivered += 1;
                    debug!(notification_type = item.tag().short_name(), "queued notification delivered");
                }
                Err(err) => {
                    failed += 1;
                    reporter.report(&item, &err);
                    if policy == FailurePolicy::Abort {
                        break ExitReason::Aborted(err);
                    }
                }
            }
        };

        info!(
            reason = ?reason,
            delivered,
            failed,
            pending = reader.len(),
            "queue worker stopped"
        );
        WorkerExit {
            reader,
            reason,
            delivered,
            failed,
        }
    }
}

/// Handle to a spawned worker.
/// - `request_shutdown()` は合図だけ。処理中の item は最後まで走る
/// - `stop()` で合図して終了を待つ
/// - handle を drop しても止まる（その場合 `EventReader` は返らない）
#[must_use = "dropping the handle stops the worker"]
pub struct WorkerHandle {
    cancel: CancelOnDrop,
    task: JoinHandle<WorkerExit>,
}

/// Cancels the worker when the owning handle goes away.
struct CancelOnDrop(CancelSource);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

impl WorkerHandle {
    pub fn request_shutdown(&self) {
        self.cancel.0.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the loop to end on its own (queue closed or aborted).
    pub async fn join(self) -> Result<WorkerExit, WorkerError> {
        // guard は終了を待つ間だけ生かしておく
        let WorkerHandle { cancel: _guard, task } = self;
        Ok(task.await?)
    }

    pub async fn stop(self) -> Result<WorkerExit, WorkerError> {
        self.request_shutdown();
        self.join().await
    }
}
