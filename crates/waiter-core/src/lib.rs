//! waiter-core
//!
//! In-process mediator: request/response dispatch through a behavior pipeline,
//! notification fan-out, and an async event queue drained by a background worker.
//!
//! # モジュール構成
//! - **domain**: 型識別子、Request / Notification、エラー、cancel、worker 設定
//! - **ports**: 抽象化レイヤー（Publisher, ErrorReporter, DomainEventQueue）
//! - **typed**: handler / behavior の trait と Registry
//! - **app**: WaiterBuilder, Dispatcher, pipeline, QueueWorker
//! - **impls**: 実装（mpsc ベースの EventQueue, TracingErrorReporter, 組み込み behavior）
//!
//! # 使用例
//! ```ignore
//! let dispatcher = WaiterBuilder::new()
//!     .handler::<Echo, _>(EchoHandler)?
//!     .open_behavior(TracingBehavior)
//!     .build()?;
//! let reply = dispatcher.send(Echo("hi".into())).await?;
//!
//! let (queue, reader) = EventQueue::unbounded();
//! let worker = QueueWorker::new(reader, Arc::new(dispatcher.clone())).start();
//! queue.enqueue(OrderPlaced { id: 1 }).await?;
//! worker.stop().await?;
//! ```

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod typed;

#[cfg(test)]
mod test_support;

pub use app::{BuildError, Dispatcher, QueueWorker, WaiterBuilder, WorkerHandle};
pub use domain::{
    CancelSignal, CancelSource, DispatchError, FailurePolicy, HandlerError, Notification,
    Request, WorkerConfig,
};
pub use impls::EventQueue;
pub use typed::{NotificationHandler, PipelineBehavior, RequestHandler};
