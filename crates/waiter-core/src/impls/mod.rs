//! Impls - ports の実装と組み込み behavior
//!
//! # 含まれる実装
//! - **EventQueue / EventReader**: tokio mpsc ベースの Event Queue
//! - **TracingErrorReporter**: Queue Worker のデフォルト報告先
//! - **TracingBehavior / CancellationBehavior / RetryBehavior**: 全 Request 共通の behavior

pub mod behaviors;
pub mod channel_queue;
pub mod reporter;

pub use self::behaviors::{CancellationBehavior, RetryBehavior, TracingBehavior};
pub use self::channel_queue::{EventQueue, EventReader};
pub use self::reporter::TracingErrorReporter;
