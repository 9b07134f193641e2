//! Ports - 抽象化レイヤー
//!
//! Queue Worker と周辺（Dispatcher, エラー通知先, Event Queue 実装）をつなぐ trait。
//! テストではここを spy に差し替える。

pub mod error_reporter;
pub mod event_queue;
pub mod publisher;

pub use self::error_reporter::ErrorReporter;
pub use self::event_queue::{DomainEventQueue, QueueError};
pub use self::publisher::Publisher;
