//! ErrorReporter port - Queue Worker が吸収した失敗の通知先
//!
//! Worker は publish の失敗で止まらない代わりに、必ずここへ報告する。

use crate::domain::{DispatchError, QueueItem};

pub trait ErrorReporter: Send + Sync {
    fn report(&self, item: &QueueItem, error: &DispatchError);
}
