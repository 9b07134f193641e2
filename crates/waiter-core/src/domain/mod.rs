//! Domain model (messages, type tags, errors, cancellation, queue items, config).

pub mod cancel;
pub mod errors;
pub mod message;
pub mod policy;
pub mod queue_item;
pub mod type_tag;

pub use self::cancel::{CancelSignal, CancelSource};
pub use self::errors::{Cancelled, DispatchError, HandlerError, HandlerPanicked, TypeMismatch};
pub use self::message::{Notification, Request};
pub use self::policy::{ConfigError, FailurePolicy, WorkerConfig};
pub use self::queue_item::QueueItem;
pub use self::type_tag::TypeTag;
