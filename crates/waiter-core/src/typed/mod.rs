//! Typed - 型付き Handler / Behavior API
//!
//! Request の型から handler を引くことで、handler 名の typo や
//! Response 型の取り違えをコンパイル時に排除する。
//!
//! # 二層構造
//! - **表層（Typed）**: `RequestHandler<R>`, `NotificationHandler<N>`, `PipelineBehavior<R>` - 型安全
//! - **内部（Dyn）**: `DynNotificationHandler`, `OpenBehavior` - object-safe, type erasure

pub mod behavior;
pub mod handler;
pub mod registry;

pub use self::behavior::{
    AnyResponse, Continuation, Next, OpenBehavior, PipelineBehavior, RequestContext,
};
pub use self::handler::{
    DynNotificationHandler, FnHandler, NotificationHandler, RequestHandler,
    TypedNotificationHandler, handler_fn,
};
pub use self::registry::{Registry, RegistryError};
