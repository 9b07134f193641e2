//! Registry - Handler / Behavior の登録と解決
//!
//! # 設計
//! - 初期化時に構築（mutable）
//! - 実行時は `Arc<Registry>` で共有（immutable、ロック不要）
//!
//! # 内部実装
//! - `HashMap<TypeTag, Box<dyn Any>>` に `Arc<dyn RequestHandler<R>>` を入れ、
//!   `resolve_handler::<R>()` で downcast して取り出す
//! - behavior は型付き / open を 1 本の Vec に登録順で保持する

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Notification, Request, TypeTag};

use super::behavior::{OpenAdapter, OpenBehavior, PipelineBehavior};
use super::handler::{
    DynNotificationHandler, NotificationHandler, RequestHandler, TypedNotificationHandler,
};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Handler for request type '{0}' is already registered")]
    DuplicateHandler(TypeTag),
}

enum BehaviorEntry {
    /// Holds an `Arc<dyn PipelineBehavior<R>>` for the tagged `R`.
    Typed {
        request: TypeTag,
        behavior: Box<dyn Any + Send + Sync>,
    },
    Open(Arc<dyn OpenBehavior>),
}

#[derive(Default)]
pub struct Registry {
    handlers: HashMap<TypeTag, Box<dyn Any + Send + Sync>>,
    notification_handlers: HashMap<TypeTag, Vec<Arc<dyn DynNotificationHandler>>>,
    behaviors: Vec<BehaviorEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the single handler for `R`.
    pub fn register_handler<R: Request, H: RequestHandler<R> + 'static>(
        &mut self,
        handler: H,
    ) -> Result<(), RegistryError> {
        let tag = TypeTag::of::<R>();
        if self.handlers.contains_key(&tag) {
            return Err(RegistryError::DuplicateHandler(tag));
        }
        let handler: Arc<dyn RequestHandler<R>> = Arc::new(handler);
        self.handlers.insert(tag, Box::new(handler));
        Ok(())
    }

    /// Append a handler for `N`. Handlers run in registration order.
    pub fn register_notification_handler<N: Notification, H: NotificationHandler<N> + 'static>(
        &mut self,
        handler: H,
    ) {
        self.notification_handlers
            .entry(TypeTag::of::<N>())
            .or_default()
            .push(Arc::new(TypedNotificationHandler::new(handler)));
    }

    pub fn register_behavior<R: Request, B: PipelineBehavior<R> + 'static>(&mut self, behavior: B) {
        let behavior: Arc<dyn PipelineBehavior<R>> = Arc::new(behavior);
        self.behaviors.push(BehaviorEntry::Typed {
            request: TypeTag::of::<R>(),
            behavior: Box::new(behavior),
        });
    }

    /// Register a behavior that wraps every request type.
    pub fn register_open_behavior<B: OpenBehavior + 'static>(&mut self, behavior: B) {
        self.behaviors.push(BehaviorEntry::Open(Arc::new(behavior)));
    }

    pub fn resolve_handler<R: Request>(&self) -> Option<Arc<dyn RequestHandler<R>>> {
        self.handlers
            .get(&TypeTag::of::<R>())?
            .downcast_ref::<Arc<dyn RequestHandler<R>>>()
            .cloned()
    }

    pub fn resolve_notification_handlers(&self, tag: TypeTag) -> &[Arc<dyn DynNotificationHandler>] {
        self.notification_handlers
            .get(&tag)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Behaviors applying to `R`, outermost first.
    pub fn resolve_behaviors<R: Request>(&self) -> Vec<Arc<dyn PipelineBehavior<R>>> {
        let tag = TypeTag::of::<R>();
        self.behaviors
            .iter()
            .filter_map(|entry| match entry {
                BehaviorEntry::Typed { request, behavior } if *request == tag => behavior
                    .downcast_ref::<Arc<dyn PipelineBehavior<R>>>()
                    .cloned(),
                BehaviorEntry::Typed { .. } => None,
                BehaviorEntry::Open(open) => Some(
                    Arc::new(OpenAdapter::<R>::new(Arc::clone(open))) as Arc<dyn PipelineBehavior<R>>
                ),
            })
            .collect()
    }

    pub fn has_handler(&self, tag: TypeTag) -> bool {
        self.handlers.contains_key(&tag)
    }

    pub fn registered_requests(&self) -> Vec<TypeTag> {
        self.handlers.keys().copied().collect()
    }

    pub fn registered_notifications(&self) -> Vec<TypeTag> {
        self.notification_handlers.keys().copied().collect()
    }

    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }
}
