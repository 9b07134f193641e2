//! Dispatcher - `send` / `publish` の入口
//!
//! Registry から handler と behavior を解決し、pipeline を組み立てて実行する。
//! Registry は `Arc` で共有するだけなので、`Dispatcher` の clone は安い。

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{CancelSignal, DispatchError, Notification, QueueItem, Request, TypeTag};
use crate::ports::Publisher;
use crate::typed::Registry;

use super::pipeline;

/// Dispatcher executes requests and notifications against a frozen registry.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub async fn send<R: Request>(&self, request: R) -> Result<R::Response, DispatchError> {
        self.send_with_cancel(request, &CancelSignal::never()).await
    }

    /// Run `request` through its behaviors and its single handler.
    ///
    /// Fails with `HandlerNotFound` when no handler is registered for `R`;
    /// any error from a behavior or the handler is returned unchanged.
    pub async fn send_with_cancel<R: Request>(
        &self,
        request: R,
        cancel: &CancelSignal,
    ) -> Result<R::Response, DispatchError> {
        let tag = TypeTag::of::<R>();
        let Some(handler) = self.registry.resolve_handler::<R>() else {
            warn!(request_type = %tag, "no handler registered for request");
            return Err(DispatchError::HandlerNotFound(tag));
        };
        let behaviors = self.registry.resolve_behaviors::<R>();
        debug!(
            request_type = tag.short_name(),
            behavior_count = behaviors.len(),
            "dispatching request"
        );

        let chain = pipeline::build_chain(&request, cancel, handler.as_ref(), &behaviors);
        chain().await.map_err(DispatchError::Handler)
    }

    pub async fn publish<N: Notification>(&self, notification: N) -> Result<(), DispatchError> {
        self.publish_with_cancel(notification, &CancelSignal::never())
            .await
    }

    /// Invoke every handler for `N` in registration order.
    ///
    /// No handlers is a successful no-op. The first failing handler stops the
    /// fan-out and its error is returned.
    pub async fn publish_with_cancel<N: Notification>(
        &self,
        notification: N,
        cancel: &CancelSignal,
    ) -> Result<(), DispatchError> {
        self.publish_erased(TypeTag::of::<N>(), &notification, cancel)
            .await
    }

    /// Publish an item taken off the event queue.
    pub async fn publish_queued(
        &self,
        item: &QueueItem,
        cancel: &CancelSignal,
    ) -> Result<(), DispatchError> {
        self.publish_erased(item.tag(), item.notification(), cancel)
            .await
    }

    async fn publish_erased(
        &self,
        tag: TypeTag,
        notification: &(dyn Any + Send + Sync),
        cancel: &CancelSignal,
    ) -> Result<(), DispatchError> {
        let handlers = self.registry.resolve_notification_handlers(tag);
        if handlers.is_empty() {
            debug!(notification_type = tag.short_name(), "no notification handlers");
            return Ok(());
        }

        debug!(
            notification_type = tag.short_name(),
            handler_count = handlers.len(),
            "publishing notification"
        );
        for (index, handler) in handlers.iter().enumerate() {
            if let Err(err) = handler.handle_dyn(notification, cancel).await {
                debug!(
                    notification_type = tag.short_name(),
                    handler_index = index,
                    error = %err,
                    "notification handler failed, skipping remaining handlers"
                );
                return Err(DispatchError::Handler(err));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Publisher for Dispatcher {
    async fn publish_item(&self, item: &QueueItem, cancel: &CancelSignal) -> Result<(), DispatchError> {
        self.publish_queued(item, cancel).await
    }
}
