//! Handler trait - Request / Notification を処理する Handler の定義
//!
//! # 学習ポイント
//! - ジェネリック trait (`RequestHandler<R>`, `NotificationHandler<N>`)
//! - Object-safe trait (`DynNotificationHandler`)
//! - Type erasure パターン (`TypedNotificationHandler<N, H>` → `DynNotificationHandler`)

use std::any::Any;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::domain::{CancelSignal, HandlerError, Notification, Request, TypeMismatch, TypeTag};

/// RequestHandler は Request を処理して Response を返す
///
/// # 使用例
/// ```ignore
/// struct EchoHandler;
///
/// #[async_trait]
/// impl RequestHandler<Echo> for EchoHandler {
///     async fn handle(&self, request: &Echo, _cancel: &CancelSignal) -> Result<String, HandlerError> {
///         Ok(format!("OK:{}", request.0))
///     }
/// }
/// ```
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(&self, request: &R, cancel: &CancelSignal) -> Result<R::Response, HandlerError>;
}

#[async_trait]
pub trait NotificationHandler<N: Notification>: Send + Sync {
    async fn handle(&self, notification: &N, cancel: &CancelSignal) -> Result<(), HandlerError>;
}

/// DynNotificationHandler は object-safe な NotificationHandler
///
/// Queue を通ってきた Notification は型が消えているので、
/// `&dyn Any` を受けて内部で downcast する。
#[async_trait]
pub trait DynNotificationHandler: Send + Sync {
    async fn handle_dyn(
        &self,
        notification: &(dyn Any + Send + Sync),
        cancel: &CancelSignal,
    ) -> Result<(), HandlerError>;

    fn notification_type(&self) -> TypeTag;
}

pub struct TypedNotificationHandler<N: Notification, H: NotificationHandler<N>> {
    handler: H,
    _marker: PhantomData<N>,
}

impl<N: Notification, H: NotificationHandler<N>> TypedNotificationHandler<N, H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<N: Notification, H: NotificationHandler<N>> DynNotificationHandler
    for TypedNotificationHandler<N, H>
{
    async fn handle_dyn(
        &self,
        notification: &(dyn Any + Send + Sync),
        cancel: &CancelSignal,
    ) -> Result<(), HandlerError> {
        let notification = notification.downcast_ref::<N>().ok_or(TypeMismatch {
            expected: TypeTag::of::<N>(),
        })?;
        self.handler.handle(notification, cancel).await
    }

    fn notification_type(&self) -> TypeTag {
        TypeTag::of::<N>()
    }
}

/// Adapts a plain synchronous function into a handler.
///
/// ```ignore
/// builder.handler::<Echo, _>(handler_fn(|req: &Echo| Ok(format!("OK:{}", req.0))))?;
/// ```
pub struct FnHandler<F> {
    f: F,
}

pub fn handler_fn<F>(f: F) -> FnHandler<F> {
    FnHandler { f }
}

#[async_trait]
impl<R, F> RequestHandler<R> for FnHandler<F>
where
    R: Request,
    F: Fn(&R) -> Result<R::Response, HandlerError> + Send + Sync,
{
    async fn handle(&self, request: &R, _cancel: &CancelSignal) -> Result<R::Response, HandlerError> {
        (self.f)(request)
    }
}

#[async_trait]
impl<N, F> NotificationHandler<N> for FnHandler<F>
where
    N: Notification,
    F: Fn(&N) -> Result<(), HandlerError> + Send + Sync,
{
    async fn handle(&self, notification: &N, _cancel: &CancelSignal) -> Result<(), HandlerError> {
        (self.f)(notification)
    }
}
