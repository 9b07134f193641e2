//! PipelineBehavior - handler 実行を包む middleware
//!
//! # 学習ポイント
//! - `Next` continuation（何回呼んでもよい `Fn` として持つ）
//! - 型付き behavior (`PipelineBehavior<R>`) と全 Request 共通の behavior (`OpenBehavior`)
//! - `OpenAdapter<R>` による open behavior → 型付き behavior の変換

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};

use crate::domain::{CancelSignal, HandlerError, Request, TypeMismatch, TypeTag};

/// Everything after the current behavior, as a re-invocable future factory.
pub type Continuation<'a, T> =
    Arc<dyn Fn() -> BoxFuture<'a, Result<T, HandlerError>> + Send + Sync + 'a>;

/// The rest of the pipeline (inner behaviors + handler).
///
/// A behavior may call [`Next::run`] zero times (short-circuit), once, or
/// several times (retry). Each call runs the whole inner chain again.
pub struct Next<'a, T> {
    continuation: Continuation<'a, T>,
}

impl<'a, T: Send + 'a> Next<'a, T> {
    pub fn new(continuation: Continuation<'a, T>) -> Self {
        Self { continuation }
    }

    pub fn run(&self) -> BoxFuture<'a, Result<T, HandlerError>> {
        (self.continuation)()
    }

    pub(crate) fn map<U, F>(self, f: F) -> Next<'a, U>
    where
        U: Send + 'a,
        F: Fn(T) -> U + Send + Sync + 'a,
    {
        let inner = self.continuation;
        let f = Arc::new(f);
        Next::new(Arc::new(move || {
            let fut = inner();
            let f = Arc::clone(&f);
            async move { fut.await.map(|value| f(value)) }.boxed()
        }))
    }
}

impl<T> Clone for Next<'_, T> {
    fn clone(&self) -> Self {
        Self {
            continuation: Arc::clone(&self.continuation),
        }
    }
}

/// A behavior bound to one request type.
///
/// # 使用例
/// ```ignore
/// struct RejectEmpty;
///
/// #[async_trait]
/// impl PipelineBehavior<Echo> for RejectEmpty {
///     async fn handle(&self, request: &Echo, _cancel: &CancelSignal, next: Next<'_, String>)
///         -> Result<String, HandlerError>
///     {
///         if request.0.is_empty() {
///             return Err("empty echo".into());
///         }
///         next.run().await
///     }
/// }
/// ```
#[async_trait]
pub trait PipelineBehavior<R: Request>: Send + Sync {
    async fn handle(
        &self,
        request: &R,
        cancel: &CancelSignal,
        next: Next<'_, R::Response>,
    ) -> Result<R::Response, HandlerError>;
}

/// Response as seen by an [`OpenBehavior`].
pub type AnyResponse = Box<dyn Any + Send>;

/// Type-erased view of the request an [`OpenBehavior`] is wrapping.
#[derive(Clone, Copy)]
pub struct RequestContext<'a> {
    tag: TypeTag,
    request: &'a (dyn Any + Send + Sync),
}

impl<'a> RequestContext<'a> {
    pub fn new<R: Request>(request: &'a R) -> Self {
        Self {
            tag: TypeTag::of::<R>(),
            request,
        }
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn request_type(&self) -> &'static str {
        self.tag.short_name()
    }

    pub fn downcast_ref<R: Request>(&self) -> Option<&'a R> {
        self.request.downcast_ref::<R>()
    }
}

/// A behavior applied to every request type (logging, timing, retry, ...).
///
/// Open behaviors see the request and response type-erased. Returning the
/// value produced by `next` is always valid; returning anything else must be a
/// value of the request's actual response type.
#[async_trait]
pub trait OpenBehavior: Send + Sync {
    async fn handle(
        &self,
        request: RequestContext<'_>,
        cancel: &CancelSignal,
        next: Next<'_, AnyResponse>,
    ) -> Result<AnyResponse, HandlerError>;
}

/// Presents an [`OpenBehavior`] as a `PipelineBehavior<R>` for one concrete `R`.
pub(crate) struct OpenAdapter<R> {
    inner: Arc<dyn OpenBehavior>,
    _marker: PhantomData<fn() -> R>,
}

impl<R> OpenAdapter<R> {
    pub(crate) fn new(inner: Arc<dyn OpenBehavior>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<R: Request> PipelineBehavior<R> for OpenAdapter<R> {
    async fn handle(
        &self,
        request: &R,
        cancel: &CancelSignal,
        next: Next<'_, R::Response>,
    ) -> Result<R::Response, HandlerError> {
        let erased = next.map(|response| Box::new(response) as AnyResponse);
        let response = self
            .inner
            .handle(RequestContext::new(request), cancel, erased)
            .await?;
        match response.downcast::<R::Response>() {
            Ok(response) => Ok(*response),
            Err(_) => Err(TypeMismatch {
                expected: TypeTag::of::<R::Response>(),
            }
            .into()),
        }
    }
}
