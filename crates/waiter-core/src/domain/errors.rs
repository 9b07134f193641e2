//! Errors - エラー型と分類
//!
//! - **設定エラー**: handler 未登録（`DispatchError::HandlerNotFound`）
//! - **handler / behavior のエラー**: そのまま呼び出し元へ（`DispatchError::Handler`）
//!
//! エンジンが自分で検出したもの以外はラップし直さない。

use std::any::Any;
use std::error::Error as StdError;

use thiserror::Error;

use super::type_tag::TypeTag;

/// Error type handlers and behaviors return.
///
/// Boxed so every handler can keep its own error type; callers get the
/// original value back through [`DispatchError::downcast_ref`].
pub type HandlerError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("handler not found for request type {0}")]
    HandlerNotFound(TypeTag),

    #[error(transparent)]
    Handler(HandlerError),
}

impl DispatchError {
    pub fn is_handler_not_found(&self) -> bool {
        matches!(self, Self::HandlerNotFound(_))
    }

    /// The error raised inside the pipeline, if any.
    pub fn handler_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Self::Handler(err) => Some(err.as_ref()),
            Self::HandlerNotFound(_) => None,
        }
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.handler_error().and_then(|err| err.downcast_ref::<E>())
    }
}

impl From<HandlerError> for DispatchError {
    fn from(err: HandlerError) -> Self {
        Self::Handler(err)
    }
}

/// Returned by behaviors that observe a cancelled [`CancelSignal`](super::CancelSignal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation was cancelled")]
pub struct Cancelled;

/// A type-erased value did not have the type it was registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("value is not of type {expected}")]
pub struct TypeMismatch {
    pub expected: TypeTag,
}

/// A handler panicked while the queue worker was publishing an item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("handler panicked: {message}")]
pub struct HandlerPanicked {
    pub message: String,
}

impl HandlerPanicked {
    /// Build from a `catch_unwind` payload. Non-string payloads get a fixed message.
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }
}
