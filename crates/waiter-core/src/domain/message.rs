//! Message - Request / Notification の定義
//!
//! Request は「ちょうど 1 つの handler がちょうど 1 つの Response を返す」メッセージ、
//! Notification は「0 個以上の handler に配られる」戻り値なしのメッセージ。

use super::type_tag::TypeTag;

/// A message answered by exactly one handler.
///
/// ```ignore
/// struct Echo(String);
///
/// impl Request for Echo {
///     type Response = String;
/// }
/// ```
///
/// Handlers and behaviors only ever see `&Self`, so a behavior that re-runs the
/// rest of the pipeline (retry) can do so without cloning the request.
pub trait Request: Send + Sync + 'static {
    type Response: Send + 'static;

    fn type_tag() -> TypeTag
    where
        Self: Sized,
    {
        TypeTag::of::<Self>()
    }
}

/// A message fanned out to every handler registered for its type.
pub trait Notification: Send + Sync + 'static {
    fn type_tag() -> TypeTag
    where
        Self: Sized,
    {
        TypeTag::of::<Self>()
    }
}
