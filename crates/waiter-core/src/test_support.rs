//! テスト用の Request / Notification / handler / behavior
//!
//! すべて `Trace` に実行順を記録するだけのスパイ。

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{CancelSignal, HandlerError, Notification, Request};
use crate::typed::{
    AnyResponse, Next, NotificationHandler, OpenBehavior, PipelineBehavior, RequestContext,
    RequestHandler,
};

/// Shared, ordered record of what ran.
#[derive(Debug, Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("boom: {0}")]
pub struct Boom(pub String);

// ---- requests ----

#[derive(Debug, Clone)]
pub struct Echo(pub String);

impl Echo {
    pub fn new(data: impl Into<String>) -> Self {
        Self(data.into())
    }
}

impl Request for Echo {
    type Response = String;
}

#[derive(Debug, Clone)]
pub struct Shout(pub String);

impl Shout {
    pub fn new(data: impl Into<String>) -> Self {
        Self(data.into())
    }
}

impl Request for Shout {
    type Response = String;
}

/// Never registered anywhere.
#[derive(Debug)]
pub struct Unregistered;

impl Request for Unregistered {
    type Response = ();
}

// ---- notifications ----

#[derive(Debug, Clone, Copy)]
pub struct Ping;

impl Notification for Ping {}

#[derive(Debug, Clone)]
pub struct Event(pub String);

impl Event {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }
}

impl Notification for Event {}

// ---- request handlers ----

pub struct EchoHandler;

#[async_trait]
impl RequestHandler<Echo> for EchoHandler {
    async fn handle(&self, request: &Echo, _cancel: &CancelSignal) -> Result<String, HandlerError> {
        Ok(format!("OK:{}", request.0))
    }
}

pub struct ShoutHandler;

#[async_trait]
impl RequestHandler<Shout> for ShoutHandler {
    async fn handle(&self, request: &Shout, _cancel: &CancelSignal) -> Result<String, HandlerError> {
        Ok(request.0.to_uppercase())
    }
}

/// Records `"H"` then echoes.
pub struct TracedEchoHandler {
    trace: Trace,
}

impl TracedEchoHandler {
    pub fn new(trace: Trace) -> Self {
        Self { trace }
    }
}

#[async_trait]
impl RequestHandler<Echo> for TracedEchoHandler {
    async fn handle(&self, request: &Echo, _cancel: &CancelSignal) -> Result<String, HandlerError> {
        self.trace.push("H");
        Ok(format!("OK:{}", request.0))
    }
}

pub struct FailingEchoHandler;

#[async_trait]
impl RequestHandler<Echo> for FailingEchoHandler {
    async fn handle(&self, request: &Echo, _cancel: &CancelSignal) -> Result<String, HandlerError> {
        Err(Boom(request.0.clone()).into())
    }
}

/// Fails the first `failures` calls, then echoes. Every call is recorded.
pub struct FlakyEchoHandler {
    failures: u32,
    calls: AtomicU32,
    trace: Trace,
}

impl FlakyEchoHandler {
    pub fn new(failures: u32, trace: Trace) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
            trace,
        }
    }
}

#[async_trait]
impl RequestHandler<Echo> for FlakyEchoHandler {
    async fn handle(&self, request: &Echo, _cancel: &CancelSignal) -> Result<String, HandlerError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.trace.push(format!("call-{call}"));
        if call <= self.failures {
            return Err(Boom(request.0.clone()).into());
        }
        Ok(format!("OK:{}", request.0))
    }
}

pub struct CancelAwareHandler;

#[async_trait]
impl RequestHandler<Echo> for CancelAwareHandler {
    async fn handle(&self, request: &Echo, cancel: &CancelSignal) -> Result<String, HandlerError> {
        cancel.check()?;
        Ok(format!("OK:{}", request.0))
    }
}

// ---- notification handlers ----

/// Records its name for `Ping`, `"{name}:{payload}"` for `Event`.
/// Fails on `Event("bad")` after recording.
pub struct RecordingNotificationHandler {
    name: String,
    trace: Trace,
}

impl RecordingNotificationHandler {
    pub fn new(name: impl Into<String>, trace: Trace) -> Self {
        Self {
            name: name.into(),
            trace,
        }
    }
}

#[async_trait]
impl NotificationHandler<Ping> for RecordingNotificationHandler {
    async fn handle(&self, _notification: &Ping, _cancel: &CancelSignal) -> Result<(), HandlerError> {
        self.trace.push(self.name.clone());
        Ok(())
    }
}

#[async_trait]
impl NotificationHandler<Event> for RecordingNotificationHandler {
    async fn handle(&self, notification: &Event, _cancel: &CancelSignal) -> Result<(), HandlerError> {
        self.trace.push(format!("{}:{}", self.name, notification.0));
        if notification.0 == "bad" {
            return Err(Boom(notification.0.clone()).into());
        }
        Ok(())
    }
}

// ---- behaviors ----

/// Records `"{name}-in"` and, on success, `"{name}-out"`.
pub struct RecordingBehavior {
    name: String,
    trace: Trace,
}

impl RecordingBehavior {
    pub fn new(name: impl Into<String>, trace: Trace) -> Self {
        Self {
            name: name.into(),
            trace,
        }
    }
}

#[async_trait]
impl<R: Request> PipelineBehavior<R> for RecordingBehavior {
    async fn handle(
        &self,
        _request: &R,
        _cancel: &CancelSignal,
        next: Next<'_, R::Response>,
    ) -> Result<R::Response, HandlerError> {
        self.trace.push(format!("{}-in", self.name));
        let response = next.run().await?;
        self.trace.push(format!("{}-out", self.name));
        Ok(response)
    }
}

/// Returns a fixed value without calling `next`.
pub struct ShortCircuitBehavior {
    value: String,
    trace: Trace,
}

impl ShortCircuitBehavior {
    pub fn new(value: impl Into<String>, trace: Trace) -> Self {
        Self {
            value: value.into(),
            trace,
        }
    }
}

#[async_trait]
impl PipelineBehavior<Echo> for ShortCircuitBehavior {
    async fn handle(
        &self,
        _request: &Echo,
        _cancel: &CancelSignal,
        _next: Next<'_, String>,
    ) -> Result<String, HandlerError> {
        self.trace.push("short-circuit");
        Ok(self.value.clone())
    }
}

pub struct RecordingOpenBehavior {
    name: String,
    trace: Trace,
}

impl RecordingOpenBehavior {
    pub fn new(name: impl Into<String>, trace: Trace) -> Self {
        Self {
            name: name.into(),
            trace,
        }
    }
}

#[async_trait]
impl OpenBehavior for RecordingOpenBehavior {
    async fn handle(
        &self,
        _request: RequestContext<'_>,
        _cancel: &CancelSignal,
        next: Next<'_, AnyResponse>,
    ) -> Result<AnyResponse, HandlerError> {
        self.trace.push(format!("{}-in", self.name));
        let response = next.run().await?;
        self.trace.push(format!("{}-out", self.name));
        Ok(response)
    }
}
