//! 組み込みの OpenBehavior
//!
//! - **TracingBehavior**: request ごとの開始 / 終了 / latency をログ
//! - **CancellationBehavior**: すでに cancel 済みなら handler を呼ばずに `Cancelled`
//! - **RetryBehavior**: 失敗したら `next` を再実行
//!
//! エンジン自体は retry しない。必要なら behavior として足す。

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{CancelSignal, Cancelled, HandlerError};
use crate::typed::{AnyResponse, Next, OpenBehavior, RequestContext};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingBehavior;

#[async_trait]
impl OpenBehavior for TracingBehavior {
    async fn handle(
        &self,
        request: RequestContext<'_>,
        _cancel: &CancelSignal,
        next: Next<'_, AnyResponse>,
    ) -> Result<AnyResponse, HandlerError> {
        let start = Instant::now();
        debug!(request_type = request.request_type(), "handling request");
        let result = next.run().await;
        let latency_ms = saturating_millis(start.elapsed());
        match &result {
            Ok(_) => debug!(request_type = request.request_type(), latency_ms, "request handled"),
            Err(err) => warn!(
                request_type = request.request_type(),
                latency_ms,
                error = %err,
                "request failed"
            ),
        }
        result
    }
}

/// Milliseconds as `u64`, clamped instead of truncated.
fn saturating_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CancellationBehavior;

#[async_trait]
impl OpenBehavior for CancellationBehavior {
    async fn handle(
        &self,
        request: RequestContext<'_>,
        cancel: &CancelSignal,
        next: Next<'_, AnyResponse>,
    ) -> Result<AnyResponse, HandlerError> {
        if cancel.is_cancelled() {
            debug!(request_type = request.request_type(), "request cancelled before handling");
            return Err(Cancelled.into());
        }
        next.run().await
    }
}

/// Re-runs the inner pipeline until it succeeds or `max_attempts` is reached.
///
/// Inner behaviors and the handler run once per attempt, so they must tolerate
/// repeated invocation. Stops early when the cancel signal fires.
#[derive(Debug, Clone, Copy)]
pub struct RetryBehavior {
    max_attempts: u32,
}

impl RetryBehavior {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

#[async_trait]
impl OpenBehavior for RetryBehavior {
    async fn handle(
        &self,
        request: RequestContext<'_>,
        cancel: &CancelSignal,
        next: Next<'_, AnyResponse>,
    ) -> Result<AnyResponse, HandlerError> {
        let mut attempt = 1;
        loop {
            match next.run().await {
                Ok(response) => return Ok(response),
                Err(err) if attempt < self.max_attempts && !cancel.is_cancelled() => {
                    warn!(
                        request_type = request.request_type(),
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "retrying request"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
