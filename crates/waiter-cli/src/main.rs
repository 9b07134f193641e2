//! waiter デモ
//!
//! builder → send → publish → queue → worker shutdown を一通り動かす。
//! 第 1 引数に worker 設定の JSON ファイルを渡せる。
//!
//! ```text
//! RUST_LOG=debug cargo run -p waiter-cli -- worker.json
//! ```

mod telemetry;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{Duration, sleep};
use tracing::info;

use waiter_core::app::{BuildError, WorkerError};
use waiter_core::domain::{ConfigError, TypeTag};
use waiter_core::impls::{CancellationBehavior, RetryBehavior, TracingBehavior};
use waiter_core::ports::QueueError;
use waiter_core::typed::RegistryError;
use waiter_core::{
    CancelSignal, DispatchError, EventQueue, HandlerError, Notification, NotificationHandler,
    QueueWorker, Request, RequestHandler, WaiterBuilder, WorkerConfig,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Telemetry(#[from] telemetry::TelemetryError),
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

// ---- messages ----

struct Echo(String);

impl Request for Echo {
    type Response = String;
}

struct Ping;

impl Notification for Ping {}

struct OrderPlaced {
    id: u32,
}

impl Notification for OrderPlaced {}

// ---- handlers ----

struct EchoHandler;

#[async_trait]
impl RequestHandler<Echo> for EchoHandler {
    async fn handle(&self, request: &Echo, _cancel: &CancelSignal) -> Result<String, HandlerError> {
        Ok(format!("OK:{}", request.0))
    }
}

struct PingLogger {
    name: &'static str,
}

#[async_trait]
impl NotificationHandler<Ping> for PingLogger {
    async fn handle(&self, _notification: &Ping, _cancel: &CancelSignal) -> Result<(), HandlerError> {
        println!("{} received ping", self.name);
        Ok(())
    }
}

/// Rejects order 0 so the worker has something to report.
struct OrderMailer;

#[async_trait]
impl NotificationHandler<OrderPlaced> for OrderMailer {
    async fn handle(&self, order: &OrderPlaced, _cancel: &CancelSignal) -> Result<(), HandlerError> {
        if order.id == 0 {
            return Err(format!("order {} has no customer", order.id).into());
        }
        sleep(Duration::from_millis(10)).await;
        println!("mail sent for order {}", order.id);
        Ok(())
    }
}

fn load_config() -> Result<WorkerConfig, CliError> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(WorkerConfig::default());
    };
    let json = std::fs::read_to_string(&path).map_err(|source| CliError::ReadConfig {
        path: path.clone(),
        source,
    })?;
    let config = WorkerConfig::from_json(&json)?;
    info!(%path, ?config, "loaded worker config");
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    telemetry::initialise()?;
    let config = load_config()?;

    // (A) 登録して凍結
    let dispatcher = WaiterBuilder::new()
        .open_behavior(TracingBehavior)
        .open_behavior(CancellationBehavior)
        .open_behavior(RetryBehavior::new(2))
        .handler::<Echo, _>(EchoHandler)?
        .notification_handler::<Ping, _>(PingLogger { name: "H1" })
        .notification_handler::<Ping, _>(PingLogger { name: "H2" })
        .notification_handler::<OrderPlaced, _>(OrderMailer)
        .expect_requests(&[TypeTag::of::<Echo>()])
        .build()?;

    // (B) send / publish
    let reply = dispatcher.send(Echo("TEST".to_string())).await?;
    println!("send -> {reply}");
    dispatcher.publish(Ping).await?;

    // (C) queue + worker
    let (queue, reader) = EventQueue::from_config(&config);
    let worker = QueueWorker::new(reader, Arc::new(dispatcher.clone()))
        .with_config(&config)
        .start();

    for id in [1, 0, 2] {
        queue.enqueue(OrderPlaced { id }).await?;
    }

    // (D) 投入済みの分を流しきってから止める
    drop(queue);
    let exit = worker.join().await?;
    info!(
        reason = ?exit.reason,
        delivered = exit.delivered,
        failed = exit.failed,
        pending = exit.reader.len(),
        "demo finished"
    );
    Ok(())
}
