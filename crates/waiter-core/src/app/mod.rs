//! App - アプリケーション層
//!
//! typed の Registry と ports を組み合わせて、Mediator の振る舞いを実装します。
//!
//! # 主要コンポーネント
//! - **WaiterBuilder**: 登録と起動時検証
//! - **Dispatcher**: `send` / `publish` の実行
//! - **pipeline**: behavior chain の組み立て（外側 = 先に登録したもの）
//! - **QueueWorker**: Event Queue を drain するバックグラウンドループ

pub mod builder;
pub mod dispatcher;
mod pipeline;
pub mod worker_loop;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, WaiterBuilder};
pub use self::dispatcher::Dispatcher;
pub use self::worker_loop::{ExitReason, QueueWorker, WorkerError, WorkerExit, WorkerHandle};
