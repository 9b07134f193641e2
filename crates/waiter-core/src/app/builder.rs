//! WaiterBuilder - Registry の組み立てと Dispatcher の生成
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - build() 後は Registry を変更できない（Dispatcher が Arc で共有するだけ）

use crate::domain::{Notification, Request, TypeTag};
use crate::typed::{
    NotificationHandler, OpenBehavior, PipelineBehavior, Registry, RegistryError, RequestHandler,
};

use super::Dispatcher;

/// WaiterBuilder は Dispatcher を構築
///
/// # 使用例
/// ```ignore
/// let dispatcher = WaiterBuilder::new()
///     .handler::<Echo, _>(EchoHandler)?
///     .notification_handler::<Ping, _>(PingLogger)
///     .open_behavior(TracingBehavior)
///     .expect_requests(&[Echo::type_tag()])
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - expect_requests() で handler が必要な Request 型を宣言
/// - build() 時に「期待集合 ⊆ 登録済み集合」をチェック
/// - 不足があれば BuildError を返す
pub struct WaiterBuilder {
    registry: Registry,
    expected_requests: Option<Vec<TypeTag>>,
}

/// BuildError は Dispatcher 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing request handlers: {0:?}. These requests were expected but not registered.")]
    MissingHandlers(Vec<String>),
}

impl WaiterBuilder {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            expected_requests: None,
        }
    }

    /// Request handler を登録（1 型につき 1 つ）
    pub fn handler<R: Request, H: RequestHandler<R> + 'static>(
        mut self,
        handler: H,
    ) -> Result<Self, RegistryError> {
        self.registry.register_handler::<R, H>(handler)?;
        Ok(self)
    }

    /// Notification handler を追加（登録順に実行される）
    pub fn notification_handler<N: Notification, H: NotificationHandler<N> + 'static>(
        mut self,
        handler: H,
    ) -> Self {
        self.registry.register_notification_handler::<N, H>(handler);
        self
    }

    /// `R` 専用の behavior を追加。先に登録したものほど外側
    pub fn behavior<R: Request, B: PipelineBehavior<R> + 'static>(mut self, behavior: B) -> Self {
        self.registry.register_behavior::<R, B>(behavior);
        self
    }

    /// 全 Request 共通の behavior を追加。型付き behavior と登録順で混ざる
    pub fn open_behavior<B: OpenBehavior + 'static>(mut self, behavior: B) -> Self {
        self.registry.register_open_behavior(behavior);
        self
    }

    pub fn expect_requests(mut self, requests: &[TypeTag]) -> Self {
        self.expected_requests = Some(requests.to_vec());
        self
    }

    /// Registry を凍結して Dispatcher を生成
    ///
    /// # 検証
    /// - expect_requests() で宣言された Request 型に handler があるかチェック
    /// - 不足があれば BuildError::MissingHandlers を返す
    pub fn build(self) -> Result<Dispatcher, BuildError> {
        if let Some(expected) = &self.expected_requests {
            let missing: Vec<String> = expected
                .iter()
                .filter(|tag| !self.registry.has_handler(**tag))
                .map(|tag| tag.name().to_string())
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingHandlers(missing));
            }
        }
        Ok(Dispatcher::new(self.registry))
    }
}

impl Default for WaiterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
