//! Pipeline - behavior 列と handler を 1 つの continuation に畳み込む
//!
//! # 学習ポイント
//! - `Iterator::rev().fold()` による middleware chain の構築
//! - 借用だけで組み立てる（request / cancel / behaviors は呼び出し側のスタックにある）
//!
//! 最後の behavior から順に包むので、実行時は先に登録された behavior が外側になる:
//! `B1-in → B2-in → H → B2-out → B1-out`

use std::sync::Arc;

use crate::domain::{CancelSignal, Request};
use crate::typed::{Continuation, Next, PipelineBehavior, RequestHandler};

pub(crate) fn build_chain<'a, R: Request>(
    request: &'a R,
    cancel: &'a CancelSignal,
    handler: &'a dyn RequestHandler<R>,
    behaviors: &'a [Arc<dyn PipelineBehavior<R>>],
) -> Continuation<'a, R::Response> {
    let terminal: Continuation<'a, R::Response> =
        Arc::new(move || handler.handle(request, cancel));

    behaviors
        .iter()
        .rev()
        .fold(terminal, |next, behavior| -> Continuation<'a, R::Response> {
            Arc::new(move || behavior.handle(request, cancel, Next::new(Arc::clone(&next))))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        Echo, RecordingBehavior, ShortCircuitBehavior, Trace, TracedEchoHandler,
    };

    #[tokio::test]
    async fn empty_behavior_list_runs_handler_directly() {
        let trace = Trace::new();
        let handler = TracedEchoHandler::new(trace.clone());
        let request = Echo::new("X");
        let cancel = CancelSignal::never();

        let chain = build_chain(&request, &cancel, &handler, &[]);

        assert_eq!(chain().await.unwrap(), "OK:X");
        assert_eq!(trace.entries(), vec!["H"]);
    }

    #[tokio::test]
    async fn first_registered_behavior_is_outermost() {
        let trace = Trace::new();
        let handler = TracedEchoHandler::new(trace.clone());
        let behaviors: Vec<Arc<dyn PipelineBehavior<Echo>>> = vec![
            Arc::new(RecordingBehavior::new("P1", trace.clone())),
            Arc::new(RecordingBehavior::new("P2", trace.clone())),
        ];
        let request = Echo::new("X");
        let cancel = CancelSignal::never();

        let chain = build_chain(&request, &cancel, &handler, &behaviors);
        let response = chain().await.unwrap();

        assert_eq!(response, "OK:X");
        assert_eq!(
            trace.entries(),
            vec!["P1-in", "P2-in", "H", "P2-out", "P1-out"]
        );
    }

    #[tokio::test]
    async fn short_circuit_skips_inner_behaviors_and_handler() {
        let trace = Trace::new();
        let handler = TracedEchoHandler::new(trace.clone());
        let behaviors: Vec<Arc<dyn PipelineBehavior<Echo>>> = vec![
            Arc::new(RecordingBehavior::new("P1", trace.clone())),
            Arc::new(ShortCircuitBehavior::new("cached", trace.clone())),
            Arc::new(RecordingBehavior::new("P3", trace.clone())),
        ];
        let request = Echo::new("X");
        let cancel = CancelSignal::never();

        let chain = build_chain(&request, &cancel, &handler, &behaviors);

        assert_eq!(chain().await.unwrap(), "cached");
        assert_eq!(trace.entries(), vec!["P1-in", "short-circuit", "P1-out"]);
    }

    #[tokio::test]
    async fn chain_can_be_invoked_more_than_once() {
        let trace = Trace::new();
        let handler = TracedEchoHandler::new(trace.clone());
        let request = Echo::new("X");
        let cancel = CancelSignal::never();

        let chain = build_chain(&request, &cancel, &handler, &[]);
        chain().await.unwrap();
        chain().await.unwrap();

        assert_eq!(trace.entries(), vec!["H", "H"]);
    }
}
