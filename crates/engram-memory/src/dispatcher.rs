// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fan-out of message-write notifications to registered extractors.
//!
//! The dispatcher holds a fixed, process-initialized list of extractor
//! handles. Every event spawns one independent task per extractor: a slow or
//! failing extractor never blocks the writer, the other extractors, or the
//! persisted append.

use std::sync::Arc;
use std::time::Duration;

use engram_core::{AppState, EngramError, Extractor, MessageEvent};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Delivers write notifications to all registered extractors.
pub struct ExtractorDispatcher {
    extractors: Vec<Arc<dyn Extractor>>,
    shutdown: CancellationToken,
}

impl ExtractorDispatcher {
    /// Build the dispatcher with its full extractor set. Registration is
    /// one-time; there is no runtime attach.
    pub fn new(extractors: Vec<Arc<dyn Extractor>>) -> Self {
        Self {
            extractors,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn extractor_count(&self) -> usize {
        self.extractors.len()
    }

    /// Fan one event out to every extractor on independent tasks.
    ///
    /// Failures are counted and logged, never propagated: enrichment is
    /// best-effort. The returned handle joins the batch for callers that
    /// need synchronous completion; the default path drops it.
    pub fn dispatch(&self, state: Arc<AppState>, event: MessageEvent) -> DispatchHandle {
        metrics::counter!("engram_dispatch_events_total").increment(1);
        debug!(
            session_id = %event.session_id,
            extractors = self.extractors.len(),
            batch = event.messages.len(),
            "dispatching message event"
        );

        let mut tasks = Vec::with_capacity(self.extractors.len());
        for extractor in &self.extractors {
            let extractor = Arc::clone(extractor);
            let state = Arc::clone(&state);
            let event = event.clone();
            let shutdown = self.shutdown.clone();
            tasks.push(tokio::spawn(async move {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        warn!(extractor = extractor.name(), "extraction aborted by shutdown");
                    }
                    result = extractor.extract(&state, &event) => {
                        if let Err(e) = result {
                            metrics::counter!(
                                "engram_extraction_failures_total",
                                "extractor" => extractor.name().to_string()
                            )
                            .increment(1);
                            warn!(
                                extractor = extractor.name(),
                                session_id = %event.session_id,
                                error = %e,
                                "extractor failed; persisted write unaffected"
                            );
                        }
                    }
                }
            }));
        }
        DispatchHandle { tasks }
    }

    /// Abort in-flight extractor tasks promptly. Idempotent.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Handle over one dispatched batch of extractor tasks.
pub struct DispatchHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl DispatchHandle {
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every extractor task in the batch to finish.
    pub async fn join(self) {
        for task in self.tasks {
            let _ = task.await;
        }
    }

    /// Wait for the batch with an upper bound. When the bound is hit the
    /// wait returns `Timeout`; the extractor tasks themselves keep running.
    pub async fn join_timeout(self, duration: Duration) -> Result<(), EngramError> {
        tokio::time::timeout(duration, self.join())
            .await
            .map_err(|_| EngramError::Timeout { duration })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use engram_core::EngramError;
    use engram_test_utils::{test_app_state, MockEmbedder};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingExtractor {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Extractor for CountingExtractor {
        fn name(&self) -> &str {
            "counting"
        }

        async fn extract(
            &self,
            _state: &AppState,
            _event: &MessageEvent,
        ) -> Result<(), EngramError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct SlowExtractor {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Extractor for SlowExtractor {
        fn name(&self) -> &str {
            "slow"
        }

        async fn extract(
            &self,
            _state: &AppState,
            _event: &MessageEvent,
        ) -> Result<(), EngramError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingExtractor;

    #[async_trait]
    impl Extractor for FailingExtractor {
        fn name(&self) -> &str {
            "failing"
        }

        async fn extract(
            &self,
            _state: &AppState,
            _event: &MessageEvent,
        ) -> Result<(), EngramError> {
            Err(EngramError::Extraction {
                extractor: "failing".to_string(),
                message: "intentional".to_string(),
            })
        }
    }

    fn make_event() -> MessageEvent {
        MessageEvent {
            session_id: "sess-1".to_string(),
            messages: vec![],
        }
    }

    #[tokio::test]
    async fn dispatch_invokes_every_extractor() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = ExtractorDispatcher::new(vec![
            Arc::new(CountingExtractor { calls: Arc::clone(&calls) }) as Arc<dyn Extractor>,
            Arc::new(CountingExtractor { calls: Arc::clone(&calls) }),
        ]);
        let state = test_app_state(Arc::new(MockEmbedder::new(8)), 8);

        let handle = dispatcher.dispatch(state, make_event());
        assert_eq!(handle.task_count(), 2);
        handle.join().await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn one_failure_does_not_stop_the_others() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = ExtractorDispatcher::new(vec![
            Arc::new(FailingExtractor) as Arc<dyn Extractor>,
            Arc::new(CountingExtractor { calls: Arc::clone(&calls) }),
        ]);
        let state = test_app_state(Arc::new(MockEmbedder::new(8)), 8);

        dispatcher.dispatch(state, make_event()).join().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1, "healthy extractor still ran");
        assert!(logs_contain("extractor failed"), "failure was reported");
    }

    #[tokio::test]
    async fn shutdown_aborts_pending_dispatch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = ExtractorDispatcher::new(vec![Arc::new(SlowExtractor {
            calls: Arc::clone(&calls),
        }) as Arc<dyn Extractor>]);
        let state = test_app_state(Arc::new(MockEmbedder::new(8)), 8);

        let handle = dispatcher.dispatch(state, make_event());
        dispatcher.shutdown();
        handle.join().await;

        assert_eq!(calls.load(Ordering::SeqCst), 0, "slow work was abandoned");
    }

    #[tokio::test]
    async fn bounded_join_times_out_on_slow_extractors() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = ExtractorDispatcher::new(vec![Arc::new(SlowExtractor {
            calls: Arc::clone(&calls),
        }) as Arc<dyn Extractor>]);
        let state = test_app_state(Arc::new(MockEmbedder::new(8)), 8);

        let handle = dispatcher.dispatch(state, make_event());
        let err = handle
            .join_timeout(Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, EngramError::Timeout { .. }));
    }
}
