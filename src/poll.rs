//! Background refresh for the terminal view.
//!
//! Runs as a tokio task that executes a full pipeline batch, sends the result
//! to the UI loop, then waits for either the refresh interval or an explicit
//! refresh request.  Each batch is independent; nothing is carried over.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::pipeline::{Payload, Pipeline};

/// Messages sent from the poller task to the UI loop.
pub enum PollMsg {
    /// A batch completed.
    Stories(Payload),
    /// The top list could not be loaded.
    Error(String),
}

/// Handle the UI loop keeps to talk to the poller.
pub struct Poller {
    pub rx: mpsc::UnboundedReceiver<PollMsg>,
    refresh_tx: mpsc::UnboundedSender<()>,
}

impl Poller {
    /// Ask for a new batch now instead of waiting for the timer.
    pub fn refresh(&self) {
        let _ = self.refresh_tx.send(());
    }
}

/// Spawn the poller on the current tokio runtime.
///
/// The task stops once the [`Poller`] is dropped.
pub fn spawn(pipeline: Pipeline, interval: Duration) -> Poller {
    let (tx, rx) = mpsc::unbounded_channel();
    let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let msg = match pipeline.run().await {
                Ok(payload) => PollMsg::Stories(payload),
                Err(e) => PollMsg::Error(format!("{:#}", anyhow::Error::new(e))),
            };
            if tx.send(msg).is_err() {
                return;
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                req = refresh_rx.recv() => {
                    if req.is_none() {
                        return;
                    }
                }
            }
        }
    });

    Poller { rx, refresh_tx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::pipeline::tests::StubSource;
    use crate::pipeline::CandidatePolicy;

    #[tokio::test]
    async fn sends_a_batch_immediately_and_on_refresh() {
        let source = StubSource::with_top(vec![1, 2]).story(1).story(2);
        let pipeline = Pipeline::new(Arc::new(source), 2, CandidatePolicy::Exact);
        let mut poller = spawn(pipeline, Duration::from_secs(3600));

        let Some(PollMsg::Stories(first)) = poller.rx.recv().await else {
            panic!("expected a batch");
        };
        assert_eq!(first.stories.len(), 2);

        poller.refresh();
        assert!(matches!(poller.rx.recv().await, Some(PollMsg::Stories(_))));
    }

    #[test]
    fn delivers_to_a_blocking_caller_outside_async_context() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let _enter = runtime.enter();

        let source = StubSource::with_top(vec![1]).story(1).delay(1, 20);
        let pipeline = Pipeline::new(Arc::new(source), 1, CandidatePolicy::Exact);
        let mut poller = spawn(pipeline, Duration::from_secs(3600));

        // Same shape as the terminal loop: try_recv between blocking waits.
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        let msg = loop {
            if let Ok(msg) = poller.rx.try_recv() {
                break msg;
            }
            assert!(std::time::Instant::now() < deadline, "no batch arrived");
            std::thread::sleep(Duration::from_millis(10));
        };
        assert!(matches!(msg, PollMsg::Stories(p) if p.stories.len() == 1));
    }

    #[tokio::test]
    async fn reports_top_list_failure() {
        let pipeline = Pipeline::new(Arc::new(StubSource::default()), 2, CandidatePolicy::Exact);
        let mut poller = spawn(pipeline, Duration::from_secs(3600));

        let Some(PollMsg::Error(msg)) = poller.rx.recv().await else {
            panic!("expected an error");
        };
        assert!(msg.contains("failed to load top stories"));
    }
}
