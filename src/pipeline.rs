//! Per-request fetch → filter → order pipeline.
//!
//! ```text
//!  top_ids()         one task per candidate          join         sort by rank
//! ┌──────────┐  spawn ┌──────────────┐ append ┌───────────┐  ┌──────────────┐
//! │ [id; n]  │ ─────► │ resolve_one  │ ─────► │ Collector │─►│   Payload    │
//! └──────────┘        └──────────────┘ (lock) └───────────┘  └──────────────┘
//! ```
//!
//! A failed top-list fetch aborts the request before any task is spawned.
//! Per-item failures are logged and contribute nothing.  Tasks are never
//! cancelled, even once the collector is full.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::collector::{self, Collector, SharedCollector};
use crate::source::{qualifies, ItemId, ItemSource, Story};

/// How many identifiers from the top list get a resolution task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidatePolicy {
    /// Exactly as many as the requested story count.  Any failure or
    /// non-story leaves the page short.
    #[default]
    Exact,
    /// At least this many; surplus completions are dropped by the collector.
    Window(usize),
}

impl CandidatePolicy {
    /// Number of tasks to spawn for `capacity` stories out of `available` ids.
    pub fn candidates(self, capacity: usize, available: usize) -> usize {
        let wanted = match self {
            CandidatePolicy::Exact => capacity,
            CandidatePolicy::Window(window) => window.max(capacity),
        };
        wanted.min(available)
    }
}

/// Outcome of resolving the identifier at rank `index`.
#[derive(Debug)]
pub struct Resolution {
    pub index: usize,
    pub id: ItemId,
    pub outcome: anyhow::Result<Story>,
}

/// Everything a renderer needs for one page.
#[derive(Debug, Clone)]
pub struct Payload {
    pub stories: Vec<Story>,
    pub elapsed: Duration,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to load top stories from {source_name}")]
    TopStories {
        source_name: String,
        #[source]
        cause: anyhow::Error,
    },
}

/// Runs one complete batch per call.  Cheap to clone; clones share the
/// source but never any per-request state.
#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn ItemSource>,
    num_stories: usize,
    policy: CandidatePolicy,
}

impl Pipeline {
    pub fn new(source: Arc<dyn ItemSource>, num_stories: usize, policy: CandidatePolicy) -> Self {
        Self {
            source,
            num_stories,
            policy,
        }
    }

    pub fn num_stories(&self) -> usize {
        self.num_stories
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub async fn run(&self) -> Result<Payload, PipelineError> {
        let start = Instant::now();

        let ids = self
            .source
            .top_ids()
            .await
            .map_err(|cause| PipelineError::TopStories {
                source_name: self.source.name().to_string(),
                cause,
            })?;

        let candidates = self.policy.candidates(self.num_stories, ids.len());
        let collector = Collector::shared(self.num_stories);
        debug!(available = ids.len(), candidates, "dispatching resolution tasks");

        let mut tasks = JoinSet::new();
        for (index, &id) in ids.iter().take(candidates).enumerate() {
            let source = Arc::clone(&self.source);
            let collector = Arc::clone(&collector);
            tasks.spawn(resolve_one(source, id, index, collector));
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!("resolution task did not finish: {e}");
            }
        }

        let stories = collector::take_ordered(collector);
        let elapsed = start.elapsed();
        info!(
            stories = stories.len(),
            candidates,
            elapsed_ms = elapsed.as_millis() as u64,
            "batch complete"
        );

        Ok(Payload { stories, elapsed })
    }
}

/// Resolve one identifier and offer it to the collector if it qualifies.
async fn resolve_one(
    source: Arc<dyn ItemSource>,
    id: ItemId,
    index: usize,
    collector: SharedCollector,
) {
    let resolution = Resolution {
        index,
        id,
        outcome: source.item(id).await.map(Story::from_item),
    };

    match resolution.outcome {
        Ok(story) if qualifies(&story.item) => {
            let accepted = collector::append_shared(&collector, resolution.index, story);
            debug!(index = resolution.index, id = resolution.id, accepted, "story resolved");
        }
        Ok(story) => {
            debug!(index = resolution.index, id = resolution.id, kind = %story.item.kind, "not a link story");
        }
        Err(e) => {
            debug!(index = resolution.index, id = resolution.id, "item fetch failed: {e:#}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
