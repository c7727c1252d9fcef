//! Bounded accumulator shared by the resolution tasks of one request.
//!
//! Tasks finish in whatever order the network allows.  Each accepted story is
//! stored together with its rank index so [`Collector::into_ordered`] can put
//! the batch back into rank order once every task has been joined.

use std::sync::{Arc, Mutex, PoisonError};

use crate::source::Story;

/// Collector behind the lock that all tasks of one request share.
pub type SharedCollector = Arc<Mutex<Collector>>;

#[derive(Debug)]
pub struct Collector {
    /// `(rank index, story)` in completion order.
    accepted: Vec<(usize, Story)>,
    capacity: usize,
}

impl Collector {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            accepted: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn shared(capacity: usize) -> SharedCollector {
        Arc::new(Mutex::new(Self::with_capacity(capacity)))
    }

    /// Keep `story` unless the collector is already full.
    ///
    /// Returns whether the story was kept.  A full collector never evicts,
    /// whatever the incoming index.
    pub fn append(&mut self, index: usize, story: Story) -> bool {
        if self.is_full() {
            return false;
        }
        self.accepted.push((index, story));
        true
    }

    pub fn is_full(&self) -> bool {
        self.accepted.len() >= self.capacity
    }

    /// The accepted stories in ascending rank order.
    pub fn into_ordered(mut self) -> Vec<Story> {
        self.accepted.sort_unstable_by_key(|(index, _)| *index);
        self.accepted.into_iter().map(|(_, story)| story).collect()
    }
}

/// Check-and-append as one critical section.
///
/// A task that panicked while holding the lock cannot leave the collector
/// half-updated (`append` is a single push), so a poisoned lock is recovered.
pub fn append_shared(collector: &SharedCollector, index: usize, story: Story) -> bool {
    collector
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .append(index, story)
}

/// Take the contents out of a shared collector once all tasks are joined.
pub fn take_ordered(collector: SharedCollector) -> Vec<Story> {
    let collector = match Arc::try_unwrap(collector) {
        Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
        Err(shared) => {
            let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
            let capacity = guard.capacity;
            std::mem::replace(&mut *guard, Collector::with_capacity(capacity))
        }
    };
    collector.into_ordered()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Item;

    fn story(id: u64) -> Story {
        Story::from_item(Item {
            id,
            kind: "story".into(),
            url: Some(format!("https://example.com/{id}")),
            ..Item::default()
        })
    }

    fn ids(stories: &[Story]) -> Vec<u64> {
        stories.iter().map(|s| s.item.id).collect()
    }

    #[test]
    fn append_stops_at_capacity() {
        let mut collector = Collector::with_capacity(2);

        assert!(collector.append(4, story(40)));
        assert!(collector.append(1, story(10)));
        assert!(collector.is_full());
        assert!(!collector.append(0, story(1)), "full collector must not evict");
        assert_eq!(collector.into_ordered().len(), 2);
    }

    #[test]
    fn zero_capacity_accepts_nothing() {
        let mut collector = Collector::with_capacity(0);
        assert!(!collector.append(0, story(1)));
        assert!(collector.into_ordered().is_empty());
    }

    #[test]
    fn into_ordered_restores_rank_and_skips_gaps() {
        // Completion order 50, 10, 40 for ids at rank 4, 0, 3.
        let mut collector = Collector::with_capacity(3);
        collector.append(4, story(50));
        collector.append(0, story(10));
        collector.append(3, story(40));
        collector.append(2, story(30));

        assert_eq!(ids(&collector.into_ordered()), vec![10, 40, 50]);
    }

    #[test]
    fn shared_collector_never_exceeds_capacity_under_contention() {
        let shared = Collector::shared(5);

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || append_shared(&shared, i, story(i as u64)))
            })
            .collect();
        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|kept| *kept)
            .count();

        assert_eq!(accepted, 5);
        let ordered = take_ordered(shared);
        assert_eq!(ordered.len(), 5);
        assert!(ordered.windows(2).all(|w| w[0].item.id < w[1].item.id));
    }

    #[test]
    fn take_ordered_works_while_still_shared() {
        let shared = Collector::shared(3);
        let other = Arc::clone(&shared);
        append_shared(&shared, 1, story(2));
        append_shared(&shared, 0, story(1));

        assert_eq!(ids(&take_ordered(shared)), vec![1, 2]);
        assert!(!other.lock().unwrap().is_full());
    }
}
