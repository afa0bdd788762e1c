use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bus_core::{ResourceKey, WorkItem};
use tokio::sync::Notify;

/// Keyed work queue shared by the resource watch and the workers.
///
/// Items for the same resource are handed out in arrival order and never to
/// two workers at once: a key taken by [`WorkQueue::next`] stays reserved
/// until [`WorkQueue::done`] is called for it. Different keys are not
/// ordered relative to each other.
#[derive(Debug, Clone, Default)]
pub struct WorkQueue {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<QueueState>,
    notify: Notify,
}

#[derive(Debug, Default)]
struct QueueState {
    /// Undelivered items per key, oldest first
    pending: HashMap<ResourceKey, VecDeque<WorkItem>>,
    /// Keys with pending items that no worker holds
    ready: VecDeque<ResourceKey>,
    /// Keys currently held by a worker
    processing: HashSet<ResourceKey>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue a change.
    pub fn add(&self, item: WorkItem) {
        let mut state = self.state();
        let key = item.key.clone();
        let items = state.pending.entry(key.clone()).or_default();
        let was_idle = items.is_empty();
        items.push_back(item);

        if was_idle && !state.processing.contains(&key) {
            state.ready.push_back(key);
            drop(state);
            self.shared.notify.notify_one();
        }
    }

    /// Take the next deliverable item without waiting.
    pub fn try_next(&self) -> Option<WorkItem> {
        let mut state = self.state();
        let key = state.ready.pop_front()?;

        let (item, drained) = match state.pending.get_mut(&key) {
            Some(items) => (items.pop_front(), items.is_empty()),
            None => (None, true),
        };
        if drained {
            state.pending.remove(&key);
        }
        let item = item?;
        state.processing.insert(key);

        let more = !state.ready.is_empty();
        drop(state);
        if more {
            // pass the wakeup on to the next idle worker
            self.shared.notify.notify_one();
        }
        Some(item)
    }

    /// Wait for the next deliverable item.
    ///
    /// Cancel safe: dropping the future never loses an item.
    pub async fn next(&self) -> WorkItem {
        loop {
            if let Some(item) = self.try_next() {
                return item;
            }
            self.shared.notify.notified().await;
        }
    }

    /// Release a key taken by [`WorkQueue::next`].
    pub fn done(&self, key: &ResourceKey) {
        let mut state = self.state();
        state.processing.remove(key);

        if state.pending.contains_key(key) {
            state.ready.push_back(key.clone());
            drop(state);
            self.shared.notify.notify_one();
        }
    }

    /// Number of undelivered items.
    pub fn len(&self) -> usize {
        self.state().pending.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn in_flight(&self) -> usize {
        self.state().processing.len()
    }
}
