use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::TrailEntry;

type Callback = Arc<dyn Fn(&[TrailEntry]) + Send + Sync>;

struct Inner {
    trail: Vec<TrailEntry>,
    subscribers: HashMap<u64, Callback>,
    next_id: u64,
}

/// Handle returned by [`BreadcrumbStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Shared slot holding the current breadcrumb trail.
///
/// Cloning yields another handle to the same slot — there is exactly one
/// trail per store, replaced wholesale on every write so no reader ever
/// observes a partial update. Nothing here is process-global: each app
/// window (and each test) owns its own store instance.
#[derive(Clone)]
pub struct BreadcrumbStore {
    inner: Arc<Mutex<Inner>>,
}

impl Default for BreadcrumbStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BreadcrumbStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                trail: Vec::new(),
                subscribers: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Replace the current trail and notify subscribers with the new value.
    /// Subscribers run after the lock is released, so a callback may call
    /// back into the store without deadlocking.
    pub fn set_trail(&self, entries: Vec<TrailEntry>) {
        let (subs, snapshot) = {
            let mut inner = self.inner.lock().unwrap();
            inner.trail = entries;
            let subs: Vec<Callback> = inner.subscribers.values().cloned().collect();
            (subs, inner.trail.clone())
        };
        tracing::debug!(entries = snapshot.len(), "trail replaced");
        for cb in subs {
            cb(&snapshot);
        }
    }

    pub fn clear_trail(&self) {
        self.set_trail(Vec::new());
    }

    /// Snapshot of the current trail. Live consumers should subscribe
    /// instead of polling.
    pub fn get_trail(&self) -> Vec<TrailEntry> {
        self.inner.lock().unwrap().trail.clone()
    }

    /// Register a change callback, invoked with the new trail on every write.
    pub fn subscribe(&self, callback: impl Fn(&[TrailEntry]) + Send + Sync + 'static) -> SubscriptionId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.insert(id, Arc::new(callback));
        SubscriptionId(id)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.lock().unwrap().subscribers.remove(&id.0);
    }

    /// Take scoped ownership of the trail slot: publish through the returned
    /// scope while the owning page is visible, and the slot is cleared when
    /// the scope is dropped.
    pub fn acquire(&self) -> BreadcrumbScope {
        BreadcrumbScope {
            store: self.clone(),
            published: None,
        }
    }
}

/// Page-bound publisher: declares "while I am visible, the trail is X".
///
/// Publishing an empty trail is suppressed — a page still loading its
/// terminal label must not clobber the previously visible trail. Publishing
/// a trail structurally equal to the last one this scope wrote is also
/// suppressed, so re-renders with an unchanged value produce no store write.
/// Dropping the scope always clears the trail, whatever was published.
pub struct BreadcrumbScope {
    store: BreadcrumbStore,
    published: Option<Vec<TrailEntry>>,
}

impl BreadcrumbScope {
    pub fn publish(&mut self, entries: Vec<TrailEntry>) {
        if entries.is_empty() {
            return;
        }
        if self.published.as_deref() == Some(entries.as_slice()) {
            return;
        }
        self.store.set_trail(entries.clone());
        self.published = Some(entries);
    }

    /// The trail this scope last wrote, if any.
    pub fn published(&self) -> Option<&[TrailEntry]> {
        self.published.as_deref()
    }
}

impl Drop for BreadcrumbScope {
    fn drop(&mut self) {
        self.store.clear_trail();
    }
}
