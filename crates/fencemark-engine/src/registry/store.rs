//! The live node registry.
//!
//! Readers take an `Arc` of the current snapshot and keep a consistent view
//! for as long as they hold it. A rebuild publishes a new snapshot with one
//! atomic swap and schedules a notification; rebuilds that happen before the
//! scheduler runs share that single notification.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::parsing::fence::FenceNode;
use crate::parsing::mdx::MdxDocument;

use super::ids::BLOCK_ID_ATTR;
use super::scheduler::Scheduler;

/// Block id to fence, as of one rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    /// Increases with every rebuild; `0` is the empty initial snapshot.
    pub version: u64,
    pub blocks: BTreeMap<String, Arc<FenceNode>>,
}

impl RegistrySnapshot {
    pub fn get(&self, id: &str) -> Option<&Arc<FenceNode>> {
        self.blocks.get(id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

pub type Listener = Arc<dyn Fn(&Arc<RegistrySnapshot>) + Send + Sync>;

struct Inner {
    snapshot: ArcSwap<RegistrySnapshot>,
    version: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener: AtomicU64,
    notify_pending: AtomicBool,
    scheduler: Arc<dyn Scheduler>,
}

impl Inner {
    fn notify(&self) {
        if !self.notify_pending.swap(false, Ordering::AcqRel) {
            return;
        }
        let snapshot = self.snapshot.load_full();
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        log::trace!(
            "Notifying {} listeners of registry version {}",
            listeners.len(),
            snapshot.version
        );
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

/// Store mapping block ids of the open document to their current fences.
#[derive(Clone)]
pub struct LiveNodeRegistry {
    inner: Arc<Inner>,
}

impl LiveNodeRegistry {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            inner: Arc::new(Inner {
                snapshot: ArcSwap::from_pointee(RegistrySnapshot::default()),
                version: AtomicU64::new(0),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(0),
                notify_pending: AtomicBool::new(false),
                scheduler,
            }),
        }
    }

    /// Rebuilds the id mapping from `document` and publishes it.
    ///
    /// Fences without an id are not tracked. When two fences share an id the
    /// first one wins.
    pub fn find_code_block_and_mapping(&self, document: &MdxDocument) -> Arc<RegistrySnapshot> {
        let mut blocks = BTreeMap::new();
        for fence in document.fences() {
            let Some(id) = fence.info.attr(BLOCK_ID_ATTR) else {
                continue;
            };
            if blocks.contains_key(id) {
                log::warn!("Duplicate code block id {id:?}; keeping the first block");
                continue;
            }
            blocks.insert(id.to_string(), fence.clone());
        }

        let version = self.inner.version.fetch_add(1, Ordering::AcqRel) + 1;
        let snapshot = Arc::new(RegistrySnapshot { version, blocks });
        self.inner.snapshot.store(snapshot.clone());
        log::debug!(
            "Registry version {version}: {} code blocks",
            snapshot.blocks.len()
        );
        self.schedule_notify();
        snapshot
    }

    pub fn get_snapshot(&self) -> Arc<RegistrySnapshot> {
        self.inner.snapshot.load_full()
    }

    /// Registers `listener` for future rebuilds.
    pub fn subscribe(
        &self,
        listener: impl Fn(&Arc<RegistrySnapshot>) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, Arc::new(listener)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    /// Drops every block and listener; a pending notification is cancelled.
    pub fn reset(&self) {
        self.inner.notify_pending.store(false, Ordering::Release);
        self.inner.listeners.lock().clear();
        self.inner.version.store(0, Ordering::Release);
        self.inner
            .snapshot
            .store(Arc::new(RegistrySnapshot::default()));
    }

    fn schedule_notify(&self) {
        if self.inner.notify_pending.swap(true, Ordering::AcqRel) {
            return;
        }
        let registry: Weak<Inner> = Arc::downgrade(&self.inner);
        self.inner.scheduler.schedule(Box::new(move || {
            if let Some(inner) = registry.upgrade() {
                inner.notify();
            }
        }));
    }
}

/// Keeps a listener registered until unsubscribed or dropped.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Inner>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.listeners.lock().retain(|(id, _)| *id != self.id);
        }
    }
}
