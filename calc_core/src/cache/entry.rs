//! A single cache slot: its load state, idle counter, and the loader
//! closure it was registered with.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::CoreResult;

/// A loader turns a parsed on-disk tree into a typed, owned definition.
pub type Loader<T> = dyn Fn(serde_json::Value) -> CoreResult<T> + Send + Sync;

/// A slot's payload: either nothing has been loaded yet, or a shared,
/// immutable handle to the loaded definition.
pub(crate) enum Payload<T> {
    Empty,
    Loaded(Arc<T>),
}

/// One registered, possibly-loaded cache slot.
///
/// The payload mutex is the "short mutex" the concurrent lazy-load
/// protocol calls for: holding it across a disk read and loader
/// invocation is what serializes concurrent loads of the same key into a
/// single load episode, and `try_lock` lets the eviction sweep skip an
/// entry that's mid-load rather than blocking on it.
pub(crate) struct Entry<T> {
    pub(crate) path: PathBuf,
    pub(crate) loader: Arc<Loader<T>>,
    pub(crate) payload: Mutex<Payload<T>>,
    pub(crate) idle_ticks: AtomicU32,
}

impl<T> Entry<T> {
    pub(crate) fn new(path: PathBuf, loader: Arc<Loader<T>>) -> Entry<T> {
        Entry {
            path,
            loader,
            payload: Mutex::new(Payload::Empty),
            idle_ticks: AtomicU32::new(0),
        }
    }

    pub(crate) fn reset_idle(&self) {
        self.idle_ticks.store(0, Ordering::Relaxed);
    }
}
