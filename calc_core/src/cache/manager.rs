//! The cached object manager: lazy-loading, reference-counted registry
//! with a background idle-eviction sweep.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::cache::entry::{Entry, Loader, Payload};
use crate::error::{CoreError, CoreResult};

/// Eviction scan cadence.
const TICK: Duration = Duration::from_secs(1);
/// Idle ticks an entry may sit with no external handles before its payload
/// is dropped.
const IDLE_THRESHOLD: u32 = 20;

struct Folder<T> {
    loader: Arc<Loader<T>>,
    #[allow(dead_code)] // prewarm traversal is a future extension; recorded, not yet walked.
    recursive: bool,
}

/// A process-wide, lazily-populated registry for one definition type
/// (agents, weapons, disc sets, or rotations each get their own instance).
/// Cheap to clone the handle: wrap in `Arc` and share across request
/// handlers rather than reaching for ambient global state.
pub struct CachedObjectManager<T> {
    base_dir: PathBuf,
    folders: RwLock<HashMap<String, Folder<T>>>,
    entries: RwLock<HashMap<String, Arc<Entry<T>>>>,
    active: Arc<AtomicBool>,
    eviction_task: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + Sync + 'static> CachedObjectManager<T> {
    /// Construct a manager rooted at `base_dir` and start its background
    /// eviction sweep.
    pub fn new(base_dir: impl Into<PathBuf>) -> Arc<CachedObjectManager<T>> {
        let manager = Arc::new(CachedObjectManager {
            base_dir: base_dir.into(),
            folders: RwLock::new(HashMap::new()),
            entries: RwLock::new(HashMap::new()),
            active: Arc::new(AtomicBool::new(true)),
            eviction_task: std::sync::Mutex::new(None),
        });

        let handle = tokio::spawn(run_eviction_loop(Arc::clone(&manager)));
        *manager.eviction_task.lock().expect("eviction task mutex poisoned") = Some(handle);

        manager
    }

    /// Record a loader for `name`. `recursive` records whether prewarming
    /// should walk nested directories (rotations are nested per agent);
    /// registration itself never touches disk.
    pub async fn register_folder<F>(&self, name: impl Into<String>, loader: F, recursive: bool)
    where
        F: Fn(serde_json::Value) -> CoreResult<T> + Send + Sync + 'static,
    {
        self.folders.write().await.insert(
            name.into(),
            Folder {
                loader: Arc::new(loader),
                recursive,
            },
        );
    }

    /// Record that `folder/id` exists and is loadable, without loading it.
    pub async fn add_entry(&self, folder: &str, id: &str) -> CoreResult<()> {
        let loader = {
            let folders = self.folders.read().await;
            let folder_cfg = folders
                .get(folder)
                .ok_or_else(|| CoreError::MissingKey(format!("folder not registered: {folder}")))?;
            Arc::clone(&folder_cfg.loader)
        };

        let key = format!("{folder}/{id}");
        let path = self.base_dir.join(folder).join(format!("{id}.json"));
        self.entries
            .write()
            .await
            .insert(key, Arc::new(Entry::new(path, loader)));
        Ok(())
    }

    /// Record an entry from its full cache key and on-disk path directly,
    /// for definitions whose key already contains the folder segment
    /// (nested rotations: `rotations/<agent_id>/<rotation_id>`).
    pub async fn add_entry_at(&self, folder: &str, key: impl Into<String>, path: impl AsRef<Path>) -> CoreResult<()> {
        let loader = {
            let folders = self.folders.read().await;
            let folder_cfg = folders
                .get(folder)
                .ok_or_else(|| CoreError::MissingKey(format!("folder not registered: {folder}")))?;
            Arc::clone(&folder_cfg.loader)
        };

        self.entries.write().await.insert(
            key.into(),
            Arc::new(Entry::new(path.as_ref().to_path_buf(), loader)),
        );
        Ok(())
    }

    /// Synchronous-style entry point: loads lazily on first access, caches,
    /// and returns a shared handle. In an async runtime this and
    /// [`CachedObjectManager::get_async`] are the same operation; both are
    /// kept so callers can spell out intent the way the source's dual API did.
    #[instrument(skip(self), fields(key))]
    pub async fn get(&self, key: &str) -> CoreResult<Arc<T>> {
        let entry = {
            let entries = self.entries.read().await;
            entries
                .get(key)
                .cloned()
                .ok_or_else(|| CoreError::MissingKey(format!("unregistered cache key: {key}")))?
        };

        let mut guard = entry.payload.lock().await;
        if let Payload::Loaded(payload) = &*guard {
            entry.reset_idle();
            return Ok(Arc::clone(payload));
        }

        debug!(key, "cache miss, loading from disk");
        let raw = tokio::fs::read_to_string(&entry.path).await.map_err(CoreError::Io)?;
        let tree: serde_json::Value = serde_json::from_str(&raw)?;
        let product = (entry.loader)(tree).map_err(|err| match err {
            CoreError::BuilderIncomplete(msg) => CoreError::Parse(msg),
            other => other,
        })?;

        let payload = Arc::new(product);
        *guard = Payload::Loaded(Arc::clone(&payload));
        entry.reset_idle();
        Ok(payload)
    }

    /// Alias for [`CachedObjectManager::get`], named to match the
    /// future-returning half of the original dual API.
    pub async fn get_async(&self, key: &str) -> CoreResult<Arc<T>> {
        self.get(key).await
    }

    /// Drop every payload and registration. Entries loaded after this call
    /// must be re-registered; handles obtained before `clear()` keep their
    /// payload alive (they hold their own `Arc`) but a fresh `get` of the
    /// same key is a `MissingKey` until re-registered.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        self.folders.write().await.clear();
    }

    /// Signal the eviction loop to stop and wait for it to drain.
    pub async fn shutdown(&self) {
        self.active.store(false, Ordering::SeqCst);
        let handle = self
            .eviction_task
            .lock()
            .expect("eviction task mutex poisoned")
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    async fn sweep_once(&self) {
        let entries: Vec<Arc<Entry<T>>> = self.entries.read().await.values().cloned().collect();

        for entry in entries {
            let Ok(mut guard) = entry.payload.try_lock() else {
                continue;
            };

            let Payload::Loaded(payload) = &*guard else {
                continue;
            };

            if Arc::strong_count(payload) > 1 {
                entry.reset_idle();
                continue;
            }

            let idle = entry.idle_ticks.fetch_add(1, Ordering::Relaxed) + 1;
            if idle >= IDLE_THRESHOLD {
                *guard = Payload::Empty;
                entry.idle_ticks.store(0, Ordering::Relaxed);
            }
        }
    }
}

async fn run_eviction_loop<T: Send + Sync + 'static>(manager: Arc<CachedObjectManager<T>>) {
    let mut ticker = tokio::time::interval(TICK);
    while manager.active.load(Ordering::SeqCst) {
        ticker.tick().await;
        if !manager.active.load(Ordering::SeqCst) {
            break;
        }
        manager.sweep_once().await;
    }
    warn!("eviction loop exiting");
}
