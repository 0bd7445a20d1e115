//! Shared application state: one cache per definition type, each rooted at
//! the same base data directory, injected into every handler via axum's
//! `State` extractor rather than through an ambient global.

use std::path::PathBuf;
use std::sync::Arc;

use calc_core::cache::CachedObjectManager;
use calc_core::equipment::{Agent, DiscSet, Rotation, Weapon};

#[derive(Clone)]
pub struct AppState {
    pub agents: Arc<CachedObjectManager<Agent>>,
    pub weapons: Arc<CachedObjectManager<Weapon>>,
    pub disc_sets: Arc<CachedObjectManager<DiscSet>>,
    pub rotations: Arc<CachedObjectManager<Rotation>>,
    pub base_dir: PathBuf,
}

impl AppState {
    pub fn new(base_dir: PathBuf) -> AppState {
        AppState {
            agents: CachedObjectManager::new(base_dir.clone()),
            weapons: CachedObjectManager::new(base_dir.clone()),
            disc_sets: CachedObjectManager::new(base_dir.clone()),
            rotations: CachedObjectManager::new(base_dir.clone()),
            base_dir,
        }
    }
}
