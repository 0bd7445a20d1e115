//! Scans the data directory and (re)registers everything the process knows
//! how to load. Run once at startup and again on every `POST /refresh`.

use std::path::Path;

use calc_core::cache::CachedObjectManager;
use calc_core::equipment::{Agent, DiscSet, Rotation, Weapon};
use calc_core::CoreResult;

use crate::state::AppState;

pub async fn refresh(state: &AppState) -> CoreResult<()> {
    state.agents.clear().await;
    state.weapons.clear().await;
    state.disc_sets.clear().await;
    state.rotations.clear().await;

    state
        .agents
        .register_folder("agents", |v| Agent::from_json(&v), false)
        .await;
    state
        .weapons
        .register_folder("weapons", |v| Weapon::from_json(&v), false)
        .await;
    state
        .disc_sets
        .register_folder("disc_sets", |v| DiscSet::from_json(&v), false)
        .await;
    state
        .rotations
        .register_folder("rotations", |v| Rotation::from_json(&v), true)
        .await;

    scan_flat(&state.agents, &state.base_dir, "agents").await?;
    scan_flat(&state.weapons, &state.base_dir, "weapons").await?;
    scan_flat(&state.disc_sets, &state.base_dir, "disc_sets").await?;
    scan_rotations(&state.rotations, &state.base_dir).await?;

    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("json")
}

async fn scan_flat<T: Send + Sync + 'static>(
    manager: &CachedObjectManager<T>,
    base_dir: &Path,
    folder: &str,
) -> CoreResult<()> {
    let dir = base_dir.join(folder);
    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_json(&path) {
            continue;
        }
        if let Some(id) = path.file_stem().and_then(|s| s.to_str()) {
            manager.add_entry(folder, id).await?;
        }
    }
    Ok(())
}

/// Rotations nest one directory per agent: `rotations/<agent-id>/<id>.json`.
async fn scan_rotations(manager: &CachedObjectManager<Rotation>, base_dir: &Path) -> CoreResult<()> {
    let dir = base_dir.join("rotations");
    let mut agent_dirs = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    while let Some(agent_dir) = agent_dirs.next_entry().await? {
        if !agent_dir.file_type().await?.is_dir() {
            continue;
        }
        let Some(aid) = agent_dir.file_name().to_str().map(str::to_string) else {
            continue;
        };

        let mut files = tokio::fs::read_dir(agent_dir.path()).await?;
        while let Some(file) = files.next_entry().await? {
            let path = file.path();
            if !is_json(&path) {
                continue;
            }
            if let Some(id) = path.file_stem().and_then(|s| s.to_str()) {
                manager
                    .add_entry_at("rotations", format!("rotations/{aid}/{id}"), &path)
                    .await?;
            }
        }
    }
    Ok(())
}
