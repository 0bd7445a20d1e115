//! Turns a `POST /damage` request body into a fully-resolved `DamageRequest`
//! by walking the caches for everything its ids reference.

use std::collections::HashMap;
use std::sync::Arc;

use calc_core::damage::DamageRequest;
use calc_core::equipment::{DiscPiece, DiscSet, Enemy, Rotation};
use calc_core::{CoreError, CoreResult};

use crate::state::AppState;

pub async fn build_damage_request(state: &AppState, body: &serde_json::Value) -> CoreResult<DamageRequest> {
    let aid = body
        .get("aid")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| CoreError::Parse("request is missing 'aid'".to_string()))?;
    let wid = body
        .get("wid")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| CoreError::Parse("request is missing 'wid'".to_string()))?;

    let agent = state.agents.get(&format!("agents/{aid}")).await?;
    let weapon = state.weapons.get(&format!("weapons/{wid}")).await?;
    let rotation = resolve_rotation(state, aid, body.get("rotation")).await?;
    let (discs, set_counts) = resolve_discs(state, body).await?;
    let enemy = match body.get("enemy") {
        Some(value) => Enemy::from_json(value)?,
        None => Enemy::default(),
    };

    Ok(DamageRequest {
        agent,
        weapon,
        discs,
        rotation,
        set_counts,
        enemy,
    })
}

async fn resolve_rotation(
    state: &AppState,
    aid: u64,
    value: Option<&serde_json::Value>,
) -> CoreResult<Rotation> {
    match value {
        Some(serde_json::Value::Number(n)) => {
            let rid = n
                .as_u64()
                .ok_or_else(|| CoreError::Parse("rotation id must be a non-negative integer".to_string()))?;
            let cached = state.rotations.get(&format!("rotations/{aid}/{rid}")).await?;
            Ok((*cached).clone())
        }
        Some(serde_json::Value::Array(cells)) => {
            let cells = cells
                .iter()
                .map(|v| {
                    v.as_str()
                        .ok_or_else(|| CoreError::Parse("rotation cell must be a string".to_string()))
                        .map(str::to_string)
                })
                .collect::<CoreResult<Vec<_>>>()?;
            Rotation::parse_cells(&cells)
        }
        _ => Err(CoreError::Parse(
            "request 'rotation' must be an id or an inline cell list".to_string(),
        )),
    }
}

async fn resolve_discs(
    state: &AppState,
    body: &serde_json::Value,
) -> CoreResult<(Vec<Arc<DiscPiece>>, Vec<(Arc<DiscSet>, usize)>)> {
    let discs_json = body
        .get("discs")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| CoreError::Parse("request is missing 'discs'".to_string()))?;

    let mut discs = Vec::with_capacity(discs_json.len());
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for (i, disc_value) in discs_json.iter().enumerate() {
        let slot = (i + 1) as u8;
        let piece = DiscPiece::from_request(slot, disc_value)?;
        *counts.entry(piece.disc_id).or_insert(0) += 1;
        discs.push(Arc::new(piece));
    }

    let mut set_counts = Vec::new();
    for (disc_id, count) in counts {
        if count >= 2 {
            let set = state.disc_sets.get(&format!("disc_sets/{disc_id}")).await?;
            set_counts.push((set, count));
        }
    }

    Ok((discs, set_counts))
}
