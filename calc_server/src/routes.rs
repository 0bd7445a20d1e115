//! The four HTTP routes: index, cache refresh, rotation persistence, and
//! the damage calculation itself.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

use calc_core::damage::{calculate, DamageStep};
use calc_core::enums::Tag;
use calc_core::CoreError;

use crate::build::build_damage_request;
use crate::cache_setup;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn index() -> &'static str {
    "3Z-style damage calculator backend"
}

#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    cache_setup::refresh(&state).await?;
    Ok("ok")
}

#[derive(Debug, Deserialize)]
pub struct RotationParams {
    aid: u64,
    id: u64,
}

#[instrument(skip(state, body))]
pub async fn put_rotation(
    State(state): State<AppState>,
    Query(params): Query<RotationParams>,
    Json(body): Json<Value>,
) -> Result<&'static str, ApiError> {
    let dir = state.base_dir.join("rotations").join(params.aid.to_string());
    tokio::fs::create_dir_all(&dir).await.map_err(CoreError::Io)?;

    let path = dir.join(format!("{}.json", params.id));
    let text = serde_json::to_string_pretty(&body).map_err(CoreError::Json)?;
    tokio::fs::write(&path, text).await.map_err(CoreError::Io)?;

    state
        .rotations
        .register_folder(
            "rotations",
            |v| calc_core::equipment::Rotation::from_json(&v),
            true,
        )
        .await;
    state
        .rotations
        .add_entry_at(
            "rotations",
            format!("rotations/{}/{}", params.aid, params.id),
            &path,
        )
        .await?;

    Ok("ok")
}

#[derive(Debug, Deserialize, Default)]
pub struct DamageParams {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[instrument(skip(state, body))]
pub async fn damage(
    State(state): State<AppState>,
    Query(params): Query<DamageParams>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let request = build_damage_request(&state, &body).await?;
    let (total, steps) = calculate(&request)?;

    let detailed = params.kind.as_deref() == Some("detailed");
    let per_ability: Vec<Value> = steps.iter().map(|step| render_step(step, detailed)).collect();

    Ok(Json(json!({ "total": total, "per_ability": per_ability })))
}

fn render_step(step: &DamageStep, detailed: bool) -> Value {
    if !detailed {
        return json!(step.damage);
    }

    let tags = match step.tags.as_slice() {
        [one] => json!(tag_name(*one)),
        many => json!(many.iter().copied().map(tag_name).collect::<Vec<_>>()),
    };
    json!([step.damage, tags, step.ability_name])
}

fn tag_name(tag: Tag) -> String {
    serde_json::to_value(tag)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}
