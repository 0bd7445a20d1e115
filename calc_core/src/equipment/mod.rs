//! Equipment model: agents, weapons, disc pieces and sets, rotations, and
//! the enemy profile, each built via a validating single-use builder.

pub mod ability;
pub mod agent;
pub mod disc;
pub mod disc_set;
pub mod enemy;
pub mod rotation;
pub mod weapon;

pub use ability::{Ability, Anomaly, Scale, Skill};
pub use agent::{Agent, AgentBuilder};
pub use disc::{DiscPiece, DiscPieceBuilder};
pub use disc_set::{DiscSet, DiscSetBuilder};
pub use enemy::Enemy;
pub use rotation::{Rotation, RotationCell};
pub use weapon::{Weapon, WeaponBuilder};

use crate::enums::{StatId, Tag};
use crate::error::{CoreError, CoreResult};
use crate::expr::FormulaBundle;
use crate::stats::{Qualifier, Stat, StatGrid};

/// A stat paired with the grid key it should be installed under, for
/// entities (weapon main/sub stat, disc main stat) whose single
/// distinguished stat isn't already embedded in a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedStat {
    pub qualifier: Qualifier,
    pub stat: Stat,
}

impl QualifiedStat {
    /// Parse `{"id": "atk_base", "tag": "universal", "base": 100.0}`, with
    /// an optional `"formula"` turning it into a relative stat.
    pub fn from_json(value: &serde_json::Value) -> CoreResult<QualifiedStat> {
        let id = value
            .get("id")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| CoreError::Parse("qualified stat is missing 'id'".to_string()))
            .and_then(StatId::parse)?;
        let tag = match value.get("tag").and_then(serde_json::Value::as_str) {
            Some(s) => Tag::parse(s)?,
            None => Tag::Universal,
        };
        let base = value.get("base").and_then(serde_json::Value::as_f64).unwrap_or(0.0);

        let stat = match value.get("formula").and_then(serde_json::Value::as_str) {
            Some(formula) => Stat::relative(base, FormulaBundle::parse(formula)?),
            None => Stat::regular(base),
        };

        Ok(QualifiedStat {
            qualifier: Qualifier::new(id, tag),
            stat,
        })
    }
}

/// Parse a grid sub-field (`"passive_stats"`, set bonus grids) that may be
/// absent, defaulting to an empty grid.
fn optional_grid(value: &serde_json::Value, field: &str) -> CoreResult<StatGrid> {
    match value.get(field) {
        Some(grid) => StatGrid::from_json(grid),
        None => Ok(StatGrid::new()),
    }
}
