//! The enemy profile a damage calculation is run against.

use crate::error::CoreError;

/// Enemy level is fixed at 60 across the system.
pub const LEVEL: u32 = 60;
/// `Kc` in the defense-multiplier formula.
pub const LEVEL_COEFFICIENT: f64 = 794.0;

/// `1 + (level - 1) / 59`, which is exactly `2.0` at the fixed level 60.
pub fn buff_level_mult() -> f64 {
    1.0 + (LEVEL as f64 - 1.0) / 59.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub dmg_reduction: f64,
    pub defense: f64,
    pub stun_mult: f64,
    /// Per-element resistance, indexed by [`crate::enums::Element::index`].
    pub res: [f64; 5],
    pub is_stunned: bool,
}

impl Default for Enemy {
    fn default() -> Enemy {
        Enemy {
            dmg_reduction: 0.0,
            defense: 0.0,
            stun_mult: 0.0,
            res: [0.0; 5],
            is_stunned: false,
        }
    }
}

impl Enemy {
    /// Parse an enemy profile from a damage request's optional `"enemy"`
    /// object. Request JSON that omits it gets [`Enemy::default`] — the
    /// request shape §6 names doesn't carry an enemy block, but the worked
    /// scenarios vary enemy fields per request, so this field is accepted
    /// when present.
    pub fn from_json(value: &serde_json::Value) -> Result<Enemy, CoreError> {
        let dmg_reduction = value.get("dmg_reduction").and_then(serde_json::Value::as_f64).unwrap_or(0.0);
        let defense = value.get("defense").and_then(serde_json::Value::as_f64).unwrap_or(0.0);
        let stun_mult = value.get("stun_mult").and_then(serde_json::Value::as_f64).unwrap_or(0.0);
        let is_stunned = value.get("is_stunned").and_then(serde_json::Value::as_bool).unwrap_or(false);

        let mut res = [0.0; 5];
        if let Some(entries) = value.get("res") {
            match entries {
                serde_json::Value::Array(values) => {
                    for (i, slot) in res.iter_mut().enumerate() {
                        if let Some(v) = values.get(i).and_then(serde_json::Value::as_f64) {
                            *slot = v;
                        }
                    }
                }
                serde_json::Value::Number(uniform) => {
                    let uniform = uniform
                        .as_f64()
                        .ok_or_else(|| CoreError::Parse("enemy 'res' must be a number".to_string()))?;
                    res = [uniform; 5];
                }
                other => {
                    return Err(CoreError::Parse(format!(
                        "enemy 'res' must be an array or a number, got {other}"
                    )))
                }
            }
        }

        Ok(Enemy {
            dmg_reduction,
            defense,
            stun_mult,
            res,
            is_stunned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buff_level_mult_is_two_at_level_sixty() {
        assert_eq!(buff_level_mult(), 2.0);
    }
}
