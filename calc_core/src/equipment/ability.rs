//! Skills and anomalies: the two shapes an agent's named abilities take.

use crate::enums::{Element, Tag};
use crate::error::{CoreError, CoreResult};
use crate::stats::StatGrid;

/// One row of a skill's motion-value table, selected by the rotation
/// entry's `index`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub motion_value: f64,
    pub daze: f64,
    pub element: Element,
}

/// A named skill: a list of applicable tags, an indexed table of
/// motion-value scales, and optional ability-scoped buffs.
#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub name: String,
    pub tags: Vec<Tag>,
    pub scales: Vec<Scale>,
    pub buffs: Option<StatGrid>,
}

/// A named anomaly ability. `can_crit` is derived at construction time from
/// whether `buffs` carries both `CritRate` and `CritDmg` under `Tag::Anomaly`.
#[derive(Debug, Clone, PartialEq)]
pub struct Anomaly {
    pub name: String,
    pub scale: f64,
    pub element: Option<Element>,
    pub buffs: Option<StatGrid>,
    pub can_crit: bool,
}

impl Anomaly {
    /// Derive `can_crit` from a buffs grid the way the loader does: both
    /// `CritRate` and `CritDmg` must be present under `Tag::Anomaly`.
    pub fn derive_can_crit(buffs: &StatGrid) -> bool {
        buffs.contains(crate::enums::StatId::CritRate, Tag::Anomaly)
            && buffs.contains(crate::enums::StatId::CritDmg, Tag::Anomaly)
    }
}

/// An agent's named ability: either a skill or an anomaly.
#[derive(Debug, Clone, PartialEq)]
pub enum Ability {
    Skill(Skill),
    Anomaly(Anomaly),
}

impl Ability {
    pub fn name(&self) -> &str {
        match self {
            Ability::Skill(s) => &s.name,
            Ability::Anomaly(a) => &a.name,
        }
    }

    /// Parse a named ability from its on-disk tree. `{"kind": "skill", ...}`
    /// or `{"kind": "anomaly", ...}` selects the variant.
    pub fn from_json(name: &str, value: &serde_json::Value) -> CoreResult<Ability> {
        let kind = value
            .get("kind")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| CoreError::Parse(format!("ability {name} is missing 'kind'")))?;

        match kind {
            "skill" => Ok(Ability::Skill(Skill::from_json(name, value)?)),
            "anomaly" => Ok(Ability::Anomaly(Anomaly::from_json(name, value)?)),
            other => Err(CoreError::Parse(format!(
                "ability {name} has unknown kind {other:?}"
            ))),
        }
    }
}

impl Skill {
    fn from_json(name: &str, value: &serde_json::Value) -> CoreResult<Skill> {
        let tags = value
            .get("tags")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| CoreError::Parse(format!("skill {name} is missing 'tags'")))?
            .iter()
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| CoreError::Parse(format!("skill {name} has a non-string tag")))
                    .and_then(Tag::parse)
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let scales = value
            .get("scales")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| CoreError::Parse(format!("skill {name} is missing 'scales'")))?
            .iter()
            .map(Scale::from_json)
            .collect::<CoreResult<Vec<_>>>()?;

        let buffs = match value.get("buffs") {
            Some(buffs) => Some(StatGrid::from_json(buffs)?),
            None => None,
        };

        Ok(Skill {
            name: name.to_string(),
            tags,
            scales,
            buffs,
        })
    }
}

impl Scale {
    fn from_json(value: &serde_json::Value) -> CoreResult<Scale> {
        let motion_value = value
            .get("motion_value")
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| CoreError::Parse("scale row is missing 'motion_value'".to_string()))?;
        let daze = value.get("daze").and_then(serde_json::Value::as_f64).unwrap_or(0.0);
        let element = value
            .get("element")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| CoreError::Parse("scale row is missing 'element'".to_string()))
            .and_then(Element::parse)?;

        Ok(Scale {
            motion_value,
            daze,
            element,
        })
    }
}

impl Anomaly {
    fn from_json(name: &str, value: &serde_json::Value) -> CoreResult<Anomaly> {
        let scale = value
            .get("scale")
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| CoreError::Parse(format!("anomaly {name} is missing 'scale'")))?;

        let element = match value.get("element").and_then(serde_json::Value::as_str) {
            Some(s) => Some(Element::parse(s)?),
            None => None,
        };

        let buffs = match value.get("buffs") {
            Some(buffs) => Some(StatGrid::from_json(buffs)?),
            None => None,
        };

        let can_crit = buffs.as_ref().is_some_and(Anomaly::derive_can_crit);

        Ok(Anomaly {
            name: name.to_string(),
            scale,
            element,
            buffs,
            can_crit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_skill_from_json() {
        let value = serde_json::json!({
            "kind": "skill",
            "tags": ["basic"],
            "scales": [{"motion_value": 100.0, "element": "phys"}],
        });
        let ability = Ability::from_json("basic_1", &value).unwrap();
        match ability {
            Ability::Skill(skill) => {
                assert_eq!(skill.tags, vec![Tag::Basic]);
                assert_eq!(skill.scales.len(), 1);
            }
            other => panic!("expected Skill, got {other:?}"),
        }
    }

    #[test]
    fn anomaly_derives_can_crit_from_buffs() {
        let value = serde_json::json!({
            "kind": "anomaly",
            "scale": 500.0,
            "buffs": {"crit_rate@anomaly": 0.1, "crit_dmg@anomaly": 0.5},
        });
        let ability = Ability::from_json("anomaly_proc", &value).unwrap();
        match ability {
            Ability::Anomaly(anomaly) => assert!(anomaly.can_crit),
            other => panic!("expected Anomaly, got {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let value = serde_json::json!({"kind": "spell"});
        assert!(Ability::from_json("x", &value).is_err());
    }
}
