//! Disc sets: the 2-piece/4-piece bonus grids granted for equipping
//! multiple pieces that share a `disc_id`.

use crate::error::{CoreError, CoreResult};
use crate::stats::StatGrid;

#[derive(Debug, Clone, PartialEq)]
pub struct DiscSet {
    pub id: u64,
    pub name: String,
    pub p2: StatGrid,
    pub p4: StatGrid,
}

impl DiscSet {
    /// Build a disc set from its on-disk tree: `id`, `name`, `p2`, `p4`.
    pub fn from_json(value: &serde_json::Value) -> CoreResult<DiscSet> {
        let id = value
            .get("id")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| CoreError::Parse("disc set is missing 'id'".to_string()))?;
        let name = value
            .get("name")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| CoreError::Parse("disc set is missing 'name'".to_string()))?;
        let p2 = value
            .get("p2")
            .ok_or_else(|| CoreError::Parse("disc set is missing 'p2'".to_string()))
            .and_then(StatGrid::from_json)?;
        let p4 = value
            .get("p4")
            .ok_or_else(|| CoreError::Parse("disc set is missing 'p4'".to_string()))
            .and_then(StatGrid::from_json)?;

        DiscSetBuilder::new()
            .set_id(id)
            .set_name(name)
            .set_p2(p2)
            .set_p4(p4)
            .get_product()
    }
}

#[derive(Debug, Default)]
pub struct DiscSetBuilder {
    id: Option<u64>,
    name: Option<String>,
    p2: Option<StatGrid>,
    p4: Option<StatGrid>,
}

impl DiscSetBuilder {
    pub fn new() -> DiscSetBuilder {
        DiscSetBuilder::default()
    }

    pub fn set_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_p2(mut self, stats: StatGrid) -> Self {
        self.p2 = Some(stats);
        self
    }

    pub fn set_p4(mut self, stats: StatGrid) -> Self {
        self.p4 = Some(stats);
        self
    }

    pub fn is_built(&self) -> bool {
        self.id.is_some() && self.name.is_some() && self.p2.is_some() && self.p4.is_some()
    }

    pub fn get_product(self) -> CoreResult<DiscSet> {
        let missing = [
            (self.id.is_none(), "id"),
            (self.name.is_none(), "name"),
            (self.p2.is_none(), "set_bonus.p2"),
            (self.p4.is_none(), "set_bonus.p4"),
        ]
        .into_iter()
        .filter(|(absent, _)| *absent)
        .map(|(_, field)| field)
        .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(CoreError::BuilderIncomplete(missing.join(", ")));
        }

        Ok(DiscSet {
            id: self.id.expect("checked above"),
            name: self.name.expect("checked above"),
            p2: self.p2.expect("checked above"),
            p4: self.p4.expect("checked above"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bonus_grids_are_rejected() {
        let err = DiscSetBuilder::new()
            .set_id(1)
            .set_name("Woodpecker Electro")
            .get_product()
            .unwrap_err();
        match err {
            CoreError::BuilderIncomplete(msg) => {
                assert!(msg.contains("p2"));
                assert!(msg.contains("p4"));
            }
            other => panic!("expected BuilderIncomplete, got {other:?}"),
        }
    }

    #[test]
    fn fully_built_set_exposes_both_bonuses() {
        let set = DiscSetBuilder::new()
            .set_id(1)
            .set_name("Woodpecker Electro")
            .set_p2(StatGrid::new())
            .set_p4(StatGrid::new())
            .get_product()
            .unwrap();
        assert!(set.p2.is_empty());
        assert!(set.p4.is_empty());
    }

    #[test]
    fn from_json_builds_a_disc_set() {
        let value = serde_json::json!({
            "id": 1, "name": "Woodpecker Electro",
            "p2": {"electric_ratio": 0.1},
            "p4": {"crit_dmg": 0.2},
        });
        let set = DiscSet::from_json(&value).unwrap();
        assert_eq!(set.id, 1);
        assert!(!set.p2.is_empty());
        assert!(!set.p4.is_empty());
    }
}
