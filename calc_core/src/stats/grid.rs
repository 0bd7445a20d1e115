//! The stat grid: a deterministically-ordered map from `(StatId, Tag)` to
//! [`Stat`], with deep-clone value semantics and qualifier-wise fusion.

use std::collections::BTreeMap;

use crate::enums::{StatId, Tag};
use crate::error::{CoreError, CoreResult};
use crate::expr::{FormulaBundle, VariableSource};
use crate::stats::stat::{Qualifier, Stat};

/// A keyed collection of stats. Iteration order follows `Qualifier`'s
/// derived `Ord` (declaration order of `StatId`, then `Tag`), which is
/// what makes grid equality and snapshot tests reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatGrid {
    content: BTreeMap<Qualifier, Stat>,
}

impl StatGrid {
    pub fn new() -> StatGrid {
        StatGrid::default()
    }

    /// Exact-qualifier lookup. Missing entries read as 0.0.
    pub fn get(&self, id: StatId, tag: Tag) -> CoreResult<f64> {
        match self.content.get(&Qualifier::new(id, tag)) {
            Some(stat) => stat.value(self),
            None => Ok(0.0),
        }
    }

    /// `get(id, Universal) + (tag != Universal ? get(id, tag) : 0)`.
    pub fn get_summed(&self, id: StatId, tag: Tag) -> CoreResult<f64> {
        let universal = self.get(id, Tag::Universal)?;
        if tag == Tag::Universal {
            return Ok(universal);
        }
        Ok(universal + self.get(id, tag)?)
    }

    pub fn contains(&self, id: StatId, tag: Tag) -> bool {
        self.content.contains_key(&Qualifier::new(id, tag))
    }

    /// Mutable access to a stat's base value, inserting a zero-valued
    /// regular stat at this qualifier if none exists yet.
    pub fn at(&mut self, id: StatId, tag: Tag) -> &mut f64 {
        match self.content.entry(Qualifier::new(id, tag)) {
            std::collections::btree_map::Entry::Occupied(e) => match e.into_mut() {
                Stat::Regular(r) => &mut r.base,
                Stat::Relative(r) => &mut r.base,
            },
            std::collections::btree_map::Entry::Vacant(e) => {
                let stat = e.insert(Stat::regular(0.0));
                match stat {
                    Stat::Regular(r) => &mut r.base,
                    Stat::Relative(r) => &mut r.base,
                }
            }
        }
    }

    /// Replace (rather than fuse) the entry at `stat`'s qualifier.
    pub fn set(&mut self, qualifier: Qualifier, stat: Stat) {
        self.content.insert(qualifier, stat);
    }

    /// Insert `stat` at `qualifier`, fusing with any existing entry per
    /// the stat-combination rules.
    pub fn add(&mut self, qualifier: Qualifier, stat: Stat) {
        match self.content.remove(&qualifier) {
            Some(existing) => {
                self.content.insert(qualifier, existing.fuse(stat));
            }
            None => {
                self.content.insert(qualifier, stat);
            }
        }
    }

    pub fn add_regular(&mut self, id: StatId, tag: Tag, base: f64) {
        self.add(Qualifier::new(id, tag), Stat::regular(base));
    }

    pub fn add_relative(&mut self, id: StatId, tag: Tag, base: f64, formulas: FormulaBundle) {
        self.add(Qualifier::new(id, tag), Stat::relative(base, formulas));
    }

    /// Parse a grid from a JSON object. Each key is a stat id, optionally
    /// suffixed `@<tag>` (default `universal`); a numeric value is a
    /// regular stat, an object `{"base": n, "formula": "c:...;f:...;m:..."}`
    /// is a relative one.
    pub fn from_json(value: &serde_json::Value) -> CoreResult<StatGrid> {
        let object = value
            .as_object()
            .ok_or_else(|| CoreError::Parse("stat grid must be a JSON object".to_string()))?;

        let mut grid = StatGrid::new();
        for (key, entry) in object {
            let (id_part, tag_part) = key.split_once('@').unwrap_or((key.as_str(), "universal"));
            let id = StatId::parse(id_part)?;
            let tag = Tag::parse(tag_part)?;

            match entry {
                serde_json::Value::Number(n) => {
                    let base = n
                        .as_f64()
                        .ok_or_else(|| CoreError::Parse(format!("non-finite stat value for {key}")))?;
                    grid.add_regular(id, tag, base);
                }
                serde_json::Value::Object(fields) => {
                    let base = fields.get("base").and_then(serde_json::Value::as_f64).unwrap_or(0.0);
                    let formula_src = fields
                        .get("formula")
                        .and_then(serde_json::Value::as_str)
                        .ok_or_else(|| CoreError::Parse(format!("relative stat {key} is missing 'formula'")))?;
                    grid.add_relative(id, tag, base, FormulaBundle::parse(formula_src)?);
                }
                other => {
                    return Err(CoreError::Parse(format!(
                        "invalid stat entry for {key}: {other}"
                    )))
                }
            }
        }
        Ok(grid)
    }

    /// Fuse every entry of `other` into this grid.
    pub fn add_grid(&mut self, other: StatGrid) {
        for (qualifier, stat) in other.content {
            self.add(qualifier, stat);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Qualifier, &Stat)> {
        self.content.iter()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl VariableSource for StatGrid {
    fn resolve(&self, id: StatId) -> CoreResult<f64> {
        self.get_summed(id, Tag::Universal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::FormulaBundle;

    #[test]
    fn missing_entry_reads_as_zero() {
        let grid = StatGrid::new();
        assert_eq!(grid.get(StatId::AtkBase, Tag::Universal).unwrap(), 0.0);
    }

    #[test]
    fn get_summed_matches_get_for_universal_tag() {
        let mut grid = StatGrid::new();
        grid.add_regular(StatId::AtkBase, Tag::Universal, 50.0);
        assert_eq!(
            grid.get_summed(StatId::AtkBase, Tag::Universal).unwrap(),
            grid.get(StatId::AtkBase, Tag::Universal).unwrap()
        );
    }

    #[test]
    fn get_summed_adds_tag_specific_entry() {
        let mut grid = StatGrid::new();
        grid.add_regular(StatId::CritRate, Tag::Universal, 0.05);
        grid.add_regular(StatId::CritRate, Tag::Basic, 0.1);
        assert_eq!(
            grid.get_summed(StatId::CritRate, Tag::Basic).unwrap(),
            0.15
        );
    }

    #[test]
    fn add_fuses_regular_entries() {
        let mut grid = StatGrid::new();
        grid.add_regular(StatId::AtkFlat, Tag::Universal, 10.0);
        grid.add_regular(StatId::AtkFlat, Tag::Universal, 5.0);
        assert_eq!(grid.get(StatId::AtkFlat, Tag::Universal).unwrap(), 15.0);
    }

    #[test]
    fn add_relative_resolves_against_self() {
        let mut grid = StatGrid::new();
        grid.add_regular(StatId::AtkBase, Tag::Universal, 100.0);
        grid.add_relative(
            StatId::AtkRatio,
            Tag::Universal,
            0.0,
            FormulaBundle::parse("f:atk_base*0.1").unwrap(),
        );
        assert_eq!(grid.get(StatId::AtkRatio, Tag::Universal).unwrap(), 10.0);
    }

    #[test]
    fn add_grid_fuses_every_entry() {
        let mut a = StatGrid::new();
        a.add_regular(StatId::HpFlat, Tag::Universal, 100.0);
        let mut b = StatGrid::new();
        b.add_regular(StatId::HpFlat, Tag::Universal, 50.0);
        a.add_grid(b);
        assert_eq!(a.get(StatId::HpFlat, Tag::Universal).unwrap(), 150.0);
    }

    #[test]
    fn from_json_parses_regular_and_relative_entries() {
        let value = serde_json::json!({
            "atk_base": 100.0,
            "crit_rate@basic": 0.1,
            "atk_ratio": {"base": 0.0, "formula": "f:atk_base*0.1"},
        });
        let grid = StatGrid::from_json(&value).unwrap();
        assert_eq!(grid.get(StatId::AtkBase, Tag::Universal).unwrap(), 100.0);
        assert_eq!(grid.get(StatId::CritRate, Tag::Basic).unwrap(), 0.1);
        assert_eq!(grid.get(StatId::AtkRatio, Tag::Universal).unwrap(), 10.0);
    }

    #[test]
    fn from_json_rejects_non_object_values() {
        assert!(StatGrid::from_json(&serde_json::json!([1, 2, 3])).is_err());
    }

    #[test]
    fn grid_does_not_mutate_on_read() {
        let mut grid = StatGrid::new();
        grid.add_regular(StatId::AtkBase, Tag::Universal, 1.0);
        let before = grid.clone();
        let _ = grid.get(StatId::AtkBase, Tag::Universal);
        let _ = grid.get_summed(StatId::AtkBase, Tag::Universal);
        assert_eq!(grid, before);
    }
}
