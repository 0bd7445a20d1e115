//! The `Stat` sum type: a constant ("regular") value or a base plus a
//! formula bundle evaluated against a grid ("relative").

use crate::enums::{StatId, Tag};
use crate::error::CoreResult;
use crate::expr::{FormulaBundle, VariableSource};

/// Identifies a stat entry within a grid: a stat id qualified by an
/// ability tag. `Tag::Universal` applies regardless of the active ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Qualifier {
    pub id: StatId,
    pub tag: Tag,
}

impl Qualifier {
    pub fn new(id: StatId, tag: Tag) -> Qualifier {
        Qualifier { id, tag }
    }
}

/// A constant stat: `value()` is always `base`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularStat {
    pub base: f64,
}

/// A base value plus a [`FormulaBundle`] evaluated against a lookup grid
/// supplied at evaluation time (see [`Stat::value`]).
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeStat {
    pub base: f64,
    pub formulas: FormulaBundle,
}

/// Either variant a grid entry can hold. Modeled as a tagged union rather
/// than a trait-object hierarchy: fusion is a total function on the 2x2
/// combination of variants (see [`Stat::fuse`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Stat {
    Regular(RegularStat),
    Relative(RelativeStat),
}

impl Stat {
    pub fn regular(base: f64) -> Stat {
        Stat::Regular(RegularStat { base })
    }

    pub fn relative(base: f64, formulas: FormulaBundle) -> Stat {
        Stat::Relative(RelativeStat { base, formulas })
    }

    pub fn base(&self) -> f64 {
        match self {
            Stat::Regular(r) => r.base,
            Stat::Relative(r) => r.base,
        }
    }

    /// Resolve this stat's value. `source` is the grid this stat is
    /// currently installed into, supplied by the caller rather than held
    /// internally — the non-owning "back-reference to the grid" the data
    /// model describes is realized as a borrow passed in at call time, so
    /// it can never outlive the grid it refers to and is implicitly
    /// rebound on every call.
    pub fn value(&self, source: &dyn VariableSource) -> CoreResult<f64> {
        match self {
            Stat::Regular(r) => Ok(r.base),
            Stat::Relative(r) => r.formulas.resolve(r.base, source),
        }
    }

    /// Fuse two stats sharing a qualifier. Bases always add; formulas
    /// follow the per-variant rules: Regular+Regular keeps no formulas,
    /// a Relative operand's formulas survive a mix with a Regular one,
    /// and two Relatives combine their formula bundles key-wise.
    pub fn fuse(self, other: Stat) -> Stat {
        match (self, other) {
            (Stat::Regular(l), Stat::Regular(r)) => Stat::regular(l.base + r.base),
            (Stat::Regular(l), Stat::Relative(r)) => {
                Stat::relative(l.base + r.base, r.formulas)
            }
            (Stat::Relative(l), Stat::Regular(r)) => {
                Stat::relative(l.base + r.base, l.formulas)
            }
            (Stat::Relative(l), Stat::Relative(r)) => {
                Stat::relative(l.base + r.base, FormulaBundle::fuse(l.formulas, r.formulas))
            }
        }
    }
}
