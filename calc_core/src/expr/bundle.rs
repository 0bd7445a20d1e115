//! Formula bundles: a `;`-separated list of `key:expression` pairs, the
//! on-disk encoding for a relative stat's condition/value/cap formulas.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::expr::eval::{CompiledExpr, VariableSource};
use crate::expr::lexer::Token;

/// The condition key: if present and its compiled expression evaluates to
/// zero, the relative stat resolves to its base value untouched.
pub const COND_KEY: char = 'c';
/// The value key: always present, computes the amount added on top of base.
pub const FUNC_KEY: char = 'f';
/// The cap key: if present, the value is clamped to at most this expression.
pub const MAX_KEY: char = 'm';

/// A parsed `c:...;f:...;m:...` formula string, keyed by the formula's
/// leading letter (`c`, `f` or `m`).
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaBundle {
    formulas: HashMap<char, CompiledExpr>,
}

impl FormulaBundle {
    /// Parse `source`, a `;`-separated list of `letter:expression` entries.
    /// The formula's key is the first character before `:`, matching the
    /// original encoding's "first letter of the formula name" rule.
    pub fn parse(source: &str) -> CoreResult<FormulaBundle> {
        let mut formulas = HashMap::new();

        for part in source.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (name, expr_src) = part.split_once(':').ok_or_else(|| {
                CoreError::Parse(format!("malformed formula entry (missing ':'): {part}"))
            })?;
            let key = name.chars().next().ok_or_else(|| {
                CoreError::Parse(format!("formula entry has an empty name: {part}"))
            })?;
            formulas.insert(key, CompiledExpr::parse(expr_src)?);
        }

        if !formulas.contains_key(&FUNC_KEY) {
            return Err(CoreError::Parse(format!(
                "formula bundle is missing a required '{FUNC_KEY}' entry: {source}"
            )));
        }

        Ok(FormulaBundle { formulas })
    }

    pub fn get(&self, key: char) -> Option<&CompiledExpr> {
        self.formulas.get(&key)
    }

    /// Evaluate this bundle against `source`, applying the condition-gate,
    /// value and cap rules in one step. `base` is the stat's base value.
    pub fn resolve(&self, base: f64, source: &dyn VariableSource) -> CoreResult<f64> {
        if let Some(cond) = self.get(COND_KEY) {
            if cond.eval(source)? == 0.0 {
                return Ok(base);
            }
        }

        let func = self
            .formulas
            .get(&FUNC_KEY)
            .expect("constructor enforces the 'f' entry is present");
        let mut calculated = func.eval(source)?;

        if let Some(max) = self.get(MAX_KEY) {
            calculated = calculated.min(max.eval(source)?);
        }

        Ok(base + calculated)
    }

    /// Fuse two formula bundles key-wise: conditions AND together (or pass
    /// through if only one side has one), functions always sum, and upper
    /// bounds take the pointwise minimum (computed eagerly when both sides
    /// are literal numbers, combined symbolically otherwise).
    pub fn fuse(lhs: FormulaBundle, rhs: FormulaBundle) -> FormulaBundle {
        let mut formulas = lhs.formulas;
        let mut rhs = rhs.formulas;

        let cond = match (formulas.remove(&COND_KEY), rhs.remove(&COND_KEY)) {
            (Some(l), Some(r)) => Some(CompiledExpr::combine(l, r, Token::And)),
            (Some(l), None) => Some(l),
            (None, Some(r)) => Some(r),
            (None, None) => None,
        };

        let func = match (formulas.remove(&FUNC_KEY), rhs.remove(&FUNC_KEY)) {
            (Some(l), Some(r)) => CompiledExpr::combine(l, r, Token::Plus),
            (Some(l), None) => l,
            (None, Some(r)) => r,
            (None, None) => unreachable!("parse() guarantees every bundle carries an 'f' entry"),
        };

        let max = match (formulas.remove(&MAX_KEY), rhs.remove(&MAX_KEY)) {
            (Some(l), Some(r)) => Some(match (l.as_literal(), r.as_literal()) {
                (Some(ln), Some(rn)) => CompiledExpr::literal(ln.min(rn)),
                _ => CompiledExpr::combine(l, r, Token::Min),
            }),
            (Some(l), None) => Some(l),
            (None, Some(r)) => Some(r),
            (None, None) => None,
        };

        let mut result = HashMap::with_capacity(3);
        if let Some(cond) = cond {
            result.insert(COND_KEY, cond);
        }
        result.insert(FUNC_KEY, func);
        if let Some(max) = max {
            result.insert(MAX_KEY, max);
        }

        FormulaBundle { formulas: result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::StatId;

    fn zero(_: StatId) -> CoreResult<f64> {
        Ok(0.0)
    }

    #[test]
    fn resolves_plain_func_only() {
        let bundle = FormulaBundle::parse("f:10+5").unwrap();
        assert_eq!(bundle.resolve(100.0, &zero).unwrap(), 115.0);
    }

    #[test]
    fn condition_gate_falls_back_to_base() {
        let bundle = FormulaBundle::parse("c:0;f:10+5").unwrap();
        assert_eq!(bundle.resolve(100.0, &zero).unwrap(), 100.0);
    }

    #[test]
    fn condition_gate_lets_func_through_when_truthy() {
        let bundle = FormulaBundle::parse("c:1;f:10+5").unwrap();
        assert_eq!(bundle.resolve(100.0, &zero).unwrap(), 115.0);
    }

    #[test]
    fn cap_clamps_the_calculated_value() {
        let bundle = FormulaBundle::parse("f:1000;m:5").unwrap();
        assert_eq!(bundle.resolve(100.0, &zero).unwrap(), 105.0);
    }

    #[test]
    fn missing_func_entry_is_rejected() {
        assert!(FormulaBundle::parse("c:1;m:5").is_err());
    }

    #[test]
    fn fuse_sums_functions_and_ands_conditions() {
        let lhs = FormulaBundle::parse("c:1;f:10").unwrap();
        let rhs = FormulaBundle::parse("c:0;f:5").unwrap();
        let fused = FormulaBundle::fuse(lhs, rhs);
        // c: 1 & 0 = 0 -> falls back to base.
        assert_eq!(fused.resolve(100.0, &zero).unwrap(), 100.0);
    }

    #[test]
    fn fuse_keeps_lone_condition() {
        let lhs = FormulaBundle::parse("c:1;f:10").unwrap();
        let rhs = FormulaBundle::parse("f:5").unwrap();
        let fused = FormulaBundle::fuse(lhs, rhs);
        assert_eq!(fused.resolve(0.0, &zero).unwrap(), 15.0);
    }

    #[test]
    fn fuse_takes_eager_min_of_literal_bounds() {
        let lhs = FormulaBundle::parse("f:1000;m:5").unwrap();
        let rhs = FormulaBundle::parse("f:1000;m:3").unwrap();
        let fused = FormulaBundle::fuse(lhs, rhs);
        assert_eq!(fused.resolve(0.0, &zero).unwrap(), 3.0);
    }
}
