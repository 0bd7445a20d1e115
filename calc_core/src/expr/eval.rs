//! RPN evaluation against a caller-supplied variable source.

use crate::enums::StatId;
use crate::error::{CoreError, CoreResult};
use crate::expr::lexer::Token;

/// Anything a compiled expression can pull variable values from. The stat
/// grid is the only production implementor; tests use plain closures/maps.
/// Fallible because resolving a variable may itself require evaluating
/// another relative stat's formulas.
pub trait VariableSource {
    fn resolve(&self, id: StatId) -> CoreResult<f64>;
}

impl<F: Fn(StatId) -> CoreResult<f64>> VariableSource for F {
    fn resolve(&self, id: StatId) -> CoreResult<f64> {
        self(id)
    }
}

/// A pre-compiled formula: the postfix token stream from
/// [`crate::expr::shunting_yard::shunting_yard`], ready for repeated evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpr {
    rpn: Vec<Token>,
}

impl CompiledExpr {
    /// Tokenize and compile a raw infix expression string.
    pub fn parse(src: &str) -> CoreResult<CompiledExpr> {
        let tokens = crate::expr::lexer::tokenize(src)?;
        let rpn = crate::expr::shunting_yard::shunting_yard(tokens)?;
        Ok(CompiledExpr { rpn })
    }

    /// Evaluate against `source`, resolving every [`Token::Variable`] on demand.
    pub fn eval(&self, source: &dyn VariableSource) -> CoreResult<f64> {
        eval_rpn(&self.rpn, source)
    }

    /// A single-number constant expression, for synthesizing fused formulas.
    pub(crate) fn literal(n: f64) -> CompiledExpr {
        CompiledExpr {
            rpn: vec![Token::Number(n)],
        }
    }

    /// `Some(n)` if this expression is exactly a bare number literal.
    pub(crate) fn as_literal(&self) -> Option<f64> {
        match self.rpn.as_slice() {
            [Token::Number(n)] => Some(*n),
            _ => None,
        }
    }

    /// Concatenate two compiled expressions' RPN streams and append `op`,
    /// producing `lhs op rhs` without re-tokenizing or re-parsing either side.
    pub(crate) fn combine(lhs: CompiledExpr, rhs: CompiledExpr, op: Token) -> CompiledExpr {
        let mut rpn = lhs.rpn;
        rpn.extend(rhs.rpn);
        rpn.push(op);
        CompiledExpr { rpn }
    }
}

/// Evaluate a postfix token stream, resolving variables via `source`.
pub fn eval_rpn(rpn: &[Token], source: &dyn VariableSource) -> CoreResult<f64> {
    let mut stack: Vec<f64> = Vec::with_capacity(rpn.len());

    for token in rpn {
        match token {
            Token::Number(n) => stack.push(*n),
            Token::Variable(id) => stack.push(source.resolve(*id)?),
            op if op.is_operator() => {
                let rhs = stack.pop().ok_or_else(|| {
                    CoreError::Evaluation("operator stack underflow (rhs)".to_string())
                })?;
                let lhs = stack.pop().ok_or_else(|| {
                    CoreError::Evaluation("operator stack underflow (lhs)".to_string())
                })?;
                let result = match op {
                    Token::Plus => lhs + rhs,
                    Token::Minus => lhs - rhs,
                    Token::Star => lhs * rhs,
                    Token::Slash => lhs / rhs,
                    Token::Percent => lhs % rhs,
                    Token::Equal => bool_to_f64(lhs == rhs),
                    Token::Less => bool_to_f64(lhs < rhs),
                    Token::More => bool_to_f64(lhs > rhs),
                    Token::LessEq => bool_to_f64(lhs <= rhs),
                    Token::MoreEq => bool_to_f64(lhs >= rhs),
                    Token::And => bool_to_f64(lhs != 0.0 && rhs != 0.0),
                    Token::Or => bool_to_f64(lhs != 0.0 || rhs != 0.0),
                    Token::Min => lhs.min(rhs),
                    _ => unreachable!("is_operator() guards this arm"),
                };
                stack.push(result);
            }
            other => {
                return Err(CoreError::Evaluation(format!(
                    "non-postfix token in compiled expression: {other:?}"
                )))
            }
        }
    }

    match stack.len() {
        1 => Ok(stack[0]),
        n => Err(CoreError::Evaluation(format!(
            "expression left {n} values on the stack, expected 1"
        ))),
    }
}

fn bool_to_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
