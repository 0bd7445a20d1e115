//! Infix expression engine: tokenizer, shunting-yard compiler, RPN
//! evaluator and the `c`/`f`/`m` formula-bundle encoding relative stats
//! use for their condition/value/cap expressions.

mod bundle;
mod eval;
mod lexer;
mod shunting_yard;

pub use bundle::{FormulaBundle, COND_KEY, FUNC_KEY, MAX_KEY};
pub use eval::{eval_rpn, CompiledExpr, VariableSource};
pub use lexer::{tokenize, Token};
pub use shunting_yard::shunting_yard;
