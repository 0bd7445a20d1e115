//! Property tests for the two places the spec phrases as universal claims
//! rather than worked examples: the expression engine's tokenize/compile/eval
//! round trip, and the stat grid's fusion rules.

use proptest::prelude::*;

use calc_core::enums::{StatId, Tag};
use calc_core::error::CoreResult;
use calc_core::expr::{eval_rpn, shunting_yard, tokenize};
use calc_core::stats::{Qualifier, Stat, StatGrid};

/// A tiny arithmetic AST, fully parenthesized on render so the generated
/// infix string's meaning never depends on the engine's own precedence
/// table — the reference value is computed independently of it.
#[derive(Debug, Clone)]
enum Ast {
    Leaf(i32),
    Add(Box<Ast>, Box<Ast>),
    Sub(Box<Ast>, Box<Ast>),
    Mul(Box<Ast>, Box<Ast>),
}

impl Ast {
    fn render(&self) -> String {
        match self {
            Ast::Leaf(n) => n.to_string(),
            Ast::Add(l, r) => format!("({}+{})", l.render(), r.render()),
            Ast::Sub(l, r) => format!("({}-{})", l.render(), r.render()),
            Ast::Mul(l, r) => format!("({}*{})", l.render(), r.render()),
        }
    }

    fn reference_eval(&self) -> f64 {
        match self {
            Ast::Leaf(n) => *n as f64,
            Ast::Add(l, r) => l.reference_eval() + r.reference_eval(),
            Ast::Sub(l, r) => l.reference_eval() - r.reference_eval(),
            Ast::Mul(l, r) => l.reference_eval() * r.reference_eval(),
        }
    }
}

fn ast_strategy() -> impl Strategy<Value = Ast> {
    let leaf = (-20i32..20).prop_map(Ast::Leaf);
    leaf.prop_recursive(6, 64, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Ast::Add(Box::new(l), Box::new(r))),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Ast::Sub(Box::new(l), Box::new(r))),
            (inner.clone(), inner).prop_map(|(l, r)| Ast::Mul(Box::new(l), Box::new(r))),
        ]
    })
}

fn no_vars(_: StatId) -> CoreResult<f64> {
    Ok(0.0)
}

proptest! {
    /// `eval(rpn(tokens(s)), g) == reference_eval(s, g)` for every
    /// well-formed, fully-parenthesized arithmetic string.
    #[test]
    fn eval_matches_reference_evaluation(ast in ast_strategy()) {
        let infix = ast.render();
        let tokens = tokenize(&infix).unwrap();
        let rpn = shunting_yard(tokens).unwrap();
        let result = eval_rpn(&rpn, &no_vars).unwrap();
        prop_assert!((result - ast.reference_eval()).abs() < 1e-6);
    }

    /// Compiling an expression that is already flat RPN-shaped (a single
    /// leaf, or one that shunting_yard has already processed) is a no-op:
    /// feeding shunting_yard's own output back through it unchanged (no
    /// parens or operators left to reorder) returns the same stream.
    #[test]
    fn shunting_yard_is_idempotent_on_its_own_output(ast in ast_strategy()) {
        let infix = ast.render();
        let tokens = tokenize(&infix).unwrap();
        let rpn_once = shunting_yard(tokens).unwrap();
        let rpn_twice = shunting_yard(rpn_once.clone()).unwrap();
        prop_assert_eq!(rpn_once, rpn_twice);
    }

    /// `Regular + Regular` sums bases, for any pair of finite base values.
    #[test]
    fn regular_fuse_sums_bases(a in -1000.0f64..1000.0, b in -1000.0f64..1000.0) {
        let fused = Stat::regular(a).fuse(Stat::regular(b));
        prop_assert!((fused.value(&no_vars).unwrap() - (a + b)).abs() < 1e-9);
    }

    /// Fusing two regular stats into a grid is commutative: installing
    /// `a` then `b` reads the same as installing `b` then `a`.
    #[test]
    fn grid_add_of_regular_stats_is_commutative(a in -1000.0f64..1000.0, b in -1000.0f64..1000.0) {
        let qualifier = Qualifier::new(StatId::AtkFlat, Tag::Universal);

        let mut ab = StatGrid::new();
        ab.add(qualifier, Stat::regular(a));
        ab.add(qualifier, Stat::regular(b));

        let mut ba = StatGrid::new();
        ba.add(qualifier, Stat::regular(b));
        ba.add(qualifier, Stat::regular(a));

        let left = ab.get(StatId::AtkFlat, Tag::Universal).unwrap();
        let right = ba.get(StatId::AtkFlat, Tag::Universal).unwrap();
        prop_assert!((left - right).abs() < 1e-9);
    }

    /// `get_summed(id, Universal) == get(id, Universal)` for any base value
    /// installed under the universal tag.
    #[test]
    fn get_summed_matches_get_under_universal_tag(base in -1000.0f64..1000.0) {
        let mut grid = StatGrid::new();
        grid.add_regular(StatId::AtkBase, Tag::Universal, base);
        let direct = grid.get(StatId::AtkBase, Tag::Universal).unwrap();
        let summed = grid.get_summed(StatId::AtkBase, Tag::Universal).unwrap();
        prop_assert_eq!(direct, summed);
    }

    /// Reading a grid (`get`/`get_summed`) never observably mutates it.
    #[test]
    fn grid_reads_do_not_mutate(base in -1000.0f64..1000.0, extra in -1000.0f64..1000.0) {
        let mut grid = StatGrid::new();
        grid.add_regular(StatId::AtkBase, Tag::Universal, base);
        grid.add_regular(StatId::CritRate, Tag::Basic, extra);
        let before = grid.clone();

        let _ = grid.get(StatId::AtkBase, Tag::Universal);
        let _ = grid.get_summed(StatId::CritRate, Tag::Basic);
        let _ = grid.contains(StatId::DefFlat, Tag::Universal);

        prop_assert_eq!(grid, before);
    }
}
