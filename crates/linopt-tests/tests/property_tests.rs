//! Property tests for constant folding: idempotence, DAG consistency and
//! agreement with unoptimized execution.

use linopt::hops::{DataType, HopDag, HopId, OpOp1, OpOp2, ValueType};
use linopt::rewrite::constant_folding::literal_from_scalar;
use linopt::runtime::execute_scalar;
use linopt::{HopRewriteRule, ProgramRewriteStatus, RewriteConstantFolding};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Expr {
    Int(i64),
    Double(f64),
    Bool(bool),
    Var(ValueType),
    Binary(OpOp2, ValueType, Box<Expr>, Box<Expr>),
    Cast(OpOp1, Box<Expr>),
}

fn literal_leaf() -> BoxedStrategy<Expr> {
    prop_oneof![
        (-50i64..50).prop_map(Expr::Int),
        (-50.0f64..50.0).prop_map(Expr::Double),
        any::<bool>().prop_map(Expr::Bool),
    ]
    .boxed()
}

fn mixed_leaf() -> BoxedStrategy<Expr> {
    prop_oneof![
        3 => literal_leaf(),
        1 => prop::sample::select(vec![ValueType::Int, ValueType::Double, ValueType::Boolean])
            .prop_map(Expr::Var),
    ]
    .boxed()
}

fn expr(leaf: BoxedStrategy<Expr>) -> BoxedStrategy<Expr> {
    leaf.prop_recursive(4, 24, 2, |inner| {
        let arithmetic = prop::sample::select(vec![
            OpOp2::Plus,
            OpOp2::Minus,
            OpOp2::Mult,
            OpOp2::Div,
            OpOp2::Modulus,
            OpOp2::IntDiv,
            OpOp2::Pow,
            OpOp2::Min,
            OpOp2::Max,
        ]);
        let boolean = prop::sample::select(vec![
            OpOp2::Less,
            OpOp2::LessEqual,
            OpOp2::Greater,
            OpOp2::Equal,
            OpOp2::NotEqual,
            OpOp2::And,
            OpOp2::Or,
        ]);
        let numeric_type = prop::sample::select(vec![ValueType::Int, ValueType::Double]);
        let cast = prop::sample::select(vec![
            OpOp1::CastAsInt,
            OpOp1::CastAsDouble,
            OpOp1::CastAsBoolean,
        ]);
        prop_oneof![
            (arithmetic, numeric_type, inner.clone(), inner.clone())
                .prop_map(|(op, vt, l, r)| Expr::Binary(op, vt, Box::new(l), Box::new(r))),
            (boolean, inner.clone(), inner.clone()).prop_map(|(op, l, r)| {
                Expr::Binary(op, ValueType::Boolean, Box::new(l), Box::new(r))
            }),
            (cast, inner).prop_map(|(op, e)| Expr::Cast(op, Box::new(e))),
        ]
    })
    .boxed()
}

fn build(dag: &mut HopDag, expr: &Expr) -> HopId {
    match expr {
        Expr::Int(v) => dag.literal(*v),
        Expr::Double(v) => dag.literal(*v),
        Expr::Bool(b) => dag.literal(*b),
        Expr::Var(vt) => {
            let name = format!("v{}", dag.len());
            dag.transient_read(&name, *vt, DataType::Scalar)
        }
        Expr::Binary(op, vt, l, r) => {
            let l = build(dag, l);
            let r = build(dag, r);
            dag.binary(*op, *vt, DataType::Scalar, l, r)
        }
        Expr::Cast(op, e) => {
            let input = build(dag, e);
            let vt = match op {
                OpOp1::CastAsInt => ValueType::Int,
                OpOp1::CastAsBoolean => ValueType::Boolean,
                _ => ValueType::Double,
            };
            dag.unary(*op, vt, DataType::Scalar, input)
        }
    }
}

fn fold(dag: &mut HopDag, roots: Vec<HopId>, fold_predicates: bool) -> Vec<HopId> {
    let mut status = ProgramRewriteStatus::default();
    RewriteConstantFolding::new()
        .fold_predicates(fold_predicates)
        .rewrite_hop_dags(dag, roots, &mut status)
        .unwrap()
}

proptest! {
    #[test]
    fn folding_is_idempotent(a in expr(mixed_leaf()), b in expr(mixed_leaf())) {
        let mut dag = HopDag::new();
        let ra = build(&mut dag, &a);
        let rb = build(&mut dag, &b);
        let shared = dag.binary(OpOp2::Equal, ValueType::Boolean, DataType::Scalar, ra, rb);

        let first = fold(&mut dag, vec![ra, rb, shared], true);
        dag.validate(&first).unwrap();
        let explain = dag.explain(&first).unwrap();
        let hops = dag.len();

        let second = fold(&mut dag, first.clone(), true);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(dag.explain(&second).unwrap(), explain);
        prop_assert_eq!(dag.len(), hops);
    }

    #[test]
    fn folded_value_matches_unoptimized_execution(e in expr(literal_leaf())) {
        let mut dag = HopDag::new();
        let root = build(&mut dag, &e);
        let value_type = dag.hop(root).value_type();
        let expected = execute_scalar(&dag, root)
            .and_then(|value| literal_from_scalar(value_type, value));

        let folded = fold(&mut dag, vec![root], false)[0];
        dag.validate(&[folded]).unwrap();

        match expected {
            Ok(expected) => {
                let actual = dag.literal_value(folded).unwrap();
                prop_assert_eq!(actual.to_string(), expected.to_string());
                prop_assert_eq!(actual.value_type(), expected.value_type());
            }
            Err(_) => prop_assert!(!dag.is_literal(folded)),
        }
    }

    #[test]
    fn literal_roots_stay_unchanged(e in literal_leaf()) {
        let mut dag = HopDag::new();
        let root = build(&mut dag, &e);
        let roots = fold(&mut dag, vec![root], true);
        prop_assert_eq!(roots, vec![root]);
        prop_assert_eq!(dag.len(), 1);
    }
}
