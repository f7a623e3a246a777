use cas_symbolic::{canonicalize, substitute, try_match, Bindings, Expr, OpKind, Shape};
use proptest::prelude::*;

const SYMBOLS: [&str; 4] = ["a", "b", "x", "y"];

const VECTORS: [&str; 3] = ["u", "v", "w"];

fn vector(i: usize) -> Expr {
    Expr::shaped_symbol(VECTORS[i], Shape::vector(3))
}

/// Generates scalar expressions without division, so that every numeric fold is exact. Vector
/// symbols only appear as products of two vectors, which are scalars.
fn expr_strategy() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (-3i32..=3).prop_map(|n| Expr::number(n as f64)),
        (0..SYMBOLS.len()).prop_map(|i| Expr::symbol(SYMBOLS[i])),
        (0..VECTORS.len(), 0..VECTORS.len())
            .prop_map(|(i, j)| Expr::op(OpKind::Multiply, vec![vector(i), vector(j)])),
    ];

    leaf.prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..=3)
                .prop_map(|args| Expr::op(OpKind::Add, args)),
            prop::collection::vec(inner.clone(), 2..=3)
                .prop_map(|args| Expr::op(OpKind::Multiply, args)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a - b),
            inner.clone().prop_map(|a| a.pow(Expr::number(2.0))),
            inner.prop_map(|a| Expr::call("h", vec![a])),
        ]
    })
}

proptest! {
    #[test]
    fn canonicalization_is_idempotent(expr in expr_strategy()) {
        let once = canonicalize(&expr);
        let twice = canonicalize(&once);
        prop_assert!(twice.structurally_eq(&once), "{} became {}", once, twice);
    }

    #[test]
    fn sums_and_products_commute(a in expr_strategy(), b in expr_strategy()) {
        let ab = canonicalize(&(a.clone() + b.clone()));
        let ba = canonicalize(&(b.clone() + a.clone()));
        prop_assert!(ab.structurally_eq(&ba), "{} != {}", ab, ba);

        let ab = canonicalize(&(a.clone() * b.clone()));
        let ba = canonicalize(&(b * a));
        prop_assert!(ab.structurally_eq(&ba), "{} != {}", ab, ba);
    }

    #[test]
    fn dot_products_commute(i in 0..VECTORS.len(), j in 0..VECTORS.len(), k in expr_strategy()) {
        let ab = canonicalize(&(k.clone() * vector(i) * vector(j)));
        let ba = canonicalize(&(vector(j) * k * vector(i)));
        prop_assert!(ab.structurally_eq(&ba), "{} != {}", ab, ba);
    }

    #[test]
    fn equality_follows_canonical_form(a in expr_strategy(), b in expr_strategy()) {
        prop_assert_eq!(a.clone() + b.clone(), b + a);
    }

    #[test]
    fn match_recovers_substituted_bindings(x in expr_strategy(), y in expr_strategy()) {
        let pattern = canonicalize(&"f(?x, g(?y))".parse::<Expr>().unwrap());
        let x = canonicalize(&x);
        let y = canonicalize(&y);
        let bindings = [("x", x.clone()), ("y", y.clone())].into_iter().collect::<Bindings>();

        let expr = canonicalize(&substitute(&pattern, &bindings));
        let found = try_match(&expr, &pattern);
        prop_assert!(found.is_some(), "{} does not match {}", expr, pattern);

        let found = found.unwrap();
        prop_assert_eq!(found.len(), 2);
        prop_assert!(found.get("x").is_some_and(|bound| bound.structurally_eq(&x)));
        prop_assert!(found.get("y").is_some_and(|bound| bound.structurally_eq(&y)));
    }

    #[test]
    fn printed_form_reparses(expr in expr_strategy()) {
        let expr = canonicalize(&expr);
        let printed = expr.to_string();
        let reparsed = printed.parse::<Expr>();
        prop_assert!(reparsed.is_ok(), "`{}` failed to parse", printed);
        prop_assert_eq!(canonicalize(&reparsed.unwrap()).to_string(), printed);
    }
}
