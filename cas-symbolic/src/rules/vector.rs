//! Vector calculus identities, and evaluation of arithmetic over vector literals.

use crate::{
    canonical::{canonical_add, canonical_multiply},
    expr::{Expr, OpKind},
    rule::Rule,
};
use once_cell::sync::Lazy;
use super::{compile, do_add, do_binary, do_multiply};

const SOURCES: &[&str] = &[
    "curl(grad(a)) ~ [0, 0, 0]",
    "div(curl(a)) ~ 0",
    "grad(a + b) ~ grad(a) + grad(b)",
    "div(a + b) ~ div(a) + div(b)",
    "curl(a + b) ~ curl(a) + curl(b)",
    "dot(a, b + c) ~ dot(a, b) + dot(a, c)",
    "dot(a + b, c) ~ dot(a, c) + dot(b, c)",
];

/// The number of rules in the library.
pub(crate) const RULE_COUNT: usize = SOURCES.len() + 3;

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules = compile("vector", SOURCES);
    rules.push(Rule::native("add vector literals", add_vector_literals));
    rules.push(Rule::native("scale vector literal", scale_vector_literal));
    rules.push(Rule::native("dot vector literals", dot_vector_literals));
    rules
});

/// Returns the rules of the library.
pub fn rules() -> &'static [Rule] {
    &RULES
}

/// Adds the vector literals of the same length in a sum element-wise.
///
/// `[a, b] + [c, d] = [a + c, b + d]`
pub fn add_vector_literals(expr: &Expr) -> Option<Expr> {
    do_add(expr, |terms| {
        let (vectors, mut others): (Vec<_>, Vec<_>) = terms.iter()
            .cloned()
            .partition(|term| term.is_op(&OpKind::Vector));
        let len = vectors.first()?.args().len();
        if vectors.len() < 2 || vectors.iter().any(|vector| vector.args().len() != len) {
            return None;
        }

        let sum = (0..len)
            .map(|i| canonical_add(vectors.iter().map(|vector| vector.args()[i].clone()).collect()))
            .collect::<Vec<_>>();
        others.push(Expr::op(OpKind::Vector, sum));
        Some(Expr::op(OpKind::Add, others))
    })
}

/// Multiplies every entry of a vector literal by the scalar factors of the product it is in.
///
/// `2*x*[a, b] = [2*x*a, 2*x*b]`
pub fn scale_vector_literal(expr: &Expr) -> Option<Expr> {
    do_multiply(expr, |factors| {
        let (vector, scalars) = factors.split_last()?;
        if !vector.is_op(&OpKind::Vector) || !scalars.iter().all(|factor| factor.shape().is_scalar()) {
            return None;
        }

        let entries = vector.args()
            .iter()
            .map(|entry| {
                let mut product = scalars.to_vec();
                product.push(entry.clone());
                canonical_multiply(product)
            })
            .collect::<Vec<_>>();
        Some(Expr::op(OpKind::Vector, entries))
    })
}

/// Evaluates the dot product of two vector literals of the same length.
///
/// `dot([a, b], [c, d]) = a*c + b*d`
pub fn dot_vector_literals(expr: &Expr) -> Option<Expr> {
    do_binary(expr, &OpKind::Dot, |lhs, rhs| {
        if !lhs.is_op(&OpKind::Vector)
            || !rhs.is_op(&OpKind::Vector)
            || lhs.args().len() != rhs.args().len()
        {
            return None;
        }

        let terms = lhs.args()
            .iter()
            .zip(rhs.args())
            .map(|(a, b)| canonical_multiply(vec![a.clone(), b.clone()]))
            .collect();
        Some(canonical_add(terms))
    })
}

#[cfg(test)]
mod tests {
    use crate::{canonicalize, expr::Shape, rewrite_fully};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expr {
        canonicalize(&source.parse::<Expr>().unwrap())
    }

    fn evaluate(source: &str) -> Expr {
        rewrite_fully(&parse(source), rules(), 100).0
    }

    #[test]
    fn identities() {
        assert_eq!(evaluate("curl(grad(f))"), parse("[0, 0, 0]"));
        assert_eq!(evaluate("div(curl(F:[3]))"), Expr::number(0.0));
    }

    #[test]
    fn linearity() {
        let expr = evaluate("div(F:[3] + G:[3])");
        assert_eq!(expr, parse("div(F:[3]) + div(G:[3])"));
        assert_eq!(expr.shape(), Shape::scalar());
    }

    #[test]
    fn literals() {
        assert_eq!(evaluate("[1, x] + [2, y]"), parse("[3, x + y]"));
        assert_eq!(evaluate("2*[x, 1]"), parse("[2*x, 2]"));
        assert_eq!(evaluate("[1, 2] * [x, y]"), parse("x + 2*y"));
    }
}
