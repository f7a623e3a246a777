//! The canonicalizer.
//!
//! [`canonicalize`] maps every expression onto a normalized tree, so that expressions differing
//! only in the order of commutative arguments, in the grouping of associative operations, or in
//! trivially foldable numeric parts end up structurally identical:
//!
//! - `Add` and `Multiply` are flattened and their arguments sorted with [`Expr::canonical_cmp`].
//! - Numbers are folded into at most one numeric term per sum or product. Identity elements are
//!   dropped, and a zero factor collapses the whole product to `0`.
//! - `a - b` becomes `a + -1*b`, and `a / b` becomes `a * b^-1`.
//! - Trivial powers collapse: `a^0 = 1`, `a^1 = a`, `0^n = 0` for positive `n`, `1^a = 1`, and
//!   `(a^b)^c = a^(b*c)`. Numeric powers are evaluated.
//! - A product of exactly two non-scalar factors is promoted to a dot product or matrix product
//!   when the operand shapes call for it. The operands of a dot product are sorted; those of a
//!   matrix product keep their order.
//!
//! Canonicalization never fails. Ill-shaped input produces an expression with an invalid
//! [`Shape`](crate::Shape), which callers check explicitly.

use crate::expr::{shape::promote_product, Expr, OpKind};

/// Exponents with an absolute value up to this bound are evaluated by repeated squaring.
const MAX_INTEGER_EXPONENT: f64 = i32::MAX as f64;

/// Returns the canonical form of the expression.
///
/// The function is pure and idempotent. If the expression is already canonical, the returned
/// expression shares its storage with the input (see [`Expr::is_same`]).
pub fn canonicalize(expr: &Expr) -> Expr {
    let op = match expr {
        Expr::Number(n) => return Expr::number(*n),
        Expr::Symbol(_) | Expr::Wildcard(_) => return expr.clone(),
        Expr::Op(op) => op,
    };

    let args = op.args().iter().map(canonicalize).collect::<Vec<_>>();
    let result = match (op.kind(), &args[..]) {
        (OpKind::Add, _) => canonical_add(args),
        (OpKind::Multiply, _) => canonical_multiply(args),
        (OpKind::Subtract, [lhs, rhs]) => {
            canonical_add(vec![lhs.clone(), negate(rhs.clone())])
        },
        (OpKind::Divide, [lhs, rhs]) => {
            canonical_multiply(vec![lhs.clone(), canonical_power(rhs.clone(), Expr::number(-1.0))])
        },
        (OpKind::Power, [base, exp]) => canonical_power(base.clone(), exp.clone()),
        (OpKind::Dot, [lhs, rhs]) if lhs.canonical_cmp(rhs).is_gt() => {
            Expr::op(OpKind::Dot, vec![rhs.clone(), lhs.clone()])
        },
        _ => {
            let unchanged = args.iter()
                .zip(op.args())
                .all(|(new, old)| new.is_same(old));
            if unchanged {
                return expr.clone();
            }
            expr.with_args(args)
        },
    };

    if result.structurally_eq(expr) {
        expr.clone()
    } else {
        result
    }
}

/// Returns `-1 * expr` in canonical form. `expr` must be canonical.
pub(crate) fn negate(expr: Expr) -> Expr {
    canonical_multiply(vec![Expr::number(-1.0), expr])
}

/// Replaces every argument that is itself an operation of the given kind with its own arguments.
/// The arguments must be canonical, so one level of flattening is enough.
fn flatten(kind: &OpKind, args: Vec<Expr>) -> Vec<Expr> {
    let mut flat = Vec::with_capacity(args.len());
    for arg in args {
        if arg.is_op(kind) {
            flat.extend(arg.args().iter().cloned());
        } else {
            flat.push(arg);
        }
    }
    flat
}

/// Builds a canonical sum from canonical terms.
pub(crate) fn canonical_add(args: Vec<Expr>) -> Expr {
    let mut terms = Vec::with_capacity(args.len());
    let mut sum = None;
    for term in flatten(&OpKind::Add, args) {
        match term {
            Expr::Number(n) => *sum.get_or_insert(0.0) += n,
            term => terms.push(term),
        }
    }

    if let Some(sum) = sum {
        if sum != 0.0 || terms.is_empty() {
            terms.push(Expr::number(sum));
        }
    }

    terms.sort_by(Expr::canonical_cmp);
    match terms.len() {
        0 => Expr::number(0.0),
        1 => terms.remove(0),
        _ => Expr::op(OpKind::Add, terms),
    }
}

/// Builds a canonical product from canonical factors.
///
/// Scalar factors commute, so they are sorted. Non-scalar factors keep their relative order and
/// are placed after the scalars, since matrix multiplication does not commute.
pub(crate) fn canonical_multiply(args: Vec<Expr>) -> Expr {
    let mut scalars = Vec::with_capacity(args.len());
    let mut others = Vec::new();
    let mut product = None;
    for factor in flatten(&OpKind::Multiply, args) {
        match factor {
            Expr::Number(n) => *product.get_or_insert(1.0) *= n,
            factor if factor.shape().is_scalar() => scalars.push(factor),
            factor => others.push(factor),
        }
    }

    if let Some(product) = product {
        if product == 0.0 {
            return Expr::number(0.0);
        }
        if product != 1.0 || (scalars.is_empty() && others.is_empty()) {
            scalars.push(Expr::number(product));
        }
    }

    if let [lhs, rhs] = &others[..] {
        match promote_product(&lhs.shape(), &rhs.shape()) {
            Some(OpKind::Dot) => {
                others.sort_by(Expr::canonical_cmp);
                scalars.push(Expr::op(OpKind::Dot, std::mem::take(&mut others)));
            },
            Some(kind) => others = vec![Expr::op(kind, others)],
            None => (),
        }
    }

    scalars.sort_by(Expr::canonical_cmp);
    let mut factors = scalars;
    factors.extend(others);
    match factors.len() {
        0 => Expr::number(1.0),
        1 => factors.remove(0),
        _ => Expr::op(OpKind::Multiply, factors),
    }
}

/// Raises `base` to the integer power `exp` by repeated squaring.
fn integer_power(base: f64, exp: i64) -> f64 {
    let mut result = 1.0;
    let mut square = base;
    let mut n = exp.unsigned_abs();
    while n > 0 {
        if n & 1 == 1 {
            result *= square;
        }
        square *= square;
        n >>= 1;
    }

    if exp < 0 {
        1.0 / result
    } else {
        result
    }
}

/// Evaluates `base^exp` numerically, or returns [`None`] if a non-integer power has no finite
/// real result.
fn numeric_power(base: f64, exp: f64) -> Option<f64> {
    if exp.fract() == 0.0 && exp.abs() <= MAX_INTEGER_EXPONENT {
        // division by zero produces an infinite result, which is kept as a marker
        return Some(integer_power(base, exp as i64));
    }

    let result = base.powf(exp);
    result.is_finite().then_some(result)
}

/// Builds a canonical power from a canonical base and exponent.
pub(crate) fn canonical_power(base: Expr, exp: Expr) -> Expr {
    match (&base, &exp) {
        (_, Expr::Number(e)) if *e == 0.0 => return Expr::number(1.0),
        (_, Expr::Number(e)) if *e == 1.0 => return base,
        (Expr::Number(b), Expr::Number(e)) if *b == 0.0 && *e > 0.0 => return Expr::number(0.0),
        (Expr::Number(b), _) if *b == 1.0 => return Expr::number(1.0),
        (Expr::Number(b), Expr::Number(e)) => {
            if let Some(value) = numeric_power(*b, *e) {
                return Expr::number(value);
            }
        },
        _ => (),
    }

    // (a^b)^c = a^(b*c)
    if let (Some(OpKind::Power), [inner_base, inner_exp]) = (base.kind(), base.args()) {
        let exp = canonical_multiply(vec![inner_exp.clone(), exp]);
        return canonical_power(inner_base.clone(), exp);
    }

    Expr::op(OpKind::Power, vec![base, exp])
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use crate::expr::Shape;
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn num(n: f64) -> Expr {
        Expr::number(n)
    }

    fn parse(source: &str) -> Expr {
        canonicalize(&source.parse::<Expr>().unwrap())
    }

    #[test]
    fn numeric_folding() {
        let expr = canonicalize(&Expr::op(OpKind::Add, vec![num(2.0), num(3.0), x()]));
        assert_eq!(expr.kind(), Some(&OpKind::Add));
        let args = expr.args();
        assert_eq!(args.len(), 2);
        assert_float_relative_eq!(args[0].as_number().unwrap(), 5.0);
        assert!(args[1].structurally_eq(&x()));
    }

    #[test]
    fn identities() {
        assert!(canonicalize(&(x() + num(0.0))).structurally_eq(&x()));
        assert!(canonicalize(&(x() * num(1.0))).structurally_eq(&x()));
        assert!(canonicalize(&(x() * num(0.0))).structurally_eq(&num(0.0)));
        assert!(canonicalize(&(num(2.0) + num(-2.0))).structurally_eq(&num(0.0)));
        assert!(canonicalize(&(num(0.5) * num(2.0))).structurally_eq(&num(1.0)));
    }

    #[test]
    fn power_laws() {
        assert!(canonicalize(&x().pow(num(0.0))).structurally_eq(&num(1.0)));
        assert!(canonicalize(&x().pow(num(1.0))).structurally_eq(&x()));
        assert!(canonicalize(&num(1.0).pow(x())).structurally_eq(&num(1.0)));
        assert!(canonicalize(&num(0.0).pow(num(3.0))).structurally_eq(&num(0.0)));

        let nested = Expr::symbol("a").pow(num(2.0)).pow(num(3.0));
        let expr = canonicalize(&nested);
        assert_eq!(expr.kind(), Some(&OpKind::Power));
        assert!(expr.args()[0].structurally_eq(&Expr::symbol("a")));
        assert!(expr.args()[1].structurally_eq(&num(6.0)));
    }

    #[test]
    fn numeric_powers() {
        assert_float_relative_eq!(parse("2^10").as_number().unwrap(), 1024.0);
        assert_float_relative_eq!(parse("4^0.5").as_number().unwrap(), 2.0);
        assert_float_relative_eq!(parse("2^-2").as_number().unwrap(), 0.25);

        // no finite real result, so the symbolic form is kept
        let root = parse("(-8)^0.5");
        assert_eq!(root.kind(), Some(&OpKind::Power));

        // integer powers of zero keep the infinite marker
        assert_eq!(parse("0^-1").as_number(), Some(f64::INFINITY));
    }

    #[test]
    fn subtract_and_divide() {
        let expr = parse("x - y");
        assert!(expr.structurally_eq(&Expr::op(OpKind::Add, vec![
            x(),
            Expr::op(OpKind::Multiply, vec![num(-1.0), Expr::symbol("y")]),
        ])));

        let expr = parse("x / y");
        assert!(expr.structurally_eq(&Expr::op(OpKind::Multiply, vec![
            x(),
            Expr::op(OpKind::Power, vec![Expr::symbol("y"), num(-1.0)]),
        ])));

        assert!(parse("6 / 2").structurally_eq(&num(3.0)));
    }

    #[test]
    fn flattening() {
        let expr = parse("a + (b + (c + d))");
        assert_eq!(expr.args().len(), 4);
        assert!(expr.args().iter().all(|arg| arg.as_symbol().is_some()));

        let expr = parse("2*(x*(3*y))");
        assert_eq!(expr.to_string(), "6*x*y");
    }

    #[test]
    fn sorting() {
        assert_eq!(parse("z + sin(x) + 2 + a").to_string(), "2 + a + z + sin(x)");
        assert_eq!(parse("y*x").to_string(), "x*y");
    }

    #[test]
    fn dot_product_promotion() {
        let expr = parse("u:[3] * v:[3]");
        assert_eq!(expr.kind(), Some(&OpKind::Dot));
        assert_eq!(expr.shape(), Shape::scalar());

        let expr = parse("2 * u:[3] * v:[3]");
        assert_eq!(expr.kind(), Some(&OpKind::Multiply));
        assert_eq!(expr.to_string(), "2*dot(u:[3], v:[3])");
    }

    #[test]
    fn dot_product_commutes() {
        let uv = parse("u:[3] * v:[3]");
        let vu = parse("v:[3] * u:[3]");
        assert!(uv.structurally_eq(&vu), "{} != {}", uv, vu);
        assert_eq!(uv, vu);
        assert_eq!(vu.to_string(), "dot(u:[3], v:[3])");

        let explicit = parse("dot(v:[3], u:[3])");
        assert!(explicit.structurally_eq(&uv));
        assert!(parse("x * v:[3] * u:[3]").structurally_eq(&parse("u:[3] * x * v:[3]")));
    }

    #[test]
    fn matrix_product_promotion() {
        let expr = parse("A:[2, 3] * v:[3]");
        assert_eq!(expr.kind(), Some(&OpKind::MatMul));
        assert_eq!(expr.shape(), Shape::vector(2));

        // non-scalar factors keep their order
        let expr = parse("B:[3, 3] * A:[3, 3]");
        assert!(expr.args()[0].structurally_eq(&Expr::shaped_symbol("B", Shape::matrix(3, 3))));
    }

    #[test]
    fn mismatched_shapes_are_invalid() {
        let expr = parse("u:[2] + v:[3]");
        assert!(!expr.shape().is_valid());
    }

    #[test]
    fn idempotent() {
        for source in [
            "(x + 0) * 1",
            "a*x + b = c",
            "x^2*x^-1/(y - 3)",
            "(a^b)^c - 4/2",
            "2 * u:[3] * v:[3] + 1",
            "deriv(sin(x)*2, x)",
        ] {
            let once = parse(source);
            let twice = canonicalize(&once);
            assert!(once.structurally_eq(&twice), "{} -> {} -> {}", source, once, twice);
        }
    }

    #[test]
    fn preserves_identity_when_unchanged() {
        let expr = parse("x + sin(y)");
        assert!(canonicalize(&expr).is_same(&expr));
    }
}
