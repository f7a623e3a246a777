use crate::expr::{Expr, OpKind};

/// Returns the complexity of the expression, a rough measure of how hard it is to read.
///
/// Every node adds its own weight to the weights of its children:
///
/// - A number weighs its magnitude, so `2` is simpler than `1000`.
/// - A symbol or wildcard weighs the length of its name.
/// - Sums weigh 3, products 2, and powers 1, so that `x*(b + c)` is simpler than `x*b + x*c`.
/// - Function calls and named operations such as `deriv` weigh the length of their name plus
///   their number of arguments.
/// - Equations, vectors, and matrices weigh 1.
///
/// The solver's [`Complexity`](crate::solve::Complexity) goal prefers candidates with a lower
/// complexity.
pub fn complexity(expr: &Expr) -> usize {
    let own = match expr {
        // casts from float saturate, and `NaN` becomes 0
        Expr::Number(n) => n.abs().ceil() as usize,
        Expr::Symbol(sym) => sym.name.len(),
        Expr::Wildcard(wildcard) => wildcard.name.len(),
        Expr::Op(op) => match op.kind() {
            OpKind::Add | OpKind::Subtract => 3,
            OpKind::Multiply | OpKind::Divide => 2,
            OpKind::Power => 1,
            OpKind::Equality | OpKind::Vector | OpKind::Matrix { .. } => 1,
            OpKind::Function(name) => name.len() + op.args().len(),
            kind => kind.name().len() + op.args().len(),
        },
    };

    expr.args()
        .iter()
        .fold(own, |total, arg| total.saturating_add(complexity(arg)))
}

#[cfg(test)]
mod tests {
    use crate::canonicalize;
    use super::*;

    fn of(source: &str) -> usize {
        complexity(&canonicalize(&source.parse::<Expr>().unwrap()))
    }

    #[test]
    fn atoms() {
        assert_eq!(of("2"), 2);
        assert_eq!(of("-0.5"), 1);
        assert_eq!(of("theta"), 5);
    }

    #[test]
    fn simpler_forms_weigh_less() {
        assert!(of("x^2") < of("x*x*x"));
        assert!(of("x*(b + c)") < of("x*b + x*c"));
    }

    #[test]
    fn calls() {
        // sin: 3 + 1 argument, x: 1
        assert_eq!(of("sin(x)"), 5);
    }

    #[test]
    fn saturates() {
        assert_eq!(complexity(&Expr::number(f64::INFINITY)), usize::MAX);
        assert_eq!(complexity(&(Expr::number(f64::INFINITY) + Expr::symbol("x"))), usize::MAX);
    }
}
