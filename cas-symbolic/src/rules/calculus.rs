//! Derivative and integral rules.
//!
//! `deriv(f, x)` and `integral(f, x)` are rewritten until no derivative or integral remains that a
//! rule knows how to handle. Rules that treat a subexpression as constant with respect to the
//! variable are guarded, so they only fire when the variable is a symbol that does not occur in
//! the subexpression.

use crate::{
    canonical::canonical_multiply,
    expr::{Expr, OpKind},
    pattern::Bindings,
    rule::Rule,
};
use once_cell::sync::Lazy;
use super::{compile, do_add, do_binary, do_multiply, is_free_of};

/// Rules that only fire if `a` does not depend on `x`.
const CONSTANT_SOURCES: &[&str] = &[
    "deriv(a, x) ~ 0",
    "integral(a, x) ~ a*x",
];

const DERIVATIVE_SOURCES: &[&str] = &[
    "deriv(x, x) ~ 1",
    "deriv(a^?#b, x) ~ ?#b*a^(?#b - 1)*deriv(a, x)",
    "deriv(a^b, x) ~ a^b*(deriv(b, x)*log(a) + b*deriv(a, x)/a)",
    "deriv(sin(a), x) ~ cos(a)*deriv(a, x)",
    "deriv(cos(a), x) ~ -sin(a)*deriv(a, x)",
    "deriv(tan(a), x) ~ deriv(a, x)/cos(a)^2",
    "deriv(exp(a), x) ~ exp(a)*deriv(a, x)",
    "deriv(log(a), x) ~ deriv(a, x)/a",
    "deriv(sqrt(a), x) ~ deriv(a, x)/(2*sqrt(a))",
];

const INTEGRAL_SOURCES: &[&str] = &[
    "integral(x, x) ~ x^2/2",
    "integral(x^-1, x) ~ log(x)",
    "integral(sin(x), x) ~ -cos(x)",
    "integral(cos(x), x) ~ sin(x)",
    "integral(exp(x), x) ~ exp(x)",
];

/// `integral(x^n, x) = x^(n+1)/(n+1)`, for constant `n` other than `-1`.
const POWER_INTEGRAL_SOURCE: &str = "integral(x^?#n, x) ~ x^(?#n + 1)/(?#n + 1)";

/// The number of rules in the library.
pub(crate) const RULE_COUNT: usize = CONSTANT_SOURCES.len()
    + DERIVATIVE_SOURCES.len()
    + INTEGRAL_SOURCES.len()
    + 1
    + 4;

/// Returns true if the constant exponent `n` is not `-1`.
fn exponent_is_not_minus_one(bindings: &Bindings) -> bool {
    bindings.get("n")
        .and_then(Expr::as_number)
        .is_some_and(|n| n != -1.0)
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules = compile("calculus", CONSTANT_SOURCES)
        .into_iter()
        .map(|rule| rule.with_guard(|bindings| is_free_of(bindings.get("a"), bindings.get("x"))))
        .collect::<Vec<_>>();

    rules.extend(compile("calculus", DERIVATIVE_SOURCES));
    rules.push(Rule::native("sum rule", sum_rule));
    rules.push(Rule::native("product rule", product_rule));

    rules.extend(compile("calculus", INTEGRAL_SOURCES));
    rules.extend(
        compile("calculus", &[POWER_INTEGRAL_SOURCE])
            .into_iter()
            .map(|rule| rule.with_guard(exponent_is_not_minus_one)),
    );
    rules.push(Rule::native("integral of sum", integral_of_sum));
    rules.push(Rule::native("constant factor of integral", integral_constant_factor));
    rules
});

/// Returns the rules of the library.
pub fn rules() -> &'static [Rule] {
    &RULES
}

/// Splits a derivative or integral of a sum into a sum of derivatives or integrals.
fn split_sum(expr: &Expr, kind: OpKind) -> Option<Expr> {
    do_binary(expr, &kind, |f, var| {
        do_add(f, |terms| {
            let terms = terms.iter()
                .map(|term| Expr::op(kind.clone(), vec![term.clone(), var.clone()]))
                .collect::<Vec<_>>();
            Some(Expr::op(OpKind::Add, terms))
        })
    })
}

/// `deriv(f+g, x) = deriv(f, x) + deriv(g, x)`
pub fn sum_rule(expr: &Expr) -> Option<Expr> {
    split_sum(expr, OpKind::Derivative)
}

/// `deriv(f*g, x) = deriv(f, x)*g + f*deriv(g, x)`, for any number of factors.
pub fn product_rule(expr: &Expr) -> Option<Expr> {
    do_binary(expr, &OpKind::Derivative, |f, var| {
        do_multiply(f, |factors| {
            let terms = (0..factors.len())
                .map(|i| {
                    let mut product = factors.to_vec();
                    product[i] = Expr::op(OpKind::Derivative, vec![factors[i].clone(), var.clone()]);
                    Expr::op(OpKind::Multiply, product)
                })
                .collect::<Vec<_>>();
            Some(Expr::op(OpKind::Add, terms))
        })
    })
}

/// `integral(f+g, x) = integral(f, x) + integral(g, x)`
pub fn integral_of_sum(expr: &Expr) -> Option<Expr> {
    split_sum(expr, OpKind::Integral)
}

/// Moves the factors of a product that do not depend on the variable out of its integral.
///
/// `integral(3*a*f(x), x) = 3*a*integral(f(x), x)`
pub fn integral_constant_factor(expr: &Expr) -> Option<Expr> {
    do_binary(expr, &OpKind::Integral, |f, var| {
        var.as_symbol()?;
        do_multiply(f, |factors| {
            let (mut constant, dependent): (Vec<_>, Vec<_>) = factors.iter()
                .cloned()
                .partition(|factor| !factor.contains(var));
            if constant.is_empty() || dependent.is_empty() {
                return None;
            }

            constant.push(Expr::op(OpKind::Integral, vec![canonical_multiply(dependent), var.clone()]));
            Some(Expr::op(OpKind::Multiply, constant))
        })
    })
}

#[cfg(test)]
mod tests {
    use crate::{canonicalize, rewrite_fully, rules::algebra};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expr {
        canonicalize(&source.parse::<Expr>().unwrap())
    }

    fn evaluate(source: &str) -> Expr {
        let rules = rules().iter()
            .chain(algebra::rules())
            .cloned()
            .collect::<Vec<_>>();
        rewrite_fully(&parse(source), &rules, 100).0
    }

    #[test]
    fn constants() {
        assert_eq!(evaluate("deriv(5, x)"), Expr::number(0.0));
        assert_eq!(evaluate("deriv(y^2, x)"), Expr::number(0.0));
        assert_eq!(evaluate("deriv(x, x)"), Expr::number(1.0));
    }

    #[test]
    fn polynomial() {
        assert_eq!(evaluate("deriv(x^2 + 3*x, x)"), parse("2*x + 3"));
        assert_eq!(evaluate("deriv(x^3, x)"), parse("3*x^2"));
    }

    #[test]
    fn chain_rule() {
        assert_eq!(evaluate("deriv(sin(x^2), x)"), parse("2*x*cos(x^2)"));
        assert_eq!(evaluate("deriv(exp(3*x), x)"), parse("3*exp(3*x)"));
    }

    #[test]
    fn product_of_functions() {
        assert_eq!(evaluate("deriv(x*sin(x), x)"), parse("sin(x) + x*cos(x)"));
    }

    #[test]
    fn integrals() {
        assert_eq!(evaluate("integral(3, x)"), parse("3*x"));
        assert_eq!(evaluate("integral(x^2, x)"), parse("x^3/3"));
        assert_eq!(evaluate("integral(1/x, x)"), parse("log(x)"));
        assert_eq!(evaluate("integral(2*cos(x), x)"), parse("2*sin(x)"));
        assert_eq!(evaluate("integral(x + 1, x)"), parse("0.5*x^2 + x"));
    }
}
