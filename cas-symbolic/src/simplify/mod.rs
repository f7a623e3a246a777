//! Simplification to a fixpoint.
//!
//! [`simplify`] canonicalizes an expression, then rewrites it with a rule list until no rule
//! applies anywhere, or until the iteration cap is reached. The result is reported as a
//! [`Solution`], whose [`Status`] tells the two outcomes apart.
//!
//! ```
//! use cas_symbolic::{rules::algebra, simplify, Expr, Status};
//!
//! let expr = "x + x + 2*x".parse::<Expr>().unwrap();
//! let solution = simplify(&expr, algebra::rules(), 100);
//! assert_eq!(solution.status, Status::Solved);
//! assert_eq!(solution.expr.to_string(), "4*x");
//! ```

mod complexity;

pub use complexity::complexity;

use crate::{
    expr::{Expr, OpKind},
    rewrite::{rewrite_fully_with, Step},
    rule::Rule,
    rules::{algebra, calculus},
    solution::{Solution, Status, Termination},
    step_collector::StepCollector,
};
use tracing::debug;

/// Simplifies the expression with the rules, making up to `max_iterations` passes over it.
pub fn simplify(expr: &Expr, rules: &[Rule], max_iterations: usize) -> Solution {
    simplify_with_steps(expr, rules, max_iterations, &mut ())
}

/// Simplifies the expression with the rules, making up to `max_iterations` passes over it. Every
/// rule application is reported to the step collector.
pub fn simplify_with_steps(
    expr: &Expr,
    rules: &[Rule],
    max_iterations: usize,
    step_collector: &mut dyn StepCollector<Step>,
) -> Solution {
    let outcome = rewrite_fully_with(expr, rules, max_iterations, step_collector);
    let (status, termination) = if outcome.converged {
        (Status::Solved, Termination::Fixpoint)
    } else {
        (Status::MaxIterationsReached, Termination::RoundLimit)
    };

    debug!(%expr, result = %outcome.expr, iterations = outcome.iterations, %status, "simplified");
    Solution {
        expr: outcome.expr,
        status,
        rounds: outcome.iterations,
        termination,
    }
}

/// Differentiates the expression with respect to the variable, and simplifies the result with the
/// [`calculus`] and [`algebra`] rules.
///
/// Derivatives that no rule knows how to take, such as those of unknown functions, are left in
/// the result as `deriv(f, x)`.
pub fn differentiate(expr: &Expr, var: &str) -> Solution {
    let derivative = Expr::op(OpKind::Derivative, vec![expr.clone(), Expr::symbol(var)]);
    let rules = calculus::rules()
        .iter()
        .chain(algebra::rules())
        .cloned()
        .collect::<Vec<_>>();
    simplify(&derivative, &rules, crate::rewrite::DEFAULT_MAX_ITERATIONS)
}

#[cfg(test)]
mod tests {
    use crate::{canonicalize, rules::factor};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expr {
        source.parse::<Expr>().unwrap()
    }

    #[test]
    fn reaches_fixpoint() {
        let solution = simplify(&parse("(x + 0)*1"), algebra::rules(), 100);
        assert!(solution.success());
        assert_eq!(solution.termination, Termination::Fixpoint);
        assert_eq!(solution.expr, Expr::symbol("x"));
    }

    #[test]
    fn records_steps() {
        let mut steps = Vec::new();
        let solution = simplify_with_steps(&parse("x*b + x*c"), factor::rules(), 100, &mut steps);
        assert_eq!(solution.expr, canonicalize(&parse("x*(b + c)")));
        assert_eq!(steps.len(), 1);
        assert_eq!(&*steps[0].rule, "a*c + b*c ~ (a + b)*c");
    }

    #[test]
    fn iteration_cap() {
        let rules = [Rule::parse("f(a) ~ f(f(a))").unwrap()];
        let solution = simplify(&parse("f(x)"), &rules, 4);
        assert!(!solution.success());
        assert_eq!(solution.status, Status::MaxIterationsReached);
        assert_eq!(solution.rounds, 4);
    }

    #[test]
    fn derivatives() {
        let solution = differentiate(&parse("x^2 + sin(x)"), "x");
        assert!(solution.success());
        assert_eq!(solution.expr, canonicalize(&parse("2*x + cos(x)")));

        let solution = differentiate(&parse("g(x)"), "x");
        assert_eq!(solution.expr, canonicalize(&parse("deriv(g(x), x)")));
    }
}
