//! Goals score the candidates of a search. The fitness of a candidate is the sum of the scores of
//! every goal given to the [`Solver`](super::Solver); higher is better.

use crate::{canonicalize, expr::Expr, simplify::complexity};
use levenshtein::levenshtein;
use std::sync::Arc;

/// A scoring function for candidates. Scores must be deterministic.
///
/// Any `Fn(&Expr) -> f64` closure is a goal.
pub trait Goal: Send + Sync {
    /// Scores the candidate. Higher scores are better.
    fn score(&self, expr: &Expr) -> f64;
}

impl<F> Goal for F
where
    F: Fn(&Expr) -> f64 + Send + Sync,
{
    fn score(&self, expr: &Expr) -> f64 {
        self(expr)
    }
}

/// Prefers candidates that print similarly to a target form. The score is the negated Levenshtein
/// distance between the printed candidate and the printed canonical target.
#[derive(Debug, Clone)]
pub struct TargetForm {
    target: String,
}

impl TargetForm {
    /// Creates the goal. The target is canonicalized first.
    pub fn new(target: &Expr) -> Self {
        Self { target: canonicalize(target).to_string() }
    }
}

impl Goal for TargetForm {
    fn score(&self, expr: &Expr) -> f64 {
        -(levenshtein(&self.target, &expr.to_string()) as f64)
    }
}

/// Prefers simpler candidates. The score is the negated [`complexity`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Complexity;

impl Goal for Complexity {
    fn score(&self, expr: &Expr) -> f64 {
        -(complexity(expr) as f64)
    }
}

/// Prefers equations that are solved for a variable.
///
/// An equation [isolated](super::isolated_variable) for the variable scores 0. Otherwise, every
/// occurrence of the variable on the right-hand side costs 10, and the complexity of the left-hand
/// side is subtracted, so that candidates where the variable is nearly alone on the left rank
/// higher. A left-hand side that does not contain the variable costs another 20, and a candidate
/// that is not an equation scores -100.
#[derive(Debug, Clone)]
pub struct Isolate(Arc<str>);

impl Isolate {
    /// Creates the goal for the variable with the given name.
    pub fn new(var: impl Into<Arc<str>>) -> Self {
        Self(var.into())
    }
}

impl Goal for Isolate {
    fn score(&self, expr: &Expr) -> f64 {
        let Some((lhs, rhs)) = expr.as_equation() else {
            return -100.0;
        };

        let in_rhs = 10.0 * rhs.count_symbol(&self.0) as f64;
        if lhs.as_symbol() == Some(&*self.0) {
            -in_rhs
        } else if lhs.contains_symbol(&self.0) {
            -in_rhs - complexity(lhs) as f64
        } else {
            -in_rhs - 20.0 - complexity(lhs) as f64
        }
    }
}

/// Prefers candidates that do not mention a variable. Every occurrence costs 10.
#[derive(Debug, Clone)]
pub struct Eliminate(Arc<str>);

impl Eliminate {
    /// Creates the goal for the variable with the given name.
    pub fn new(var: impl Into<Arc<str>>) -> Self {
        Self(var.into())
    }
}

impl Goal for Eliminate {
    fn score(&self, expr: &Expr) -> f64 {
        -10.0 * expr.count_symbol(&self.0) as f64
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expr {
        canonicalize(&source.parse::<Expr>().unwrap())
    }

    #[test]
    fn closures_are_goals() {
        let goal = |expr: &Expr| expr.node_count() as f64;
        assert_eq!(goal.score(&parse("x + y")), 3.0);
    }

    #[test]
    fn target_form() {
        let goal = TargetForm::new(&parse("y = 2*x"));
        assert_eq!(goal.score(&parse("y = x*2")), 0.0);
        assert_eq!(goal.score(&parse("y = 3*x")), -1.0);
    }

    #[test]
    fn isolate() {
        let goal = Isolate::new("x");
        assert_eq!(goal.score(&parse("x = y + 1")), 0.0);
        assert_eq!(goal.score(&parse("x = x*y")), -10.0);

        // complexity of `2*x` is 2 + 2 + 1
        assert_eq!(goal.score(&parse("2*x = y")), -5.0);
        assert_eq!(goal.score(&parse("y = 2*x")), -31.0);
        assert_eq!(goal.score(&parse("x + 1")), -100.0);
    }

    #[test]
    fn eliminate() {
        let goal = Eliminate::new("y");
        assert_eq!(goal.score(&parse("z = y + 1")), -10.0);
        assert_eq!(goal.score(&parse("z = x + 2")), 0.0);
    }

    #[test]
    fn simpler_is_better() {
        assert!(Complexity.score(&parse("x*(b + c)")) > Complexity.score(&parse("x*b + x*c")));
    }
}
