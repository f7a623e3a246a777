//! Rewriting expressions with lists of rules.
//!
//! Two strategies are provided:
//!
//! - [`rewrite_fully`] repeatedly rewrites an expression until no rule applies anywhere (a
//!   fixpoint) or an iteration cap is reached. At each node, the first rule in the list that fires
//!   wins, so the order of the rules matters.
//! - [`rewrite_each_node`] applies a single rule once at every node of an expression
//!   independently, returning every distinct result. This is how the solver explores the space of
//!   rewrites of an equation.
//!
//! Rule sets are not guaranteed to terminate (two rules may undo each other), which is why
//! [`rewrite_fully`] takes an iteration cap.

use crate::{canonicalize, expr::Expr, rule::Rule, step_collector::StepCollector};
use std::sync::Arc;
use tracing::trace;

/// The default cap on the number of passes made by [`rewrite_fully`].
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// A single application of a rule.
#[derive(Debug, Clone)]
pub struct Step {
    /// The name of the rule that fired.
    pub rule: Arc<str>,

    /// The subexpression the rule was applied to.
    pub before: Expr,

    /// The result of applying the rule.
    pub after: Expr,
}

/// The result of [`rewrite_fully_with`].
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// The rewritten expression.
    pub expr: Expr,

    /// Whether any rule fired.
    pub changed: bool,

    /// Whether a fixpoint was reached before the iteration cap.
    pub converged: bool,

    /// The number of passes in which a rule fired.
    pub iterations: usize,
}

/// Makes one pass over the expression. If a rule fires at a node, that node is replaced and its
/// children are not visited in this pass; otherwise the pass recurses into the children.
///
/// Returns [`None`] if no rule fired anywhere.
fn rewrite_pass(
    expr: &Expr,
    rules: &[Rule],
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<Expr> {
    for rule in rules {
        if let Some(after) = rule.apply(expr) {
            trace!(rule = rule.name(), before = %expr, after = %after, "applied rule");
            step_collector.push(Step {
                rule: rule.shared_name(),
                before: expr.clone(),
                after: after.clone(),
            });
            return Some(after);
        }
    }

    let mut changed = false;
    let args = expr.args()
        .iter()
        .map(|arg| match rewrite_pass(arg, rules, step_collector) {
            Some(new_arg) => {
                changed = true;
                new_arg
            },
            None => arg.clone(),
        })
        .collect::<Vec<_>>();

    changed.then(|| expr.with_args(args))
}

/// Rewrites the expression with the rules until no rule applies, or `max_iterations` passes have
/// been made. Every rule application is reported to the step collector.
///
/// The expression is canonicalized before the first pass and after every pass. With an empty rule
/// list, the expression is returned unchanged and uncanonicalized.
pub fn rewrite_fully_with(
    expr: &Expr,
    rules: &[Rule],
    max_iterations: usize,
    step_collector: &mut dyn StepCollector<Step>,
) -> RewriteOutcome {
    if rules.is_empty() {
        return RewriteOutcome {
            expr: expr.clone(),
            changed: false,
            converged: true,
            iterations: 0,
        };
    }

    let mut current = canonicalize(expr);
    let mut changed = false;
    let mut iterations = 0;

    while iterations < max_iterations {
        let next = match rewrite_pass(&current, rules, step_collector) {
            Some(next) => canonicalize(&next),
            None => return RewriteOutcome { expr: current, changed, converged: true, iterations },
        };

        // a pass whose effect canonicalization undoes is a fixpoint as well
        if next.structurally_eq(&current) {
            return RewriteOutcome { expr: current, changed, converged: true, iterations };
        }

        current = next;
        changed = true;
        iterations += 1;
    }

    trace!(max_iterations, expr = %current, "iteration cap reached");
    RewriteOutcome { expr: current, changed, converged: false, iterations }
}

/// Rewrites the expression with the rules until no rule applies, or `max_iterations` passes have
/// been made.
///
/// Returns the rewritten expression, and whether any rule fired.
pub fn rewrite_fully(expr: &Expr, rules: &[Rule], max_iterations: usize) -> (Expr, bool) {
    let outcome = rewrite_fully_with(expr, rules, max_iterations, &mut ());
    (outcome.expr, outcome.changed)
}

/// Collects the results of applying the rule at `expr` and at every node below it. Each result
/// is `expr` with exactly one node replaced; the path from that node up to `expr` is rebuilt, and
/// every other subtree is shared.
fn rewrites_at(expr: &Expr, rule: &Rule, results: &mut Vec<Expr>) {
    if let Some(result) = rule.apply(expr) {
        results.push(result);
    }

    for (i, arg) in expr.args().iter().enumerate() {
        let mut arg_results = Vec::new();
        rewrites_at(arg, rule, &mut arg_results);
        for new_arg in arg_results {
            let mut args = expr.args().to_vec();
            args[i] = new_arg;
            results.push(expr.with_args(args));
        }
    }
}

/// Applies the rule once at every node of the expression independently, and returns every
/// canonical result that differs from the canonical form of the expression.
pub fn rewrite_each_node(expr: &Expr, rule: &Rule) -> Vec<Expr> {
    let expr = canonicalize(expr);
    let mut results = Vec::new();
    rewrites_at(&expr, rule, &mut results);

    results.into_iter()
        .map(|result| canonicalize(&result))
        .filter(|result| !result.structurally_eq(&expr))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expr {
        source.parse::<Expr>().unwrap()
    }

    fn rules(sources: &[&str]) -> Vec<Rule> {
        sources.iter().map(|source| Rule::parse(source).unwrap()).collect()
    }

    #[test]
    fn empty_rule_list_returns_input() {
        let expr = parse("(x + 0) * 1");
        let (result, changed) = rewrite_fully(&expr, &[], DEFAULT_MAX_ITERATIONS);
        assert!(result.is_same(&expr));
        assert!(!changed);
    }

    #[test]
    fn rewrites_nested_nodes() {
        let rules = rules(&["log(exp(a)) ~ a"]);
        let (result, changed) = rewrite_fully(&parse("sin(log(exp(x))) + log(exp(y))"), &rules, 10);
        assert!(changed);
        assert_eq!(result, parse("sin(x) + y"));
    }

    #[test]
    fn reaches_fixpoint_through_several_passes() {
        let rules = rules(&["f(a) ~ a"]);
        let outcome = rewrite_fully_with(&parse("f(f(f(x)))"), &rules, 10, &mut ());
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 3);
        assert_eq!(outcome.expr, parse("x"));
    }

    #[test]
    fn oscillating_rules_hit_the_cap() {
        let rules = rules(&["f(a) ~ g(a)", "g(a) ~ f(a)"]);
        let outcome = rewrite_fully_with(&parse("f(x)"), &rules, 7, &mut ());
        assert!(outcome.changed);
        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 7);
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = rules(&["f(a) ~ g(a)", "f(a) ~ h(a)"]);
        let (result, _) = rewrite_fully(&parse("f(x)"), &rules, 10);
        assert_eq!(result, parse("g(x)"));
    }

    #[test]
    fn records_steps() {
        let rules = rules(&["f(a) ~ a"]);
        let mut steps = Vec::new();
        rewrite_fully_with(&parse("f(f(x))"), &rules, 10, &mut steps);
        assert_eq!(steps.len(), 2);
        assert_eq!(&*steps[0].rule, "f(a) ~ a");
        assert_eq!(steps[0].before, parse("f(f(x))"));
        assert_eq!(steps[1].after, parse("x"));
    }

    #[test]
    fn each_node_rewrite() {
        let rule = Rule::parse("f(a) ~ a").unwrap();
        let results = rewrite_each_node(&parse("f(x) + f(f(y))"), &rule);
        let printed = results.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(printed, vec!["x + f(f(y))", "f(x) + f(y)", "f(x) + f(y)"]);
    }

    #[test]
    fn each_node_shares_untouched_subtrees() {
        let rule = Rule::parse("f(a) ~ a").unwrap();
        let expr = canonicalize(&parse("g(y) + f(x)"));
        let results = rewrite_each_node(&expr, &rule);
        assert_eq!(results.len(), 1);
        assert!(results[0].args()[1].is_same(&expr.args()[1]));
    }
}
