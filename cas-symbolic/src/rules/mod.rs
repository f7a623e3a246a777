//! The built-in rule libraries.
//!
//! Each library is a list of [`Rule`]s, compiled once from rule text (plus a few native rules for
//! rewrites that a fixed-arity pattern can't express) the first time it is used:
//!
//! | Library          | Contents                                                              |
//! | ---------------- | --------------------------------------------------------------------- |
//! | [`algebra`]      | Basic evaluation: like terms, like factors, log / exp identities      |
//! | [`expand`]       | The distributive law and expansion of powers                          |
//! | [`factor`]       | Factoring out common terms                                            |
//! | [`calculus`]     | Derivative and integral rules                                         |
//! | [`vector`]       | Gradient, divergence, curl, and dot product identities                |
//! | [`logic`]        | Propositional identities over `and`, `or`, and `not`                  |
//! | [`equation`]     | Transforms that move terms between the sides of an equation            |
//!
//! The order of the rules in a library matters to [`rewrite_fully`](crate::rewrite_fully), which
//! applies the first rule that fires at each node.

pub mod algebra;
pub mod calculus;
pub mod equation;
pub mod expand;
pub mod factor;
pub mod logic;
pub mod vector;

use crate::{expr::{Expr, OpKind}, rule::Rule};
use tracing::error;

/// Compiles a list of rule sources. Rules that fail to compile are logged and skipped.
pub(crate) fn compile(library: &str, sources: &[&str]) -> Vec<Rule> {
    sources.iter()
        .filter_map(|source| match Rule::parse(source) {
            Ok(rule) => Some(rule),
            Err(err) => {
                error!(library, source, %err, "failed to compile rule");
                None
            },
        })
        .collect()
}

/// If the expression is a sum, calls the given transformation function with the terms.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_add(expr: &Expr, f: impl FnOnce(&[Expr]) -> Option<Expr>) -> Option<Expr> {
    match expr.kind() {
        Some(OpKind::Add) => f(expr.args()),
        _ => None,
    }
}

/// If the expression is a product, calls the given transformation function with the factors.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_multiply(expr: &Expr, f: impl FnOnce(&[Expr]) -> Option<Expr>) -> Option<Expr> {
    match expr.kind() {
        Some(OpKind::Multiply) => f(expr.args()),
        _ => None,
    }
}

/// If the expression is a power, calls the given transformation function with the base and the
/// exponent.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_power(expr: &Expr, f: impl FnOnce(&Expr, &Expr) -> Option<Expr>) -> Option<Expr> {
    match (expr.kind(), expr.args()) {
        (Some(OpKind::Power), [base, exp]) => f(base, exp),
        _ => None,
    }
}

/// If the expression is an operation of the given kind over exactly two arguments, calls the
/// given transformation function with them. Used for `deriv(f, x)` and `integral(f, x)`.
pub(crate) fn do_binary(
    expr: &Expr,
    kind: &OpKind,
    f: impl FnOnce(&Expr, &Expr) -> Option<Expr>,
) -> Option<Expr> {
    match expr.args() {
        [lhs, rhs] if expr.is_op(kind) => f(lhs, rhs),
        _ => None,
    }
}

/// Returns true if the bound expression does not depend on the bound variable. Used to guard
/// rules that treat an expression as a constant with respect to a variable.
pub(crate) fn is_free_of(expr: Option<&Expr>, var: Option<&Expr>) -> bool {
    match (expr, var) {
        (Some(expr), Some(var)) => var.as_symbol().is_some() && !expr.contains(var),
        _ => false,
    }
}
