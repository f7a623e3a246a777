//! Structural pattern matching and template substitution.
//!
//! Matching is a single pass over the expression and the pattern with no backtracking: an
//! operation in the pattern only matches an operation of the same kind with the same number of
//! arguments, matched pairwise in order. Both sides are expected to be canonical, so the order of
//! commutative arguments agrees.

use crate::expr::Expr;
use std::{collections::BTreeMap, sync::Arc};

/// The expressions bound to the wildcards of a pattern by a successful match.
#[derive(Debug, Clone, Default)]
pub struct Bindings(BTreeMap<Arc<str>, Expr>);

impl Bindings {
    /// Creates an empty set of bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the expression bound to the wildcard with the given name.
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.0.get(name)
    }

    /// Binds the wildcard with the given name, returning the previous binding if there was one.
    pub fn insert(&mut self, name: impl Into<Arc<str>>, expr: Expr) -> Option<Expr> {
        self.0.insert(name.into(), expr)
    }

    /// Returns the number of bound wildcards.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no wildcard is bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the bindings in order of wildcard name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.0.iter().map(|(name, expr)| (&**name, expr))
    }
}

impl<N: Into<Arc<str>>> FromIterator<(N, Expr)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (N, Expr)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, expr)| (name.into(), expr)).collect())
    }
}

/// Matches the expression against the pattern, accumulating wildcard bindings.
fn match_into(expr: &Expr, pattern: &Expr, bindings: &mut Bindings) -> bool {
    match (expr, pattern) {
        (_, Expr::Wildcard(wildcard)) => match bindings.get(&wildcard.name) {
            // a wildcard seen in an earlier argument must bind the same expression again
            Some(bound) => bound == expr,
            None => {
                if !wildcard.constraint.admits(expr) {
                    return false;
                }
                bindings.insert(wildcard.name.clone(), expr.clone());
                true
            },
        },
        (Expr::Op(op), Expr::Op(pattern_op)) => {
            op.kind() == pattern_op.kind()
                && op.args().len() == pattern_op.args().len()
                && op.args().iter()
                    .zip(pattern_op.args())
                    .all(|(arg, pattern_arg)| match_into(arg, pattern_arg, bindings))
        },
        (Expr::Op(_), _) | (_, Expr::Op(_)) => false,
        (expr, pattern) => expr.structurally_eq(pattern),
    }
}

/// Attempts to match the expression against the pattern.
///
/// On success, returns the bindings of every wildcard in the pattern. Wildcards that occur more
/// than once must bind canonically equal expressions at every occurrence.
pub fn try_match(expr: &Expr, pattern: &Expr) -> Option<Bindings> {
    let mut bindings = Bindings::new();
    match_into(expr, pattern, &mut bindings).then_some(bindings)
}

/// Instantiates the template, replacing every bound wildcard with its binding. Unbound wildcards
/// are left in place.
///
/// The result is not canonicalized.
pub fn substitute(template: &Expr, bindings: &Bindings) -> Expr {
    match template {
        Expr::Wildcard(wildcard) => bindings.get(&wildcard.name)
            .cloned()
            .unwrap_or_else(|| template.clone()),
        Expr::Op(op) => {
            let args = op.args().iter()
                .map(|arg| substitute(arg, bindings))
                .collect::<Vec<_>>();
            template.with_args(args)
        },
        _ => template.clone(),
    }
}
