//! Basic evaluation: combining like terms and like factors, and identities of elementary
//! functions at special values.

use crate::{
    canonical::{canonical_add, canonical_multiply, canonical_power},
    expr::{Expr, OpKind},
    rule::Rule,
};
use once_cell::sync::Lazy;
use super::{compile, do_add, do_multiply};

const SOURCES: &[&str] = &[
    "log(exp(a)) ~ a",
    "exp(log(a)) ~ a",
    "exp(0) ~ 1",
    "log(1) ~ 0",
    "sqrt(0) ~ 0",
    "sqrt(1) ~ 1",
    "sqrt(a)^2 ~ a",
    "sin(0) ~ 0",
    "cos(0) ~ 1",
    "tan(0) ~ 0",
    "sin(a)^2 + cos(a)^2 ~ 1",
    "sin(a)/cos(a) ~ tan(a)",
];

/// The number of rules in the library.
pub(crate) const RULE_COUNT: usize = SOURCES.len() + 2;

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules = vec![
        Rule::native("combine like terms", combine_like_terms),
        Rule::native("combine like factors", combine_like_factors),
    ];
    rules.extend(compile("algebra", SOURCES));
    rules
});

/// Returns the rules of the library.
pub fn rules() -> &'static [Rule] {
    &RULES
}

/// Splits a term into its numeric coefficient and the rest of the term.
///
/// - `5` -> `(1, 5)`
/// - `3*a*b` -> `(3, a*b)`
/// - `a` -> `(1, a)`
fn split_coefficient(term: &Expr) -> (f64, Expr) {
    match (term.kind(), term.args()) {
        (Some(OpKind::Multiply), [Expr::Number(coefficient), rest @ ..]) => {
            (*coefficient, canonical_multiply(rest.to_vec()))
        },
        _ => (1.0, term.clone()),
    }
}

/// Combines like terms.
///
/// `a+a = 2a`
/// `2a+3a = 5a`
/// `x*y - x*y = 0`
pub fn combine_like_terms(expr: &Expr) -> Option<Expr> {
    do_add(expr, |terms| {
        let mut groups: Vec<(f64, Expr)> = Vec::with_capacity(terms.len());
        for term in terms {
            let (coefficient, rest) = split_coefficient(term);
            match groups.iter_mut().find(|(_, existing)| existing.structurally_eq(&rest)) {
                Some((total, _)) => *total += coefficient,
                None => groups.push((coefficient, rest)),
            }
        }

        if groups.len() == terms.len() {
            return None;
        }

        let terms = groups.into_iter()
            .map(|(coefficient, rest)| canonical_multiply(vec![Expr::number(coefficient), rest]))
            .collect();
        Some(canonical_add(terms))
    })
}

/// Splits a factor into its base and exponent. Factors that are not powers have exponent `1`.
fn split_exponent(factor: &Expr) -> (Expr, Expr) {
    match (factor.kind(), factor.args()) {
        (Some(OpKind::Power), [base, exp]) => (base.clone(), exp.clone()),
        _ => (factor.clone(), Expr::number(1.0)),
    }
}

/// Combines scalar factors with the same base.
///
/// `a*a = a^2`
/// `a^2*a^x = a^(2+x)`
/// `x*x^-1 = 1`
pub fn combine_like_factors(expr: &Expr) -> Option<Expr> {
    do_multiply(expr, |factors| {
        let mut kept = Vec::new();
        let mut groups: Vec<(Expr, Vec<Expr>)> = Vec::with_capacity(factors.len());
        for factor in factors {
            if factor.as_number().is_some() || !factor.shape().is_scalar() {
                kept.push(factor.clone());
                continue;
            }

            let (base, exp) = split_exponent(factor);
            match groups.iter_mut().find(|(existing, _)| existing.structurally_eq(&base)) {
                Some((_, exps)) => exps.push(exp),
                None => groups.push((base, vec![exp])),
            }
        }

        if groups.iter().all(|(_, exps)| exps.len() == 1) {
            return None;
        }

        kept.extend(groups.into_iter().map(|(base, exps)| canonical_power(base, canonical_add(exps))));
        Some(canonical_multiply(kept))
    })
}
