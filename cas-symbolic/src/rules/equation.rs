//! Transforms that move terms and factors between the two sides of an equation.
//!
//! These rules are meant for the [`Solver`](crate::solve::Solver), which applies every transform
//! once at every node and ranks the results. Several of them undo each other (for example,
//! swapping the sides of an equation), so they should not be used with
//! [`rewrite_fully`](crate::rewrite_fully).
//!
//! Matching is positional over canonical argument lists, so a sum or product is moved one argument
//! at a time, with one rule per argument position.

use crate::rule::Rule;
use once_cell::sync::Lazy;
use super::compile;

const SOURCES: &[&str] = &[
    // sums
    "a + b = c ~ a = c - b",
    "a + b = c ~ b = c - a",
    "a + b + c = d ~ a + b = d - c",
    "a + b + c = d ~ a + c = d - b",
    "a + b + c = d ~ b + c = d - a",

    // products
    "a*b = c ~ a = c/b",
    "a*b = c ~ b = c/a",
    "a*b*c = d ~ a*b = d/c",
    "a*b*c = d ~ a*c = d/b",
    "a*b*c = d ~ b*c = d/a",

    // powers
    "a^b = c ~ a = c^(1/b)",
    "a^b = c ~ b = log(c)/log(a)",

    // inverse functions
    "exp(a) = b ~ a = log(b)",
    "log(a) = b ~ a = exp(b)",
    "sin(a) = b ~ a = asin(b)",
    "cos(a) = b ~ a = acos(b)",
    "tan(a) = b ~ a = atan(b)",

    // whole equation
    "a = b ~ b = a",
    "a = b ~ a - b = 0",
];

/// The number of rules in the library.
pub(crate) const RULE_COUNT: usize = SOURCES.len();

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| compile("equation", SOURCES));

/// Returns the rules of the library.
pub fn rules() -> &'static [Rule] {
    &RULES
}
