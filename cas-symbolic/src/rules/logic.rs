//! Propositional identities over the functions `and`, `or`, and `not`, and the symbols `true` and
//! `false`.
//!
//! Function arguments are not reordered by canonicalization, so every identity with a constant
//! operand is listed for both argument orders.

use crate::rule::Rule;
use once_cell::sync::Lazy;
use super::compile;

const SOURCES: &[&str] = &[
    "not(true) ~ false",
    "not(false) ~ true",
    "not(not(a)) ~ a",
    "and(a, true) ~ a",
    "and(true, a) ~ a",
    "and(a, false) ~ false",
    "and(false, a) ~ false",
    "or(a, true) ~ true",
    "or(true, a) ~ true",
    "or(a, false) ~ a",
    "or(false, a) ~ a",
    "and(a, a) ~ a",
    "or(a, a) ~ a",
    "and(a, not(a)) ~ false",
    "and(not(a), a) ~ false",
    "or(a, not(a)) ~ true",
    "or(not(a), a) ~ true",
    "not(and(a, b)) ~ or(not(a), not(b))",
    "not(or(a, b)) ~ and(not(a), not(b))",
];

/// The number of rules in the library.
pub(crate) const RULE_COUNT: usize = SOURCES.len();

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| compile("logic", SOURCES));

/// Returns the rules of the library.
pub fn rules() -> &'static [Rule] {
    &RULES
}
