//! Factoring common terms out of sums.
//!
//! Because both patterns and expressions are canonical, a common factor can only appear in a few
//! positions within a pair of products; the wildcard names below are chosen so that the canonical
//! order of each pattern lines up with the canonical order of the expressions it targets.

use crate::rule::Rule;
use once_cell::sync::Lazy;
use super::compile;

const SOURCES: &[&str] = &[
    "a*b + a*c ~ a*(b + c)",
    "a*c + b*c ~ (a + b)*c",
    "a*b + b*c ~ b*(a + c)",
    "a + a*b ~ a*(1 + b)",
    "b + a*b ~ (1 + a)*b",
    "a^2 - b^2 ~ (a + b)*(a - b)",
    "a^2 + 2*a*b + b^2 ~ (a + b)^2",
    "log(a) + log(b) ~ log(a*b)",
];

/// The number of rules in the library.
pub(crate) const RULE_COUNT: usize = SOURCES.len();

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| compile("factor", SOURCES));

/// Returns the rules of the library.
pub fn rules() -> &'static [Rule] {
    &RULES
}

#[cfg(test)]
mod tests {
    use crate::{canonicalize, expr::Expr, rewrite_fully};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expr {
        canonicalize(&source.parse::<Expr>().unwrap())
    }

    fn factor(source: &str) -> Expr {
        rewrite_fully(&parse(source), rules(), 100).0
    }

    #[test]
    fn common_factor_positions() {
        assert_eq!(factor("x*b + x*c"), parse("x*(b + c)"));
        assert_eq!(factor("a*y + a*z"), parse("a*(y + z)"));
        assert_eq!(factor("a*m + m*z"), parse("m*(a + z)"));
    }

    #[test]
    fn term_and_product() {
        assert_eq!(factor("x + x*y"), parse("x*(1 + y)"));
        assert_eq!(factor("y + x*y"), parse("(1 + x)*y"));
    }

    #[test]
    fn difference_of_squares() {
        assert_eq!(factor("x^2 - y^2"), parse("(x + y)*(x - y)"));
    }

    #[test]
    fn perfect_square() {
        assert_eq!(factor("x^2 + 2*x*y + y^2"), parse("(x + y)^2"));
    }

    #[test]
    fn logarithms() {
        assert_eq!(factor("log(x) + log(y)"), parse("log(x*y)"));
    }
}
