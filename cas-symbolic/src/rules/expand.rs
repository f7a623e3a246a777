//! Expansion: the distributive law, powers of sums, and splitting of logarithms and
//! exponentials.

use crate::{
    canonical::{canonical_add, canonical_multiply},
    expr::{Expr, OpKind},
    rule::Rule,
};
use once_cell::sync::Lazy;
use super::{algebra, compile, do_multiply, do_power};

/// Powers of sums are only expanded up to this exponent.
const MAX_EXPANDED_POWER: f64 = 8.0;

const SOURCES: &[&str] = &[
    "(a*b)^c ~ a^c*b^c",
    "a^(b + c) ~ a^b*a^c",
    "log(a*b) ~ log(a) + log(b)",
    "log(a^b) ~ b*log(a)",
    "exp(a + b) ~ exp(a)*exp(b)",
];

/// The number of rules in the library.
pub(crate) const RULE_COUNT: usize = SOURCES.len() + 2;

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules = vec![
        Rule::native("distribute", distribute),
        Rule::native("expand power", expand_power),
    ];
    rules.extend(compile("expand", SOURCES));
    rules
});

/// Returns the rules of the library.
pub fn rules() -> &'static [Rule] {
    &RULES
}

/// Distributes a product over the first scalar sum among its factors.
///
/// `a(b+c) = ab+ac`
/// `2x(y+1) = 2xy+2x`
pub fn distribute(expr: &Expr) -> Option<Expr> {
    do_multiply(expr, |factors| {
        let index = factors.iter()
            .position(|factor| factor.is_op(&OpKind::Add) && factor.shape().is_scalar())?;

        let terms = factors[index].args()
            .iter()
            .map(|term| {
                let mut product = factors.to_vec();
                product[index] = term.clone();
                canonical_multiply(product)
            })
            .collect();
        Some(canonical_add(terms))
    })
}

/// Expands a sum raised to a small positive integer power, combining like terms of the result.
///
/// `(a+b)^2 = a^2+2ab+b^2`
pub fn expand_power(expr: &Expr) -> Option<Expr> {
    do_power(expr, |base, exp| {
        let n = exp.as_number()
            .filter(|n| n.fract() == 0.0 && (2.0..=MAX_EXPANDED_POWER).contains(n))?;
        if !base.is_op(&OpKind::Add) || !base.shape().is_scalar() {
            return None;
        }

        let mut products = vec![Expr::number(1.0)];
        for _ in 0..n as usize {
            products = products.iter()
                .flat_map(|acc| {
                    base.args()
                        .iter()
                        .map(move |term| canonical_multiply(vec![acc.clone(), term.clone()]))
                })
                .collect();
        }

        let terms = products.into_iter()
            .map(|product| algebra::combine_like_factors(&product).unwrap_or(product))
            .collect();
        let sum = canonical_add(terms);
        Some(algebra::combine_like_terms(&sum).unwrap_or(sum))
    })
}

#[cfg(test)]
mod tests {
    use crate::canonicalize;
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expr {
        canonicalize(&source.parse::<Expr>().unwrap())
    }

    #[test]
    fn distributes_over_sum() {
        assert_eq!(distribute(&parse("a*(b + c)")), Some(parse("a*b + a*c")));
        assert_eq!(distribute(&parse("2*x*(y + 1)")), Some(parse("2*x*y + 2*x")));
        assert_eq!(distribute(&parse("a*b")), None);
    }

    #[test]
    fn expands_powers_of_sums() {
        assert_eq!(expand_power(&parse("(a + b)^2")), Some(parse("a^2 + 2*a*b + b^2")));
        assert_eq!(expand_power(&parse("(x + 1)^3")), Some(parse("x^3 + 3*x^2 + 3*x + 1")));
        assert_eq!(expand_power(&parse("(x + 1)^0.5")), None);
        assert_eq!(expand_power(&parse("(x + 1)^20")), None);
    }

    #[test]
    fn pattern_rules() {
        let rule = &rules()[2];
        assert_eq!(rule.apply(&parse("(x*y)^n")), Some(parse("x^n*y^n")));

        let rule = &rules()[5];
        assert_eq!(rule.apply(&parse("log(x^2)")), Some(parse("2*log(x)")));
    }
}
