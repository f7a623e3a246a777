//! Rewrite rules.
//!
//! A [`Rule`] is either a pattern with a replacement template (optionally guarded by a predicate
//! over the bindings of a match), or a native function that inspects an expression directly. Native
//! rules cover rewrites that a fixed pattern can't express, such as combining an arbitrary number of
//! like terms in a sum.

use cas_error::Error;
use cas_parser::parser::{ast::rule::RewriteRule, Parser};
use crate::{
    canonicalize,
    expr::{Constraint, Expr},
    pattern::{substitute, try_match, Bindings},
};
use std::{fmt, sync::Arc};

/// A predicate over the bindings of a successful match. The rule only fires if it returns true.
pub type Guard = Arc<dyn Fn(&Bindings) -> bool + Send + Sync>;

/// A function that rewrites an expression, returning [`None`] if it does not apply.
pub type NativeFn = Arc<dyn Fn(&Expr) -> Option<Expr> + Send + Sync>;

/// How a rule rewrites an expression.
#[derive(Clone)]
enum RuleKind {
    Pattern {
        pattern: Expr,
        replacement: Expr,
        guard: Option<Guard>,
    },
    Native(NativeFn),
}

/// A named rewrite rule.
#[derive(Clone)]
pub struct Rule {
    name: Arc<str>,
    kind: RuleKind,
}

impl Rule {
    /// Creates a rule from a pattern and a replacement template. Both are canonicalized.
    pub fn new(pattern: Expr, replacement: Expr) -> Self {
        let pattern = canonicalize(&pattern);
        let replacement = canonicalize(&replacement);
        Self {
            name: format!("{} ~ {}", pattern, replacement).into(),
            kind: RuleKind::Pattern { pattern, replacement, guard: None },
        }
    }

    /// Compiles a rule from source text of the form `pattern ~ replacement`.
    ///
    /// In rule text, every scalar symbol whose name is a single character is a wildcard that
    /// matches anything; `a*c + b*c ~ (a + b)*c` has the wildcards `a`, `b`, and `c`. Longer names
    /// are literal symbols. Explicit wildcards (`?a`, `?#n`, `?$s`) can be used to attach a
    /// constraint.
    ///
    /// The rule is named after its source text.
    pub fn parse(source: &str) -> Result<Self, Error> {
        let ast = Parser::new(source).try_parse_full::<RewriteRule>()?;
        let pattern = symbols_to_wildcards(&Expr::from(ast.pattern));
        let replacement = symbols_to_wildcards(&Expr::from(ast.replacement));
        Ok(Self::new(pattern, replacement).with_name(source.trim()))
    }

    /// Creates a rule from a function that rewrites expressions.
    ///
    /// The function receives canonical expressions. Its result is canonicalized; a result that is
    /// structurally identical to the input is treated as if the rule did not apply.
    pub fn native<F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&Expr) -> Option<Expr> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: RuleKind::Native(Arc::new(f)),
        }
    }

    /// Attaches a guard to the rule. The rule only fires on matches for which the guard returns
    /// true. Guards have no effect on native rules.
    pub fn with_guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&Bindings) -> bool + Send + Sync + 'static,
    {
        if let RuleKind::Pattern { guard: slot, .. } = &mut self.kind {
            *slot = Some(Arc::new(guard));
        }
        self
    }

    /// Renames the rule.
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the name of the rule.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the rule as a shared string.
    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Returns the pattern and replacement of the rule, or [`None`] for native rules.
    pub fn pattern(&self) -> Option<(&Expr, &Expr)> {
        match &self.kind {
            RuleKind::Pattern { pattern, replacement, .. } => Some((pattern, replacement)),
            RuleKind::Native(_) => None,
        }
    }

    /// Applies the rule at the root of the expression, which should be canonical.
    ///
    /// Returns the canonical result if the rule fired and changed the expression.
    pub fn apply(&self, expr: &Expr) -> Option<Expr> {
        let result = match &self.kind {
            RuleKind::Pattern { pattern, replacement, guard } => {
                let bindings = try_match(expr, pattern)?;
                if let Some(guard) = guard {
                    if !guard(&bindings) {
                        return None;
                    }
                }
                substitute(replacement, &bindings)
            },
            RuleKind::Native(f) => f(expr)?,
        };

        let result = canonicalize(&result);
        (!result.structurally_eq(expr)).then_some(result)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Rule");
        debug.field("name", &self.name);
        match &self.kind {
            RuleKind::Pattern { pattern, replacement, guard } => {
                debug.field("pattern", &pattern.to_string())
                    .field("replacement", &replacement.to_string())
                    .field("guarded", &guard.is_some());
            },
            RuleKind::Native(_) => {
                debug.field("native", &true);
            },
        }
        debug.finish()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Replaces every scalar symbol with a one-character name with a wildcard of the same name.
fn symbols_to_wildcards(expr: &Expr) -> Expr {
    match expr {
        Expr::Symbol(sym) if sym.name.chars().count() == 1 && sym.shape.is_scalar() => {
            Expr::wildcard(sym.name.clone(), Constraint::None)
        },
        Expr::Op(op) => {
            let args = op.args().iter().map(symbols_to_wildcards).collect::<Vec<_>>();
            expr.with_args(args)
        },
        _ => expr.clone(),
    }
}

#[cfg(test)]
mod tests {
    use crate::expr::OpKind;
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expr {
        canonicalize(&source.parse::<Expr>().unwrap())
    }

    #[test]
    fn one_character_symbols_are_wildcards() {
        let rule = Rule::parse("log(exp(a)) ~ a").unwrap();
        let (pattern, replacement) = rule.pattern().unwrap();
        assert_eq!(pattern.to_string(), "log(exp(?a))");
        assert_eq!(replacement.to_string(), "?a");
        assert_eq!(rule.name(), "log(exp(a)) ~ a");
    }

    #[test]
    fn apply_pattern_rule() {
        let rule = Rule::parse("a*c + b*c ~ (a + b)*c").unwrap();
        let result = rule.apply(&parse("x*b + x*c")).unwrap();
        assert_eq!(result, parse("x*(b + c)"));
        assert!(rule.apply(&parse("x + y")).is_none());
    }

    #[test]
    fn guard_blocks_match() {
        let rule = Rule::parse("deriv(a, x) ~ 0")
            .unwrap()
            .with_guard(|bindings| match (bindings.get("a"), bindings.get("x")) {
                (Some(a), Some(x)) => !a.contains(x),
                _ => false,
            });
        assert_eq!(rule.apply(&parse("deriv(3*y, x)")), Some(Expr::number(0.0)));
        assert_eq!(rule.apply(&parse("deriv(3*x, x)")), None);
    }

    #[test]
    fn native_rule() {
        let rule = Rule::native("double", |expr| {
            expr.as_number().map(|n| Expr::number(n * 2.0))
        });
        assert_eq!(rule.apply(&Expr::number(2.0)), Some(Expr::number(4.0)));
        assert_eq!(rule.apply(&Expr::number(0.0)), None);
        assert_eq!(rule.apply(&Expr::symbol("x")), None);
    }

    #[test]
    fn rule_without_effect_does_not_fire() {
        let rule = Rule::parse("a ~ a").unwrap();
        assert!(rule.apply(&parse("x + 1")).is_none());
    }

    #[test]
    fn explicit_wildcards_keep_constraints() {
        let rule = Rule::parse("?#n*x ~ n").unwrap();
        let (pattern, _) = rule.pattern().unwrap();
        assert_eq!(pattern.kind(), Some(&OpKind::Multiply));
        assert_eq!(pattern.args()[0], Expr::wildcard("n", Constraint::Constant));
    }

    #[test]
    fn parse_failure() {
        assert!(Rule::parse("a + ~ b").is_err());
        assert!(Rule::parse("a + b").is_err());
    }
}
