use crate::parser::{ast::expr::Expr, error::Error, token::Tilde, Parse, Parser};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rewrite rule written as `pattern ~ replacement`, such as `a*c + b*c ~ (a + b)*c`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RewriteRule {
    /// The expression to look for.
    pub pattern: Expr,

    /// The expression to replace matches with.
    pub replacement: Expr,

    /// The region of the source code that this rule was parsed from.
    pub span: Range<usize>,
}

impl Parse for RewriteRule {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let pattern = input.try_parse::<Expr>()?;
        input.try_parse::<Tilde>()?;
        let replacement = input.try_parse::<Expr>()?;
        let span = pattern.span().start..replacement.span().end;
        Ok(Self { pattern, replacement, span })
    }
}
