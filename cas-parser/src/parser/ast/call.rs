use crate::{
    parser::{
        ast::{expr::Expr, literal::LitSym},
        error::Error,
        token::{CloseParen, OpenParen},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function call, such as `sin(x)` or `deriv(x^2, x)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function being called.
    pub name: LitSym,

    /// The arguments of the call, in order.
    pub args: Vec<Expr>,

    /// The region of the source code that this call was parsed from.
    pub span: Range<usize>,
}

impl Call {
    /// Parses the argument list of a call whose name has already been parsed.
    pub(crate) fn parse_args(input: &mut Parser, name: LitSym) -> Result<Self, Error> {
        input.try_parse::<OpenParen>()?;
        let args = if input.peek_kind() == Some(TokenKind::CloseParen) {
            Vec::new()
        } else {
            input.try_parse_delimited::<Expr>(TokenKind::Comma)?
        };
        let close = input.try_parse::<CloseParen>()?;

        Ok(Self {
            span: name.span.start..close.span.end,
            name,
            args,
        })
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        Self::parse_args(input, name)
    }
}

