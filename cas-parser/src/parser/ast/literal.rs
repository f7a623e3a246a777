use crate::{
    parser::{
        error::{kind, Error},
        token::{CloseSquare, Colon, Comma, Name, Number, OpenSquare, Question},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A number literal, such as `2`, `3.5`, or `1e-3`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitNum {
    /// The value of the number.
    pub value: f64,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitNum {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let num = input.try_parse::<Number>()?;
        let value = num.lexeme.parse::<f64>()
            .map_err(|_| Error::new(vec![num.span.clone()], kind::InvalidNumber {
                lexeme: num.lexeme.clone(),
            }))?;
        Ok(Self { value, span: num.span })
    }
}

/// A symbol literal, optionally annotated with a shape, such as `x`, `v:[3]`, or `M:[2, 3]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The dimensions given in the shape annotation. Empty for scalar symbols.
    pub dims: Vec<usize>,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// Parses a single dimension of a shape annotation.
fn parse_dimension(input: &mut Parser) -> Result<usize, Error> {
    let num = input.try_parse::<Number>()?;
    match num.lexeme.parse::<usize>() {
        Ok(dim) if dim > 0 => Ok(dim),
        _ => Err(Error::new(vec![num.span], kind::InvalidDimension { lexeme: num.lexeme })),
    }
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<Name>()?;
        let mut span = name.span.clone();
        let mut dims = Vec::new();

        if input.peek_kind() == Some(TokenKind::Colon) {
            input.try_parse::<Colon>()?;
            input.try_parse::<OpenSquare>()?;
            dims.push(parse_dimension(input)?);
            while input.peek_kind() == Some(TokenKind::Comma) {
                input.try_parse::<Comma>()?;
                dims.push(parse_dimension(input)?);
            }
            let close = input.try_parse::<CloseSquare>()?;
            span.end = close.span.end;
        }

        Ok(Self { name: name.lexeme, dims, span })
    }
}

/// The constraint attached to a wildcard, restricting what it may bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WildcardConstraint {
    /// `?a`: matches anything.
    None,

    /// `?#a`: matches only numbers.
    Constant,

    /// `?$a`: matches only scalar-shaped expressions.
    Scalar,
}

/// A wildcard used in rewrite rule patterns, such as `?a`, `?#n`, or `?$s`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitWildcard {
    /// The name of the wildcard, without the leading sigils.
    pub name: String,

    /// What the wildcard is allowed to match.
    pub constraint: WildcardConstraint,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitWildcard {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let question = input.try_parse::<Question>()?;
        let constraint = match input.peek_kind() {
            Some(TokenKind::Hash) => {
                input.next_token()?;
                WildcardConstraint::Constant
            },
            Some(TokenKind::Dollar) => {
                input.next_token()?;
                WildcardConstraint::Scalar
            },
            _ => WildcardConstraint::None,
        };
        let name = input.try_parse::<Name>()?;

        Ok(Self {
            name: name.lexeme,
            constraint,
            span: question.span.start..name.span.end,
        })
    }
}
