use crate::{
    parser::{
        ast::{
            binary::Binary,
            call::Call,
            list::{List, Matrix},
            literal::{LitNum, LitSym, LitWildcard},
            paren::Paren,
            unary::Unary,
        },
        error::{kind, Error},
        token::op::{BinOp, BinOpKind},
        Associativity,
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents any kind of expression that can be written in the source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A number literal.
    Number(LitNum),

    /// A symbol, optionally with a shape annotation.
    Symbol(LitSym),

    /// A rule wildcard.
    Wildcard(LitWildcard),

    /// A function call.
    Call(Call),

    /// A vector literal.
    List(List),

    /// A matrix literal.
    Matrix(Matrix),

    /// A parenthesized expression.
    Paren(Paren),

    /// A unary operation.
    Unary(Unary),

    /// A binary operation.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Number(num) => num.span.clone(),
            Expr::Symbol(sym) => sym.span.clone(),
            Expr::Wildcard(wildcard) => wildcard.span.clone(),
            Expr::Call(call) => call.span.clone(),
            Expr::List(list) => list.span.clone(),
            Expr::Matrix(matrix) => matrix.span.clone(),
            Expr::Paren(paren) => paren.span.clone(),
            Expr::Unary(unary) => unary.span.clone(),
            Expr::Binary(binary) => binary.span.clone(),
        }
    }

    /// If this expression is an [`Expr::Paren`], returns the innermost expression in the
    /// parenthesized expression. Otherwise, returns `self`.
    pub fn innermost(&self) -> &Expr {
        match self {
            Expr::Paren(paren) => paren.innermost(),
            expr => expr,
        }
    }
}

/// Parses a primary expression: a literal, call, wildcard, vector, matrix, parenthesized
/// expression, or negation.
fn parse_prefix(input: &mut Parser) -> Result<Expr, Error> {
    match input.peek_kind() {
        Some(TokenKind::Number) => Ok(Expr::Number(input.try_parse()?)),
        Some(TokenKind::Name) => {
            let sym = input.try_parse::<LitSym>()?;
            if sym.dims.is_empty() && input.peek_kind() == Some(TokenKind::OpenParen) {
                Ok(Expr::Call(Call::parse_args(input, sym)?))
            } else {
                Ok(Expr::Symbol(sym))
            }
        },
        Some(TokenKind::Question) => Ok(Expr::Wildcard(input.try_parse::<LitWildcard>()?)),
        Some(TokenKind::Sub) => Ok(Expr::Unary(input.try_parse::<Unary>()?)),
        Some(TokenKind::OpenParen) => Ok(Expr::Paren(input.try_parse::<Paren>()?)),
        Some(TokenKind::OpenSquare) => {
            // a list whose first entry is itself a list is a matrix
            if input.peek_nth_kind(1) == Some(TokenKind::OpenSquare) {
                Ok(Expr::Matrix(input.try_parse::<Matrix>()?))
            } else {
                Ok(Expr::List(input.try_parse::<List>()?))
            }
        },
        Some(found) => Err(input.error(kind::UnexpectedToken {
            expected: &[
                TokenKind::Number,
                TokenKind::Name,
                TokenKind::Question,
                TokenKind::Sub,
                TokenKind::OpenParen,
                TokenKind::OpenSquare,
            ],
            found,
        })),
        None => Err(input.error(kind::UnexpectedEof)),
    }
}

/// Parses an expression using precedence climbing. Only binary operators with a precedence of at
/// least `min` are consumed; the rest are left for the caller.
pub(crate) fn parse_expr(input: &mut Parser, min: Precedence) -> Result<Expr, Error> {
    let mut lhs = parse_prefix(input)?;

    loop {
        let Some(kind) = input.peek_kind().and_then(BinOpKind::from_token) else {
            break;
        };
        if kind.precedence() < min {
            break;
        }

        let op = input.try_parse::<BinOp>()?;
        let next_min = match op.associativity() {
            Associativity::Left => op.precedence().next(),
            Associativity::Right => op.precedence(),
        };
        let rhs = parse_expr(input, next_min)?;
        lhs = Expr::Binary(Binary::new(lhs, op, rhs));
    }

    Ok(lhs)
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        parse_expr(input, Precedence::Any)
    }
}
