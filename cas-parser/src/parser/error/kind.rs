use ariadne::Fmt;
use cas_attrs::ErrorKind;
use cas_error::EXPR;
use crate::tokenizer::TokenKind;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of file",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of file",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// A parenthesis was opened but never closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is never closed"],
    help = format!("add a closing parenthesis `{}` somewhere after this", ")".fg(EXPR)),
)]
pub struct UnclosedParenthesis;

/// A pair of parentheses was found with nothing inside.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression inside parenthesis",
    labels = ["add an expression here"],
)]
pub struct EmptyParenthesis;

/// A numeric literal could not be converted to a number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid number `{}`", lexeme),
    labels = ["this literal"],
)]
pub struct InvalidNumber {
    /// The literal as written in the source.
    pub lexeme: String,
}

/// A shape annotation contained something other than a positive integer.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid dimension `{}`", lexeme),
    labels = ["this dimension"],
    help = format!("dimensions must be {}", "positive integers".fg(EXPR)),
)]
pub struct InvalidDimension {
    /// The dimension as written in the source.
    pub lexeme: String,
}

/// A matrix literal whose rows do not all have the same number of entries.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "matrix rows have different lengths",
    labels = [format!("this row has {} entries, but the first row has {}", found, expected)],
)]
pub struct RaggedMatrix {
    /// The number of entries in the first row.
    pub expected: usize,

    /// The number of entries in the offending row.
    pub found: usize,
}
