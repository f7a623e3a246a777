pub mod ast;
pub mod error;
pub mod token;

use error::{kind, Error};
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// A high-level parser for expressions and rewrite rules. This is the type to use to parse an
/// arbitrary piece of source text into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl cas_error::ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current non-whitespace token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.peek_token()
            .map_or_else(|| self.eof_span(), |token| token.span.clone())
    }

    /// Returns the previous token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the beginning of the stream.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Returns the next non-whitespace token without advancing the cursor.
    pub fn peek_token(&self) -> Option<&Token<'source>> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
    }

    /// Returns the kind of the next non-whitespace token without advancing the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek_token().map(|token| token.kind)
    }

    /// Returns the kind of the `n`th upcoming non-whitespace token (counting from zero) without
    /// advancing the cursor.
    pub fn peek_nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .filter(|token| !token.is_whitespace())
            .nth(n)
            .map(|token| token.kind)
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if !token.is_whitespace() {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(kind::UnexpectedEof))
    }

    /// Advances past the next token if it is of the given kind, returning it.
    pub fn next_if(&mut self, kind: TokenKind) -> Option<Token<'source>> {
        if self.peek_kind() == Some(kind) {
            self.next_token().ok()
        } else {
            None
        }
    }

    /// Returns true if only whitespace remains in the stream.
    pub fn is_at_end(&self) -> bool {
        self.peek_token().is_none()
    }

    /// Speculatively parses a value from the given stream of tokens. If parsing fails, the cursor
    /// is moved back to where it was before parsing.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value using a custom parsing function. If parsing fails, the cursor
    /// is moved back to where it was before parsing.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Speculatively parses multiple values (at least one) from the given stream of tokens, each
    /// delimited by a certain token.
    pub fn try_parse_delimited<T: Parse>(&mut self, delimiter: TokenKind) -> Result<Vec<T>, Error> {
        let mut values = vec![self.try_parse::<T>()?];
        while self.next_if(delimiter).is_some() {
            values.push(self.try_parse::<T>()?);
        }
        Ok(values)
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        if self.is_at_end() {
            Ok(value)
        } else {
            Err(self.error(kind::ExpectedEof))
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// `a op b op c` is evaluated as `a op (b op c)`.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of equations (`=`).
    Eq,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors.
    Factor,

    /// Precedence of unary subtraction (`-`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,

    /// Precedence of literals, calls, and parenthesized expressions.
    Primary,
}

impl Precedence {
    /// Returns the next-highest precedence.
    pub fn next(self) -> Self {
        match self {
            Self::Any => Self::Eq,
            Self::Eq => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor => Self::Neg,
            Self::Neg => Self::Exp,
            Self::Exp | Self::Primary => Self::Primary,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{
        binary::Binary,
        call::Call,
        expr::Expr,
        list::{List, Matrix},
        literal::{LitNum, LitSym, LitWildcard, WildcardConstraint},
        rule::RewriteRule,
        unary::Unary,
    };
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    fn parse(input: &str) -> Expr {
        Parser::new(input).try_parse_full::<Expr>().unwrap()
    }

    fn parse_err(input: &str) -> Error {
        Parser::new(input).try_parse_full::<Expr>().unwrap_err()
    }

    #[test]
    fn literal_number() {
        assert_eq!(parse("3.25"), Expr::Number(LitNum {
            value: 3.25,
            span: 0..4,
        }));
    }

    #[test]
    fn literal_symbol_with_shape() {
        assert_eq!(parse("M:[2, 3]"), Expr::Symbol(LitSym {
            name: "M".to_string(),
            dims: vec![2, 3],
            span: 0..8,
        }));
    }

    #[test]
    fn wildcards() {
        assert_eq!(parse("?#n"), Expr::Wildcard(LitWildcard {
            name: "n".to_string(),
            constraint: WildcardConstraint::Constant,
            span: 0..3,
        }));
        assert_eq!(parse("?a"), Expr::Wildcard(LitWildcard {
            name: "a".to_string(),
            constraint: WildcardConstraint::None,
            span: 0..2,
        }));
    }

    #[test]
    fn precedence_climbing() {
        // 1 + 2 * 3
        assert_eq!(parse("1 + 2 * 3"), Expr::Binary(Binary {
            lhs: Box::new(Expr::Number(LitNum { value: 1.0, span: 0..1 })),
            op: BinOp { kind: BinOpKind::Add, span: 2..3 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(Expr::Number(LitNum { value: 2.0, span: 4..5 })),
                op: BinOp { kind: BinOpKind::Mul, span: 6..7 },
                rhs: Box::new(Expr::Number(LitNum { value: 3.0, span: 8..9 })),
                span: 4..9,
            })),
            span: 0..9,
        }));
    }

    #[test]
    fn exponent_is_right_associative() {
        let expr = parse("a^b^c");
        let Expr::Binary(outer) = expr else { panic!("expected binary expression") };
        assert_eq!(outer.op.kind, BinOpKind::Exp);
        assert!(matches!(*outer.lhs, Expr::Symbol(_)));
        assert!(matches!(*outer.rhs, Expr::Binary(Binary { op: BinOp { kind: BinOpKind::Exp, .. }, .. })));
    }

    #[test]
    fn negative_exponent_binds_tighter_than_factor() {
        // x^-1 * y = (x^(-1)) * y
        let expr = parse("x^-1*y");
        let Expr::Binary(outer) = expr else { panic!("expected binary expression") };
        assert_eq!(outer.op.kind, BinOpKind::Mul);
        let Expr::Binary(pow) = *outer.lhs else { panic!("expected power") };
        assert_eq!(pow.op.kind, BinOpKind::Exp);
        assert_eq!(*pow.rhs, Expr::Unary(Unary {
            operand: Box::new(Expr::Number(LitNum { value: 1.0, span: 3..4 })),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 2..3 },
            span: 2..4,
        }));
    }

    #[test]
    fn negation_binds_weaker_than_exponent() {
        // -x^2 = -(x^2)
        let Expr::Unary(unary) = parse("-x^2") else { panic!("expected unary expression") };
        assert!(matches!(*unary.operand, Expr::Binary(Binary { op: BinOp { kind: BinOpKind::Exp, .. }, .. })));
    }

    #[test]
    fn equation() {
        let Expr::Binary(eq) = parse("a*x + b = c") else { panic!("expected equation") };
        assert_eq!(eq.op.kind, BinOpKind::Eq);
        assert!(matches!(*eq.lhs, Expr::Binary(Binary { op: BinOp { kind: BinOpKind::Add, .. }, .. })));
    }

    #[test]
    fn call_and_vector() {
        assert_eq!(parse("f(x, [1, y])"), Expr::Call(Call {
            name: LitSym { name: "f".to_string(), dims: Vec::new(), span: 0..1 },
            args: vec![
                Expr::Symbol(LitSym { name: "x".to_string(), dims: Vec::new(), span: 2..3 }),
                Expr::List(List {
                    items: vec![
                        Expr::Number(LitNum { value: 1.0, span: 6..7 }),
                        Expr::Symbol(LitSym { name: "y".to_string(), dims: Vec::new(), span: 9..10 }),
                    ],
                    span: 5..11,
                }),
            ],
            span: 0..12,
        }));
    }

    #[test]
    fn empty_call() {
        let Expr::Call(call) = parse("rand()") else { panic!("expected call") };
        assert!(call.args.is_empty());
    }

    #[test]
    fn matrix_literal() {
        let Expr::Matrix(Matrix { rows, .. }) = parse("[[1, 2], [3, 4]]") else {
            panic!("expected matrix");
        };
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn ragged_matrix() {
        let err = parse_err("[[1, 2], [3]]");
        assert_eq!(err.kind.message(), "matrix rows have different lengths");
        assert_eq!(err.spans, vec![9..12]);
    }

    #[test]
    fn rewrite_rule() {
        let rule = Parser::new("a*c+b*c~(a+b)*c").try_parse_full::<RewriteRule>().unwrap();
        assert!(matches!(rule.pattern, Expr::Binary(Binary { op: BinOp { kind: BinOpKind::Add, .. }, .. })));
        assert!(matches!(rule.replacement, Expr::Binary(Binary { op: BinOp { kind: BinOpKind::Mul, .. }, .. })));
        assert_eq!(rule.span, 0..15);
    }

    #[test]
    fn unclosed_parenthesis() {
        let err = parse_err("(x + 1");
        assert_eq!(err.kind.message(), "unclosed parenthesis");
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn empty_parenthesis() {
        let err = parse_err("2 * ()");
        assert_eq!(err.kind.message(), "missing expression inside parenthesis");
    }

    #[test]
    fn unexpected_eof() {
        let err = parse_err("x +");
        assert_eq!(err.kind.message(), "unexpected end of file");
    }

    #[test]
    fn trailing_garbage() {
        let err = parse_err("x y");
        assert_eq!(err.kind.message(), "expected end of file");
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn invalid_dimension() {
        let err = parse_err("v:[0]");
        assert_eq!(err.kind.message(), "invalid dimension `0`");
    }
}
