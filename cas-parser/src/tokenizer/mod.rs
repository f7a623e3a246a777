pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
///
/// Characters the lexer cannot classify are kept as [`TokenKind::Symbol`] tokens, so that the
/// parser can report them with a proper span.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "1 + 2.5",
            [
                (TokenKind::Number, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, "2.5"),
            ],
        );
    }

    #[test]
    fn rule_with_wildcards() {
        compare_tokens(
            "?#n*x~y_1",
            [
                (TokenKind::Question, "?"),
                (TokenKind::Hash, "#"),
                (TokenKind::Name, "n"),
                (TokenKind::Mul, "*"),
                (TokenKind::Name, "x"),
                (TokenKind::Tilde, "~"),
                (TokenKind::Name, "y_1"),
            ],
        );
    }

    #[test]
    fn shaped_symbol() {
        compare_tokens(
            "M:[2,3]",
            [
                (TokenKind::Name, "M"),
                (TokenKind::Colon, ":"),
                (TokenKind::OpenSquare, "["),
                (TokenKind::Number, "2"),
                (TokenKind::Comma, ","),
                (TokenKind::Number, "3"),
                (TokenKind::CloseSquare, "]"),
            ],
        );
    }

    #[test]
    fn scientific_number_and_unknown() {
        let tokens = tokenize_complete("1e-3 @");
        let kinds = tokens.iter().map(|token| token.kind).collect::<Vec<_>>();
        assert_eq!(kinds, vec![TokenKind::Number, TokenKind::Whitespace, TokenKind::Symbol]);
        assert_eq!(tokens[0].lexeme, "1e-3");
    }
}
