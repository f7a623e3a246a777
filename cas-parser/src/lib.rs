//! Tokenizer and parser for symbolic expressions, equations, and rewrite rules.
//!
//! The grammar is small: numbers, symbols (optionally annotated with a shape such as `v:[3]`),
//! rule wildcards (`?a`, `?#n`, `?$s`), function calls, vector and matrix literals, the binary
//! operators `+ - * / ^ =`, and unary negation. A rewrite rule is two expressions separated by
//! `~`.
//!
//! ```
//! use cas_parser::parser::{ast::Expr, Parser};
//!
//! let expr = Parser::new("a*x + b = c").try_parse_full::<Expr>().unwrap();
//! assert_eq!(expr.span(), 0..11);
//! ```

pub mod parser;
pub mod tokenizer;
