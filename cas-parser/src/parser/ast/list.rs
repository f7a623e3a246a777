use crate::{
    parser::{
        ast::expr::Expr,
        error::{kind, Error},
        token::{CloseSquare, OpenSquare},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A vector literal, such as `[1, x, 3]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct List {
    /// The entries of the vector.
    pub items: Vec<Expr>,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for List {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.try_parse::<OpenSquare>()?;
        let items = input.try_parse_delimited::<Expr>(TokenKind::Comma)?;
        let close = input.try_parse::<CloseSquare>()?;
        Ok(Self {
            items,
            span: open.span.start..close.span.end,
        })
    }
}

/// A matrix literal written as a list of rows, such as `[[1, 2], [3, 4]]`. Every row has the same
/// number of entries.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix {
    /// The rows of the matrix, in order.
    pub rows: Vec<Vec<Expr>>,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Matrix {
    /// Returns the number of rows and columns of the matrix.
    pub fn dims(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map_or(0, Vec::len))
    }
}

impl Parse for Matrix {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.try_parse::<OpenSquare>()?;
        let mut rows = Vec::new();
        let mut expected = None;

        loop {
            let row = input.try_parse::<List>()?;
            let len = row.items.len();
            match expected {
                None => expected = Some(len),
                Some(expected) if expected != len => {
                    return Err(Error::new(vec![row.span], kind::RaggedMatrix {
                        expected,
                        found: len,
                    }));
                },
                Some(_) => (),
            }
            rows.push(row.items);

            if input.next_if(TokenKind::Comma).is_none() {
                break;
            }
        }

        let close = input.try_parse::<CloseSquare>()?;
        Ok(Self {
            rows,
            span: open.span.start..close.span.end,
        })
    }
}
