//! Shape inference for expressions.
//!
//! Every expression carries a [`Shape`]: a list of dimensions (empty for scalars) and a validity
//! flag. Shapes are inferred bottom-up when an operation is constructed, so an ill-formed operation
//! (such as the dot product of vectors with different lengths) never fails to build; it is simply
//! marked invalid, and so is every operation containing it.

use std::fmt::{self, Display, Formatter};
use super::{Expr, OpKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The shape of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shape {
    /// The dimensions of the value. Empty for scalars, one entry for vectors, two for matrices.
    dims: Vec<usize>,

    /// Whether the shape is well-formed.
    valid: bool,
}

impl Default for Shape {
    fn default() -> Self {
        Self::scalar()
    }
}

impl Shape {
    /// The shape of a scalar value.
    pub fn scalar() -> Self {
        Self { dims: Vec::new(), valid: true }
    }

    /// The shape of a vector with `len` entries.
    pub fn vector(len: usize) -> Self {
        Self { dims: vec![len], valid: true }
    }

    /// The shape of a matrix with the given number of rows and columns.
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self { dims: vec![rows, cols], valid: true }
    }

    /// A shape with arbitrary dimensions.
    pub fn tensor(dims: Vec<usize>) -> Self {
        Self { dims, valid: true }
    }

    /// The shape of an ill-formed expression.
    pub fn invalid() -> Self {
        Self { dims: Vec::new(), valid: false }
    }

    /// Returns the dimensions of the shape.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns true if the shape is well-formed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns true if the shape is a valid scalar shape.
    pub fn is_scalar(&self) -> bool {
        self.valid && self.dims.is_empty()
    }

    /// If the shape is a valid vector shape, returns its length.
    pub fn as_vector(&self) -> Option<usize> {
        match self.dims[..] {
            [len] if self.valid => Some(len),
            _ => None,
        }
    }

    /// If the shape is a valid matrix shape, returns its rows and columns.
    pub fn as_matrix(&self) -> Option<(usize, usize)> {
        match self.dims[..] {
            [rows, cols] if self.valid => Some((rows, cols)),
            _ => None,
        }
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return write!(f, "invalid");
        }
        if self.dims.is_empty() {
            return write!(f, "scalar");
        }

        write!(f, "[")?;
        let mut iter = self.dims.iter();
        if let Some(dim) = iter.next() {
            write!(f, "{}", dim)?;
            for dim in iter {
                write!(f, ", {}", dim)?;
            }
        }
        write!(f, "]")
    }
}

/// Element-wise combination: all operands have the same shape, or are scalars.
fn element_wise<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Shape {
    let mut result = Shape::scalar();
    for shape in shapes {
        if shape.is_scalar() {
            continue;
        }
        if result.is_scalar() {
            result = shape.clone();
        } else if &result != shape {
            return Shape::invalid();
        }
    }
    result
}

/// Returns the shape of the product of two matrix / vector operands, if they are compatible.
fn matrix_product(lhs: &Shape, rhs: &Shape) -> Option<Shape> {
    match (lhs.dims(), rhs.dims()) {
        ([r, k1], [k2, c]) if k1 == k2 => Some(Shape::matrix(*r, *c)),
        ([r, k1], [k2]) if k1 == k2 => Some(Shape::vector(*r)),
        ([k1], [k2, c]) if k1 == k2 => Some(Shape::vector(*c)),
        _ => None,
    }
}

/// Infers the shape of an operation of the given kind over the given arguments.
pub fn infer(kind: &OpKind, args: &[Expr]) -> Shape {
    if args.iter().any(|arg| !arg.shape().is_valid()) {
        return Shape::invalid();
    }

    let shapes = args.iter().map(Expr::shape).collect::<Vec<_>>();
    let all_scalar = shapes.iter().all(Shape::is_scalar);

    match kind {
        OpKind::Add
        | OpKind::Subtract
        | OpKind::Multiply
        | OpKind::Divide
        | OpKind::Power
        | OpKind::Equality
        | OpKind::Function(_) => element_wise(&shapes),
        OpKind::Vector if all_scalar => Shape::vector(args.len()),
        OpKind::Matrix { rows, cols } if all_scalar && rows * cols == args.len() => {
            Shape::matrix(*rows, *cols)
        },
        OpKind::Dot => match &shapes[..] {
            [lhs, rhs] if lhs.as_vector().is_some() && lhs == rhs => Shape::scalar(),
            _ => Shape::invalid(),
        },
        OpKind::MatMul => match &shapes[..] {
            [lhs, rhs] => matrix_product(lhs, rhs).unwrap_or_else(Shape::invalid),
            _ => Shape::invalid(),
        },
        OpKind::Derivative | OpKind::Integral => match &shapes[..] {
            [expr, var] if var.is_scalar() => expr.clone(),
            _ => Shape::invalid(),
        },
        OpKind::Grad => match &shapes[..] {
            [field] if field.is_scalar() => Shape::vector(3),
            _ => Shape::invalid(),
        },
        OpKind::Divergence => match &shapes[..] {
            [field] if field.as_vector().is_some() => Shape::scalar(),
            _ => Shape::invalid(),
        },
        OpKind::Curl => match &shapes[..] {
            [field] if field.as_vector() == Some(3) => Shape::vector(3),
            _ => Shape::invalid(),
        },
        OpKind::Vector | OpKind::Matrix { .. } => Shape::invalid(),
    }
}

/// If the product of the two operands should be promoted to a more specific operation based on
/// their shapes, returns the kind of that operation.
///
/// Two vectors of the same length promote to [`OpKind::Dot`]; a matrix times a matrix or vector
/// (in either order) with compatible inner dimensions promotes to [`OpKind::MatMul`].
pub fn promote_product(lhs: &Shape, rhs: &Shape) -> Option<OpKind> {
    if !lhs.is_valid() || !rhs.is_valid() || lhs.is_scalar() || rhs.is_scalar() {
        return None;
    }

    match (lhs.as_vector(), rhs.as_vector()) {
        (Some(a), Some(b)) if a == b => return Some(OpKind::Dot),
        (Some(_), Some(_)) => return None,
        _ => (),
    }

    matrix_product(lhs, rhs).map(|_| OpKind::MatMul)
}

/// Returns the innermost operation in the expression whose shape is invalid while all of its
/// operands are valid, i.e. the operation that introduced the invalid shape.
pub fn first_invalid(expr: &Expr) -> Option<&Expr> {
    expr.post_order_iter()
        .find(|node| !node.shape().is_valid() && node.args().iter().all(|arg| arg.shape().is_valid()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn vector(name: &str, len: usize) -> Expr {
        Expr::shaped_symbol(name, Shape::vector(len))
    }

    fn matrix(name: &str, rows: usize, cols: usize) -> Expr {
        Expr::shaped_symbol(name, Shape::matrix(rows, cols))
    }

    #[test]
    fn element_wise_with_scalar() {
        let expr = Expr::op(OpKind::Add, vec![vector("v", 3), Expr::symbol("x")]);
        assert_eq!(expr.shape(), Shape::vector(3));
    }

    #[test]
    fn element_wise_mismatch() {
        let expr = Expr::op(OpKind::Add, vec![vector("u", 2), vector("v", 3)]);
        assert!(!expr.shape().is_valid());
    }

    #[test]
    fn invalid_is_contagious() {
        let bad = Expr::op(OpKind::Dot, vec![vector("u", 2), vector("v", 3)]);
        let expr = Expr::op(OpKind::Add, vec![bad.clone(), Expr::number(1.0)]);
        assert!(!expr.shape().is_valid());
        assert_eq!(first_invalid(&expr), Some(&bad));
    }

    #[test]
    fn matrix_products() {
        let expr = Expr::op(OpKind::MatMul, vec![matrix("A", 2, 3), matrix("B", 3, 4)]);
        assert_eq!(expr.shape(), Shape::matrix(2, 4));

        let expr = Expr::op(OpKind::MatMul, vec![matrix("A", 2, 3), vector("v", 3)]);
        assert_eq!(expr.shape(), Shape::vector(2));

        let expr = Expr::op(OpKind::MatMul, vec![matrix("A", 2, 3), vector("v", 2)]);
        assert!(!expr.shape().is_valid());
    }

    #[test]
    fn vector_calculus() {
        let grad = Expr::op(OpKind::Grad, vec![Expr::symbol("f")]);
        assert_eq!(grad.shape(), Shape::vector(3));
        let div = Expr::op(OpKind::Divergence, vec![grad.clone()]);
        assert_eq!(div.shape(), Shape::scalar());
        let curl = Expr::op(OpKind::Curl, vec![vector("v", 2)]);
        assert!(!curl.shape().is_valid());
    }

    #[test]
    fn literals() {
        let vector = Expr::op(OpKind::Vector, vec![Expr::number(1.0), Expr::symbol("x")]);
        assert_eq!(vector.shape(), Shape::vector(2));
        let matrix = Expr::op(OpKind::Matrix { rows: 2, cols: 1 }, vec![Expr::number(1.0)]);
        assert!(!matrix.shape().is_valid());
    }

    #[test]
    fn promotion() {
        assert_eq!(promote_product(&Shape::vector(3), &Shape::vector(3)), Some(OpKind::Dot));
        assert_eq!(promote_product(&Shape::vector(3), &Shape::vector(2)), None);
        assert_eq!(promote_product(&Shape::matrix(2, 3), &Shape::vector(3)), Some(OpKind::MatMul));
        assert_eq!(promote_product(&Shape::vector(2), &Shape::matrix(2, 5)), Some(OpKind::MatMul));
        assert_eq!(promote_product(&Shape::scalar(), &Shape::vector(2)), None);
    }

    #[test]
    fn display() {
        assert_eq!(Shape::scalar().to_string(), "scalar");
        assert_eq!(Shape::matrix(2, 3).to_string(), "[2, 3]");
        assert_eq!(Shape::invalid().to_string(), "invalid");
    }
}
