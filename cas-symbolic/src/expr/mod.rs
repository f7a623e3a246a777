//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](cas_parser::parser::ast::expr::Expr) type from `cas_parser` is a recursive `enum`
//! that represents the syntax of an expression, including spans and parentheses. It's convenient
//! for parsing, but not so much for algebraic manipulation.
//!
//! This module defines a separate [`Expr`], a closed set of variants: numbers, symbols, wildcards,
//! and operations. An operation holds its kind and an ordered, shared list of child expressions.
//! Expressions are immutable; every transformation builds a new expression, and unchanged
//! subtrees are shared between the old and new trees.
//!
//! # Canonical equality
//!
//! There are many ways to write the same expression: `a + b` and `b + a`, `x - y` and
//! `x + -1*y`, `(x + 0)*1` and `x`. The [`canonicalize`](crate::canonicalize) function maps all of
//! these onto a single normalized tree.
//!
//! The [`PartialEq`], [`Eq`], and [`Hash`] implementations for [`Expr`] are defined over that
//! canonical form, **not** the raw structure. Two expressions compare equal if and only if their
//! canonical forms are structurally identical. Use [`Expr::structurally_eq`] to compare raw trees.
//!
//! Canonical equality is not the same as mathematical equality: `x^2 + 2*x + 1` and `(x + 1)^2`
//! are equal numbers for every `x`, but they have different canonical forms.

mod convert;
mod flat;
mod fmt;
mod iter;
pub mod shape;

use crate::canonical::canonicalize;
use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
    ops::{Add, Div, Mul, Neg, Sub},
    sync::Arc,
};

pub use flat::FlatNode;
pub use iter::ExprIter;
pub use shape::Shape;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Restricts what a [`Wildcard`] is allowed to bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constraint {
    /// The wildcard binds to any expression.
    None,

    /// The wildcard binds only to expressions with a scalar shape.
    Scalar,

    /// The wildcard binds only to numbers.
    Constant,
}

impl Constraint {
    /// Returns true if a wildcard with this constraint may bind to the given expression.
    pub fn admits(self, expr: &Expr) -> bool {
        match self {
            Self::None => true,
            Self::Scalar => expr.shape().is_scalar(),
            Self::Constant => matches!(expr, Expr::Number(_)),
        }
    }
}

/// A named variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Symbol {
    /// The name of the variable.
    pub name: Arc<str>,

    /// The shape of the variable. Scalar unless annotated otherwise.
    pub shape: Shape,
}

/// A named placeholder used in rule patterns and replacements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wildcard {
    /// The name of the wildcard.
    pub name: Arc<str>,

    /// What the wildcard may bind to.
    pub constraint: Constraint,
}

/// The kind of an [`Op`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OpKind {
    /// `a + b + ...`
    Add,

    /// `a * b * ...`
    Multiply,

    /// `a ^ b`
    Power,

    /// `a / b`. Canonicalization rewrites this as `a * b^-1`.
    Divide,

    /// `a - b`. Canonicalization rewrites this as `a + -1*b`.
    Subtract,

    /// `a = b`
    Equality,

    /// A call to a named function, such as `sin(x)`.
    Function(Arc<str>),

    /// A vector literal, `[a, b, c]`.
    Vector,

    /// A matrix literal stored in row-major order, `[[a, b], [c, d]]`.
    Matrix {
        rows: usize,
        cols: usize,
    },

    /// The dot product of two vectors.
    Dot,

    /// The product of two matrices, or of a matrix and a vector.
    MatMul,

    /// `deriv(f, x)`, the derivative of `f` with respect to `x`.
    Derivative,

    /// `integral(f, x)`, the indefinite integral of `f` with respect to `x`.
    Integral,

    /// `grad(f)`, the gradient of a scalar field.
    Grad,

    /// `div(F)`, the divergence of a vector field.
    Divergence,

    /// `curl(F)`, the curl of a three-dimensional vector field.
    Curl,
}

impl OpKind {
    /// Returns the name of the kind of operation, used to order operations of different kinds.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Multiply => "Multiply",
            Self::Power => "Power",
            Self::Divide => "Divide",
            Self::Subtract => "Subtract",
            Self::Equality => "Equality",
            Self::Function(_) => "Function",
            Self::Vector => "Vector",
            Self::Matrix { .. } => "Matrix",
            Self::Dot => "Dot",
            Self::MatMul => "MatMul",
            Self::Derivative => "Derivative",
            Self::Integral => "Integral",
            Self::Grad => "Grad",
            Self::Divergence => "Divergence",
            Self::Curl => "Curl",
        }
    }

    /// Returns true if the operation is associative, and therefore flattened by canonicalization.
    pub fn is_associative(&self) -> bool {
        matches!(self, Self::Add | Self::Multiply)
    }
}

/// An operation over an ordered list of child expressions.
///
/// The shape of the operation is inferred once, when it is constructed.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Op {
    kind: OpKind,
    args: Arc<[Expr]>,
    shape: Shape,
}

impl Op {
    /// Returns the kind of the operation.
    pub fn kind(&self) -> &OpKind {
        &self.kind
    }

    /// Returns the arguments of the operation.
    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    /// Returns the inferred shape of the operation.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

/// A mathematical expression.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A number, such as `2` or `0.5`.
    Number(f64),

    /// A variable, such as `x` or `v:[3]`.
    Symbol(Symbol),

    /// A rule wildcard, such as `?a`.
    Wildcard(Wildcard),

    /// An operation, such as `a + b` or `sin(x)`.
    Op(Op),
}

impl Expr {
    /// Creates a number. Negative zero is normalized to zero.
    pub fn number(value: f64) -> Self {
        Self::Number(if value == 0.0 { 0.0 } else { value })
    }

    /// Creates a scalar symbol.
    pub fn symbol(name: impl Into<Arc<str>>) -> Self {
        Self::shaped_symbol(name, Shape::scalar())
    }

    /// Creates a symbol with the given shape.
    pub fn shaped_symbol(name: impl Into<Arc<str>>, shape: Shape) -> Self {
        Self::Symbol(Symbol { name: name.into(), shape })
    }

    /// Creates a wildcard.
    pub fn wildcard(name: impl Into<Arc<str>>, constraint: Constraint) -> Self {
        Self::Wildcard(Wildcard { name: name.into(), constraint })
    }

    /// Creates an operation, inferring its shape. No simplification is done.
    pub fn op(kind: OpKind, args: impl Into<Arc<[Expr]>>) -> Self {
        let args = args.into();
        let shape = shape::infer(&kind, &args);
        Self::Op(Op { kind, args, shape })
    }

    /// Creates a call to the named function.
    pub fn call(name: impl Into<Arc<str>>, args: impl Into<Arc<[Expr]>>) -> Self {
        Self::op(OpKind::Function(name.into()), args)
    }

    /// Creates the equation `lhs = rhs`.
    pub fn equation(lhs: Expr, rhs: Expr) -> Self {
        Self::op(OpKind::Equality, vec![lhs, rhs])
    }

    /// Raises this expression to the given power. No simplification is done.
    pub fn pow(self, exp: Expr) -> Self {
        Self::op(OpKind::Power, vec![self, exp])
    }

    /// Returns the shape of the expression. Numbers and wildcards are scalars.
    pub fn shape(&self) -> Shape {
        match self {
            Self::Number(_) | Self::Wildcard(_) => Shape::scalar(),
            Self::Symbol(sym) => sym.shape.clone(),
            Self::Op(op) => op.shape.clone(),
        }
    }

    /// Returns the children of the expression. Atoms have no children.
    pub fn args(&self) -> &[Expr] {
        match self {
            Self::Op(op) => &op.args,
            _ => &[],
        }
    }

    /// If the expression is an operation, returns its kind.
    pub fn kind(&self) -> Option<&OpKind> {
        match self {
            Self::Op(op) => Some(&op.kind),
            _ => None,
        }
    }

    /// Returns true if the expression is an operation of the given kind.
    pub fn is_op(&self, kind: &OpKind) -> bool {
        self.kind() == Some(kind)
    }

    /// If the expression is a number, returns its value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// If the expression is a symbol, returns its name.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(sym) => Some(&sym.name),
            _ => None,
        }
    }

    /// If the expression is an equation, returns its left and right-hand sides.
    pub fn as_equation(&self) -> Option<(&Expr, &Expr)> {
        match self {
            Self::Op(Op { kind: OpKind::Equality, args, .. }) => match &args[..] {
                [lhs, rhs] => Some((lhs, rhs)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Rebuilds this operation with new children, re-inferring its shape. Atoms are returned
    /// unchanged.
    pub fn with_args(&self, args: impl Into<Arc<[Expr]>>) -> Self {
        match self {
            Self::Op(op) => Self::op(op.kind.clone(), args),
            _ => self.clone(),
        }
    }

    /// Returns true if both expressions are the same object: operations sharing the same child
    /// list, or structurally identical atoms. This is a cheap check used to detect that a
    /// transformation returned its input.
    pub fn is_same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Op(lhs), Self::Op(rhs)) => Arc::ptr_eq(&lhs.args, &rhs.args) && lhs.kind == rhs.kind,
            (Self::Op(_), _) | (_, Self::Op(_)) => false,
            (lhs, rhs) => lhs.structurally_eq(rhs),
        }
    }

    /// Returns true if both expressions have identical trees, without canonicalizing either.
    /// `NaN` is considered equal to itself.
    pub fn structurally_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(lhs), Self::Number(rhs)) => lhs == rhs || (lhs.is_nan() && rhs.is_nan()),
            (Self::Symbol(lhs), Self::Symbol(rhs)) => lhs == rhs,
            (Self::Wildcard(lhs), Self::Wildcard(rhs)) => lhs == rhs,
            (Self::Op(lhs), Self::Op(rhs)) => {
                lhs.kind == rhs.kind
                    && lhs.args.len() == rhs.args.len()
                    && (Arc::ptr_eq(&lhs.args, &rhs.args)
                        || lhs.args.iter().zip(rhs.args.iter()).all(|(l, r)| l.structurally_eq(r)))
            },
            _ => false,
        }
    }

    /// Hashes the raw tree of the expression, consistently with [`Expr::structurally_eq`].
    fn hash_structure<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Number(n) if n.is_nan() => u64::MAX.hash(state),
            Self::Number(n) => n.to_bits().hash(state),
            Self::Symbol(sym) => sym.hash(state),
            Self::Wildcard(wildcard) => wildcard.hash(state),
            Self::Op(op) => {
                op.kind.hash(state);
                op.args.len().hash(state);
                for arg in op.args.iter() {
                    arg.hash_structure(state);
                }
            },
        }
    }

    /// Compares two expressions using the total order used to sort the arguments of commutative
    /// operations:
    ///
    /// - Number < Symbol < Wildcard < Operation
    /// - numbers are ordered by value, symbols and wildcards by name, then by shape / constraint
    /// - operations are ordered by the name of their kind, then lexicographically by arguments
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        fn rank(expr: &Expr) -> u8 {
            match expr {
                Expr::Number(_) => 0,
                Expr::Symbol(_) => 1,
                Expr::Wildcard(_) => 2,
                Expr::Op(_) => 3,
            }
        }

        match (self, other) {
            (Self::Number(lhs), Self::Number(rhs)) => lhs.total_cmp(rhs),
            (Self::Symbol(lhs), Self::Symbol(rhs)) => lhs.name.cmp(&rhs.name)
                .then_with(|| lhs.shape.cmp(&rhs.shape)),
            (Self::Wildcard(lhs), Self::Wildcard(rhs)) => lhs.name.cmp(&rhs.name)
                .then_with(|| lhs.constraint.cmp(&rhs.constraint)),
            (Self::Op(lhs), Self::Op(rhs)) => lhs.kind.name().cmp(rhs.kind.name())
                .then_with(|| lhs.kind.cmp(&rhs.kind))
                .then_with(|| {
                    lhs.args.iter()
                        .zip(rhs.args.iter())
                        .map(|(l, r)| l.canonical_cmp(r))
                        .find(|ordering| ordering.is_ne())
                        .unwrap_or_else(|| lhs.args.len().cmp(&rhs.args.len()))
                }),
            (lhs, rhs) => rank(lhs).cmp(&rank(rhs)),
        }
    }

    /// Returns true if `needle` occurs anywhere in this expression, compared structurally.
    pub fn contains(&self, needle: &Expr) -> bool {
        self.post_order_iter().any(|node| node.structurally_eq(needle))
    }

    /// Returns true if a symbol with the given name occurs anywhere in this expression.
    pub fn contains_symbol(&self, name: &str) -> bool {
        self.post_order_iter().any(|node| node.as_symbol() == Some(name))
    }

    /// Returns the number of occurrences of the symbol with the given name.
    pub fn count_symbol(&self, name: &str) -> usize {
        self.post_order_iter().filter(|node| node.as_symbol() == Some(name)).count()
    }

    /// Replaces every occurrence of the symbol with the given name with `with`. Subtrees that do
    /// not contain the symbol are shared with the original expression.
    pub fn replace_symbol(&self, name: &str, with: &Expr) -> Expr {
        match self {
            Self::Symbol(sym) if &*sym.name == name => with.clone(),
            Self::Op(op) if self.contains_symbol(name) => {
                let args = op.args.iter()
                    .map(|arg| arg.replace_symbol(name, with))
                    .collect::<Vec<_>>();
                self.with_args(args)
            },
            _ => self.clone(),
        }
    }

    /// Returns false if any number in the expression is infinite or `NaN`.
    pub fn is_finite(&self) -> bool {
        self.post_order_iter().all(|node| node.as_number().map_or(true, f64::is_finite))
    }

    /// Returns the total number of nodes in the expression.
    pub fn node_count(&self) -> usize {
        self.post_order_iter().count()
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first, children before their parent).
    pub fn post_order_iter(&self) -> ExprIter<'_> {
        ExprIter::new(self)
    }
}

/// Checks if two expressions are **canonically** equal.
///
/// For more information, see the [module-level documentation](self).
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_eq(other) || canonicalize(self).structurally_eq(&canonicalize(other))
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonicalize(self).hash_structure(state);
    }
}

/// Builds `a + b`. No simplification is done.
impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::op(OpKind::Add, vec![self, rhs])
    }
}

/// Builds `a - b`. No simplification is done.
impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::op(OpKind::Subtract, vec![self, rhs])
    }
}

/// Builds `a * b`. No simplification is done.
impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::op(OpKind::Multiply, vec![self, rhs])
    }
}

/// Builds `a / b`. No simplification is done.
impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::op(OpKind::Divide, vec![self, rhs])
    }
}

/// Builds `-1 * a`, or the negated number if the expression is a number.
impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        match self {
            Expr::Number(n) => Expr::number(-n),
            expr => Expr::op(OpKind::Multiply, vec![Expr::number(-1.0), expr]),
        }
    }
}
