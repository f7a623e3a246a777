//! Canonicalization, pattern rewriting, and goal-directed solving of symbolic expressions.
//!
//! This crate is built in layers:
//!
//! - [`expr`]: the immutable [`Expr`] tree, with its [`Shape`] checker, its printer, and
//!   conversion from [`cas_parser`] syntax trees.
//! - [`canonicalize`]: maps every expression onto a normalized tree. Equality and hashing of
//!   [`Expr`] are defined over this form.
//! - [`pattern`]: structural matching of expressions against patterns containing wildcards, and
//!   substitution of bindings into templates.
//! - [`rule`] and [`rewrite`]: rewrite rules, applied either until nothing changes
//!   ([`rewrite_fully`]) or once at every node ([`rewrite_each_node`]).
//! - [`rules`]: the built-in rule libraries.
//! - [`simplify()`] and [`differentiate`]: simplification to a fixpoint.
//! - [`solve`]: a population search over rewrites of a system of equations, directed by goals.
//!
//! ```
//! use cas_symbolic::{rules::algebra, simplify, Expr};
//!
//! let expr = "(x + 0)*1 + log(exp(y))".parse::<Expr>().unwrap();
//! let solution = simplify(&expr, algebra::rules(), 100);
//! assert!(solution.success());
//! assert_eq!(solution.expr.to_string(), "x + y");
//! ```

mod canonical;
pub mod expr;
pub mod pattern;
pub mod rewrite;
pub mod rule;
pub mod rules;
pub mod simplify;
mod solution;
pub mod solve;
pub mod step_collector;

pub use canonical::canonicalize;
pub use expr::{Constraint, Expr, FlatNode, OpKind, Shape};
pub use pattern::{substitute, try_match, Bindings};
pub use rewrite::{rewrite_each_node, rewrite_fully, rewrite_fully_with, RewriteOutcome, Step};
pub use rule::Rule;
pub use simplify::{complexity, differentiate, simplify, simplify_with_steps};
pub use solution::{Solution, Status, Termination};
pub use solve::{solve, Goal, Solver, SolveOptions};
pub use step_collector::StepCollector;
