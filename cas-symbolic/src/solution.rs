use crate::expr::Expr;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a [`simplify`](crate::simplify()) or [`solve`](crate::solve()) call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    /// A result was found: the rewriter reached a fixpoint, or the search settled on a best
    /// candidate.
    Solved,

    /// The iteration or round cap was reached first. The result is the best one found so far.
    MaxIterationsReached,

    /// The search produced no candidate worth keeping. The result is the first input equation.
    NoCandidates,

    /// The caller cancelled the search. The result is the best one found so far.
    Cancelled,

    /// The call itself was invalid, such as an empty system of equations.
    Invalid(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solved => write!(f, "solved"),
            Self::MaxIterationsReached => write!(f, "max iterations reached"),
            Self::NoCandidates => write!(f, "no candidates"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Invalid(msg) => write!(f, "invalid: {}", msg),
        }
    }
}

/// The condition that stopped the rewriter or the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// No rule applied anywhere in the expression.
    Fixpoint,

    /// The best fitness was unchanged over the whole stagnation window.
    Stagnation,

    /// A round produced no candidate that had not been seen before.
    Exhausted,

    /// The iteration or round cap was reached.
    RoundLimit,

    /// The caller cancelled the search.
    Cancelled,

    /// The call was rejected before any work was done.
    Rejected,
}

/// The result of [`simplify`](crate::simplify()) or [`solve`](crate::solve()).
#[derive(Debug, Clone)]
pub struct Solution {
    /// The resulting expression.
    pub expr: Expr,

    /// A human-readable account of how the call ended.
    pub status: Status,

    /// The number of rewrite passes or search rounds that were run.
    pub rounds: usize,

    /// The condition that stopped the call.
    pub termination: Termination,
}

impl Solution {
    /// Builds the result of an invalid call. The expression is `NaN`.
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self {
            expr: Expr::number(f64::NAN),
            status: Status::Invalid(msg.into()),
            rounds: 0,
            termination: Termination::Rejected,
        }
    }

    /// Returns true if the call produced a result it considers final.
    pub fn success(&self) -> bool {
        self.status == Status::Solved
    }
}
