use std::sync::Arc;
use super::{Expr, OpKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A node of an expression flattened into an array by [`Expr::flatten`].
///
/// Operations refer to their children by index into the same array. Children always appear before
/// their parent, so the array can be evaluated front to back.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlatNode {
    Number(f64),
    Symbol(Arc<str>),
    Wildcard(Arc<str>),
    Op {
        kind: OpKind,
        children: Vec<usize>,
    },
}

impl Expr {
    /// Flattens the expression into an array of nodes in post-order. The last node is the root.
    pub fn flatten(&self) -> Vec<FlatNode> {
        let mut nodes = Vec::new();

        // indices of the nodes whose parent has not been emitted yet
        let mut pending = Vec::new();

        for expr in self.post_order_iter() {
            let node = match expr {
                Expr::Number(n) => FlatNode::Number(*n),
                Expr::Symbol(sym) => FlatNode::Symbol(sym.name.clone()),
                Expr::Wildcard(wildcard) => FlatNode::Wildcard(wildcard.name.clone()),
                Expr::Op(op) => {
                    let children = pending.split_off(pending.len() - op.args().len());
                    FlatNode::Op { kind: op.kind().clone(), children }
                },
            };
            pending.push(nodes.len());
            nodes.push(node);
        }

        nodes
    }
}
