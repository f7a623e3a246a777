use super::Expr;

/// An iterator that iteratively traverses the tree of expressions in left-to-right post-order
/// (i.e. depth-first). Every node is yielded after all of its children.
///
/// This iterator is created by [`Expr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a Expr>,
    last_visited: Option<&'a Expr>,
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn new(expr: &'a Expr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the current expression in the stack and marks it as the last visited expression.
    fn visit(&mut self) -> Option<&'a Expr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given expression matches the last visited expression.
    fn is_last_visited(&self, expr: &'a Expr) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, expr),
            None => false,
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            let args = expr.args();
            match args.last() {
                // atoms and operations without arguments are visited immediately
                None => return self.visit(),
                Some(last) if self.is_last_visited(last) => return self.visit(),
                Some(_) => self.stack.extend(args.iter().rev()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn post_order() {
        // sin(x) + y*2
        let expr = Expr::call("sin", vec![Expr::symbol("x")])
            + Expr::symbol("y") * Expr::number(2.0);
        let printed = expr.post_order_iter()
            .map(|node| node.to_string())
            .collect::<Vec<_>>();
        assert_eq!(printed, vec!["x", "sin(x)", "y", "2", "y*2", "sin(x) + y*2"]);
    }

    #[test]
    fn repeated_subtree() {
        let shared = Expr::symbol("a") * Expr::symbol("b");
        let expr = shared.clone() + shared;
        assert_eq!(expr.post_order_iter().count(), 7);
    }

    #[test]
    fn empty_call() {
        let expr = Expr::call("rand", Vec::new()) + Expr::number(1.0);
        assert_eq!(expr.post_order_iter().count(), 3);
    }
}
