use cas_error::Error;
use cas_parser::parser::{
    ast::{
        expr::Expr as AstExpr,
        literal::{LitSym, WildcardConstraint},
    },
    token::op::BinOpKind,
    Parser,
};
use std::str::FromStr;
use super::{Constraint, Expr, OpKind, Shape};

/// Returns the shape described by a symbol's shape annotation.
fn shape_of(sym: &LitSym) -> Shape {
    match sym.dims[..] {
        [] => Shape::scalar(),
        [len] => Shape::vector(len),
        [rows, cols] => Shape::matrix(rows, cols),
        _ => Shape::tensor(sym.dims.clone()),
    }
}

/// Converts a call to a built-in operation if the name and arity match one, or to a generic
/// function call otherwise.
fn convert_call(name: &str, args: Vec<Expr>) -> Expr {
    let kind = match (name, args.len()) {
        ("deriv", 2) => OpKind::Derivative,
        ("integral", 2) => OpKind::Integral,
        ("grad", 1) => OpKind::Grad,
        ("div", 1) => OpKind::Divergence,
        ("curl", 1) => OpKind::Curl,
        ("dot", 2) => OpKind::Dot,
        ("matmul", 2) => OpKind::MatMul,
        _ => OpKind::Function(name.into()),
    };
    Expr::op(kind, args)
}

impl From<AstExpr> for Expr {
    fn from(expr: AstExpr) -> Self {
        Self::from(&expr)
    }
}

impl From<&AstExpr> for Expr {
    fn from(expr: &AstExpr) -> Self {
        match expr {
            AstExpr::Number(num) => Expr::number(num.value),
            AstExpr::Symbol(sym) => Expr::shaped_symbol(sym.name.as_str(), shape_of(sym)),
            AstExpr::Wildcard(wildcard) => {
                let constraint = match wildcard.constraint {
                    WildcardConstraint::None => Constraint::None,
                    WildcardConstraint::Constant => Constraint::Constant,
                    WildcardConstraint::Scalar => Constraint::Scalar,
                };
                Expr::wildcard(wildcard.name.as_str(), constraint)
            },
            AstExpr::Call(call) => {
                let args = call.args.iter().map(Expr::from).collect();
                convert_call(&call.name.name, args)
            },
            AstExpr::List(list) => {
                Expr::op(OpKind::Vector, list.items.iter().map(Expr::from).collect::<Vec<_>>())
            },
            AstExpr::Matrix(matrix) => {
                let (rows, cols) = matrix.dims();
                let entries = matrix.rows.iter()
                    .flatten()
                    .map(Expr::from)
                    .collect::<Vec<_>>();
                Expr::op(OpKind::Matrix { rows, cols }, entries)
            },
            AstExpr::Paren(paren) => Expr::from(paren.innermost()),
            AstExpr::Unary(unary) => -Expr::from(&*unary.operand),
            AstExpr::Binary(binary) => {
                let lhs = Expr::from(&*binary.lhs);
                let rhs = Expr::from(&*binary.rhs);
                match binary.op.kind {
                    BinOpKind::Exp => lhs.pow(rhs),
                    BinOpKind::Mul => lhs * rhs,
                    BinOpKind::Div => lhs / rhs,
                    BinOpKind::Add => lhs + rhs,
                    BinOpKind::Sub => lhs - rhs,
                    BinOpKind::Eq => Expr::equation(lhs, rhs),
                }
            },
        }
    }
}

impl Expr {
    /// Parses an expression or equation from source text.
    ///
    /// The result is **not** canonicalized; it mirrors the structure of the source. Parse
    /// failures are returned as an [`Error`] that can be reported with its source spans.
    pub fn parse(source: &str) -> Result<Self, Error> {
        let ast = Parser::new(source).try_parse_full::<AstExpr>()?;
        Ok(Self::from(ast))
    }
}

impl FromStr for Expr {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn negative_literal() {
        let expr = Expr::parse("-2").unwrap();
        assert!(expr.structurally_eq(&Expr::number(-2.0)));
    }

    #[test]
    fn raw_structure_is_kept() {
        let expr = Expr::parse("(x + 0) * 1").unwrap();
        let expected = (Expr::symbol("x") + Expr::number(0.0)) * Expr::number(1.0);
        assert!(expr.structurally_eq(&expected));
    }

    #[test]
    fn builtin_calls() {
        assert_eq!(Expr::parse("deriv(f, x)").unwrap().kind(), Some(&OpKind::Derivative));
        assert_eq!(Expr::parse("div(F:[3])").unwrap().kind(), Some(&OpKind::Divergence));
        assert_eq!(
            Expr::parse("div(a, b)").unwrap().kind(),
            Some(&OpKind::Function("div".into())),
        );
    }

    #[test]
    fn shapes_from_annotations() {
        let expr = Expr::parse("M:[2, 3]").unwrap();
        assert_eq!(expr.shape(), Shape::matrix(2, 3));

        let expr = Expr::parse("[[1, 2, 3], [4, 5, 6]]").unwrap();
        assert_eq!(expr.kind(), Some(&OpKind::Matrix { rows: 2, cols: 3 }));
        assert_eq!(expr.shape(), Shape::matrix(2, 3));
    }

    #[test]
    fn wildcards() {
        let expr = Expr::parse("?#n * ?$s").unwrap();
        assert!(expr.args()[0].structurally_eq(&Expr::wildcard("n", Constraint::Constant)));
        assert!(expr.args()[1].structurally_eq(&Expr::wildcard("s", Constraint::Scalar)));
    }

    #[test]
    fn parse_failure() {
        let err = Expr::parse("(x + 1").unwrap_err();
        assert!(err.to_string().starts_with("unclosed parenthesis"));
    }
}
