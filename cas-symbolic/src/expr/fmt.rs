//! The printer for [`Expr`].
//!
//! Printing is total: every expression, canonical or not and valid or not, has a printed form.
//! The printed form of a canonical expression parses back into an expression with the same
//! canonical form, which makes it usable as a key to deduplicate expressions.
//!
//! Non-finite numbers are the exception: they print as `inf`, `-inf` and `NaN`, which read back
//! as symbols. The solver never admits a candidate containing a non-finite number, so these forms
//! never meet the symbols of the same name as keys.

use std::fmt::{self, Display, Formatter};
use super::{Constraint, Expr, OpKind};

/// How tightly an expression binds when printed, from loosest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Eq,
    Add,
    Mul,
    Neg,
    Pow,
    Atom,
}

/// Returns true if the number prints with a leading minus sign.
fn is_negative(n: f64) -> bool {
    n < 0.0
}

/// If the factor is `b^-1`, returns `b`.
fn reciprocal_base(factor: &Expr) -> Option<&Expr> {
    match (factor.kind(), factor.args()) {
        (Some(OpKind::Power), [base, exp]) if exp.as_number() == Some(-1.0) => Some(base),
        _ => None,
    }
}

impl Expr {
    /// Returns the precedence of the expression when printed.
    fn precedence(&self) -> Precedence {
        match self {
            Self::Number(n) if is_negative(*n) => Precedence::Neg,
            Self::Number(_) | Self::Symbol(_) | Self::Wildcard(_) => Precedence::Atom,
            Self::Op(op) => match op.kind() {
                OpKind::Add | OpKind::Subtract => Precedence::Add,
                OpKind::Multiply => match op.args().first() {
                    Some(Self::Number(n)) if is_negative(*n) => Precedence::Neg,
                    _ => Precedence::Mul,
                },
                OpKind::Divide => Precedence::Mul,
                OpKind::Power => Precedence::Pow,
                OpKind::Equality => Precedence::Eq,
                _ => Precedence::Atom,
            },
        }
    }
}

/// Writes the expression, wrapped in parentheses if `parens` is true.
fn write_child(f: &mut Formatter<'_>, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

/// Writes a comma-separated list of expressions.
fn write_list(f: &mut Formatter<'_>, items: &[Expr]) -> fmt::Result {
    let mut iter = items.iter();
    if let Some(item) = iter.next() {
        write!(f, "{}", item)?;
        for item in iter {
            write!(f, ", {}", item)?;
        }
    }
    Ok(())
}

/// Writes a call-like operation, `name(a, b)`.
fn write_call(f: &mut Formatter<'_>, name: &str, args: &[Expr]) -> fmt::Result {
    write!(f, "{}(", name)?;
    write_list(f, args)?;
    write!(f, ")")
}

/// Writes a number. Non-finite numbers print as `inf`, `-inf`, or `NaN`.
fn write_number(f: &mut Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}", if n > 0.0 { "inf" } else { "-inf" })
    } else {
        write!(f, "{}", n)
    }
}

/// Writes a term of a sum, after the first. Negative terms are printed with ` - `.
fn write_term(f: &mut Formatter<'_>, term: &Expr) -> fmt::Result {
    match term {
        Expr::Number(n) if is_negative(*n) => {
            write!(f, " - ")?;
            write_number(f, -n)
        },
        Expr::Op(op) if *op.kind() == OpKind::Multiply => match op.args() {
            [Expr::Number(n), rest @ ..] if is_negative(*n) && !rest.is_empty() => {
                write!(f, " - ")?;
                write_product(f, -n, rest)
            },
            _ => {
                write!(f, " + ")?;
                write_child(f, term, term.precedence() <= Precedence::Add)
            },
        },
        _ => {
            write!(f, " + ")?;
            write_child(f, term, term.precedence() <= Precedence::Add)
        },
    }
}

/// Writes a product with the given numeric coefficient and remaining factors. Factors of the form
/// `b^-1` are written as divisions.
fn write_product(f: &mut Formatter<'_>, coefficient: f64, factors: &[Expr]) -> fmt::Result {
    let (denominators, numerators): (Vec<_>, Vec<_>) = factors.iter()
        .partition(|factor| reciprocal_base(factor).is_some());

    let mut first = true;
    if coefficient == -1.0 && !numerators.is_empty() {
        write!(f, "-")?;
    } else if coefficient != 1.0 || numerators.is_empty() {
        write_number(f, coefficient)?;
        first = false;
    }

    for factor in numerators {
        if !first {
            write!(f, "*")?;
        }
        let prec = factor.precedence();
        write_child(f, factor, prec < Precedence::Mul || (prec == Precedence::Neg && !first))?;
        first = false;
    }

    for factor in denominators {
        if let Some(base) = reciprocal_base(factor) {
            write!(f, "/")?;
            write_child(f, base, base.precedence() < Precedence::Atom)?;
        }
    }

    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::Number(n) => return write_number(f, *n),
            Self::Symbol(sym) => {
                write!(f, "{}", sym.name)?;
                if !sym.shape.dims().is_empty() {
                    write!(f, ":{}", sym.shape)?;
                }
                return Ok(());
            },
            Self::Wildcard(wildcard) => {
                let sigil = match wildcard.constraint {
                    Constraint::None => "",
                    Constraint::Constant => "#",
                    Constraint::Scalar => "$",
                };
                return write!(f, "?{}{}", sigil, wildcard.name);
            },
            Self::Op(op) => op,
        };

        let args = op.args();
        match (op.kind(), args) {
            (OpKind::Add, [first, rest @ ..]) => {
                write_child(f, first, first.precedence() <= Precedence::Eq)?;
                for term in rest {
                    write_term(f, term)?;
                }
                Ok(())
            },
            (OpKind::Multiply, [Expr::Number(n), rest @ ..]) if !rest.is_empty() => {
                write_product(f, *n, rest)
            },
            (OpKind::Multiply, [_, ..]) => write_product(f, 1.0, args),
            (OpKind::Subtract, [lhs, rhs]) => {
                write_child(f, lhs, lhs.precedence() <= Precedence::Eq)?;
                write!(f, " - ")?;
                write_child(f, rhs, rhs.precedence() <= Precedence::Add)
            },
            (OpKind::Divide, [lhs, rhs]) => {
                write_child(f, lhs, lhs.precedence() < Precedence::Mul)?;
                write!(f, "/")?;
                write_child(f, rhs, rhs.precedence() < Precedence::Atom)
            },
            (OpKind::Power, [base, exp]) => {
                write_child(f, base, base.precedence() < Precedence::Atom)?;
                write!(f, "^")?;
                let prec = exp.precedence();
                let negative_number = exp.as_number().is_some_and(is_negative);
                write_child(f, exp, prec < Precedence::Neg || (prec == Precedence::Neg && !negative_number))
            },
            (OpKind::Equality, [lhs, rhs]) => {
                write_child(f, lhs, lhs.precedence() <= Precedence::Eq)?;
                write!(f, " = ")?;
                write_child(f, rhs, rhs.precedence() <= Precedence::Eq)
            },
            (OpKind::Function(name), _) => write_call(f, name, args),
            (OpKind::Vector, _) => {
                write!(f, "[")?;
                write_list(f, args)?;
                write!(f, "]")
            },
            (OpKind::Matrix { cols, .. }, _) if *cols > 0 => {
                write!(f, "[")?;
                let mut rows = args.chunks(*cols);
                if let Some(row) = rows.next() {
                    write!(f, "[")?;
                    write_list(f, row)?;
                    write!(f, "]")?;
                    for row in rows {
                        write!(f, ", [")?;
                        write_list(f, row)?;
                        write!(f, "]")?;
                    }
                }
                write!(f, "]")
            },
            (OpKind::Dot, _) => write_call(f, "dot", args),
            (OpKind::MatMul, _) => write_call(f, "matmul", args),
            (OpKind::Derivative, _) => write_call(f, "deriv", args),
            (OpKind::Integral, _) => write_call(f, "integral", args),
            (OpKind::Grad, _) => write_call(f, "grad", args),
            (OpKind::Divergence, _) => write_call(f, "div", args),
            (OpKind::Curl, _) => write_call(f, "curl", args),

            // malformed operations (wrong number of arguments) are printed as calls
            (kind, _) => write_call(f, &kind.name().to_lowercase(), args),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::canonicalize;
    use super::*;
    use super::super::Shape;

    fn parse(source: &str) -> Expr {
        canonicalize(&source.parse::<Expr>().unwrap())
    }

    #[test]
    fn sums_with_negative_terms() {
        assert_eq!(parse("x - 3").to_string(), "-3 + x");
        assert_eq!(parse("c - b").to_string(), "c - b");
        assert_eq!(parse("x - 2*y").to_string(), "x - 2*y");
    }

    #[test]
    fn products_and_quotients() {
        assert_eq!(parse("(c - b)/a").to_string(), "(c - b)/a");
        assert_eq!(parse("-b/a").to_string(), "-b/a");
        assert_eq!(parse("1/a").to_string(), "a^-1");
        assert_eq!(parse("-(a + b)").to_string(), "-(a + b)");
        assert_eq!(parse("2*x*y").to_string(), "2*x*y");
    }

    #[test]
    fn powers() {
        assert_eq!(parse("(a*b)^2").to_string(), "(a*b)^2");
        assert_eq!(parse("x^(-y)").to_string(), "x^(-y)");
        assert_eq!(parse("x^(y^z)").to_string(), "x^y^z");
        assert_eq!(parse("(-2)^x").to_string(), "(-2)^x");
    }

    #[test]
    fn equations_and_calls() {
        assert_eq!(parse("x = (c - b)/a").to_string(), "x = (c - b)/a");
        assert_eq!(parse("deriv(sin(x), x)").to_string(), "deriv(sin(x), x)");
        assert_eq!(parse("[[1, 2], [3, 4]]").to_string(), "[[1, 2], [3, 4]]");
    }

    #[test]
    fn shaped_symbols_and_wildcards() {
        assert_eq!(Expr::shaped_symbol("M", Shape::matrix(2, 3)).to_string(), "M:[2, 3]");
        assert_eq!(Expr::wildcard("n", Constraint::Constant).to_string(), "?#n");
        assert_eq!(Expr::wildcard("s", Constraint::Scalar).to_string(), "?$s");
    }

    #[test]
    fn non_finite_numbers() {
        assert_eq!(Expr::number(f64::INFINITY).to_string(), "inf");
        assert_eq!(Expr::number(f64::NEG_INFINITY).to_string(), "-inf");
        assert_eq!(Expr::number(f64::NAN).to_string(), "NaN");

        // the printed forms read back as symbols, not numbers
        let reparsed = "inf".parse::<Expr>().unwrap();
        assert_eq!(reparsed.as_symbol(), Some("inf"));
        assert!(reparsed.is_finite());
        assert!(!Expr::number(f64::INFINITY).is_finite());
    }

    #[test]
    fn printed_form_round_trips() {
        for source in [
            "x = (c - b)/a",
            "-b/a + 3*x^2",
            "sin(x)^2 + cos(x)^2",
            "(x + 1)*(x - 1)",
            "2^-1*x",
            "a*b^-2",
            "v:[3] + u:[3]",
            "-(a + b)*c",
        ] {
            let expr = parse(source);
            let reparsed = parse(&expr.to_string());
            assert!(
                expr.structurally_eq(&reparsed),
                "`{}` printed as `{}`, which parses to `{}`",
                source,
                expr,
                reparsed,
            );
        }
    }
}
