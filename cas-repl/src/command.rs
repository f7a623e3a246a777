use cas_symbolic::{
    rewrite::DEFAULT_MAX_ITERATIONS,
    rules::{algebra, calculus, equation, expand, factor, logic, vector},
    simplify,
    solve::{isolated_variable, Eliminate, Goal, Isolate, Solver},
    Expr,
    Rule,
};
use crate::error::Error;
use once_cell::sync::Lazy;

/// The help text printed by the `help` command.
pub const HELP: &str = "\
commands:
  <expr>                          simplify an expression
  simplify <expr>                 simplify an expression
  expand <expr>                   expand products and powers of sums
  factor <expr>                   factor common terms out of sums
  solve <eq>; <eq>; ... for <var> solve a system of equations for a variable
  help                            print this message";

/// Rules used by `simplify`.
static SIMPLIFY_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    [algebra::rules(), calculus::rules(), vector::rules(), logic::rules()]
        .concat()
});

/// Rules used by `expand`.
static EXPAND_RULES: Lazy<Vec<Rule>> = Lazy::new(|| [expand::rules(), algebra::rules()].concat());

/// Rules used by `factor`.
static FACTOR_RULES: Lazy<Vec<Rule>> = Lazy::new(|| [factor::rules(), algebra::rules()].concat());

/// A command entered by the user.
#[derive(Debug, Clone)]
pub enum Command {
    Simplify(Expr),
    Expand(Expr),
    Factor(Expr),
    Solve {
        equations: Vec<Expr>,
        var: String,
    },
    Help,
}

/// Parses an expression, keeping the source around for error reports.
fn parse_expr(source: &str) -> Result<Expr, Error> {
    let source = source.trim();
    Expr::parse(source).map_err(|err| Error::Parse(err, source.to_string()))
}

/// Returns true if the string is a valid variable name.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Command {
    /// Parses a line of input. A line without a command word is simplified.
    pub fn parse(line: &str) -> Result<Self, Error> {
        let line = line.trim();
        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match head {
            "help" => Ok(Self::Help),
            "simplify" => parse_expr(rest).map(Self::Simplify),
            "expand" => parse_expr(rest).map(Self::Expand),
            "factor" => parse_expr(rest).map(Self::Factor),
            "solve" => {
                let usage = || Error::Usage("expected `solve <equation>; ... for <variable>`".into());
                let (equations, var) = rest.rsplit_once(" for ").ok_or_else(usage)?;
                let var = var.trim();
                if !is_identifier(var) {
                    return Err(usage());
                }

                let equations = equations.split(';')
                    .filter(|eq| !eq.trim().is_empty())
                    .map(parse_expr)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Solve { equations, var: var.to_string() })
            },
            _ => parse_expr(line).map(Self::Simplify),
        }
    }

    /// Runs the command, returning the text to print.
    pub fn run(&self) -> String {
        let solution = match self {
            Self::Help => return HELP.to_string(),
            Self::Simplify(expr) => simplify(expr, &SIMPLIFY_RULES, DEFAULT_MAX_ITERATIONS),
            Self::Expand(expr) => simplify(expr, &EXPAND_RULES, DEFAULT_MAX_ITERATIONS),
            Self::Factor(expr) => simplify(expr, &FACTOR_RULES, DEFAULT_MAX_ITERATIONS),
            Self::Solve { equations, var } => {
                // the other variables that an input equation defines are eliminated
                let eliminated = equations.iter()
                    .filter_map(isolated_variable)
                    .filter(|name| *name != var.as_str())
                    .map(|name| Box::new(Eliminate::new(name)) as Box<dyn Goal>)
                    .collect::<Vec<_>>();
                Solver::new(equation::rules().to_vec())
                    .with_goal(Isolate::new(var.as_str()))
                    .with_goals(eliminated)
                    .solve(equations)
            },
        };

        if solution.success() {
            solution.expr.to_string()
        } else {
            format!("{} ({})", solution.expr, solution.status)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn run(line: &str) -> String {
        Command::parse(line).unwrap().run()
    }

    #[test]
    fn simplify_commands() {
        assert_eq!(run("(x + 0)*1"), "x");
        assert_eq!(run("simplify x + x"), "2*x");
        assert_eq!(run("deriv(x^2, x)"), "2*x");
    }

    #[test]
    fn expand_and_factor() {
        assert_eq!(run("expand (a + b)^2"), "2*a*b + a^2 + b^2");
        assert_eq!(run("factor x*b + x*c"), "x*(b + c)");
    }

    #[test]
    fn solve_commands() {
        assert_eq!(run("solve 2*x = y for x"), "x = 0.5*y");
        assert_eq!(run("solve y = x + 1; z = y + 1 for z"), "z = 2 + x");
    }

    #[test]
    fn malformed_commands() {
        assert!(matches!(Command::parse("solve x = 1"), Err(Error::Usage(_))));
        assert!(matches!(Command::parse("solve x = 1 for 2"), Err(Error::Usage(_))));
        assert!(matches!(Command::parse("simplify (x"), Err(Error::Parse(_, _))));
        assert!(matches!(Command::parse("help"), Ok(Command::Help)));
    }
}
