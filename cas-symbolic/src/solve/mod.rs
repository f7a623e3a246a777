//! Goal-directed solving of equations and systems of equations.
//!
//! The [`Solver`] runs a population search over the space of rewrites of its input equations.
//! Each round, every candidate that has not been expanded yet is rewritten by every transform at
//! every node (see [`rewrite_each_node`]), and its basic simplification is added as well. New
//! candidates are scored by summing the scores of the [`Goal`]s, and only the best
//! [`SolveOptions::population`] candidates survive into the next round. Candidates are
//! deduplicated by their printed canonical form.
//!
//! The search stops when:
//!
//! - the best fitness has not changed over [`SolveOptions::stagnation_window`] rounds,
//! - a round produces no candidate that has not been seen before,
//! - [`SolveOptions::max_rounds`] rounds have run, or
//! - the [`CancellationToken`] is cancelled.
//!
//! In a system of equations, an equation that is [isolated](isolated_variable) for some variable
//! is substituted into the other candidates, which is how variables are eliminated.
//!
//! ```
//! use cas_symbolic::{rules::equation, solve::{Isolate, Solver}, Expr};
//!
//! let eq = "2*x + 1 = y".parse::<Expr>().unwrap();
//! let solution = Solver::new(equation::rules().to_vec())
//!     .with_goal(Isolate::new("x"))
//!     .solve(&[eq]);
//! assert!(solution.success());
//! assert_eq!(solution.expr, "x = (y - 1)/2".parse::<Expr>().unwrap());
//! ```

mod cancel;
mod goal;
mod options;

pub use cancel::CancellationToken;
pub use goal::{Complexity, Eliminate, Goal, Isolate, TargetForm};
pub use options::{
    SolveOptions,
    SolveOptionsBuilder,
    DEFAULT_MAX_ROUNDS,
    DEFAULT_POPULATION,
    DEFAULT_STAGNATION_WINDOW,
};

use crate::{
    canonicalize,
    expr::{shape::first_invalid, Expr},
    rewrite::{rewrite_each_node, rewrite_fully, DEFAULT_MAX_ITERATIONS},
    rule::Rule,
    rules::algebra,
    solution::{Solution, Status, Termination},
    step_collector::StepCollector,
};
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A summary of a completed search round, reported through
/// [`Solver::solve_with_reports`].
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// The number of the round, starting at 1.
    pub round: usize,

    /// The best candidate after the round.
    pub best: Expr,

    /// The fitness of the best candidate.
    pub best_fitness: f64,

    /// The number of candidates that survived the round.
    pub population: usize,

    /// The number of previously unseen candidates the round produced.
    pub new_candidates: usize,
}

/// A member of the population.
#[derive(Debug, Clone)]
struct Candidate {
    expr: Expr,
    fitness: f64,
    expanded: bool,
}

/// If the expression is an equation whose left-hand side is a bare symbol that does not occur in
/// its right-hand side, returns the name of the symbol.
///
/// ```
/// use cas_symbolic::{solve::isolated_variable, Expr};
///
/// let eq = "y = x + 1".parse::<Expr>().unwrap();
/// assert_eq!(isolated_variable(&eq), Some("y"));
///
/// let eq = "y = y*x".parse::<Expr>().unwrap();
/// assert_eq!(isolated_variable(&eq), None);
/// ```
pub fn isolated_variable(expr: &Expr) -> Option<&str> {
    let (lhs, rhs) = expr.as_equation()?;
    let var = lhs.as_symbol()?;
    (!rhs.contains_symbol(var)).then_some(var)
}

/// Substitutes the isolated equation into the target, if the target mentions its variable.
///
/// Returns [`None`] if the equation is not isolated, or if the substitution would not change the
/// target.
fn substitute_isolated(isolated: &Expr, target: &Expr) -> Option<Expr> {
    let var = isolated_variable(isolated)?;
    let (_, value) = isolated.as_equation()?;
    if isolated.structurally_eq(target) || !target.contains_symbol(var) {
        return None;
    }
    Some(canonicalize(&target.replace_symbol(var, value)))
}

/// A goal-directed equation solver. See the [module-level documentation](self) for details.
pub struct Solver {
    transforms: Vec<Rule>,
    goals: Vec<Box<dyn Goal>>,
    options: SolveOptions,
    cancellation: CancellationToken,
}

impl Solver {
    /// Creates a solver that rewrites candidates with the given transforms. The solver has no
    /// goals, so every candidate scores 0 until goals are added with [`Solver::with_goal`].
    pub fn new(transforms: Vec<Rule>) -> Self {
        Self {
            transforms,
            goals: Vec::new(),
            options: SolveOptions::default(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Adds a goal to the solver.
    pub fn with_goal(mut self, goal: impl Goal + 'static) -> Self {
        self.goals.push(Box::new(goal));
        self
    }

    /// Adds several boxed goals to the solver.
    pub fn with_goals(mut self, goals: impl IntoIterator<Item = Box<dyn Goal>>) -> Self {
        self.goals.extend(goals);
        self
    }

    /// Sets the options of the search.
    pub fn with_options(mut self, options: SolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the token that can cancel the search.
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Returns the options of the search.
    pub fn options(&self) -> &SolveOptions {
        &self.options
    }

    /// Solves the system of equations.
    pub fn solve(&self, equations: &[Expr]) -> Solution {
        self.solve_with_reports(equations, &mut ())
    }

    /// Solves the system of equations, reporting a summary of every completed round to the
    /// collector.
    pub fn solve_with_reports(
        &self,
        equations: &[Expr],
        reports: &mut dyn StepCollector<RoundReport>,
    ) -> Solution {
        if equations.is_empty() {
            return Solution::invalid("the system of equations is empty");
        }

        let equations = equations.iter().map(canonicalize).collect::<Vec<_>>();
        if let Some(invalid) = equations.iter().find_map(first_invalid) {
            return Solution::invalid(format!("`{}` has an invalid shape", invalid));
        }

        let mut seen = HashSet::new();
        let mut population = Vec::new();
        for eq in &equations {
            self.admit(eq.clone(), &mut seen, &mut population);
        }
        if self.options.seed_substitutions {
            for isolated in &equations {
                for target in &equations {
                    if let Some(expr) = substitute_isolated(isolated, target) {
                        self.admit(expr, &mut seen, &mut population);
                    }
                }
            }
        }
        rank(&mut population, self.options.population);

        if population.is_empty() {
            debug!("no finite candidates among the input equations");
            return Solution {
                expr: equations[0].clone(),
                status: Status::NoCandidates,
                rounds: 0,
                termination: Termination::Exhausted,
            };
        }

        let pool = self.thread_pool();
        let mut history = Vec::new();
        let mut round = 0;

        let termination = loop {
            if self.cancellation.is_cancelled() {
                break Termination::Cancelled;
            }
            if round >= self.options.max_rounds {
                break Termination::RoundLimit;
            }
            round += 1;

            let pending = population.iter()
                .enumerate()
                .filter(|(_, candidate)| !candidate.expanded)
                .map(|(i, _)| i)
                .collect::<Vec<_>>();
            let exprs = pending.iter()
                .map(|&i| population[i].expr.clone())
                .collect::<Vec<_>>();
            let expansions = self.expand_all(&exprs, pool.as_ref());

            let mut fresh = Vec::new();
            for (&i, expansion) in pending.iter().zip(expansions) {
                let Some(results) = expansion else {
                    continue;
                };
                population[i].expanded = true;
                for expr in results {
                    self.admit(expr, &mut seen, &mut fresh);
                }
            }

            if self.options.substitute_isolated {
                let substitutions = substitution_pass(&population, &fresh);
                for expr in substitutions {
                    self.admit(expr, &mut seen, &mut fresh);
                }
            }

            let new_candidates = fresh.len();
            population.extend(fresh);
            rank(&mut population, self.options.population);

            let best = &population[0];
            debug!(
                round,
                best = %best.expr,
                fitness = best.fitness,
                new_candidates,
                "finished round",
            );
            reports.push(RoundReport {
                round,
                best: best.expr.clone(),
                best_fitness: best.fitness,
                population: population.len(),
                new_candidates,
            });

            history.push(best.fitness);
            if self.cancellation.is_cancelled() {
                break Termination::Cancelled;
            }
            if is_stagnant(&history, self.options.stagnation_window) {
                break Termination::Stagnation;
            }
            if new_candidates == 0 {
                break Termination::Exhausted;
            }
        };

        let status = match termination {
            Termination::RoundLimit => Status::MaxIterationsReached,
            Termination::Cancelled => Status::Cancelled,
            _ => Status::Solved,
        };
        let best = &population[0];
        debug!(?termination, rounds = round, best = %best.expr, "search stopped");

        Solution {
            expr: best.expr.clone(),
            status,
            rounds: round,
            termination,
        }
    }

    /// Sums the scores of every goal. A `NaN` fitness ranks below every other fitness.
    fn fitness(&self, expr: &Expr) -> f64 {
        let fitness = self.goals.iter().map(|goal| goal.score(expr)).sum::<f64>();
        if fitness.is_nan() {
            f64::NEG_INFINITY
        } else {
            fitness
        }
    }

    /// Adds the expression to the list of candidates, unless it has been seen before or contains
    /// a non-finite number.
    fn admit(&self, expr: Expr, seen: &mut HashSet<String>, candidates: &mut Vec<Candidate>) {
        if !expr.is_finite() || !seen.insert(expr.to_string()) {
            return;
        }

        let fitness = self.fitness(&expr);
        candidates.push(Candidate { expr, fitness, expanded: false });
    }

    /// Builds the worker pool, if the search should run on more than one thread.
    fn thread_pool(&self) -> Option<ThreadPool> {
        if self.options.threads <= 1 {
            return None;
        }

        match ThreadPoolBuilder::new().num_threads(self.options.threads).build() {
            Ok(pool) => Some(pool),
            Err(err) => {
                warn!(%err, "failed to build thread pool, expanding candidates sequentially");
                None
            },
        }
    }

    /// Expands every expression, on the worker pool if there is one. The results are in the same
    /// order as the expressions; an expression skipped because of cancellation has no results.
    fn expand_all(&self, exprs: &[Expr], pool: Option<&ThreadPool>) -> Vec<Option<Vec<Expr>>> {
        match pool {
            Some(pool) => pool.install(|| {
                exprs.par_iter()
                    .map(|expr| self.expand(expr))
                    .collect()
            }),
            None => exprs.iter()
                .map(|expr| self.expand(expr))
                .collect(),
        }
    }

    /// Returns every one-step rewrite of the expression by the transforms, and its basic
    /// simplification. Returns [`None`] if the search was cancelled.
    fn expand(&self, expr: &Expr) -> Option<Vec<Expr>> {
        if self.cancellation.is_cancelled() {
            return None;
        }

        let mut results = self.transforms.iter()
            .flat_map(|rule| rewrite_each_node(expr, rule))
            .collect::<Vec<_>>();

        if self.options.reduce {
            let (reduced, changed) = rewrite_fully(expr, algebra::rules(), DEFAULT_MAX_ITERATIONS);
            if changed {
                results.push(reduced);
            }
        }

        Some(results)
    }
}

/// Substitutes isolated candidates into other candidates, for every pair in which at least one of
/// the two candidates is new this round.
fn substitution_pass(population: &[Candidate], fresh: &[Candidate]) -> Vec<Expr> {
    let old = population.len();
    let all = population.iter()
        .chain(fresh)
        .map(|candidate| &candidate.expr)
        .collect::<Vec<_>>();

    let mut results = Vec::new();
    for (i, isolated) in all.iter().enumerate() {
        if isolated_variable(isolated).is_none() {
            continue;
        }
        for (j, target) in all.iter().enumerate() {
            if i < old && j < old {
                continue;
            }
            if let Some(expr) = substitute_isolated(isolated, target) {
                results.push(expr);
            }
        }
    }

    results
}

/// Sorts the candidates by descending fitness and keeps the best `size` of them. Candidates with
/// equal fitness keep their relative order, so older candidates win ties.
fn rank(candidates: &mut Vec<Candidate>, size: usize) {
    candidates.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    candidates.truncate(size.max(1));
}

/// Returns true if the last `window` best fitnesses are all equal.
fn is_stagnant(history: &[f64], window: usize) -> bool {
    if window == 0 || history.len() < window {
        return false;
    }

    let recent = &history[history.len() - window..];
    recent.iter().all(|&fitness| fitness == recent[0])
}

/// Solves the system of equations with the given transforms and goals, using the default options
/// apart from the round cap and the population size.
pub fn solve(
    equations: &[Expr],
    transforms: Vec<Rule>,
    goals: Vec<Box<dyn Goal>>,
    max_rounds: usize,
    population: usize,
) -> Solution {
    let options = SolveOptionsBuilder::new()
        .max_rounds(max_rounds)
        .population(population)
        .build();
    Solver::new(transforms)
        .with_goals(goals)
        .with_options(options)
        .solve(equations)
}
