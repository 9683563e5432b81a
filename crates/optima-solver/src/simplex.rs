use log::{debug, info, warn};

use crate::error::ValidationError;
use crate::problem::LpProblem;
use crate::solution::{OptimalSolution, PivotStep, SolveResult};
use crate::tableau::Tableau;

/// Default pivot budget
pub const DEFAULT_MAX_ITERATIONS: usize = 50;
/// Tolerance used for every "is zero" / "is negative" test
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Tableau simplex solver for `max c·x, Ax <= b, x >= 0` problems with `b >= 0`
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the comparison tolerance, which must be positive and finite
    pub fn with_tolerance(mut self, tol: f64) -> Result<Self, ValidationError> {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(ValidationError::InvalidTolerance(tol));
        }
        self.tolerance = tol;
        Ok(self)
    }

    /// Solve the problem starting from the all-slack basis
    pub fn solve(&self, problem: &LpProblem) -> SolveResult {
        let tableau = Tableau::initialize(problem, self.tolerance);
        self.run(tableau)
    }

    /// Drive an already initialized tableau to a terminal state
    pub(crate) fn run(&self, mut tableau: Tableau) -> SolveResult {
        let mut trace = Vec::new();
        let mut iterations = 0;

        loop {
            let Some(pivot_col) = tableau.entering_column() else {
                info!(
                    "found optimum in {} iterations, obj.: {}",
                    iterations,
                    tableau.objective_value()
                );
                return SolveResult::Optimal(OptimalSolution::new(tableau, iterations, trace));
            };

            let entering = tableau.variable_at(pivot_col);
            let Some((pivot_row, ratio)) = tableau.leaving_row(pivot_col) else {
                warn!("problem is unbounded: {} can increase without limit", entering);
                return SolveResult::Unbounded {
                    entering,
                    iterations,
                    trace,
                };
            };

            if iterations >= self.max_iterations {
                warn!(
                    "iteration limit of {} reached, obj.: {}",
                    self.max_iterations,
                    tableau.objective_value()
                );
                return SolveResult::IterationLimitExceeded {
                    tableau,
                    iterations,
                    trace,
                };
            }

            let leaving = tableau.pivot(pivot_row, pivot_col);
            iterations += 1;

            debug!(
                "pivot {}: {} enters, {} leaves (row {}, ratio {}), obj.: {}",
                iterations,
                entering,
                leaving,
                pivot_row,
                ratio,
                tableau.objective_value()
            );

            trace.push(PivotStep {
                iteration: iterations,
                entering,
                leaving,
                pivot_row,
                ratio,
                objective_value: tableau.objective_value(),
                basic_values: tableau.basic_values(),
            });
        }
    }
}
