use std::collections::BTreeMap;

use crate::problem::{LpProblem, Variable};
use crate::sensitivity::{self, SensitivityReport};
use crate::tableau::Tableau;

/// Terminal outcome of a simplex run
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub enum SolveResult {
    /// An optimal solution was found
    Optimal(OptimalSolution),
    /// Some decision column can grow without bound
    Unbounded {
        /// The variable whose column had no positive entry
        entering: Variable,
        iterations: usize,
        trace: Vec<PivotStep>,
    },
    /// The pivot budget ran out before a terminal state was reached.
    /// The tableau is kept for diagnostics only and must not be analyzed.
    IterationLimitExceeded {
        tableau: Tableau,
        iterations: usize,
        trace: Vec<PivotStep>,
    },
}

impl SolveResult {
    pub fn status(&self) -> SolutionStatus {
        match self {
            SolveResult::Optimal(_) => SolutionStatus::Optimal,
            SolveResult::Unbounded { .. } => SolutionStatus::Unbounded,
            SolveResult::IterationLimitExceeded { .. } => SolutionStatus::IterationLimitExceeded,
        }
    }

    pub fn optimal(&self) -> Option<&OptimalSolution> {
        match self {
            SolveResult::Optimal(optimal) => Some(optimal),
            _ => None,
        }
    }

    pub fn iterations(&self) -> usize {
        match self {
            SolveResult::Optimal(optimal) => optimal.iterations,
            SolveResult::Unbounded { iterations, .. }
            | SolveResult::IterationLimitExceeded { iterations, .. } => *iterations,
        }
    }

    pub fn trace(&self) -> &[PivotStep] {
        match self {
            SolveResult::Optimal(optimal) => &optimal.trace,
            SolveResult::Unbounded { trace, .. }
            | SolveResult::IterationLimitExceeded { trace, .. } => trace,
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    Optimal,
    Unbounded,
    IterationLimitExceeded,
}

/// An optimal solve together with the frozen terminal tableau it was read from
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct OptimalSolution {
    pub solution: Solution,
    /// Number of pivots performed
    pub iterations: usize,
    pub trace: Vec<PivotStep>,
    tableau: Tableau,
}

impl OptimalSolution {
    pub(crate) fn new(tableau: Tableau, iterations: usize, trace: Vec<PivotStep>) -> Self {
        Self {
            solution: extract(&tableau),
            iterations,
            trace,
            tableau,
        }
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    pub fn basis(&self) -> &[Variable] {
        self.tableau.basis()
    }

    pub fn objective_value(&self) -> f64 {
        self.solution.objective_value
    }

    /// Post-optimal sensitivity analysis of this solution
    pub fn analyze(&self, problem: &LpProblem) -> SensitivityReport {
        sensitivity::analyze(problem, self)
    }
}

/// Variable values read off a terminal tableau
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Value of each decision variable
    pub values: Vec<f64>,
    /// Value of each slack variable
    pub slacks: Vec<f64>,
    /// Optimal objective value
    pub objective_value: f64,
}

impl Solution {
    pub fn value(&self, var: Variable) -> f64 {
        match var {
            Variable::Decision(j) => self.values[j],
            Variable::Slack(i) => self.slacks[i],
        }
    }

    pub fn value_of(&self, problem: &LpProblem, name: &str) -> Option<f64> {
        problem.lookup(name).map(|var| self.value(var))
    }

    /// Every decision and slack variable keyed by display name
    pub fn to_map(&self, problem: &LpProblem) -> BTreeMap<String, f64> {
        let decision = self
            .values
            .iter()
            .enumerate()
            .map(|(j, &v)| (problem.variable_name(Variable::Decision(j)), v));
        let slack = self
            .slacks
            .iter()
            .enumerate()
            .map(|(i, &v)| (Variable::Slack(i).to_string(), v));
        decision.chain(slack).collect()
    }
}

/// One pivot of the simplex run
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PivotStep {
    /// 1-based pivot number
    pub iteration: usize,
    pub entering: Variable,
    pub leaving: Variable,
    /// Tableau row the pivot happened on (1-based, row 0 is the objective)
    pub pivot_row: usize,
    /// Winning ratio of the minimum ratio test
    pub ratio: f64,
    /// Objective value after the pivot
    pub objective_value: f64,
    /// Basic variables and their values after the pivot
    pub basic_values: Vec<(Variable, f64)>,
}

/// Read the solution off a tableau: non-basic variables are zero, each basic
/// variable takes its row's right-hand side.
pub fn extract(tableau: &Tableau) -> Solution {
    let mut values = vec![0.0; tableau.num_variables()];
    let mut slacks = vec![0.0; tableau.num_constraints()];

    for (var, value) in tableau.basic_values() {
        match var {
            Variable::Decision(j) => values[j] = value,
            Variable::Slack(i) => slacks[i] = value,
        }
    }

    Solution {
        values,
        slacks,
        objective_value: tableau.objective_value(),
    }
}
