mod error;
mod problem;
mod sensitivity;
mod simplex;
mod solution;
mod tableau;

pub use error::{SensitivityError, ValidationError};
pub use problem::{LpProblem, Variable};
pub use sensitivity::{
    analyze, ReducedCost, SensitivityRange, SensitivityReport, ShadowPrice, Utilization,
    UtilizationBand, WhatIf,
};
pub use simplex::{Solver, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
pub use solution::{extract, OptimalSolution, PivotStep, Solution, SolutionStatus, SolveResult};
pub use tableau::Tableau;
