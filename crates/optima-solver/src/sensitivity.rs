//! Post-optimal sensitivity analysis read off a terminal tableau.
//!
//! Shadow prices and reduced costs come straight from the objective row. The
//! coefficient and right-hand side ranges are fixed-percentage estimates, not
//! ratio-test ranging: a basic variable's coefficient gets a ±50% band, a
//! non-basic one `[0, c + reduced cost]`, and every right-hand side ±10%.

use std::collections::HashMap;

use log::debug;

use crate::error::SensitivityError;
use crate::problem::{LpProblem, Variable};
use crate::solution::OptimalSolution;

/// Half-width of the objective coefficient band for basic variables, as a fraction
const BASIC_COEFFICIENT_BAND: f64 = 0.5;
/// Half-width of the right-hand side band, as a fraction
const RHS_BAND: f64 = 0.1;

/// Everything the analyzer derives from an optimal tableau
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityReport {
    pub objective_value: f64,

    /// Shadow prices (dual values) for each constraint
    /// Indicates how much the objective would change per unit of extra resource
    pub shadow_prices: Vec<ShadowPrice>,

    /// Reduced costs for each decision variable
    pub reduced_costs: Vec<ReducedCost>,

    /// Ranges for objective coefficients (approximate)
    pub objective_ranges: Vec<SensitivityRange>,

    /// Ranges for constraint right-hand sides (approximate)
    pub rhs_ranges: Vec<SensitivityRange>,

    /// How much of each constraint the solution consumes
    pub utilization: Vec<Utilization>,

    /// Constraints with a non-zero shadow price
    pub binding_constraints: Vec<String>,

    /// Constraints with a zero shadow price
    pub non_binding_constraints: Vec<String>,

    /// Tolerance of the solve the report was derived from
    tolerance: f64,

    /// Constraint name to position in the per-constraint lists
    #[cfg_attr(feature = "serde", serde(skip))]
    constraint_index: HashMap<String, usize>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowPrice {
    /// Constraint name
    pub constraint: String,
    /// Objective change per unit increase of the right-hand side
    pub value: f64,
    pub binding: bool,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedCost {
    /// Variable name
    pub variable: String,
    /// Current value in solution
    pub value: f64,
    /// Objective-row entry; for a non-basic variable, how much its coefficient
    /// must grow before it could profitably enter
    pub reduced_cost: f64,
    /// Is this variable in the basis?
    pub is_basic: bool,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityRange {
    /// Variable or constraint name
    pub name: String,
    /// Current value
    pub current: f64,
    /// Lower bound of the (approximate) range
    pub lower_bound: f64,
    /// Upper bound of the (approximate) range
    pub upper_bound: f64,
}

impl SensitivityRange {
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        let slack = tolerance * self.lower_bound.abs().max(self.upper_bound.abs()).max(1.0);
        value >= self.lower_bound - slack && value <= self.upper_bound + slack
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Utilization {
    pub constraint: String,
    pub used: f64,
    pub available: f64,
    pub slack: f64,
    /// Share of the right-hand side consumed, in percent (0 when it is 0)
    pub percent_used: f64,
    pub band: UtilizationBand,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilizationBand {
    /// Above 99.9%
    Full,
    /// Above 80%
    High,
    /// Above 50%
    Moderate,
    Low,
}

impl UtilizationBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent > 99.9 {
            UtilizationBand::Full
        } else if percent > 80.0 {
            UtilizationBand::High
        } else if percent > 50.0 {
            UtilizationBand::Moderate
        } else {
            UtilizationBand::Low
        }
    }
}

/// Linear estimate of the objective after changing one right-hand side
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct WhatIf {
    pub constraint: String,
    pub delta: f64,
    pub new_rhs: f64,
    pub objective_delta: f64,
    pub projected_objective: f64,
}

/// Analyze an optimal solution of `problem`
pub fn analyze(problem: &LpProblem, optimal: &OptimalSolution) -> SensitivityReport {
    let tableau = optimal.tableau();
    let tolerance = tableau.tolerance();
    let values = &optimal.solution.values;

    let shadow_prices: Vec<ShadowPrice> = problem
        .constraint_names()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let value = -tableau.reduced_cost(Variable::Slack(i));
            ShadowPrice {
                constraint: name.clone(),
                value,
                binding: value.abs() > tolerance,
            }
        })
        .collect();

    let reduced_costs = problem
        .variable_names()
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let var = Variable::Decision(j);
            ReducedCost {
                variable: name.clone(),
                value: values[j],
                reduced_cost: tableau.reduced_cost(var),
                is_basic: tableau.is_basic(var),
            }
        })
        .collect();

    let objective_ranges = problem
        .variable_names()
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let var = Variable::Decision(j);
            let current = problem.objective()[j];
            let (lower_bound, upper_bound) = if tableau.is_basic(var) {
                let half_width = current.abs() * BASIC_COEFFICIENT_BAND;
                (current - half_width, current + half_width)
            } else {
                (0.0, current + tableau.reduced_cost(var))
            };
            SensitivityRange {
                name: name.clone(),
                current,
                lower_bound,
                upper_bound,
            }
        })
        .collect();

    let rhs_ranges = problem
        .constraint_names()
        .iter()
        .zip(problem.rhs())
        .map(|(name, &rhs)| SensitivityRange {
            name: name.clone(),
            current: rhs,
            lower_bound: rhs * (1.0 - RHS_BAND),
            upper_bound: rhs * (1.0 + RHS_BAND),
        })
        .collect();

    let utilization = problem
        .constraint_names()
        .iter()
        .zip(problem.constraint_matrix())
        .zip(problem.rhs())
        .map(|((name, row), &available)| {
            let used: f64 = row.iter().zip(values).map(|(a, x)| a * x).sum();
            let percent_used = if available > 0.0 {
                used / available * 100.0
            } else {
                0.0
            };
            Utilization {
                constraint: name.clone(),
                used,
                available,
                slack: available - used,
                percent_used,
                band: UtilizationBand::from_percent(percent_used),
            }
        })
        .collect();

    let (binding, non_binding): (Vec<&ShadowPrice>, Vec<&ShadowPrice>) =
        shadow_prices.iter().partition(|sp| sp.binding);
    let binding_constraints: Vec<String> =
        binding.iter().map(|sp| sp.constraint.clone()).collect();
    let non_binding_constraints: Vec<String> =
        non_binding.iter().map(|sp| sp.constraint.clone()).collect();

    debug!(
        "sensitivity analysis: {} binding, {} non-binding constraints",
        binding_constraints.len(),
        non_binding_constraints.len()
    );

    SensitivityReport {
        objective_value: optimal.objective_value(),
        shadow_prices,
        reduced_costs,
        objective_ranges,
        rhs_ranges,
        utilization,
        binding_constraints,
        non_binding_constraints,
        tolerance,
        constraint_index: problem
            .constraint_names()
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect(),
    }
}

impl SensitivityReport {
    fn constraint_position(&self, constraint: &str) -> Result<usize, SensitivityError> {
        self.constraint_index
            .get(constraint)
            .copied()
            .ok_or_else(|| SensitivityError::UnknownConstraint(constraint.to_string()))
    }

    pub fn shadow_price(&self, constraint: &str) -> Option<f64> {
        self.constraint_position(constraint)
            .ok()
            .map(|i| self.shadow_prices[i].value)
    }

    pub fn is_binding(&self, constraint: &str) -> Option<bool> {
        self.constraint_position(constraint)
            .ok()
            .map(|i| self.shadow_prices[i].binding)
    }

    /// Project the objective after changing `constraint`'s right-hand side by
    /// `delta`. Refuses changes that leave the right-hand side range, where the
    /// shadow price no longer applies.
    pub fn what_if(&self, constraint: &str, delta: f64) -> Result<WhatIf, SensitivityError> {
        let i = self.constraint_position(constraint)?;
        let range = &self.rhs_ranges[i];
        let new_rhs = range.current + delta;

        if !range.contains(new_rhs, self.tolerance) {
            return Err(SensitivityError::OutsideRhsRange {
                constraint: constraint.to_string(),
                requested: new_rhs,
                lower: range.lower_bound,
                upper: range.upper_bound,
            });
        }

        let objective_delta = self.shadow_prices[i].value * delta;
        Ok(WhatIf {
            constraint: constraint.to_string(),
            delta,
            new_rhs,
            objective_delta,
            projected_objective: self.objective_value + objective_delta,
        })
    }

    /// What-if projections for growing every binding constraint by
    /// `fraction` of its current right-hand side
    pub fn resource_increase_scenarios(
        &self,
        fraction: f64,
    ) -> Result<Vec<WhatIf>, SensitivityError> {
        self.shadow_prices
            .iter()
            .zip(&self.rhs_ranges)
            .filter(|(sp, _)| sp.binding)
            .map(|(sp, range)| self.what_if(&sp.constraint, range.current * fraction))
            .collect()
    }

    /// Constraint with the highest positive shadow price
    pub fn most_valuable_resource(&self) -> Option<&ShadowPrice> {
        self.shadow_prices
            .iter()
            .filter(|sp| sp.value > self.tolerance)
            .fold(None, |best: Option<&ShadowPrice>, sp| match best {
                Some(b) if b.value >= sp.value => Some(b),
                _ => Some(sp),
            })
    }

    /// Constraints using more than 99% of their right-hand side
    pub fn bottlenecks(&self) -> impl Iterator<Item = &Utilization> {
        self.utilization.iter().filter(|u| u.percent_used > 99.0)
    }

    /// Constraints using less than 50% of their right-hand side
    pub fn underutilized(&self) -> impl Iterator<Item = &Utilization> {
        self.utilization.iter().filter(|u| u.percent_used < 50.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplex::Solver;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn worked_example() -> LpProblem {
        LpProblem::build(
            vec![5.0, 4.0],
            vec![vec![6.0, 4.0], vec![1.0, 2.0]],
            vec![24.0, 6.0],
            names(&["x", "y"]),
            names(&["labor", "material"]),
        )
        .unwrap()
    }

    fn report_for(problem: &LpProblem) -> SensitivityReport {
        let result = Solver::new().solve(problem);
        result.optimal().expect("optimal").analyze(problem)
    }

    /// Four constraints, one of them slack at the optimum, plus a product that
    /// stays out of the solution
    fn mixed_problem() -> LpProblem {
        // Maximize: 3x + 2y + z
        // Subject to:
        //   x + y + z <= 4
        //   x <= 3
        //   y <= 3
        //   x + 2y + 3z <= 100
        LpProblem::build(
            vec![3.0, 2.0, 1.0],
            vec![
                vec![1.0, 1.0, 1.0],
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![1.0, 2.0, 3.0],
            ],
            vec![4.0, 3.0, 3.0, 100.0],
            names(&["x", "y", "z"]),
            names(&["sum", "x_max", "y_max", "loose"]),
        )
        .unwrap()
    }

    #[test]
    fn test_shadow_prices_worked_example() {
        let report = report_for(&worked_example());

        assert!((report.shadow_price("labor").unwrap() - 0.75).abs() < 1e-9);
        assert!((report.shadow_price("material").unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(report.binding_constraints, vec!["labor", "material"]);
        assert!(report.non_binding_constraints.is_empty());
        assert_eq!(report.shadow_price("missing"), None);
    }

    #[test]
    fn test_duals_price_out_the_objective() {
        let problem = worked_example();
        let report = report_for(&problem);

        // b · y = c · x at the optimum
        let dual_objective: f64 = report
            .shadow_prices
            .iter()
            .zip(problem.rhs())
            .map(|(sp, b)| sp.value * b)
            .sum();
        assert!((dual_objective - report.objective_value).abs() < 1e-6);
    }

    #[test]
    fn test_reduced_costs_and_ranges() {
        let problem = mixed_problem();
        let report = report_for(&problem);

        let x = &report.reduced_costs[0];
        assert!(x.is_basic);
        assert!(x.reduced_cost.abs() < 1e-6);
        assert!((x.value - 3.0).abs() < 1e-6);

        let z = &report.reduced_costs[2];
        assert!(!z.is_basic);
        assert_eq!(z.value, 0.0);
        assert!(z.reduced_cost > 0.0);

        let x_range = &report.objective_ranges[0];
        assert!((x_range.lower_bound - 1.5).abs() < 1e-9);
        assert!((x_range.upper_bound - 4.5).abs() < 1e-9);

        let z_range = &report.objective_ranges[2];
        assert_eq!(z_range.lower_bound, 0.0);
        assert!((z_range.upper_bound - (1.0 + z.reduced_cost)).abs() < 1e-9);

        let loose = &report.rhs_ranges[3];
        assert!((loose.lower_bound - 90.0).abs() < 1e-9);
        assert!((loose.upper_bound - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_range_contains_with_negative_bounds() {
        let range = SensitivityRange {
            name: "x".to_string(),
            current: -4.0,
            lower_bound: -6.0,
            upper_bound: -2.0,
        };
        assert!(range.contains(-4.0, 1e-6));
        assert!(!range.contains(-1.0, 1e-6));
    }

    #[test]
    fn test_utilization_and_bands() {
        let problem = mixed_problem();
        let report = report_for(&problem);

        let sum = &report.utilization[0];
        assert!((sum.used - 4.0).abs() < 1e-6);
        assert!(sum.slack.abs() < 1e-6);
        assert_eq!(sum.band, UtilizationBand::Full);

        let loose = &report.utilization[3];
        assert!((loose.used - 5.0).abs() < 1e-6);
        assert!((loose.slack - 95.0).abs() < 1e-6);
        assert!((loose.percent_used - 5.0).abs() < 1e-6);
        assert_eq!(loose.band, UtilizationBand::Low);
        assert!(!report.is_binding("loose").unwrap());

        let bottlenecks: Vec<_> = report.bottlenecks().map(|u| u.constraint.as_str()).collect();
        assert_eq!(bottlenecks, vec!["sum", "x_max"]);
        let underutilized: Vec<_> = report.underutilized().map(|u| u.constraint.as_str()).collect();
        assert_eq!(underutilized, vec!["y_max", "loose"]);
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(UtilizationBand::from_percent(100.0), UtilizationBand::Full);
        assert_eq!(UtilizationBand::from_percent(99.9), UtilizationBand::High);
        assert_eq!(UtilizationBand::from_percent(80.0), UtilizationBand::Moderate);
        assert_eq!(UtilizationBand::from_percent(50.0), UtilizationBand::Low);
        assert_eq!(UtilizationBand::from_percent(0.0), UtilizationBand::Low);
    }

    #[test]
    fn test_zero_rhs_reports_zero_percent() {
        let problem = LpProblem::build(
            vec![1.0, 1.0],
            vec![vec![1.0, 0.0], vec![1.0, 1.0]],
            vec![0.0, 3.0],
            names(&["x", "y"]),
            names(&["x_cap", "total"]),
        )
        .unwrap();
        let report = report_for(&problem);

        assert_eq!(report.utilization[0].percent_used, 0.0);
        assert_eq!(report.utilization[0].band, UtilizationBand::Low);
        assert_eq!(report.rhs_ranges[0].lower_bound, 0.0);
        assert_eq!(report.rhs_ranges[0].upper_bound, 0.0);
    }

    #[test]
    fn test_complementary_slackness() {
        for problem in [worked_example(), mixed_problem()] {
            let report = report_for(&problem);
            for (sp, u) in report.shadow_prices.iter().zip(&report.utilization) {
                assert!(
                    (sp.value * u.slack).abs() < 1e-6,
                    "{}: shadow price {} with slack {}",
                    sp.constraint,
                    sp.value,
                    u.slack
                );
            }
        }
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let problem = mixed_problem();
        let result = Solver::new().solve(&problem);
        let optimal = result.optimal().unwrap();

        let first = optimal.analyze(&problem);
        let second = optimal.analyze(&problem);

        assert_eq!(first, second);
    }

    #[test]
    fn test_what_if_within_range() {
        let report = report_for(&worked_example());

        let projection = report.what_if("labor", 2.0).unwrap();

        assert!((projection.objective_delta - 1.5).abs() < 1e-9);
        assert!((projection.projected_objective - 22.5).abs() < 1e-6);
        assert_eq!(projection.new_rhs, 26.0);
    }

    #[test]
    fn test_what_if_refuses_extrapolation() {
        let report = report_for(&worked_example());

        let err = report.what_if("labor", 10.0).unwrap_err();
        assert!(matches!(err, SensitivityError::OutsideRhsRange { .. }));

        let err = report.what_if("nope", 1.0).unwrap_err();
        assert_eq!(err, SensitivityError::UnknownConstraint("nope".to_string()));
    }

    #[test]
    fn test_queries_by_constraint_name() {
        let report = report_for(&mixed_problem());

        for (sp, range) in report.shadow_prices.iter().zip(&report.rhs_ranges) {
            assert_eq!(report.shadow_price(&sp.constraint), Some(sp.value));
            assert_eq!(report.is_binding(&sp.constraint), Some(sp.binding));
            assert_eq!(range.name, sp.constraint);
        }
        assert_eq!(report.is_binding("sum"), Some(true));
        assert_eq!(report.is_binding("loose"), Some(false));
        assert_eq!(report.is_binding("missing"), None);

        let projection = report.what_if("loose", 5.0).unwrap();
        assert_eq!(projection.new_rhs, 105.0);
        assert!(projection.objective_delta.abs() < 1e-9);
    }

    #[test]
    fn test_resource_increase_scenarios() {
        let report = report_for(&worked_example());

        let scenarios = report.resource_increase_scenarios(0.1).unwrap();

        assert_eq!(scenarios.len(), 2);
        assert!((scenarios[0].delta - 2.4).abs() < 1e-9);
        assert!((scenarios[0].objective_delta - 1.8).abs() < 1e-9);
        assert!((scenarios[1].objective_delta - 0.3).abs() < 1e-9);
        assert!(report.resource_increase_scenarios(0.2).is_err());
    }

    #[test]
    fn test_most_valuable_resource() {
        let report = report_for(&worked_example());
        assert_eq!(report.most_valuable_resource().unwrap().constraint, "labor");

        let idle = LpProblem::build(
            vec![0.0],
            vec![vec![1.0]],
            vec![5.0],
            names(&["x"]),
            names(&["cap"]),
        )
        .unwrap();
        let report = report_for(&idle);
        assert!(report.most_valuable_resource().is_none());
        assert_eq!(report.non_binding_constraints, vec!["cap"]);
    }
}
