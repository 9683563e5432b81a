use log::debug;

use crate::problem::{LpProblem, Variable};

/// Dense simplex tableau in slack form.
///
/// Row 0 is the objective row, rows `1..=m` are the constraints. The last
/// column holds the right-hand side. Columns `0..n` are the decision
/// variables and `n..n+m` the slacks.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    data: Vec<Vec<f64>>,
    /// Basic variable of each constraint row (`basis[i]` belongs to row `i + 1`)
    basis: Vec<Variable>,
    num_vars: usize,
    tolerance: f64,
}

impl Tableau {
    /// Build the starting tableau: constraint rows with an identity block over
    /// the slack columns, the negated objective in row 0, and every slack basic.
    pub fn initialize(problem: &LpProblem, tolerance: f64) -> Self {
        let n_vars = problem.num_variables();
        let n_constraints = problem.num_constraints();
        let n_cols = n_vars + n_constraints + 1;
        let rhs_col = n_cols - 1;

        let mut data = vec![vec![0.0; n_cols]; n_constraints + 1];

        for (j, &coef) in problem.objective().iter().enumerate() {
            data[0][j] = -coef;
        }

        for (i, coefficients) in problem.constraint_matrix().iter().enumerate() {
            let row = &mut data[i + 1];
            row[..n_vars].copy_from_slice(coefficients);
            row[n_vars + i] = 1.0;
            row[rhs_col] = problem.rhs()[i];
        }

        let basis = (0..n_constraints).map(Variable::Slack).collect();

        debug!(
            "initialized tableau: {} rows x {} cols, {} decision vars, {} slacks",
            n_constraints + 1,
            n_cols,
            n_vars,
            n_constraints
        );

        Self {
            data,
            basis,
            num_vars: n_vars,
            tolerance,
        }
    }

    /// Entering column by the Dantzig rule: the decision column with the most
    /// negative objective-row entry. Slack columns never enter. `None` means the
    /// tableau is optimal.
    pub fn entering_column(&self) -> Option<usize> {
        let mut min_val = -self.tolerance;
        let mut min_col = None;

        for (j, &val) in self.data[0][..self.num_vars].iter().enumerate() {
            if val < min_val {
                min_val = val;
                min_col = Some(j);
            }
        }

        min_col
    }

    /// Minimum ratio test over rows with a positive entry in `col`.
    /// Returns the tableau row (1-based) and the winning ratio, or `None` when
    /// the column is unbounded.
    pub fn leaving_row(&self, col: usize) -> Option<(usize, f64)> {
        let rhs_col = self.rhs_column();

        let mut min_ratio = f64::INFINITY;
        let mut min_row = None;

        for (i, row) in self.data.iter().enumerate().skip(1) {
            let val = row[col];
            if val > self.tolerance {
                let ratio = row[rhs_col] / val;
                if ratio < min_ratio {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }

        min_row.map(|row| (row, min_ratio))
    }

    /// Pivot on (`row`, `col`) and return the variable that left the basis.
    /// `row` must be a constraint row picked by [`Tableau::leaving_row`].
    pub(crate) fn pivot(&mut self, row: usize, col: usize) -> Variable {
        debug_assert!(row >= 1 && self.data[row][col].abs() > self.tolerance);
        let n_cols = self.data[0].len();

        let leaving = self.basis[row - 1];
        self.basis[row - 1] = self.variable_at(col);

        let pivot_val = self.data[row][col];
        for j in 0..n_cols {
            self.data[row][j] /= pivot_val;
        }

        let pivot_row = self.data[row].clone();
        for (i, current) in self.data.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let multiplier = current[col];
            if multiplier == 0.0 {
                continue;
            }
            for (cell, &p) in current.iter_mut().zip(&pivot_row) {
                *cell -= multiplier * p;
            }
        }

        leaving
    }

    /// Variable owning tableau column `col`
    pub fn variable_at(&self, col: usize) -> Variable {
        if col < self.num_vars {
            Variable::Decision(col)
        } else {
            Variable::Slack(col - self.num_vars)
        }
    }

    pub fn basis(&self) -> &[Variable] {
        &self.basis
    }

    pub fn is_basic(&self, var: Variable) -> bool {
        self.basis.contains(&var)
    }

    /// Current value of every basic variable, in row order
    pub fn basic_values(&self) -> Vec<(Variable, f64)> {
        let rhs_col = self.rhs_column();
        self.basis
            .iter()
            .enumerate()
            .map(|(i, &var)| (var, self.data[i + 1][rhs_col]))
            .collect()
    }

    /// Objective-row entry of a variable's column
    pub fn reduced_cost(&self, var: Variable) -> f64 {
        self.data[0][var.column(self.num_vars)]
    }

    pub fn objective_value(&self) -> f64 {
        self.data[0][self.rhs_column()]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn rhs_column(&self) -> usize {
        self.data[0].len() - 1
    }

    pub fn num_variables(&self) -> usize {
        self.num_vars
    }

    pub fn num_constraints(&self) -> usize {
        self.basis.len()
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LpProblem {
        LpProblem::build(
            vec![5.0, 4.0],
            vec![vec![6.0, 4.0], vec![1.0, 2.0]],
            vec![24.0, 6.0],
            vec!["x".to_string(), "y".to_string()],
            vec!["labor".to_string(), "material".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_initialize_layout() {
        let tableau = Tableau::initialize(&sample(), 1e-6);

        assert_eq!(tableau.rows().len(), 3);
        assert_eq!(tableau.rows()[0], vec![-5.0, -4.0, 0.0, 0.0, 0.0]);
        assert_eq!(tableau.rows()[1], vec![6.0, 4.0, 1.0, 0.0, 24.0]);
        assert_eq!(tableau.rows()[2], vec![1.0, 2.0, 0.0, 1.0, 6.0]);
        assert_eq!(tableau.basis(), &[Variable::Slack(0), Variable::Slack(1)]);
        assert_eq!(tableau.objective_value(), 0.0);
    }

    #[test]
    fn test_entering_and_leaving_selection() {
        let tableau = Tableau::initialize(&sample(), 1e-6);

        assert_eq!(tableau.entering_column(), Some(0));
        // ratios 24/6 = 4 and 6/1 = 6
        assert_eq!(tableau.leaving_row(0), Some((1, 4.0)));
    }

    #[test]
    fn test_pivot_updates_basis_and_rows() {
        let mut tableau = Tableau::initialize(&sample(), 1e-6);

        let leaving = tableau.pivot(1, 0);

        assert_eq!(leaving, Variable::Slack(0));
        assert_eq!(tableau.basis()[0], Variable::Decision(0));
        assert!((tableau.objective_value() - 20.0).abs() < 1e-9);
        assert!(tableau.reduced_cost(Variable::Decision(0)).abs() < 1e-9);
        assert!((tableau.rows()[1][0] - 1.0).abs() < 1e-9);
        assert!(tableau.rows()[2][0].abs() < 1e-9);
    }

    #[test]
    fn test_column_without_positive_entry_is_unbounded() {
        let problem = LpProblem::build(
            vec![1.0, 0.0],
            vec![vec![-1.0, 1.0]],
            vec![5.0],
            vec!["x".to_string(), "y".to_string()],
            vec!["c".to_string()],
        )
        .unwrap();
        let tableau = Tableau::initialize(&problem, 1e-6);

        assert_eq!(tableau.entering_column(), Some(0));
        assert_eq!(tableau.leaving_row(0), None);
    }
}
