use std::collections::HashMap;
use std::fmt;

use crate::error::ValidationError;

/// A linear program in standard maximization form:
/// maximize `objective · x` subject to `constraint_matrix · x <= rhs`, `x >= 0`.
///
/// Built once through [`LpProblem::build`] and immutable afterwards.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct LpProblem {
    /// Objective coefficients (to maximize)
    objective: Vec<f64>,
    /// One row of coefficients per constraint
    constraint_matrix: Vec<Vec<f64>>,
    /// Right-hand side of each constraint, all non-negative
    rhs: Vec<f64>,
    var_names: Vec<String>,
    constraint_names: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip))]
    var_index: HashMap<String, usize>,
    #[cfg_attr(feature = "serde", serde(skip))]
    constraint_index: HashMap<String, usize>,
}

/// A variable of the slack-form problem.
///
/// Decision variables come from the problem itself; every constraint adds one
/// slack variable.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    Decision(usize),
    Slack(usize),
}

impl Variable {
    /// Tableau column of this variable for a problem with `num_vars` decision variables
    pub fn column(self, num_vars: usize) -> usize {
        match self {
            Variable::Decision(j) => j,
            Variable::Slack(i) => num_vars + i,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Decision(j) => write!(f, "x{}", j + 1),
            Variable::Slack(i) => write!(f, "s{}", i + 1),
        }
    }
}

impl LpProblem {
    /// Validate the raw problem data and build the problem.
    ///
    /// The number of variables is taken from `var_names` and the number of
    /// constraints from `constraint_rows`; every other array must agree.
    pub fn build(
        objective: Vec<f64>,
        constraint_rows: Vec<Vec<f64>>,
        rhs: Vec<f64>,
        var_names: Vec<String>,
        constraint_names: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let num_vars = var_names.len();
        let num_constraints = constraint_rows.len();

        if num_vars == 0 {
            return Err(ValidationError::NoVariables);
        }
        if objective.len() != num_vars {
            return Err(ValidationError::ObjectiveLength {
                expected: num_vars,
                actual: objective.len(),
            });
        }
        for (row, coefficients) in constraint_rows.iter().enumerate() {
            if coefficients.len() != num_vars {
                return Err(ValidationError::RowLength {
                    row,
                    expected: num_vars,
                    actual: coefficients.len(),
                });
            }
        }
        if rhs.len() != num_constraints {
            return Err(ValidationError::RhsLength {
                expected: num_constraints,
                actual: rhs.len(),
            });
        }
        if constraint_names.len() != num_constraints {
            return Err(ValidationError::ConstraintNamesLength {
                expected: num_constraints,
                actual: constraint_names.len(),
            });
        }

        if let Some(j) = objective.iter().position(|c| !c.is_finite()) {
            return Err(ValidationError::NonFinite {
                location: format!("objective coefficient of '{}'", var_names[j]),
            });
        }
        for (i, coefficients) in constraint_rows.iter().enumerate() {
            if let Some(j) = coefficients.iter().position(|c| !c.is_finite()) {
                return Err(ValidationError::NonFinite {
                    location: format!(
                        "coefficient of '{}' in constraint '{}'",
                        var_names[j], constraint_names[i]
                    ),
                });
            }
        }
        for (i, &value) in rhs.iter().enumerate() {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite {
                    location: format!("right-hand side of constraint '{}'", constraint_names[i]),
                });
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeRhs {
                    constraint: constraint_names[i].clone(),
                    value,
                });
            }
        }

        let mut var_index = HashMap::with_capacity(num_vars);
        for (j, name) in var_names.iter().enumerate() {
            if var_index.insert(name.clone(), j).is_some() {
                return Err(ValidationError::DuplicateVariable(name.clone()));
            }
        }
        let mut constraint_index = HashMap::with_capacity(num_constraints);
        for (i, name) in constraint_names.iter().enumerate() {
            if constraint_index.insert(name.clone(), i).is_some() {
                return Err(ValidationError::DuplicateConstraint(name.clone()));
            }
        }
        for i in 0..num_constraints {
            let slack = Variable::Slack(i).to_string();
            if var_index.contains_key(&slack) {
                return Err(ValidationError::ReservedSlackName(slack));
            }
        }

        Ok(Self {
            objective,
            constraint_matrix: constraint_rows,
            rhs,
            var_names,
            constraint_names,
            var_index,
            constraint_index,
        })
    }

    pub fn num_variables(&self) -> usize {
        self.var_names.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraint_names.len()
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn constraint_matrix(&self) -> &[Vec<f64>] {
        &self.constraint_matrix
    }

    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    pub fn variable_names(&self) -> &[String] {
        &self.var_names
    }

    pub fn constraint_names(&self) -> &[String] {
        &self.constraint_names
    }

    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.var_index.get(name).copied()
    }

    pub fn constraint_index(&self, name: &str) -> Option<usize> {
        self.constraint_index.get(name).copied()
    }

    /// Display name of a decision or slack variable
    pub fn variable_name(&self, var: Variable) -> String {
        match var {
            Variable::Decision(j) => self.var_names[j].clone(),
            Variable::Slack(_) => var.to_string(),
        }
    }

    /// Resolve a display name back to a variable. Slack names (`s1`, `s2`, ...)
    /// are reserved, so at most one variable matches.
    pub fn lookup(&self, name: &str) -> Option<Variable> {
        if let Some(j) = self.variable_index(name) {
            return Some(Variable::Decision(j));
        }
        let i: usize = name.strip_prefix('s')?.parse().ok()?;
        let slack = Variable::Slack(i.checked_sub(1)?);
        (i <= self.num_constraints() && slack.to_string() == name).then_some(slack)
    }
}
