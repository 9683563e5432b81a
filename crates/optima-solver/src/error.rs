use thiserror::Error;

/// Reasons an [`LpProblem`](crate::LpProblem) cannot be built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Problem has no decision variables")]
    NoVariables,
    #[error("Objective has {actual} coefficients but there are {expected} variables")]
    ObjectiveLength { expected: usize, actual: usize },
    #[error("Constraint row {row} has {actual} coefficients but there are {expected} variables")]
    RowLength { row: usize, expected: usize, actual: usize },
    #[error("Got {actual} right-hand side values for {expected} constraints")]
    RhsLength { expected: usize, actual: usize },
    #[error("Got {actual} constraint names for {expected} constraints")]
    ConstraintNamesLength { expected: usize, actual: usize },
    #[error("Right-hand side of constraint '{constraint}' is negative ({value})")]
    NegativeRhs { constraint: String, value: f64 },
    #[error("Non-finite value in {location}")]
    NonFinite { location: String },
    #[error("Duplicate variable name: {0}")]
    DuplicateVariable(String),
    #[error("Duplicate constraint name: {0}")]
    DuplicateConstraint(String),
    #[error("Variable name '{0}' is reserved for a slack variable")]
    ReservedSlackName(String),
    #[error("Tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),
}

/// Queries the sensitivity report refuses to answer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensitivityError {
    #[error("Unknown constraint: {0}")]
    UnknownConstraint(String),
    #[error(
        "'{constraint}' = {requested} is outside its range [{lower}, {upper}]; re-solve instead"
    )]
    OutsideRhsRange {
        constraint: String,
        requested: f64,
        lower: f64,
        upper: f64,
    },
}
