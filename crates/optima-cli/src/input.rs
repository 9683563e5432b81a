use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;

use optima_solver::LpProblem;

/// Problem record as stored on disk
#[derive(Debug, Deserialize)]
pub struct ProblemFile {
    #[serde(default)]
    pub name: Option<String>,
    pub variables: Vec<String>,
    pub objective: Vec<f64>,
    #[serde(default)]
    pub constraints: Vec<ConstraintRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ConstraintRecord {
    pub name: String,
    pub coefficients: Vec<f64>,
    pub rhs: f64,
}

impl ProblemFile {
    pub fn into_problem(self) -> Result<(Option<String>, LpProblem)> {
        let mut rows = Vec::with_capacity(self.constraints.len());
        let mut rhs = Vec::with_capacity(self.constraints.len());
        let mut names = Vec::with_capacity(self.constraints.len());
        for c in self.constraints {
            rows.push(c.coefficients);
            rhs.push(c.rhs);
            names.push(c.name);
        }

        let problem = LpProblem::build(self.objective, rows, rhs, self.variables, names)
            .context("Invalid problem")?;
        Ok((self.name, problem))
    }
}

pub fn parse(source: &str) -> Result<(Option<String>, LpProblem)> {
    let file: ProblemFile = serde_json::from_str(source).context("Parsing problem file")?;
    file.into_problem()
}

pub fn load(path: &Path) -> Result<(Option<String>, LpProblem)> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Reading {}", path.display()))?;
    let (name, problem) = parse(&source).with_context(|| format!("Loading {}", path.display()))?;
    info!(
        "loaded {}: {} variables, {} constraints",
        path.display(),
        problem.num_variables(),
        problem.num_constraints()
    );
    Ok((name, problem))
}
