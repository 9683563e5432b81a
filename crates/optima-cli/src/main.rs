mod input;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use env_logger::Builder;

use optima_solver::{SolveResult, Solver, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

#[derive(Parser)]
#[command(name = "optima")]
#[command(about = "Tableau simplex solver with sensitivity analysis", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem file and print the optimal solution
    Solve {
        /// The JSON problem file
        file: PathBuf,
        #[command(flatten)]
        solver: SolverArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
        /// Show sensitivity analysis
        #[arg(short, long)]
        analysis: bool,
        /// Show every pivot
        #[arg(short, long)]
        trace: bool,
    },
    /// Check a problem file for errors
    Check {
        /// The JSON problem file
        file: PathBuf,
    },
    /// Project the objective after changing one constraint limit
    WhatIf {
        /// The JSON problem file
        file: PathBuf,
        /// Constraint name
        constraint: String,
        /// Change to the constraint's right-hand side
        #[arg(allow_hyphen_values = true)]
        delta: f64,
        #[command(flatten)]
        solver: SolverArgs,
    },
}

#[derive(clap::Args)]
struct SolverArgs {
    /// Maximum number of pivots
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
    /// Tolerance for zero / sign tests
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,
}

impl SolverArgs {
    fn solver(&self) -> Result<Solver> {
        Solver::new()
            .with_max_iterations(self.max_iterations)
            .with_tolerance(self.tolerance)
            .context("Invalid --tolerance")
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    match cli.command {
        Commands::Solve {
            file,
            solver,
            format,
            analysis,
            trace,
        } => {
            let (name, problem) = input::load(&file)?;
            let result = solver.solver()?.solve(&problem);
            let sensitivity = if analysis {
                result.optimal().map(|optimal| optimal.analyze(&problem))
            } else {
                None
            };

            match format {
                Format::Json => {
                    let output = serde_json::json!({
                        "name": name,
                        "status": result.status(),
                        "result": &result,
                        "analysis": sensitivity,
                    });
                    let text = serde_json::to_string_pretty(&output).context("Serializing result")?;
                    println!("{}", text);
                }
                Format::Pretty => {
                    if let Some(name) = &name {
                        println!("Problem: {}", name);
                    }
                    report::print_result(&problem, &result, trace);
                    if let Some(sensitivity) = &sensitivity {
                        report::print_analysis(sensitivity);
                    }
                }
            }

            Ok(exit_code(&result))
        }
        Commands::Check { file } => {
            let (name, problem) = input::load(&file)?;
            println!("✓ {} is valid", name.as_deref().unwrap_or(&file.display().to_string()));
            println!("  {} variables", problem.num_variables());
            println!("  {} constraints", problem.num_constraints());
            Ok(ExitCode::SUCCESS)
        }
        Commands::WhatIf {
            file,
            constraint,
            delta,
            solver,
        } => {
            let (_, problem) = input::load(&file)?;
            let result = solver.solver()?.solve(&problem);
            let Some(optimal) = result.optimal() else {
                report::print_result(&problem, &result, false);
                return Ok(exit_code(&result));
            };

            let projection = optimal
                .analyze(&problem)
                .what_if(&constraint, delta)
                .context("Projecting change")?;
            report::print_what_if(&projection);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_code(result: &SolveResult) -> ExitCode {
    match result {
        SolveResult::Optimal(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
