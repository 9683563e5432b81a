use optima_solver::{LpProblem, PivotStep, SensitivityReport, SolveResult, UtilizationBand, WhatIf};

pub fn print_result(problem: &LpProblem, result: &SolveResult, show_trace: bool) {
    if show_trace {
        print_trace(problem, result.trace());
    }

    match result {
        SolveResult::Optimal(optimal) => {
            println!("Status: OPTIMAL");
            println!("Objective value: {:.4}", optimal.objective_value());
            println!("Iterations: {}", optimal.iterations);
            println!();
            println!("Variables:");
            for (name, &value) in problem.variable_names().iter().zip(&optimal.solution.values) {
                if value.abs() > 0.001 {
                    println!("  {:20} {:12.4}", name, value);
                }
            }
        }
        SolveResult::Unbounded { entering, iterations, .. } => {
            println!("Status: UNBOUNDED");
            println!(
                "{} can increase without limit (after {} iterations).",
                problem.variable_name(*entering),
                iterations
            );
        }
        SolveResult::IterationLimitExceeded { tableau, iterations, .. } => {
            println!("Status: ITERATION LIMIT EXCEEDED");
            println!(
                "No terminal state after {} iterations; last objective value {:.4}.",
                iterations,
                tableau.objective_value()
            );
        }
    }
}

fn print_trace(problem: &LpProblem, trace: &[PivotStep]) {
    println!("Pivots:");
    for step in trace {
        println!(
            "  {:3}: {} enters, {} leaves (ratio {:.4}), objective {:.4}",
            step.iteration,
            problem.variable_name(step.entering),
            problem.variable_name(step.leaving),
            step.ratio,
            step.objective_value
        );
        for (var, value) in &step.basic_values {
            println!("         {:20} {:12.4}", problem.variable_name(*var), value);
        }
    }
    println!();
}

pub fn print_analysis(report: &SensitivityReport) {
    println!();
    println!("Analysis:");
    println!();

    if !report.binding_constraints.is_empty() {
        println!("Binding constraints:");
        for name in &report.binding_constraints {
            println!("  - {}", name);
        }
        println!();
    }

    println!("Shadow prices:");
    for sp in &report.shadow_prices {
        let note = if sp.binding { "" } else { " (non-binding)" };
        println!("  {:30} {:12.4}{}", sp.constraint, sp.value, note);
    }
    if let Some(best) = report.most_valuable_resource() {
        println!("  Most valuable: {} ({:.4} per unit)", best.constraint, best.value);
    }
    println!();

    println!("Reduced costs:");
    for rc in &report.reduced_costs {
        let status = if rc.is_basic { "basic" } else { "non-basic" };
        println!("  {:20} {:12.4}  {}", rc.variable, rc.reduced_cost, status);
    }
    println!();

    println!("Objective coefficient ranges (approximate):");
    for r in &report.objective_ranges {
        println!(
            "  {:20} {:12.4}  [{:.4}, {:.4}]",
            r.name, r.current, r.lower_bound, r.upper_bound
        );
    }
    println!();

    println!("Right-hand side ranges (approximate):");
    for r in &report.rhs_ranges {
        println!(
            "  {:30} {:12.2}  [{:.2}, {:.2}]",
            r.name, r.current, r.lower_bound, r.upper_bound
        );
    }
    println!();

    println!("Utilization:");
    for u in &report.utilization {
        let band = match u.band {
            UtilizationBand::Full => "full",
            UtilizationBand::High => "high",
            UtilizationBand::Moderate => "moderate",
            UtilizationBand::Low => "low",
        };
        println!(
            "  {:30} {:12.2} / {:12.2}  slack {:12.2}  {:6.1}%  {}",
            u.constraint, u.used, u.available, u.slack, u.percent_used, band
        );
    }
}

pub fn print_what_if(projection: &WhatIf) {
    println!(
        "Changing {} by {} (to {}) moves the objective by {:.4}",
        projection.constraint, projection.delta, projection.new_rhs, projection.objective_delta
    );
    println!("Projected objective: {:.4}", projection.projected_objective);
}
