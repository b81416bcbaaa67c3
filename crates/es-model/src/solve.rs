//! Solving a [`Model`] through `good_lp`.

use std::str::FromStr;
use std::time::Instant;

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution as _, Solver, SolverModel, Variable,
    variable,
};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::model::{Model, Sense};

/// Solver backends compiled into this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Pure-Rust simplex solver.
    #[default]
    Microlp,
    /// Pure-Rust interior point solver.
    Clarabel,
}

impl SolverKind {
    pub fn name(self) -> &'static str {
        match self {
            SolverKind::Microlp => "microlp",
            SolverKind::Clarabel => "clarabel",
        }
    }
}

impl std::fmt::Display for SolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "microlp" | "minilp" => Ok(SolverKind::Microlp),
            "clarabel" => Ok(SolverKind::Clarabel),
            _ => Err(ModelError::UnknownSolver {
                name: s.to_string(),
            }),
        }
    }
}

/// Optimal variable assignment of a model.
#[derive(Debug, Clone)]
pub struct Solution {
    pub values: Vec<f64>,
    pub objective: f64,
    pub solver: SolverKind,
    pub solve_time_s: f64,
}

/// Solve `model` with the given backend. Blocks until the solver returns.
pub fn solve(model: &Model, solver: SolverKind) -> ModelResult<Solution> {
    tracing::debug!(
        variables = model.variables().len(),
        constraints = model.constraints().len(),
        "solving with {}",
        solver
    );

    let started = Instant::now();
    let values = match solver {
        SolverKind::Microlp => solve_with(model, good_lp::solvers::microlp::microlp)?,
        SolverKind::Clarabel => solve_with(model, good_lp::solvers::clarabel::clarabel)?,
    };
    let solve_time_s = started.elapsed().as_secs_f64();

    if values.len() != model.variables().len() {
        return Err(ModelError::SolutionMismatch {
            what: format!(
                "{} values for {} variables",
                values.len(),
                model.variables().len()
            ),
        });
    }

    Ok(Solution {
        objective: model.objective_value(&values),
        values,
        solver,
        solve_time_s,
    })
}

fn solve_with<S>(model: &Model, solver: S) -> ModelResult<Vec<f64>>
where
    S: Solver,
    S::Model: SolverModel<Error = ResolutionError>,
{
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .variables()
        .iter()
        .map(|v| {
            let def = variable().min(v.lower);
            match v.upper {
                Some(ub) => vars.add(def.max(ub)),
                None => vars.add(def),
            }
        })
        .collect();

    let objective: Expression = model
        .objective()
        .iter()
        .map(|&(i, c)| handles[i] * c)
        .sum();

    let mut problem = vars.minimise(objective).using(solver);
    for c in model.constraints() {
        let lhs: Expression = c.terms.iter().map(|&(i, k)| handles[i] * k).sum();
        let constraint = match c.sense {
            Sense::Eq => good_lp::constraint::eq(lhs, c.rhs),
            Sense::Le => good_lp::constraint::leq(lhs, c.rhs),
            Sense::Ge => good_lp::constraint::geq(lhs, c.rhs),
        };
        problem.add_constraint(constraint);
    }

    let solution = problem.solve()?;
    Ok(handles.iter().map(|&h| solution.value(h)).collect())
}
