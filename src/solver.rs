use rustc_hash::FxHashMap;

use std::fmt;

use crate::branch::branch_and_cut;
use crate::error::Error;
use crate::model::Model;
use crate::options::Options;
use crate::simplex::{phase1, round_to_precision, Outcome};
use crate::tableau::Tableau;

/// How a solve ended. Never an error: numerical and combinatorial failure
/// is part of the result, input-validation failure is [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A provably optimal assignment was found.
    Optimal,
    /// No assignment satisfies all constraints.
    Infeasible,
    /// The objective can be improved without limit.
    Unbounded,
    /// Degeneracy prevented termination within `max_pivots`.
    Cycled,
    /// The branch-and-cut budget (time or iterations) ran out first. The
    /// result is the best incumbent if one was found, NaN otherwise.
    TimedOut,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::Optimal => write!(f, "optimal"),
            Status::Infeasible => write!(f, "infeasible"),
            Status::Unbounded => write!(f, "unbounded"),
            Status::Cycled => write!(f, "cycled"),
            Status::TimedOut => write!(f, "timedout"),
        }
    }
}

/// The externally visible result of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: Status,
    /// Objective value, sign-corrected for the optimization direction.
    /// NaN when no meaningful value exists, `±∞` for unbounded models.
    pub result: f64,
    /// `(name, value)` pairs in variable declaration order. Variables at
    /// zero (within precision) are omitted.
    pub variables: Vec<(String, f64)>,
}

impl Solution {
    /// Value of a variable by name; variables omitted from the list are 0.
    pub fn value_of(&self, name: &str) -> f64 {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
            .unwrap_or(0.0)
    }
}

/// Reads the final tableau/basis state into a [`Solution`].
pub(crate) fn solution(
    tableau: &Tableau,
    variables: &[(String, FxHashMap<String, f64>)],
    sign: f64,
    outcome: Outcome,
    precision: f64,
) -> Solution {
    match outcome {
        Outcome::Optimal(result) => extract(tableau, variables, sign, Status::Optimal, result, precision),
        Outcome::TimedOut(result) if !result.is_nan() => {
            extract(tableau, variables, sign, Status::TimedOut, result, precision)
        }
        Outcome::Unbounded(col) => {
            let variable = tableau.variable_at_position[col];
            Solution {
                status: Status::Unbounded,
                result: sign * f64::INFINITY,
                variables: if (1..=variables.len()).contains(&variable) {
                    vec![(variables[variable - 1].0.clone(), f64::INFINITY)]
                } else {
                    Vec::new()
                },
            }
        }
        Outcome::TimedOut(_) => empty(Status::TimedOut),
        Outcome::Infeasible => empty(Status::Infeasible),
        Outcome::Cycled => empty(Status::Cycled),
    }
}

fn extract(
    tableau: &Tableau,
    variables: &[(String, FxHashMap<String, f64>)],
    sign: f64,
    status: Status,
    result: f64,
    precision: f64,
) -> Solution {
    let mut values = Vec::new();
    for (i, (name, _)) in variables.iter().enumerate() {
        let pos = tableau.position_of_variable[i + 1];
        if pos < tableau.width {
            continue; //non-basic, the variable is 0 and omitted
        }
        let value = tableau.at(pos - tableau.width, 0);
        if value > precision {
            values.push((name.clone(), round_to_precision(value, precision)));
        }
    }
    Solution {
        status,
        result: -sign * result,
        variables: values,
    }
}

fn empty(status: Status) -> Solution {
    Solution {
        status,
        result: f64::NAN,
        variables: Vec::new(),
    }
}

/// Solves `model` with the given options.
///
/// Purely continuous models are answered by the two-phase simplex directly.
/// Models with integer or binary variables run branch and cut seeded with
/// the simplex relaxation; if the relaxation already failed (infeasible,
/// unbounded, cycled) every tightening would fail the same way, so that
/// outcome is returned as-is.
pub fn solve(model: &Model, options: &Options) -> Result<Solution, Error> {
    let mut tabmod = model.as_tableau()?;
    let outcome = phase1(&mut tabmod.tableau, options);
    let solution = if tabmod.integers.is_empty() {
        self::solution(
            &tabmod.tableau,
            tabmod.variables,
            tabmod.sign,
            outcome,
            options.precision,
        )
    } else if let Outcome::Optimal(result) = outcome {
        branch_and_cut(&tabmod, result, options)
    } else {
        self::solution(
            &tabmod.tableau,
            tabmod.variables,
            tabmod.sign,
            outcome,
            options.precision,
        )
    };
    Ok(solution)
}
