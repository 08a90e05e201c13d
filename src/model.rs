use rustc_hash::{FxHashMap, FxHashSet};
use tabular::{Row, Table};

use std::collections::hash_map::Entry;
use std::fmt;

use crate::constraint::Constraint;
use crate::error::Error;
use crate::options::Options;
use crate::solver::{self, Solution};
use crate::tableau::{Tableau, TableauModel};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OptDir {
    Max,
    Min,
}

impl fmt::Display for OptDir {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OptDir::Max => write!(f, "Max"),
            OptDir::Min => write!(f, "Min"),
        }
    }
}

/// A linear program over named variables and named constraint rows.
///
/// Variables are kept in insertion order; that order fixes the tableau
/// column layout and, through it, every tie-break in the solver, so solving
/// the same model twice yields the same solution.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub(crate) opt_dir: OptDir,
    pub(crate) objective: Option<String>,
    pub(crate) constraints: Vec<(String, Constraint)>,
    pub(crate) variables: Vec<(String, FxHashMap<String, f64>)>,
    pub(crate) integers: FxHashSet<String>,
    pub(crate) binaries: FxHashSet<String>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

//bounds of one constraint name after merging, plus its first tableau row
struct RowBounds {
    row: usize,
    lower: f64,
    upper: f64,
}

impl Model {
    /// An empty maximization model with no objective.
    pub fn new() -> Self {
        Self {
            opt_dir: OptDir::Max,
            objective: None,
            constraints: Vec::new(),
            variables: Vec::new(),
            integers: FxHashSet::default(),
            binaries: FxHashSet::default(),
        }
    }

    pub fn maximize(objective: &str) -> Self {
        let mut mdl = Self::new();
        mdl.set_objective(OptDir::Max, objective);
        mdl
    }

    pub fn minimize(objective: &str) -> Self {
        let mut mdl = Self::new();
        mdl.set_objective(OptDir::Min, objective);
        mdl
    }

    //set objective coefficient source and optimization direction
    pub fn set_objective(&mut self, opt_dir: OptDir, objective: &str) {
        self.opt_dir = opt_dir;
        self.objective = Some(objective.to_string());
    }

    //add a constraint to the model; repeats of a name merge to tightest bounds
    pub fn add_constraint(&mut self, name: &str, constraint: Constraint) {
        self.constraints.push((name.to_string(), constraint));
    }

    //add a variable with its sparse (constraint name, coefficient) entries
    pub fn add_variable(&mut self, name: &str, coefficients: &[(&str, f64)]) {
        let coefs = coefficients
            .iter()
            .map(|&(constraint, coef)| (constraint.to_string(), coef))
            .collect();
        self.variables.push((name.to_string(), coefs));
    }

    /// Restrict a variable to integer values.
    pub fn mark_integer(&mut self, name: &str) {
        self.integers.insert(name.to_string());
    }

    /// Restrict a variable to {0, 1}. Implies integrality.
    pub fn mark_binary(&mut self, name: &str) {
        self.binaries.insert(name.to_string());
    }

    /// Restrict every variable declared so far to integer values.
    pub fn mark_all_integer(&mut self) {
        for (name, _) in &self.variables {
            self.integers.insert(name.clone());
        }
    }

    /// Restrict every variable declared so far to {0, 1}.
    pub fn mark_all_binary(&mut self) {
        for (name, _) in &self.variables {
            self.binaries.insert(name.clone());
        }
    }

    /// Solve with the default [`Options`].
    pub fn solve(&self) -> Result<Solution, Error> {
        solver::solve(self, &Options::default())
    }

    /// Solve with explicit [`Options`].
    pub fn solve_with(&self, options: &Options) -> Result<Solution, Error> {
        solver::solve(self, options)
    }

    /// Translates the model into a dense standard-form tableau.
    ///
    /// Every constraint row is expressed internally as `≤ RHS`: a finite
    /// upper bound becomes a row with the coefficients as given, a finite
    /// lower bound a row with them negated, a constraint with both bounds
    /// two adjacent rows. Each binary variable gets one extra `≤ 1` row.
    /// Row layout and column order are fixed here and never reordered;
    /// only the position maps move during pivoting.
    pub(crate) fn as_tableau(&self) -> Result<TableauModel<'_>, Error> {
        let sign = match self.opt_dir {
            OptDir::Max => 1.0,
            OptDir::Min => -1.0,
        };

        //merge bounds sharing a constraint name, preserving first-seen order
        let mut rows: Vec<RowBounds> = Vec::with_capacity(self.constraints.len());
        let mut row_of_name: FxHashMap<&str, usize> = FxHashMap::default();
        for (name, constraint) in &self.constraints {
            if constraint.lower.is_nan() || constraint.upper.is_nan() {
                return Err(Error::InvalidBound(name.clone()));
            }
            match row_of_name.entry(name.as_str()) {
                Entry::Occupied(e) => {
                    let bounds = &mut rows[*e.get()];
                    bounds.lower = bounds.lower.max(constraint.lower);
                    bounds.upper = bounds.upper.min(constraint.upper);
                }
                Entry::Vacant(e) => {
                    e.insert(rows.len());
                    rows.push(RowBounds {
                        row: 0,
                        lower: constraint.lower,
                        upper: constraint.upper,
                    });
                }
            }
        }

        //one row per finite bound, numbered from 1 (row 0 is the objective)
        let mut num_rows = 1;
        for bounds in &mut rows {
            bounds.row = num_rows;
            num_rows += bounds.lower.is_finite() as usize + bounds.upper.is_finite() as usize;
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut binary_cols = Vec::new();
        let mut integers = Vec::new();
        for (i, (name, _)) in self.variables.iter().enumerate() {
            if !seen.insert(name.as_str()) {
                return Err(Error::DuplicateVariable(name.clone()));
            }
            let col = i + 1;
            if self.binaries.contains(name.as_str()) {
                binary_cols.push(col);
                integers.push(col);
            } else if self.integers.contains(name.as_str()) {
                integers.push(col);
            }
        }

        let width = self.variables.len() + 1;
        let height = num_rows + binary_cols.len();
        let mut tableau = Tableau::new(width, height);

        for (i, (name, coefs)) in self.variables.iter().enumerate() {
            let c = i + 1;
            for (constraint, &coef) in coefs {
                if !coef.is_finite() {
                    return Err(Error::InvalidCoefficient {
                        variable: name.clone(),
                        constraint: constraint.clone(),
                    });
                }
                if self.objective.as_deref() == Some(constraint.as_str()) {
                    tableau.set(0, c, sign * coef);
                }
                if let Some(&b) = row_of_name.get(constraint.as_str()) {
                    let bounds = &rows[b];
                    if bounds.upper.is_finite() {
                        tableau.set(bounds.row, c, coef);
                        if bounds.lower.is_finite() {
                            tableau.set(bounds.row + 1, c, -coef);
                        }
                    } else if bounds.lower.is_finite() {
                        tableau.set(bounds.row, c, -coef);
                    }
                }
            }
        }

        for bounds in &rows {
            if bounds.upper.is_finite() {
                tableau.set(bounds.row, 0, bounds.upper);
                if bounds.lower.is_finite() {
                    tableau.set(bounds.row + 1, 0, -bounds.lower);
                }
            } else if bounds.lower.is_finite() {
                tableau.set(bounds.row, 0, -bounds.lower);
            }
        }

        for (b, &col) in binary_cols.iter().enumerate() {
            let row = num_rows + b;
            tableau.set(row, 0, 1.0);
            tableau.set(row, col, 1.0);
        }

        Ok(TableauModel {
            tableau,
            sign,
            variables: &self.variables,
            integers,
        })
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut table = Table::new("{:<}  {:^}  {:<}");

        let mut row = Row::new();
        row.add_cell(self.opt_dir);
        row.add_cell(":");
        row.add_cell(self.objective.as_deref().unwrap_or(""));
        table.add_row(row);

        let mut row = Row::new();
        row.add_cell("Subject to");
        row.add_cell(":");
        row.add_cell("");
        table.add_row(row);

        for (name, constraint) in &self.constraints {
            let mut row = Row::new();
            row.add_cell(name);
            row.add_cell("");
            row.add_cell(constraint);
            table.add_row(row);
        }

        write!(f, "{}", table)
    }
}
