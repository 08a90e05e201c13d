//! An embedded linear-programming and mixed-integer-programming solver.
//!
//! Models are described sparsely: variables carry `(constraint name,
//! coefficient)` entries, constraints carry bounds. The solver translates
//! the model into a dense standard-form tableau, runs the two-phase primal
//! simplex method on it and, when integer or binary variables are present,
//! a best-bound branch-and-cut search on top of it.
//!
//! ```
//! use lopt::{Constraint, Model, Status};
//!
//! let mut model = Model::maximize("profit");
//! model.add_constraint("wood", Constraint::less_eq(300));
//! model.add_constraint("labor", Constraint::less_eq(110));
//! model.add_variable("table", &[("profit", 1200.0), ("wood", 30.0), ("labor", 5.0)]);
//! model.add_variable("dresser", &[("profit", 1600.0), ("wood", 20.0), ("labor", 10.0)]);
//!
//! let solution = model.solve().unwrap();
//! assert_eq!(solution.status, Status::Optimal);
//! assert_eq!(solution.result, 19200.0);
//! assert_eq!(solution.value_of("table"), 4.0);
//! assert_eq!(solution.value_of("dresser"), 9.0);
//! ```
//!
//! Outcomes like infeasibility or unboundedness are reported as a
//! [`Status`], never as an error; [`Error`] is reserved for malformed
//! input models.

mod branch;
mod constraint;
mod error;
mod model;
mod options;
mod simplex;
mod solver;
mod tableau;

pub use constraint::Constraint;
pub use error::Error;
pub use model::{Model, OptDir};
pub use options::Options;
pub use solver::{solve, Solution, Status};
