use thiserror::Error;

/// Input-validation failures raised while translating a [`Model`](crate::Model)
/// into tableau form.
///
/// These are programmer errors in the supplied model and are reported through
/// `Result`, never as a solver [`Status`](crate::Status). Numerical and
/// combinatorial failure (infeasible, unbounded, cycled, timed out) is always
/// a status, never an `Error`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("variable `{0}` is declared more than once")]
    DuplicateVariable(String),

    #[error("a bound of constraint `{0}` is NaN")]
    InvalidBound(String),

    #[error("coefficient of variable `{variable}` on `{constraint}` is not finite")]
    InvalidCoefficient { variable: String, constraint: String },
}
