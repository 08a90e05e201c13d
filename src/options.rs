/// Per-solve tuning knobs.
///
/// An `Options` value is immutable for the duration of a solve call. The
/// built-in defaults are what `Options::default()` returns; callers override
/// individual fields with the `with_*` setters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
    /// Numbers closer than this are considered equal. Also the rounding
    /// granularity for reported values.
    pub precision: f64,
    /// Enable degeneracy-cycle detection on the pivot history.
    pub check_cycles: bool,
    /// Pivot cap for each relaxation solve.
    pub max_pivots: usize,
    /// Relative optimality gap at which branch and cut may stop early.
    pub tolerance: f64,
    /// Wall-clock budget for the whole branch-and-cut search, in milliseconds.
    pub timeout: f64,
    /// Branch-and-cut node budget.
    pub max_iterations: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            precision: 1e-8,
            check_cycles: false,
            max_pivots: 8192,
            tolerance: 0.0,
            timeout: f64::INFINITY,
            max_iterations: 32768,
        }
    }
}

impl Options {
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_check_cycles(mut self, check_cycles: bool) -> Self {
        self.check_cycles = check_cycles;
        self
    }

    pub fn with_max_pivots(mut self, max_pivots: usize) -> Self {
        self.max_pivots = max_pivots;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_timeout(mut self, timeout: f64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}
