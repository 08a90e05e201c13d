use num::ToPrimitive;

use std::fmt;

/// Lower/upper bounds for one named constraint row.
///
/// Either side may be infinite. An equality is the special case where both
/// sides coincide. Repeated constraints under the same name are merged by the
/// tableau builder to their tightest combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub(crate) lower: f64,
    pub(crate) upper: f64,
}

impl Constraint {
    /// "At most `value`", i.e. `{ max: value }`.
    pub fn less_eq<T: ToPrimitive>(value: T) -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: to_bound(value),
        }
    }

    /// "At least `value`", i.e. `{ min: value }`.
    pub fn greater_eq<T: ToPrimitive>(value: T) -> Self {
        Self {
            lower: to_bound(value),
            upper: f64::INFINITY,
        }
    }

    /// "Exactly `value`", i.e. both bounds at once.
    pub fn equal_to<T: ToPrimitive>(value: T) -> Self {
        let value = to_bound(value);
        Self {
            lower: value,
            upper: value,
        }
    }

    /// "Between `lower` and `upper`" (inclusive).
    pub fn in_range<T: ToPrimitive>(lower: T, upper: T) -> Self {
        Self {
            lower: to_bound(lower),
            upper: to_bound(upper),
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }
}

//non-convertible bounds surface as NaN and are rejected by model validation
fn to_bound<T: ToPrimitive>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.lower.is_finite(), self.upper.is_finite()) {
            (true, true) if self.lower == self.upper => write!(f, "= {}", self.upper),
            (true, true) => write!(f, "{} \u{2264} \u{00b7} \u{2264} {}", self.lower, self.upper),
            (true, false) => write!(f, "\u{2265} {}", self.lower),
            (false, true) => write!(f, "\u{2264} {}", self.upper),
            (false, false) => write!(f, "free"),
        }
    }
}
