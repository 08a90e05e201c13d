use crate::options::Options;
use crate::tableau::Tableau;

/// Result of running the two-phase simplex method (or the surrounding
/// branch-and-cut search) on one tableau.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Outcome {
    /// Objective-row RHS at optimality, rounded to the precision grid.
    /// Internally smaller is better; the reported value is sign-corrected
    /// during solution extraction.
    Optimal(f64),
    /// The entering column that proved the objective unbounded.
    Unbounded(usize),
    Infeasible,
    Cycled,
    /// Best incumbent found before the search budget ran out, NaN if none.
    TimedOut(f64),
}

/// Phase 1: drive every negative RHS out of the basis, then hand the
/// feasible tableau to [`phase2`].
pub(crate) fn phase1(tbl: &mut Tableau, options: &Options) -> Outcome {
    let mut pivot_history = Vec::new();
    let precision = options.precision;
    for _ in 0..options.max_pivots {
        //leaving row: most negative RHS, first found wins
        let mut row = 0;
        let mut rhs = -precision;
        for r in 1..tbl.height {
            let value = tbl.at(r, 0);
            if value < rhs {
                rhs = value;
                row = r;
            }
        }
        if row == 0 {
            return phase2(tbl, options);
        }

        //entering column: largest -objective/coefficient over negative coefficients
        let mut col = 0;
        let mut max_ratio = f64::NEG_INFINITY;
        for c in 1..tbl.width {
            let coefficient = tbl.at(row, c);
            if coefficient < -precision {
                let ratio = -tbl.at(0, c) / coefficient;
                if ratio > max_ratio {
                    max_ratio = ratio;
                    col = c;
                }
            }
        }
        if col == 0 {
            return Outcome::Infeasible;
        }

        if options.check_cycles
            && has_cycle(
                &mut pivot_history,
                tbl.variable_at_position[tbl.width + row],
                tbl.variable_at_position[col],
            )
        {
            return Outcome::Cycled;
        }
        tbl.pivot(row, col);
    }
    Outcome::Cycled
}

/// Phase 2: optimize from a basic feasible solution with Dantzig's rule.
pub(crate) fn phase2(tbl: &mut Tableau, options: &Options) -> Outcome {
    let mut pivot_history = Vec::new();
    let precision = options.precision;
    for _ in 0..options.max_pivots {
        //entering column: largest objective coefficient above precision
        let mut col = 0;
        let mut value = precision;
        for c in 1..tbl.width {
            let reduced_cost = tbl.at(0, c);
            if reduced_cost > value {
                value = reduced_cost;
                col = c;
            }
        }
        if col == 0 {
            return Outcome::Optimal(round_to_precision(tbl.at(0, 0), precision));
        }

        //leaving row: minimum ratio test; a ~0 RHS with positive coefficient
        //is taken immediately (degenerate pivot, avoids dividing by tiny RHS)
        let mut row = 0;
        let mut min_ratio = f64::INFINITY;
        for r in 1..tbl.height {
            let value = tbl.at(r, col);
            if value.abs() <= precision {
                continue;
            }
            let rhs = tbl.at(r, 0);
            if rhs.abs() <= precision && value > 0.0 {
                row = r;
                break;
            }
            let ratio = rhs / value;
            if precision < ratio && ratio < min_ratio {
                min_ratio = ratio;
                row = r;
            }
        }
        if row == 0 {
            return Outcome::Unbounded(col);
        }

        if options.check_cycles
            && has_cycle(
                &mut pivot_history,
                tbl.variable_at_position[tbl.width + row],
                tbl.variable_at_position[col],
            )
        {
            return Outcome::Cycled;
        }
        tbl.pivot(row, col);
    }
    Outcome::Cycled
}

//appends the newest (leaving, entering) pair and scans every period length
//up to half the history for a repeat
fn has_cycle(history: &mut Vec<(usize, usize)>, leaving: usize, entering: usize) -> bool {
    history.push((leaving, entering));
    for length in 1..=history.len() / 2 {
        let mut cycle = true;
        for i in 0..length {
            let item = history.len() - 1 - i;
            if history[item] != history[item - length] {
                cycle = false;
                break;
            }
        }
        if cycle {
            return true;
        }
    }
    false
}

/// Rounds to the grid implied by `precision` (e.g. 1e-8 rounds to the
/// nearest 1e-8), nudged by machine epsilon so values sitting just below a
/// grid point land on it.
pub(crate) fn round_to_precision(num: f64, precision: f64) -> f64 {
    let rounding = (1.0 / precision).round();
    ((num + f64::EPSILON) * rounding).round() / rounding
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_cycles_of_every_period() {
        let mut history = Vec::new();
        assert!(!has_cycle(&mut history, 1, 2));
        assert!(has_cycle(&mut history, 1, 2)); //period 1

        let mut history = Vec::new();
        assert!(!has_cycle(&mut history, 1, 2));
        assert!(!has_cycle(&mut history, 3, 4));
        assert!(!has_cycle(&mut history, 1, 2));
        assert!(has_cycle(&mut history, 3, 4)); //period 2
    }

    #[test]
    fn different_pairs_are_not_a_cycle() {
        let mut history = Vec::new();
        assert!(!has_cycle(&mut history, 1, 2));
        assert!(!has_cycle(&mut history, 3, 4));
        assert!(!has_cycle(&mut history, 5, 6));
        assert!(!has_cycle(&mut history, 1, 2));
    }

    #[test]
    fn rounding_snaps_to_the_precision_grid() {
        assert_eq!(round_to_precision(1.0000000001, 1e-8), 1.0);
        assert_eq!(round_to_precision(19199.999999996, 1e-8), 19200.0);
        assert_eq!(round_to_precision(1.23e-9, 1e-8), 0.0);
        assert_eq!(round_to_precision(2.5, 1e-8), 2.5);
    }
}
