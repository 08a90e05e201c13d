use ndarray::Array2;

use rustc_hash::FxHashMap;

/// Dense simplex tableau.
///
/// Row 0 is the objective row and column 0 the right-hand side. Structural
/// variables occupy columns `1..width`; every row owns one additional slack
/// variable, so `width + height` variable slots exist in total. The two
/// position vectors form a bijection between variables and their current
/// place: a position below `width` is a non-basic column, a position of
/// `width + r` means "basic in row `r`".
///
/// `matrix` may hold more rows than `height`; branch-and-cut scratch buffers
/// are allocated once at their maximum size and resized logically through
/// `height`.
#[derive(Debug, Clone)]
pub(crate) struct Tableau {
    pub(crate) matrix: Array2<f64>,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) position_of_variable: Vec<usize>,
    pub(crate) variable_at_position: Vec<usize>,
}

/// A tableau bundled with everything needed to read a solution back out of
/// it: the objective sign, the model's variable list and the columns of the
/// integer variables (binary columns included).
pub(crate) struct TableauModel<'a> {
    pub(crate) tableau: Tableau,
    pub(crate) sign: f64,
    pub(crate) variables: &'a [(String, FxHashMap<String, f64>)],
    pub(crate) integers: Vec<usize>,
}

impl Tableau {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        let num_vars = width + height;
        Self {
            matrix: Array2::zeros((height, width)),
            width,
            height,
            position_of_variable: (0..num_vars).collect(),
            variable_at_position: (0..num_vars).collect(),
        }
    }

    //scratch buffer for branch and cut; height is set by apply_cuts
    pub(crate) fn with_capacity(width: usize, max_height: usize) -> Self {
        let num_vars = width + max_height;
        Self {
            matrix: Array2::zeros((max_height, width)),
            width,
            height: 0,
            position_of_variable: vec![0; num_vars],
            variable_at_position: vec![0; num_vars],
        }
    }

    #[inline(always)]
    pub(crate) fn at(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.height && col < self.width);
        self.matrix[[row, col]]
    }

    #[inline(always)]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.height && col < self.width);
        self.matrix[[row, col]] = value;
    }

    /// In-place Gauss-Jordan pivot making `col` basic in `row`.
    ///
    /// The floating-point choices here are deliberate and load-bearing:
    /// entries of the scaled pivot row below 1e-16 in magnitude are snapped
    /// to exactly 0, the surviving column indices are recorded so other rows
    /// are only touched where the pivot row is nonzero, and the pivot column
    /// entries are written directly as `1/quotient` and `-coef/quotient`
    /// (the dictionary representation of the leaving variable).
    #[inline(always)]
    pub(crate) fn pivot(&mut self, row: usize, col: usize) {
        debug_assert!(0 < row && row < self.height);
        debug_assert!(0 < col && col < self.width);

        let quotient = self.at(row, col);
        let leaving = self.variable_at_position[self.width + row];
        let entering = self.variable_at_position[col];
        self.variable_at_position[self.width + row] = entering;
        self.variable_at_position[col] = leaving;
        self.position_of_variable[leaving] = col;
        self.position_of_variable[entering] = self.width + row;

        // (1 / quotient) * R_pivot -> R_pivot
        let mut nonzero_columns = Vec::with_capacity(self.width);
        for c in 0..self.width {
            let value = self.at(row, c);
            if value.abs() > 1e-16 {
                self.set(row, c, value / quotient);
                nonzero_columns.push(c);
            } else {
                self.set(row, c, 0.0);
            }
        }
        self.set(row, col, 1.0 / quotient);

        // -M[r, col] * R_pivot + R_r -> R_r
        for r in 0..self.height {
            if r == row {
                continue;
            }
            let coef = self.at(r, col);
            if coef.abs() > 1e-16 {
                for &c in &nonzero_columns {
                    self.set(r, c, self.at(r, c) - coef * self.at(row, c));
                }
                self.set(r, col, -coef / quotient);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pivot_updates_rows_and_position_maps() {
        // objective row [0, 3, 2], constraint row [6, 2, 1]
        let mut tbl = Tableau::new(3, 2);
        tbl.set(0, 1, 3.0);
        tbl.set(0, 2, 2.0);
        tbl.set(1, 0, 6.0);
        tbl.set(1, 1, 2.0);
        tbl.set(1, 2, 1.0);

        tbl.pivot(1, 1);

        // pivot row scaled by 1/2, pivot entry replaced by 1/quotient
        assert_eq!(tbl.at(1, 0), 3.0);
        assert_eq!(tbl.at(1, 1), 0.5);
        assert_eq!(tbl.at(1, 2), 0.5);

        // objective row eliminated over the recorded columns
        assert_eq!(tbl.at(0, 0), -9.0);
        assert_eq!(tbl.at(0, 1), -1.5);
        assert_eq!(tbl.at(0, 2), 0.5);

        // variable 1 became basic in row 1, variable 4 (the slack) left
        assert_eq!(tbl.position_of_variable[1], 3 + 1);
        assert_eq!(tbl.position_of_variable[4], 1);
        assert_eq!(tbl.variable_at_position[1], 4);
        assert_eq!(tbl.variable_at_position[3 + 1], 1);
    }

    #[test]
    fn pivot_snaps_tiny_entries_to_zero() {
        let mut tbl = Tableau::new(3, 2);
        tbl.set(1, 0, 1e-18);
        tbl.set(1, 1, 4.0);
        tbl.set(1, 2, 1e-17);

        tbl.pivot(1, 1);

        assert_eq!(tbl.at(1, 0), 0.0);
        assert_eq!(tbl.at(1, 2), 0.0);
        assert_eq!(tbl.at(1, 1), 0.25);
    }
}
