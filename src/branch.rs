use ndarray::s;

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::mem;
use std::time::Instant;

use crate::options::Options;
use crate::simplex::{phase1, Outcome};
use crate::solver::{solution, Solution};
use crate::tableau::{Tableau, TableauModel};

/// One bound tightening on an integer variable: `variable ≤ bound` when
/// `sign` is +1, `variable ≥ bound` when `sign` is −1 (the row is stored as
/// `sign · variable ≤ sign · bound`).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cut {
    sign: f64,
    variable: usize,
    bound: f64,
}

//a pending node of the search tree: the parent relaxation bound and the
//full set of cuts that defines the node
#[derive(Debug, Clone)]
struct Branch {
    eval: f64,
    cuts: Vec<Cut>,
}

impl PartialEq for Branch {
    fn eq(&self, other: &Self) -> bool {
        self.eval.total_cmp(&other.eval).is_eq()
    }
}

impl Eq for Branch {}

impl PartialOrd for Branch {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Branch {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.eval.total_cmp(&other.eval)
    }
}

/// Materializes `root` plus one appended row per cut into the scratch
/// buffer, leaving `root` untouched.
///
/// A cut on a variable that is still non-basic appends a plain bound row.
/// A cut on a basic variable is expressed relative to that variable's
/// current row, so the appended row stays consistent with the basis.
fn apply_cuts(root: &Tableau, buf: &mut Tableau, cuts: &[Cut]) {
    buf.height = root.height + cuts.len();

    buf.matrix
        .slice_mut(s![..root.height, ..])
        .assign(&root.matrix);
    for (i, cut) in cuts.iter().enumerate() {
        let r = root.height + i;
        let pos = root.position_of_variable[cut.variable];
        if pos < root.width {
            buf.matrix[[r, 0]] = cut.sign * cut.bound;
            buf.matrix.slice_mut(s![r, 1..]).fill(0.0);
            buf.matrix[[r, pos]] = cut.sign;
        } else {
            //basic: subtract the variable's row so the new row is in terms
            //of the current non-basic variables
            let row = pos - root.width;
            buf.matrix[[r, 0]] = cut.sign * (cut.bound - buf.matrix[[row, 0]]);
            for c in 1..root.width {
                buf.matrix[[r, c]] = -cut.sign * buf.matrix[[row, c]];
            }
        }
    }

    let base = root.width + root.height;
    buf.position_of_variable[..base].copy_from_slice(&root.position_of_variable);
    buf.variable_at_position[..base].copy_from_slice(&root.variable_at_position);
    for i in base..base + cuts.len() {
        buf.position_of_variable[i] = i;
        buf.variable_at_position[i] = i;
    }
}

//returns (column, value, fractionality) of the integer variable whose basic
//value sits farthest from an integer; non-basic integer variables are 0
fn most_fractional(tbl: &Tableau, integers: &[usize]) -> (usize, f64, f64) {
    let mut highest_frac = 0.0;
    let mut variable = 0;
    let mut value = 0.0;
    for &int_var in integers {
        let pos = tbl.position_of_variable[int_var];
        if pos < tbl.width {
            continue;
        }
        let val = tbl.at(pos - tbl.width, 0);
        let frac = (val - val.round()).abs();
        if frac > highest_frac {
            highest_frac = frac;
            variable = int_var;
            value = val;
        }
    }
    (variable, value, highest_frac)
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Best-bound branch and cut over the integer variables. Requires the
/// already-solved optimal LP relaxation (`init_result`) as input.
pub(crate) fn branch_and_cut(
    tabmod: &TableauModel,
    init_result: f64,
    options: &Options,
) -> Solution {
    let (init_variable, init_value, init_frac) = most_fractional(&tabmod.tableau, &tabmod.integers);
    if init_frac <= options.precision {
        //the relaxation is already integral
        return solution(
            &tabmod.tableau,
            tabmod.variables,
            tabmod.sign,
            Outcome::Optimal(init_result),
            options.precision,
        );
    }

    let mut branches = BinaryHeap::new();
    branches.push(Reverse(Branch {
        eval: init_result,
        cuts: vec![Cut {
            sign: -1.0,
            variable: init_variable,
            bound: init_value.ceil(),
        }],
    }));
    branches.push(Reverse(Branch {
        eval: init_result,
        cuts: vec![Cut {
            sign: 1.0,
            variable: init_variable,
            bound: init_value.floor(),
        }],
    }));

    //two scratch tableaus sized for the worst case (one ≤ and one ≥ cut per
    //integer variable), allocated once and reused across all nodes: one
    //holds the current incumbent, the other the candidate being evaluated,
    //and they swap roles whenever a candidate becomes the incumbent
    let max_extra_rows = tabmod.integers.len() * 2;
    let max_height = tabmod.tableau.height + max_extra_rows;
    let mut best = Tableau::with_capacity(tabmod.tableau.width, max_height);
    let mut candidate = Tableau::with_capacity(tabmod.tableau.width, max_height);

    let optimal_threshold = init_result * (1.0 - tabmod.sign * options.tolerance);
    let start = Instant::now();
    let mut timedout = elapsed_ms(start) >= options.timeout;
    let mut solution_found = false;
    let mut best_eval = f64::INFINITY;
    let mut iter = 0;

    while iter < options.max_iterations && best_eval >= optimal_threshold && !timedout {
        let Some(Reverse(branch)) = branches.pop() else {
            break;
        };
        if branch.eval > best_eval {
            //everything still queued is bound by a worse relaxation
            break;
        }
        apply_cuts(&tabmod.tableau, &mut candidate, &branch.cuts);
        //the root is bounded and cuts only tighten it, so unbounded cannot
        //come back here; infeasible and cycled nodes are simply skipped
        if let Outcome::Optimal(result) = phase1(&mut candidate, options) {
            if result < best_eval {
                let (variable, value, frac) = most_fractional(&candidate, &tabmod.integers);
                if frac <= options.precision {
                    solution_found = true;
                    best_eval = result;
                    mem::swap(&mut best, &mut candidate);
                } else {
                    //children inherit the parent's cuts on other variables;
                    //cuts on the branching variable keep only their own side
                    let mut cuts_upper = Vec::with_capacity(branch.cuts.len() + 1);
                    let mut cuts_lower = Vec::with_capacity(branch.cuts.len() + 1);
                    for cut in &branch.cuts {
                        if cut.variable == variable {
                            if cut.sign < 0.0 {
                                cuts_lower.push(*cut);
                            } else {
                                cuts_upper.push(*cut);
                            }
                        } else {
                            cuts_upper.push(*cut);
                            cuts_lower.push(*cut);
                        }
                    }
                    cuts_lower.push(Cut {
                        sign: 1.0,
                        variable,
                        bound: value.floor(),
                    });
                    cuts_upper.push(Cut {
                        sign: -1.0,
                        variable,
                        bound: value.ceil(),
                    });
                    branches.push(Reverse(Branch {
                        eval: result,
                        cuts: cuts_upper,
                    }));
                    branches.push(Reverse(Branch {
                        eval: result,
                        cuts: cuts_lower,
                    }));
                }
            }
        }
        timedout = elapsed_ms(start) >= options.timeout;
        iter += 1;
    }

    //the search was cut short while better nodes may still have existed
    let unfinished = !branches.is_empty()
        && best_eval >= optimal_threshold
        && (timedout || iter == options.max_iterations);

    let (tableau, outcome) = if unfinished {
        let result = if solution_found { best_eval } else { f64::NAN };
        (&best, Outcome::TimedOut(result))
    } else if !solution_found {
        (&tabmod.tableau, Outcome::Infeasible)
    } else {
        (&best, Outcome::Optimal(best_eval))
    };
    solution(tableau, tabmod.variables, tabmod.sign, outcome, options.precision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branches_pop_in_best_bound_order() {
        let mut heap = BinaryHeap::new();
        for eval in [3.0, 1.0, 2.0] {
            heap.push(Reverse(Branch {
                eval,
                cuts: Vec::new(),
            }));
        }
        let order: Vec<f64> = std::iter::from_fn(|| heap.pop().map(|Reverse(b)| b.eval)).collect();
        assert_eq!(order, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn branch_equality_agrees_with_its_ordering() {
        let neg = Branch {
            eval: -0.0,
            cuts: Vec::new(),
        };
        let pos = Branch {
            eval: 0.0,
            cuts: Vec::new(),
        };
        assert_eq!(neg == pos, neg.cmp(&pos).is_eq());
        assert!(neg < pos);
    }

    #[test]
    fn most_fractional_skips_non_basic_variables() {
        let mut tbl = Tableau::new(3, 3);
        //variable 1 basic in row 1 with value 2.4, variable 2 non-basic
        tbl.position_of_variable.swap(1, 4);
        tbl.variable_at_position.swap(1, 4);
        tbl.set(1, 0, 2.4);

        let (variable, value, frac) = most_fractional(&tbl, &[1, 2]);
        assert_eq!(variable, 1);
        assert_eq!(value, 2.4);
        assert!((frac - 0.4).abs() < 1e-12);
    }

    #[test]
    fn cuts_on_non_basic_variables_append_plain_bound_rows() {
        let root = Tableau::new(3, 2);
        let mut buf = Tableau::with_capacity(3, 4);
        apply_cuts(
            &root,
            &mut buf,
            &[
                Cut {
                    sign: 1.0,
                    variable: 1,
                    bound: 4.0,
                },
                Cut {
                    sign: -1.0,
                    variable: 2,
                    bound: 2.0,
                },
            ],
        );

        assert_eq!(buf.height, 4);
        // x1 <= 4
        assert_eq!(buf.at(2, 0), 4.0);
        assert_eq!(buf.at(2, 1), 1.0);
        assert_eq!(buf.at(2, 2), 0.0);
        // x2 >= 2, stored negated
        assert_eq!(buf.at(3, 0), -2.0);
        assert_eq!(buf.at(3, 2), -1.0);
        //the cut rows' slack variables extend the position maps as identity
        assert_eq!(buf.position_of_variable[5], 5);
        assert_eq!(buf.variable_at_position[6], 6);
    }

    #[test]
    fn cuts_on_basic_variables_are_relative_to_their_row() {
        let mut root = Tableau::new(3, 2);
        root.set(1, 0, 2.5);
        root.set(1, 1, 1.0);
        root.set(1, 2, 0.5);
        root.pivot(1, 1); //variable 1 basic in row 1, value 2.5

        let mut buf = Tableau::with_capacity(3, 3);
        apply_cuts(
            &root,
            &mut buf,
            &[Cut {
                sign: 1.0,
                variable: 1,
                bound: 2.0,
            }],
        );

        // x1 = 2.5 - 0.5*x2, so x1 <= 2 becomes the negated basic row with
        // rhs 2 - 2.5
        assert_eq!(buf.at(2, 0), -0.5);
        assert_eq!(buf.at(2, 1), -1.0);
        assert_eq!(buf.at(2, 2), -0.5);
    }
}
