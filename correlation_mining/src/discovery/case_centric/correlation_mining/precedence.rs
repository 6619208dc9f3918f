//! Precedence/succession (PS) matrix

use itertools::Itertools;
use nalgebra::DMatrix;
use rayon::prelude::*;

use super::grouping::GroupedLog;

///
/// Pairwise precedence probabilities between activities
///
/// `PS[i][j]` is the fraction of co-occurring `(i, j)` occurrence pairs (over all traces)
/// in which the occurrence of `i` is _strictly_ earlier than the one of `j`.
/// Complementarity holds: `PS[i][j] + PS[j][i] = 1` for `i != j`, so pairs with equal
/// timestamps count towards the pair with the larger index.
///
/// Pairs that never co-occur get `PS[i][j] = 0` and `PS[j][i] = 1` for `i < j`; use
/// [`PrecedenceMatrix::has_evidence`] to tell them apart from measured values.
///
#[derive(Debug, Clone, PartialEq)]
pub struct PrecedenceMatrix {
    probabilities: DMatrix<f64>,
    co_occurrences: DMatrix<u64>,
}

/// Number of pairs `(x, y)` with `x` in `a_i`, `y` in `a_j` and `x < y`
///
/// Both slices must be sorted ascending. Single pass, the pointer into `a_j` never moves back.
fn count_strictly_before(a_i: &[f64], a_j: &[f64]) -> u64 {
    let mut z = 0;
    let mut count = 0;
    for &t in a_i {
        while z < a_j.len() && a_j[z] <= t {
            z += 1;
        }
        count += (a_j.len() - z) as u64;
    }
    count
}

impl PrecedenceMatrix {
    /// Compute the PS matrix of a grouped log
    pub fn estimate(log: &GroupedLog) -> Self {
        let n = log.alphabet.len();
        let cells: Vec<(usize, usize, u64, u64)> = (0..n)
            .tuple_combinations()
            .collect::<Vec<(usize, usize)>>()
            .into_par_iter()
            .map(|(i, j)| {
                let (count, total) =
                    log.co_occurring(i, j)
                        .fold((0, 0), |(count, total), (a_i, a_j)| {
                            (
                                count + count_strictly_before(a_i, a_j),
                                total + (a_i.len() * a_j.len()) as u64,
                            )
                        });
                (i, j, count, total)
            })
            .collect();

        let mut probabilities = DMatrix::zeros(n, n);
        let mut co_occurrences = DMatrix::zeros(n, n);
        for (i, j, count, total) in cells {
            let p = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            };
            probabilities[(i, j)] = p;
            probabilities[(j, i)] = 1.0 - p;
            co_occurrences[(i, j)] = total;
            co_occurrences[(j, i)] = total;
        }
        Self {
            probabilities,
            co_occurrences,
        }
    }

    /// Number of activities
    pub fn size(&self) -> usize {
        self.probabilities.nrows()
    }

    /// `PS[i][j]`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.probabilities[(i, j)]
    }

    /// Number of occurrence pairs of `i` and `j` the estimate is based on (symmetric)
    pub fn co_occurrence_total(&self, i: usize, j: usize) -> u64 {
        self.co_occurrences[(i, j)]
    }

    /// Returns `true` if `i` and `j` occur together in at least one trace
    pub fn has_evidence(&self, i: usize, j: usize) -> bool {
        self.co_occurrence_total(i, j) > 0
    }

    /// The underlying matrix
    pub fn probabilities(&self) -> &DMatrix<f64> {
        &self.probabilities
    }
}
