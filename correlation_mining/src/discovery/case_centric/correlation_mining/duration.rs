//! Average gap between matched occurrences of two activities

use nalgebra::DMatrix;
use rayon::prelude::*;

use super::grouping::GroupedLog;

/// Running arithmetic mean (the mean of no samples is 0)
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    samples: usize,
}

impl Mean {
    fn push(&mut self, gap: f64) {
        self.sum += gap;
        self.samples += 1;
    }

    fn value(self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.sum / self.samples as f64
        }
    }
}

/// FIFO matching: every occurrence of `i` (earliest first) claims the earliest unclaimed
/// occurrence of `j` that is strictly later
fn fifo_gaps(a_i: &[f64], a_j: &[f64], mean: &mut Mean) {
    let mut z = 0;
    for &t in a_i {
        while z < a_j.len() && a_j[z] <= t {
            z += 1;
        }
        if z < a_j.len() {
            mean.push(a_j[z] - t);
            z += 1;
        }
    }
}

/// LIFO matching: every occurrence of `i` (latest first) claims the latest unclaimed
/// occurrence of `j`, if that one is strictly later
fn lifo_gaps(a_i: &[f64], a_j: &[f64], mean: &mut Mean) {
    let mut z = a_j.len();
    for &t in a_i.iter().rev() {
        if z == 0 {
            break;
        }
        if t < a_j[z - 1] {
            mean.push(a_j[z - 1] - t);
            z -= 1;
        }
    }
}

///
/// Estimated time (in seconds) between an occurrence of `i` and the following occurrence of `j`
///
/// For each ordered pair, occurrences are matched both first-in-first-out and
/// last-in-first-out within each trace; the gaps of all traces are pooled, and
/// the smaller of the two means is kept. Pairs without any match (and the diagonal) are 0.
///
#[derive(Debug, Clone, PartialEq)]
pub struct DurationMatrix {
    durations: DMatrix<f64>,
}

impl DurationMatrix {
    /// Compute the duration matrix of a grouped log
    pub fn estimate(log: &GroupedLog) -> Self {
        let n = log.alphabet.len();
        let cells: Vec<(usize, usize, f64)> = (0..n * n)
            .into_par_iter()
            .map(|cell| (cell / n, cell % n))
            .filter(|(i, j)| i != j)
            .map(|(i, j)| {
                let mut fifo = Mean::default();
                let mut lifo = Mean::default();
                for (a_i, a_j) in log.co_occurring(i, j) {
                    fifo_gaps(a_i, a_j, &mut fifo);
                    lifo_gaps(a_i, a_j, &mut lifo);
                }
                (i, j, fifo.value().min(lifo.value()))
            })
            .collect();

        let mut durations = DMatrix::zeros(n, n);
        for (i, j, d) in cells {
            durations[(i, j)] = d;
        }
        Self { durations }
    }

    /// Number of activities
    pub fn size(&self) -> usize {
        self.durations.nrows()
    }

    /// `Duration[i][j]`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.durations[(i, j)]
    }

    /// Mean of all non-zero entries (`None` if there are none)
    pub fn mean_nonzero(&self) -> Option<f64> {
        let (sum, samples) = self
            .durations
            .iter()
            .filter(|d| **d != 0.0)
            .fold((0.0, 0usize), |(sum, samples), d| (sum + d, samples + 1));
        (samples > 0).then(|| sum / samples as f64)
    }

    /// The underlying matrix
    pub fn durations(&self) -> &DMatrix<f64> {
        &self.durations
    }
}
