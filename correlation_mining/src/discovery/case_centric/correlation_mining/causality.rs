//! Reconciliation of precedence, durations and activity frequencies into edge frequencies
//!
//! Every ordered pair `(a, b)` that co-occurs in some trace and whose precedence probability
//! exceeds the confidence threshold is a _candidate edge_. Each candidate gets a causality
//! coefficient
//!
//! ```text
//! C[a][b] = PS[a][b] / (1 + Duration[a][b] / mean_duration) + 1e-5 · (count(a) + count(b)) / (2 · max_count)
//! ```
//!
//! and the edge frequencies `x` solve
//!
//! ```text
//! maximize   Σ C[e] · x[e]
//! subject to Σ_{e leaving a}  x[e] <= count(a)   for every activity a
//!            Σ_{e entering a} x[e] <= count(a)   for every activity a
//!            x >= 0
//! ```
//!
//! The constraint matrix is the incidence matrix of a bipartite graph, so vertex optima
//! are integral. If the solver fails, frequencies are estimated from the precedence matrix
//! alone and the result is marked as approximate.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::{
    duration::DurationMatrix,
    grouping::ActivityAlphabet,
    precedence::PrecedenceMatrix,
    solver::{LinearConstraint, LinearProgram, LinearSolver, EPSILON},
};

/// Tie-breaking weight of the frequency term of the coefficient
///
/// Edges whose endpoints differ by one occurrence get coefficients `FREQUENCY_BIAS / (2 · max_count)`
/// apart. The simplex solver only sees differences above its tolerance ([`EPSILON`]), so the
/// preference for frequent activities holds up to `max_count = FREQUENCY_BIAS / (2 · EPSILON) = 5000`;
/// beyond that, equally strong edges are ordered by index.
const FREQUENCY_BIAS: f64 = 1e-5;
/// Tolerance when rounding solver output down to whole frequencies
const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Frequency part of the coefficient of an edge between activities with `count_sum` occurrences in total
fn frequency_term(count_sum: u64, max_count: f64) -> f64 {
    FREQUENCY_BIAS * count_sum as f64 / (2.0 * max_count)
}

/// Objective coefficients of all candidate edges (zero for other pairs)
#[derive(Debug, Clone, PartialEq)]
pub struct CausalityMatrix {
    coefficients: DMatrix<f64>,
}

impl CausalityMatrix {
    /// Compute coefficients for all pairs `(i, j)` that co-occur and have `PS[i][j] > confidence_threshold`
    pub fn new(
        alphabet: &ActivityAlphabet,
        precedence: &PrecedenceMatrix,
        durations: &DurationMatrix,
        confidence_threshold: f64,
    ) -> Self {
        let n = alphabet.len();
        let mean_duration = durations.mean_nonzero().unwrap_or(1.0);
        let max_count = alphabet.max_count().max(1) as f64;
        if FREQUENCY_BIAS / (2.0 * max_count) <= EPSILON {
            tracing::debug!(
                max_count,
                "occurrence counts too large to break ties between equally strong edges"
            );
        }
        let coefficients = DMatrix::from_fn(n, n, |i, j| {
            if i == j
                || !precedence.has_evidence(i, j)
                || precedence.get(i, j) <= confidence_threshold
            {
                return 0.0;
            }
            precedence.get(i, j) / (1.0 + durations.get(i, j) / mean_duration)
                + frequency_term(alphabet.count(i) + alphabet.count(j), max_count)
        });
        Self { coefficients }
    }

    /// Coefficient of `(i, j)`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.coefficients[(i, j)]
    }

    /// Candidate edges `(source, target)` in row-major order
    pub fn candidates(&self) -> Vec<(usize, usize)> {
        let n = self.coefficients.nrows();
        (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.coefficients[(i, j)] > 0.0)
            .collect()
    }

    ///
    /// Linear program over the [`CausalityMatrix::candidates`] (variable `e` is candidate `e`)
    ///
    /// Constraints `0..n` bound the outgoing flow, constraints `n..2n` the incoming flow
    /// of every activity by its occurrence count.
    ///
    pub fn to_program(&self, alphabet: &ActivityAlphabet) -> LinearProgram {
        let candidates = self.candidates();
        let n = alphabet.len();
        let mut constraints: Vec<LinearConstraint> = (0..2 * n)
            .map(|row| LinearConstraint {
                coefficients: Vec::new(),
                upper_bound: alphabet.count(row % n) as f64,
            })
            .collect();
        for (variable, &(i, j)) in candidates.iter().enumerate() {
            constraints[i].coefficients.push((variable, 1.0));
            constraints[n + j].coefficients.push((variable, 1.0));
        }
        constraints.retain(|c| !c.coefficients.is_empty());
        LinearProgram {
            objective: candidates.iter().map(|&(i, j)| self.get(i, j)).collect(),
            constraints,
        }
    }
}

/// An edge with its estimated number of occurrences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEdge {
    /// Index of the source activity
    pub source: usize,
    /// Index of the target activity
    pub target: usize,
    /// Estimated number of times `target` directly followed `source`
    pub frequency: u64,
}

/// Outcome of [`resolve_causality`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEdges {
    /// Edges with non-zero frequency, in row-major order
    pub edges: Vec<ResolvedEdge>,
    /// `true` if the solver failed and frequencies were estimated without flow conservation
    pub approximate: bool,
}

///
/// Determine edge frequencies with `solver` (see module docs)
///
/// Never fails: a [`SolverError`](super::solver::SolverError) is logged and answered with
/// `round(PS[i][j] · min(count(i), count(j)))` per candidate edge.
///
pub fn resolve_causality(
    alphabet: &ActivityAlphabet,
    precedence: &PrecedenceMatrix,
    durations: &DurationMatrix,
    confidence_threshold: f64,
    solver: &dyn LinearSolver,
) -> ResolvedEdges {
    let causality = CausalityMatrix::new(alphabet, precedence, durations, confidence_threshold);
    let candidates = causality.candidates();
    tracing::debug!(
        candidates = candidates.len(),
        solver = solver.name(),
        "resolving causality"
    );
    if candidates.is_empty() {
        return ResolvedEdges::default();
    }

    let program = causality.to_program(alphabet);
    let (frequencies, approximate): (Vec<u64>, bool) = match solver.maximize(&program) {
        Ok(solution) if solution.len() == candidates.len() => (
            solution
                .iter()
                .map(|x| (x + INTEGRALITY_TOLERANCE).floor().max(0.0) as u64)
                .collect(),
            false,
        ),
        outcome => {
            let reason = match outcome {
                Err(e) => e.to_string(),
                Ok(solution) => format!(
                    "solution has {} values for {} edges",
                    solution.len(),
                    candidates.len()
                ),
            };
            tracing::warn!(
                solver = solver.name(),
                %reason,
                "solver failed, estimating edge frequencies from precedence only"
            );
            (
                candidates
                    .iter()
                    .map(|&(i, j)| {
                        let bound = alphabet.count(i).min(alphabet.count(j)) as f64;
                        (precedence.get(i, j) * bound).round() as u64
                    })
                    .collect(),
                true,
            )
        }
    };

    let edges = candidates
        .into_iter()
        .zip(frequencies)
        .filter(|(_, frequency)| *frequency > 0)
        .map(|((source, target), frequency)| ResolvedEdge {
            source,
            target,
            frequency,
        })
        .collect();
    ResolvedEdges { edges, approximate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        discovery::case_centric::correlation_mining::{
            grouping::{group_traces, GroupedLog},
            parameters::CorrelationMinerParameters,
            preprocess::preprocess_log,
            solver::{GreedySolver, SimplexSolver, SolverError},
        },
        core::event_data::case_centric::{Event, Trace},
        event_log,
        EventLog,
    };

    struct Estimates {
        grouped: GroupedLog,
        precedence: PrecedenceMatrix,
        durations: DurationMatrix,
    }

    fn estimate(log: &EventLog) -> Estimates {
        let traces = preprocess_log(log, &CorrelationMinerParameters::default()).unwrap();
        let grouped = group_traces(ActivityAlphabet::from_traces(&traces), &traces);
        Estimates {
            precedence: PrecedenceMatrix::estimate(&grouped),
            durations: DurationMatrix::estimate(&grouped),
            grouped,
        }
    }

    fn resolve(est: &Estimates, solver: &dyn LinearSolver) -> ResolvedEdges {
        resolve_causality(
            &est.grouped.alphabet,
            &est.precedence,
            &est.durations,
            CorrelationMinerParameters::DEFAULT_CONFIDENCE_THRESHOLD,
            solver,
        )
    }

    /// Always fails, to exercise the fallback
    #[derive(Debug)]
    struct FailingSolver;

    impl LinearSolver for FailingSolver {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn maximize(&self, _program: &LinearProgram) -> Result<Vec<f64>, SolverError> {
            Err(SolverError::Unbounded)
        }
    }

    fn sequential_log() -> EventLog {
        event_log!(
            ["a" => 0.0, "b" => 1.0, "c" => 2.0],
            ["a" => 0.0, "b" => 1.0, "c" => 2.0],
            ["a" => 0.0, "b" => 1.0, "c" => 2.0]
        )
    }

    #[test]
    fn candidates_need_evidence_and_confidence() {
        let est = estimate(&event_log!(["a" => 0.0, "b" => 1.0], ["c" => 0.0]));
        let causality = CausalityMatrix::new(
            &est.grouped.alphabet,
            &est.precedence,
            &est.durations,
            0.5,
        );
        // b -> a has PS 0, a -> c and c -> a never co-occur
        assert_eq!(causality.candidates(), vec![(0, 1)]);
        assert!(causality.get(0, 1) > 0.5);
        assert_eq!(causality.get(2, 0), 0.0);
    }

    #[test]
    fn shorter_gaps_get_larger_coefficients() {
        let est = estimate(&sequential_log());
        let causality = CausalityMatrix::new(
            &est.grouped.alphabet,
            &est.precedence,
            &est.durations,
            0.5,
        );
        assert_eq!(causality.candidates(), vec![(0, 1), (0, 2), (1, 2)]);
        assert!(causality.get(0, 1) > causality.get(0, 2));
        assert!(causality.get(1, 2) > causality.get(0, 2));
    }

    #[test]
    fn program_has_flow_constraints() {
        let est = estimate(&sequential_log());
        let causality = CausalityMatrix::new(
            &est.grouped.alphabet,
            &est.precedence,
            &est.durations,
            0.5,
        );
        let program = causality.to_program(&est.grouped.alphabet);
        assert_eq!(program.num_variables(), 3);
        // out(a), out(b), in(b), in(c): c has no outgoing and a no incoming candidate
        assert_eq!(program.constraints.len(), 4);
        assert!(program.constraints.iter().all(|c| c.upper_bound == 3.0));
    }

    #[test]
    fn exact_resolution_prefers_direct_successors() {
        let est = estimate(&sequential_log());
        for solver in [
            &SimplexSolver::default() as &dyn LinearSolver,
            &GreedySolver as &dyn LinearSolver,
        ] {
            let resolved = resolve(&est, solver);
            assert!(!resolved.approximate);
            assert_eq!(
                resolved.edges,
                vec![
                    ResolvedEdge {
                        source: 0,
                        target: 1,
                        frequency: 3
                    },
                    ResolvedEdge {
                        source: 1,
                        target: 2,
                        frequency: 3
                    },
                ],
                "solver {}",
                solver.name()
            );
        }
    }

    #[test]
    fn failing_solver_falls_back_to_precedence() {
        let est = estimate(&sequential_log());
        let resolved = resolve(&est, &FailingSolver);
        assert!(resolved.approximate);
        // PS is 1 for every candidate, so every candidate gets min(count) = 3
        assert_eq!(resolved.edges.len(), 3);
        assert!(resolved.edges.iter().all(|e| e.frequency == 3));
    }

    #[test]
    fn frequency_steps_exceed_solver_tolerance() {
        let max_count = 4_000.0;
        assert!(frequency_term(4_000, max_count) - frequency_term(3_999, max_count) > EPSILON);
        assert!(frequency_term(2, 1.0) <= FREQUENCY_BIAS);
    }

    /// `a` and `b` compete for the incoming capacity of `x`, with identical precedence and
    /// durations; the more frequent `b` gets the larger share.
    #[test]
    fn frequent_sources_win_ties() {
        let mut log = EventLog::new();
        let mut push = |events: &[(&str, f64)]| {
            let mut trace = Trace::new();
            trace.events = events
                .iter()
                .map(|&(activity, time)| Event::new_at(activity.to_string(), time))
                .collect();
            log.traces.push(trace);
        };
        for _ in 0..599 {
            push(&[("a", 0.0), ("x", 1.0)]);
        }
        for _ in 0..600 {
            push(&[("b", 0.0), ("x", 1.0)]);
        }
        for _ in 0..300 {
            push(&[("a", 5.0)]);
            push(&[("b", 5.0)]);
        }
        let est = estimate(&log);
        let alphabet = &est.grouped.alphabet;
        assert_eq!(alphabet.counts(), &[899, 900, 1199]);

        let resolved = resolve(&est, &SimplexSolver::default());
        assert!(!resolved.approximate);
        assert_eq!(
            resolved.edges,
            vec![
                ResolvedEdge {
                    source: 0,
                    target: 2,
                    frequency: 299
                },
                ResolvedEdge {
                    source: 1,
                    target: 2,
                    frequency: 900
                },
            ]
        );
    }

    #[test]
    fn no_candidates() {
        let est = estimate(&event_log!(["a" => 0.0], ["b" => 1.0]));
        let resolved = resolve(&est, &FailingSolver);
        assert_eq!(resolved, ResolvedEdges::default());
    }
}
