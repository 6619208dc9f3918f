//! Correlation Mining
//!
//! Discovers a frequency and a performance directly-follows graph from aggregate timing
//! statistics instead of replaying event sequences:
//!
//! 1. [`preprocess`]: activity label and timestamp (in seconds) per event, traces sorted by time
//! 2. [`grouping`]: activity alphabet and per-trace occurrence lists
//! 3. [`precedence`] and [`duration`]: precedence/succession matrix and duration matrix
//! 4. [`causality`]: edge frequencies from a linear program (see [`solver`])
//! 5. [`assembly`]: the resulting [`DirectlyFollowsGraph`]s
//!
//! ```rust
//! use correlation_mining::{discover_correlation_dfg, event_log, CorrelationMinerParameters};
//!
//! let log = event_log!(
//!     ["register" => 0.0, "approve" => 60.0],
//!     ["register" => 30.0, "approve" => 150.0],
//! );
//! let result = discover_correlation_dfg(&log, &CorrelationMinerParameters::default()).unwrap();
//! assert_eq!(result.frequency_dfg.get_df_weight(("register", "approve")), Some(2));
//! assert_eq!(result.performance_dfg.get_df_weight(("register", "approve")), Some(90.0));
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{
    event_data::case_centric::{event_table::EventTable, EventLog},
    process_models::case_centric::dfg::DirectlyFollowsGraph,
};

use self::{
    assembly::assemble_graphs,
    causality::resolve_causality,
    duration::DurationMatrix,
    grouping::{group_traces, ActivityAlphabet},
    precedence::PrecedenceMatrix,
    preprocess::preprocess_log,
    solver::LinearSolver,
};

pub mod assembly;
pub mod causality;
pub mod duration;
pub mod error;
pub mod grouping;
pub mod parameters;
pub mod precedence;
pub mod preprocess;
pub mod solver;

#[doc(inline)]
pub use error::{ConfigurationError, CorrelationMinerError, InvalidLogError};
#[doc(inline)]
pub use parameters::{CorrelationMinerParameters, SolverChoice};

/// Output of correlation mining
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMinerResult {
    /// Edge weight: estimated number of times the target directly followed the source
    pub frequency_dfg: DirectlyFollowsGraph<'static, u64>,
    /// Edge weight: estimated average time (seconds) between source and target
    pub performance_dfg: DirectlyFollowsGraph<'static, f64>,
    /// `true` if the solver failed and edge frequencies are only estimated from precedence
    /// (flow conservation may be violated)
    pub approximate: bool,
}

impl CorrelationMinerResult {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

///
/// Discover a frequency and a performance DFG from an [`EventLog`]
///
/// Uses the solver selected in `params` (see [`discover_correlation_dfg_with_solver`]).
///
pub fn discover_correlation_dfg(
    log: &EventLog,
    params: &CorrelationMinerParameters,
) -> Result<CorrelationMinerResult, CorrelationMinerError> {
    let solver = params.solver.build();
    discover_correlation_dfg_with_solver(log, params, &*solver)
}

///
/// Discover a frequency and a performance DFG from an [`EventLog`], with a custom [`LinearSolver`]
///
/// An empty log (or a log without events) yields empty graphs.
/// Fails if an event lacks a usable activity or timestamp, or if `params` are out of range.
///
pub fn discover_correlation_dfg_with_solver(
    log: &EventLog,
    params: &CorrelationMinerParameters,
    solver: &dyn LinearSolver,
) -> Result<CorrelationMinerResult, CorrelationMinerError> {
    params.validate()?;
    let traces = preprocess_log(log, params)?;
    let alphabet = ActivityAlphabet::from_traces(&traces);
    tracing::debug!(
        traces = traces.len(),
        activities = alphabet.len(),
        "preprocessed event log"
    );
    if alphabet.is_empty() {
        return Ok(CorrelationMinerResult::default());
    }

    let grouped = group_traces(alphabet, &traces);
    let (precedence, durations) = rayon::join(
        || PrecedenceMatrix::estimate(&grouped),
        || DurationMatrix::estimate(&grouped),
    );
    tracing::debug!(size = precedence.size(), "estimated precedence and durations");

    let resolved = resolve_causality(
        &grouped.alphabet,
        &precedence,
        &durations,
        params.confidence_threshold,
        solver,
    );
    let (frequency_dfg, performance_dfg) =
        assemble_graphs(&grouped.alphabet, &resolved, &durations);
    tracing::info!(
        activities = frequency_dfg.activities.len(),
        edges = frequency_dfg.directly_follows_relations.len(),
        approximate = resolved.approximate,
        "discovered correlation DFG"
    );
    Ok(CorrelationMinerResult {
        frequency_dfg,
        performance_dfg,
        approximate: resolved.approximate,
    })
}

///
/// Discover a frequency and a performance DFG from an [`EventTable`]
///
/// Rows are grouped into cases by the `case-id-key` column; activity and timestamp are read
/// from the `activity-key` and `timestamp-key` columns.
///
pub fn discover_correlation_dfg_from_table(
    table: &EventTable,
    params: &CorrelationMinerParameters,
) -> Result<CorrelationMinerResult, CorrelationMinerError> {
    let log = table.to_event_log(
        &params.activity_key,
        &params.timestamp_key,
        &params.case_id_key,
    )?;
    discover_correlation_dfg(&log, params)
}
