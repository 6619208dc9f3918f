//! Options of correlation mining

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::event_data::case_centric::constants::{
    ACTIVITY_NAME, PREFIXED_TRACE_ID_NAME, TIMESTAMP_NAME,
};

use super::{
    error::ConfigurationError,
    solver::{GreedySolver, LinearSolver, SimplexSolver},
};

/// Option key of [`CorrelationMinerParameters::activity_key`]
pub const ACTIVITY_KEY_OPTION: &str = "activity-key";
/// Option key of [`CorrelationMinerParameters::timestamp_key`]
pub const TIMESTAMP_KEY_OPTION: &str = "timestamp-key";
/// Option key of [`CorrelationMinerParameters::case_id_key`]
pub const CASE_ID_KEY_OPTION: &str = "case-id-key";
/// Option key of [`CorrelationMinerParameters::confidence_threshold`]
pub const CONFIDENCE_THRESHOLD_OPTION: &str = "confidence-threshold";
/// Option key of [`CorrelationMinerParameters::solver`]
pub const SOLVER_OPTION: &str = "solver";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Which [`LinearSolver`] resolves the causality program
pub enum SolverChoice {
    /// Exact optimum ([`SimplexSolver`])
    #[default]
    Simplex,
    /// Fast feasible assignment ([`GreedySolver`])
    Greedy,
}

impl SolverChoice {
    /// Instantiate the chosen solver
    pub fn build(self) -> Box<dyn LinearSolver> {
        match self {
            SolverChoice::Simplex => Box::new(SimplexSolver::default()),
            SolverChoice::Greedy => Box::new(GreedySolver),
        }
    }
}

impl FromStr for SolverChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simplex" => Ok(Self::Simplex),
            "greedy" => Ok(Self::Greedy),
            other => Err(format!("unknown solver '{other}' (expected 'simplex' or 'greedy')")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
/// Parameters for correlation mining
///
/// Deserialization ignores unknown keys and falls back to the defaults for missing ones:
///
/// ```rust
/// use correlation_mining::CorrelationMinerParameters;
///
/// let params = CorrelationMinerParameters::from_json(r#"{"activity-key": "Activity", "color": "red"}"#).unwrap();
/// assert_eq!(params.activity_key, "Activity");
/// assert_eq!(params.timestamp_key, "time:timestamp");
/// ```
pub struct CorrelationMinerParameters {
    /// Event attribute (or table column) holding the activity label
    pub activity_key: String,
    /// Event attribute (or table column) holding the event time
    pub timestamp_key: String,
    /// Table column holding the case identifier (only used for tabular input)
    pub case_id_key: String,
    /// An edge `a -> b` is only proposed if the precedence probability of `a` before `b` exceeds this value
    pub confidence_threshold: f64,
    /// Solver for the causality program
    pub solver: SolverChoice,
}

impl Default for CorrelationMinerParameters {
    fn default() -> Self {
        Self {
            activity_key: ACTIVITY_NAME.to_string(),
            timestamp_key: TIMESTAMP_NAME.to_string(),
            case_id_key: PREFIXED_TRACE_ID_NAME.to_string(),
            confidence_threshold: Self::DEFAULT_CONFIDENCE_THRESHOLD,
            solver: SolverChoice::default(),
        }
    }
}

impl CorrelationMinerParameters {
    /// Default for [`CorrelationMinerParameters::confidence_threshold`]
    pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

    ///
    /// Build parameters from `(key, value)` string options
    ///
    /// Recognized keys: `activity-key`, `timestamp-key`, `case-id-key`,
    /// `confidence-threshold` and `solver`. Other keys are ignored.
    ///
    pub fn from_options<I, K, V>(options: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();
        for (key, value) in options {
            let (key, value) = (key.as_ref(), value.as_ref());
            let invalid = |reason: String| ConfigurationError::InvalidOption {
                key: key.to_string(),
                value: value.to_string(),
                reason,
            };
            match key {
                ACTIVITY_KEY_OPTION => params.activity_key = non_empty(value).map_err(invalid)?,
                TIMESTAMP_KEY_OPTION => params.timestamp_key = non_empty(value).map_err(invalid)?,
                CASE_ID_KEY_OPTION => params.case_id_key = non_empty(value).map_err(invalid)?,
                CONFIDENCE_THRESHOLD_OPTION => {
                    params.confidence_threshold = value
                        .trim()
                        .parse::<f64>()
                        .map_err(|e| invalid(e.to_string()))?;
                }
                SOLVER_OPTION => params.solver = value.parse().map_err(invalid)?,
                _ => tracing::debug!(key, "ignoring unrecognized option"),
            }
        }
        params.validate()?;
        Ok(params)
    }

    /// Deserialize parameters from a JSON object (see type-level docs)
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| ConfigurationError::InvalidOption {
                key: "<json>".to_string(),
                value: json.to_string(),
                reason: e.to_string(),
            })?;
        params.validate()?;
        Ok(params)
    }

    /// Serialize parameters to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Check value ranges (the confidence threshold must lie in `[0, 1)`)
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(0.0..1.0).contains(&self.confidence_threshold) {
            return Err(ConfigurationError::InvalidOption {
                key: CONFIDENCE_THRESHOLD_OPTION.to_string(),
                value: self.confidence_threshold.to_string(),
                reason: "must be at least 0 and below 1".to_string(),
            });
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}
