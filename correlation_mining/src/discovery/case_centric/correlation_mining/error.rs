//! Errors of correlation mining

use crate::core::event_data::case_centric::event_table::EventTableError;

/// The event log cannot be interpreted with the configured attribute keys
///
/// Raised by preprocessing, before any matrix is computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidLogError {
    /// An event lacks the configured activity or timestamp attribute
    #[error("event {event} of trace {trace} has no '{key}' attribute")]
    MissingAttribute {
        /// Trace index in the log
        trace: usize,
        /// Event index in the trace
        event: usize,
        /// Attribute key that was looked up
        key: String,
    },
    /// The activity attribute is not a string
    #[error("event {event} of trace {trace}: activity attribute '{key}' is not a string (found {value})")]
    InvalidActivity {
        /// Trace index in the log
        trace: usize,
        /// Event index in the trace
        event: usize,
        /// Attribute key that was looked up
        key: String,
        /// Display representation of the offending value
        value: String,
    },
    /// The timestamp attribute cannot be converted to seconds
    #[error("event {event} of trace {trace}: cannot interpret '{value}' of attribute '{key}' as a timestamp")]
    UnparseableTimestamp {
        /// Trace index in the log
        trace: usize,
        /// Event index in the trace
        event: usize,
        /// Attribute key that was looked up
        key: String,
        /// Display representation of the offending value
        value: String,
    },
}

/// Invalid configuration, or configuration that does not fit the input data
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// A configured column is missing in tabular input
    #[error("missing column '{0}' in tabular event data")]
    MissingColumn(String),
    /// An option has a value that cannot be used
    #[error("invalid value '{value}' for option '{key}': {reason}")]
    InvalidOption {
        /// Option key
        key: String,
        /// Rejected value
        value: String,
        /// Why the value was rejected
        reason: String,
    },
    /// Tabular input is structurally broken (e.g., rows with a wrong number of cells)
    #[error("malformed tabular event data: {0}")]
    MalformedTable(String),
}

/// Error returned by the correlation mining entry points
#[derive(Debug, thiserror::Error)]
pub enum CorrelationMinerError {
    /// See [`InvalidLogError`]
    #[error(transparent)]
    InvalidLog(#[from] InvalidLogError),
    /// See [`ConfigurationError`]
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EventTableError> for CorrelationMinerError {
    fn from(e: EventTableError) -> Self {
        match e {
            EventTableError::MissingColumn(column) => {
                ConfigurationError::MissingColumn(column).into()
            }
            ragged @ EventTableError::RaggedRow { .. } => {
                ConfigurationError::MalformedTable(ragged.to_string()).into()
            }
            EventTableError::Csv(e) => Self::Csv(e),
            EventTableError::Io(e) => Self::Io(e),
        }
    }
}
