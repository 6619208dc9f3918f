//! Well-known attribute keys

/// Common identifying field for event identities (i.e., activities)
///
/// _Note_: While the concept XES extension is the de-facto standard for identifying activity names,
/// some logs might not use `concept:name`. The key actually used is configurable
/// (see `CorrelationMinerParameters::activity_key`).
pub const ACTIVITY_NAME: &str = "concept:name";
/// Common field holding the time at which an event occurred
pub const TIMESTAMP_NAME: &str = "time:timestamp";
/// Common identifying field for trace identities (i.e., trace IDs)
///
/// See also [`ACTIVITY_NAME`]
pub const TRACE_ID_NAME: &str = "concept:name";
/// [`TRACE_ID_NAME`] with the `case:` prefix used when flattening traces into event rows
///
/// Used as the default case identifier column of tabular event data
pub const PREFIXED_TRACE_ID_NAME: &str = "case:concept:name";
