//! Normalization of event data into time-ordered `(activity, seconds, index)` sequences

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::event_data::{
    case_centric::{AttributeValue, Event, EventLog},
    timestamp_utils::{parse_epoch_seconds, to_epoch_seconds},
};

use super::{error::InvalidLogError, parameters::CorrelationMinerParameters};

/// An event reduced to what correlation mining needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessedEvent {
    /// Activity label
    pub activity: String,
    /// Seconds since the unix epoch (or any other common origin)
    pub timestamp: f64,
    /// Position of the event in its original trace
    pub index: usize,
}

/// Events of one case, sorted by `(timestamp, index)`
pub type PreprocessedTrace = Vec<PreprocessedEvent>;

fn timestamp_seconds(value: &AttributeValue) -> Option<f64> {
    let seconds = match value {
        AttributeValue::Date(dt) => to_epoch_seconds(dt),
        AttributeValue::Int(i) => *i as f64,
        AttributeValue::Float(f) => *f,
        AttributeValue::String(s) => parse_epoch_seconds(s)?,
        AttributeValue::Boolean(_) | AttributeValue::None() => return None,
    };
    seconds.is_finite().then_some(seconds)
}

fn preprocess_event(
    log: &EventLog,
    event: &Event,
    trace_index: usize,
    event_index: usize,
    params: &CorrelationMinerParameters,
) -> Result<PreprocessedEvent, InvalidLogError> {
    let lookup = |key: &str| {
        log.get_event_attribute(event, key)
            .ok_or_else(|| InvalidLogError::MissingAttribute {
                trace: trace_index,
                event: event_index,
                key: key.to_string(),
            })
    };

    let activity_attr = lookup(&params.activity_key)?;
    let activity = activity_attr
        .value
        .try_as_string()
        .ok_or_else(|| InvalidLogError::InvalidActivity {
            trace: trace_index,
            event: event_index,
            key: params.activity_key.clone(),
            value: activity_attr.value.to_string(),
        })?
        .clone();

    let timestamp_attr = lookup(&params.timestamp_key)?;
    let timestamp = timestamp_seconds(&timestamp_attr.value).ok_or_else(|| {
        InvalidLogError::UnparseableTimestamp {
            trace: trace_index,
            event: event_index,
            key: params.timestamp_key.clone(),
            value: timestamp_attr.value.to_string(),
        }
    })?;

    Ok(PreprocessedEvent {
        activity,
        timestamp,
        index: event_index,
    })
}

///
/// Convert every trace of `log` into a [`PreprocessedTrace`]
///
/// Events are stably sorted by timestamp, so events with equal timestamps keep their
/// original relative order. Fails on the first event (in log order) whose activity or
/// timestamp attribute is missing or cannot be interpreted.
///
pub fn preprocess_log(
    log: &EventLog,
    params: &CorrelationMinerParameters,
) -> Result<Vec<PreprocessedTrace>, InvalidLogError> {
    let traces: Vec<Result<PreprocessedTrace, InvalidLogError>> = log
        .traces
        .par_iter()
        .enumerate()
        .map(|(trace_index, trace)| {
            let mut events = trace
                .events
                .iter()
                .enumerate()
                .map(|(event_index, event)| {
                    preprocess_event(log, event, trace_index, event_index, params)
                })
                .collect::<Result<PreprocessedTrace, _>>()?;
            events.sort_by(|a, b| {
                a.timestamp
                    .total_cmp(&b.timestamp)
                    .then(a.index.cmp(&b.index))
            });
            Ok(events)
        })
        .collect();
    // Sequential collect, so the reported error does not depend on thread scheduling
    traces.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::{
        core::event_data::case_centric::{Attribute, XESEditableAttribute},
        event_log,
    };

    fn activities(trace: &PreprocessedTrace) -> Vec<&str> {
        trace.iter().map(|e| e.activity.as_str()).collect()
    }

    #[test]
    fn events_are_sorted_by_time_then_index() {
        let log = event_log!(["c" => 5.0, "a" => 1.0, "b" => 1.0, "d" => 0.5]);
        let traces = preprocess_log(&log, &CorrelationMinerParameters::default()).unwrap();
        assert_eq!(traces.len(), 1);
        assert_eq!(activities(&traces[0]), vec!["d", "a", "b", "c"]);
        assert_eq!(
            traces[0].iter().map(|e| e.index).collect::<Vec<_>>(),
            vec![3, 1, 2, 0]
        );
    }

    #[test]
    fn timestamp_representations() {
        let dt = DateTime::parse_from_rfc3339("1970-01-01T00:00:10.5+00:00").unwrap();
        let log = event_log!([
            "a" => dt,
            "b" => 11_i64,
            "c" => "1970-01-01T00:00:12Z",
            "d" => "13"
        ]);
        let traces = preprocess_log(&log, &CorrelationMinerParameters::default()).unwrap();
        let times: Vec<f64> = traces[0].iter().map(|e| e.timestamp).collect();
        assert_eq!(times, vec![10.5, 11.0, 12.0, 13.0]);
    }

    #[test]
    fn custom_keys_and_global_defaults() {
        let mut log = event_log!(["a" => 0.0]);
        log.traces[0].events[0]
            .attributes
            .add_to_attributes("step".to_string(), "register".into());
        log.global_event_attrs = Some(vec![Attribute::new("at".to_string(), 42.0.into())]);
        let params = CorrelationMinerParameters {
            activity_key: "step".to_string(),
            timestamp_key: "at".to_string(),
            ..Default::default()
        };
        let traces = preprocess_log(&log, &params).unwrap();
        assert_eq!(traces[0][0].activity, "register");
        assert_eq!(traces[0][0].timestamp, 42.0);
    }

    #[test]
    fn missing_activity_attribute() {
        let mut log = event_log!(["a" => 0.0], ["a" => 0.0, "b" => 1.0]);
        log.traces[1].events[1].attributes.remove_with_key("concept:name");
        let err = preprocess_log(&log, &CorrelationMinerParameters::default()).unwrap_err();
        assert_eq!(
            err,
            InvalidLogError::MissingAttribute {
                trace: 1,
                event: 1,
                key: "concept:name".to_string()
            }
        );
    }

    #[test]
    fn unparseable_timestamp() {
        let log = event_log!(["a" => "tomorrow morning"]);
        let err = preprocess_log(&log, &CorrelationMinerParameters::default()).unwrap_err();
        assert!(matches!(
            err,
            InvalidLogError::UnparseableTimestamp { trace: 0, event: 0, ref value, .. } if value == "tomorrow morning"
        ));

        let log = event_log!(["a" => f64::NAN]);
        assert!(preprocess_log(&log, &CorrelationMinerParameters::default()).is_err());
    }

    #[test]
    fn non_string_activity() {
        let mut log = event_log!(["a" => 0.0]);
        log.traces[0].events[0]
            .attributes
            .get_by_key_mut("concept:name")
            .unwrap()
            .value = AttributeValue::Int(7);
        let err = preprocess_log(&log, &CorrelationMinerParameters::default()).unwrap_err();
        assert!(matches!(err, InvalidLogError::InvalidActivity { ref value, .. } if value == "7"));
    }

    #[test]
    fn empty_log() {
        let log = EventLog::new();
        assert!(preprocess_log(&log, &CorrelationMinerParameters::default())
            .unwrap()
            .is_empty());
    }
}
