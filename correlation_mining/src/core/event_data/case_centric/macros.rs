//! Macros for concisely building event data (mostly useful for tests and examples)

/// Create an [`Attribute`].
///
/// An attribute is denoted by a `key => value` mapping.
///
/// # Examples
///
/// ```rust
/// use correlation_mining::{attribute, core::chrono::Utc};
///
/// let attr_1 = attribute!("concept:name" => "Approve");
/// let attr_2 = attribute!("time:timestamp" => Utc::now());
/// let attr_3 = attribute!("cost" => 2500.00);
/// ```
///
/// [`Attribute`]: crate::core::event_data::case_centric::Attribute
#[macro_export]
macro_rules! attribute {
    ($key:expr => $val:expr) => {
        $crate::core::event_data::case_centric::Attribute::new(
            $key.into(),
            $crate::core::event_data::case_centric::AttributeValue::from($val),
        )
    };
}

/// Create an [`Attributes`] instance.
///
/// Attributes are denoted by a comma-separated list of `key => value` mappings.
///
/// ```rust
/// use correlation_mining::attributes;
///
/// let attrs = attributes!("concept:name" => "Approve", "cost" => 2500.00);
/// assert_eq!(attrs.len(), 2);
/// ```
///
/// [`Attributes`]: crate::core::event_data::case_centric::Attributes
#[macro_export]
macro_rules! attributes {
    ($($key:expr => $value:expr),* $(,)?) => {
        vec![
            $(
                $crate::attribute!($key => $value)
            ),*
        ]
    };
}

/// Create an [`Event`] from an activity and a timestamp.
///
/// The timestamp is either numeric seconds (`f64`) or a `chrono` `DateTime`.
/// Further attributes can be given using a `{key => value, ...}` syntax,
/// separated from the timestamp by a semicolon.
///
/// ```rust
/// use correlation_mining::event;
///
/// let e1 = event!("register" => 0.0);
/// let e2 = event!("approve" => 3600.0; {"org:resource" => "Mike"});
/// assert_eq!(e2.attributes.len(), 3);
/// ```
///
/// [`Event`]: crate::core::event_data::case_centric::Event
#[macro_export]
macro_rules! event {
    ($activity:expr => $time:expr $(; { $($key:expr => $value:expr),* $(,)? })?) => {
        $crate::core::event_data::case_centric::Event {
            attributes: vec![
                $crate::attribute!(
                    $crate::core::event_data::case_centric::constants::ACTIVITY_NAME => $activity
                ),
                $crate::attribute!(
                    $crate::core::event_data::case_centric::constants::TIMESTAMP_NAME => $time
                ),
                $(
                    $(
                        $crate::attribute!($key => $value)
                    ),*
                )?
            ],
        }
    };
}

/// Create a [`Trace`].
///
/// A trace is a comma-separated sequence of events, using the syntax of the [`event`] macro.
/// Trace-level attributes can optionally be provided first, using a `{key => value, ...}`
/// syntax, separated from the events by a semicolon.
///
/// ```rust
/// use correlation_mining::trace;
///
/// let t1 = trace!("a" => 0.0, "b" => 1.0);
/// let t2 = trace!({"concept:name" => "case-7"}; "a" => 0.0, "b" => 1.0; {"cost" => 10.0});
/// assert_eq!(t2.events.len(), 2);
/// ```
///
/// [`Trace`]: crate::core::event_data::case_centric::Trace
/// [`event`]: crate::event
#[macro_export]
macro_rules! trace {
    (
        { $($key:expr => $value:expr),* $(,)? };
        $(
            $activity:expr => $time:expr $(; { $($keys:expr => $values:expr),* $(,)? })?
        ),* $(,)?
    ) => {
        $crate::core::event_data::case_centric::Trace {
            attributes: $crate::attributes!($($key => $value),*),
            events: vec![
                $(
                    $crate::event!($activity => $time $(; { $($keys => $values),* })?)
                ),*
            ],
        }
    };
    ($($content:tt)*) => {
        $crate::trace!({}; $($content)*)
    };
}

/// Create an [`EventLog`].
///
/// An event log is a sequence of traces, each denoted by square brackets containing
/// events in the syntax of the [`trace`] macro.
///
/// Traces are automatically provided trace ids (`concept:name`), if they aren't
/// manually provided. The trace ids correspond to the index in the event log.
///
/// ```rust
/// use correlation_mining::event_log;
///
/// let log = event_log!(
///     ["a" => 0.0, "b" => 1.0],
///     ["a" => 2.0, "b" => 3.0],
/// );
/// assert_eq!(log.traces.len(), 2);
/// ```
///
/// [`EventLog`]: crate::core::event_data::case_centric::EventLog
/// [`trace`]: crate::trace
#[macro_export]
macro_rules! event_log {
    ($([$($events:tt)*]),* $(,)?) => {{
        use $crate::core::event_data::case_centric::XESEditableAttribute;
        let mut log = $crate::core::event_data::case_centric::EventLog {
            attributes: Vec::new(),
            traces: vec![$($crate::trace!($($events)*)),*],
            global_trace_attrs: None,
            global_event_attrs: None,
        };
        log.traces.iter_mut().enumerate().for_each(|(idx, trace)| {
            if trace
                .attributes
                .get_by_key($crate::core::event_data::case_centric::constants::TRACE_ID_NAME)
                .is_none()
            {
                trace.attributes.add_attribute($crate::attribute!(
                    $crate::core::event_data::case_centric::constants::TRACE_ID_NAME => idx.to_string()
                ));
            }
        });
        log
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::event_data::case_centric::{
        constants::{ACTIVITY_NAME, TIMESTAMP_NAME, TRACE_ID_NAME},
        AttributeValue, XESEditableAttribute,
    };

    #[test]
    fn test_event_macro() {
        let e = event!("a" => 2.0; {"org:resource" => "John", "cost" => 10_i64});
        assert_eq!(
            e.attributes.get_by_key(ACTIVITY_NAME).map(|a| &a.value),
            Some(&AttributeValue::String("a".to_string()))
        );
        assert_eq!(
            e.attributes.get_by_key(TIMESTAMP_NAME).map(|a| &a.value),
            Some(&AttributeValue::Float(2.0))
        );
        assert_eq!(
            e.attributes.get_by_key("cost").map(|a| &a.value),
            Some(&AttributeValue::Int(10))
        );
    }

    #[test]
    fn test_trace_macro_with_attributes() {
        let t = trace!({"concept:name" => "c1"}; "a" => 0.0, "b" => 1.0; {"x" => true});
        assert_eq!(t.events.len(), 2);
        assert_eq!(
            t.attributes.get_by_key(TRACE_ID_NAME).map(|a| &a.value),
            Some(&AttributeValue::String("c1".to_string()))
        );
        assert!(t.events[1].attributes.get_by_key("x").is_some());
        assert!(t.events[0].attributes.get_by_key("x").is_none());
    }

    #[test]
    fn test_event_log_macro_assigns_ids() {
        let log = event_log!(["a" => 0.0], [], ["b" => 1.0, "c" => 2.0]);
        assert_eq!(log.traces.len(), 3);
        assert!(log.traces[1].events.is_empty());
        let ids: Vec<_> = log
            .traces
            .iter()
            .filter_map(|t| t.attributes.get_by_key(TRACE_ID_NAME))
            .filter_map(|a| a.value.try_as_string().cloned())
            .collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }
}
