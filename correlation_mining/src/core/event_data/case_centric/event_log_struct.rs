use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::constants::{ACTIVITY_NAME, TIMESTAMP_NAME};

///
/// Possible attribute values of an event record
///
/// Tip: If you know the expected `AttributeValue` type, make use of the `try_as_xxx` functions (e.g., [`AttributeValue::try_as_string`])
///
/// ```rust
/// use correlation_mining::core::event_data::case_centric::AttributeValue;
/// let v = AttributeValue::Float(42.0);
///
/// let f = v.try_as_float().unwrap();
/// assert_eq!(*f,42.0);
/// ````
///
/// For None attribute vaues, the [`Display`] implementation returns the String `"None"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "content")]
pub enum AttributeValue {
    /// String values
    String(String),
    /// `DateTime` values
    Date(DateTime<FixedOffset>),
    /// Integer values
    Int(i64),
    /// Float values
    Float(f64),
    /// Boolean values
    Boolean(bool),
    /// Used to represent invalid values (e.g., `DateTime` which could not be parsed)
    None(),
}

impl Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{s}"),
            AttributeValue::Date(date_time) => write!(f, "{date_time}"),
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Boolean(b) => write!(f, "{b}"),
            AttributeValue::None() => write!(f, "None"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T> From<DateTime<T>> for AttributeValue
where
    T: chrono::TimeZone,
{
    fn from(value: DateTime<T>) -> Self {
        Self::Date(value.fixed_offset())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl AttributeValue {
    ///
    /// Try to get attribute value as String
    ///
    /// Returns `Some()` of inner value if value is of variant [`AttributeValue::String`] and `None` otherwise
    ///
    pub fn try_as_string(&self) -> Option<&String> {
        match self {
            AttributeValue::String(v) => Some(v),
            _ => None,
        }
    }
    ///
    /// Try to get attribute value as float
    ///
    /// Returns `Some()` of inner value if value is of variant [`AttributeValue::Float`] and `None` otherwise
    ///
    pub fn try_as_float(&self) -> Option<&f64> {
        match self {
            AttributeValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
///
/// Attribute made up of the key and value
///
pub struct Attribute {
    /// Attribute key
    pub key: String,
    /// Attribute value
    pub value: AttributeValue,
}

impl Attribute {
    ///
    /// Helper to create a new attribute
    ///
    pub fn new(key: String, attribute_val: AttributeValue) -> Self {
        Self {
            key,
            value: attribute_val,
        }
    }
}

///
/// Attributes are [`Vec`]s of [`Attribute`]s
///
/// See the [`XESEditableAttribute`] trait for convenient functions to add, edit or remove attribute by keys.
///
/// ```rust
/// use correlation_mining::core::event_data::case_centric::{Attribute, AttributeValue, XESEditableAttribute};
/// let attrs = vec![Attribute::new("key".to_string(), AttributeValue::Float(42.0))];
///
/// let f = attrs.get_by_key("key").and_then(|a| a.value.try_as_float()).unwrap();
/// assert_eq!(*f,42.0);
/// ````
pub type Attributes = Vec<Attribute>;

///
/// Trait to easily add and update attributes
///
pub trait XESEditableAttribute {
    ///
    /// Add a new attribute (with key and value)
    ///
    /// Note: Does _not_ check if attribute was already present and does _not_ sort attributes wrt. key.
    ///
    fn add_to_attributes(&mut self, key: String, value: AttributeValue);
    ///
    /// Add a new attribute
    ///
    fn add_attribute(&mut self, attr: Attribute);
    ///
    /// Get an attribute by key
    ///
    /// _Complexity_: Does linear lookup (i.e., in O(n)).
    fn get_by_key(&self, key: &str) -> Option<&Attribute>;
    ///
    /// Get an attribute as mutable by key
    ///
    /// _Complexity_: Does linear lookup (i.e., in O(n)).
    fn get_by_key_mut(&mut self, key: &str) -> Option<&mut Attribute>;
    ///
    /// Get an attribute by key or the default value (e.g., provided by global event or trace attributes)
    ///
    /// _Complexity_: Does linear lookup (i.e., in O(n)).
    fn get_by_key_or_global<'a>(
        &'a self,
        key: &str,
        global_attrs: &'a Option<Attributes>,
    ) -> Option<&'a Attribute>;
    ///
    /// Remove attribute with given key
    ///
    /// Returns `true` if the attribute was present and `false` otherwise
    ///
    fn remove_with_key(&mut self, key: &str) -> bool;
}

impl XESEditableAttribute for Attributes {
    fn add_to_attributes(&mut self, key: String, value: AttributeValue) {
        self.push(Attribute::new(key, value));
    }

    fn add_attribute(&mut self, a: Attribute) {
        self.push(a);
    }

    fn get_by_key(&self, key: &str) -> Option<&Attribute> {
        self.iter().find(|attr| attr.key == key)
    }

    fn get_by_key_mut(&mut self, key: &str) -> Option<&mut Attribute> {
        self.iter_mut().find(|attr| attr.key == key)
    }

    fn get_by_key_or_global<'a>(
        &'a self,
        key: &str,
        global_attrs: &'a Option<Attributes>,
    ) -> Option<&'a Attribute> {
        self.get_by_key(key).or_else(|| {
            global_attrs
                .as_ref()
                .and_then(|global_attrs| global_attrs.get_by_key(key))
        })
    }

    fn remove_with_key(&mut self, key: &str) -> bool {
        match self.iter().position(|a| a.key == key) {
            Some(index) => {
                self.remove(index);
                true
            }
            None => false,
        }
    }
}

///
/// An event consists of multiple (event) attributes ([Attributes])
///
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Event attributes
    pub attributes: Attributes,
}

impl Event {
    /// Create a new event with the provided activity
    ///
    /// Uses [`ACTIVITY_NAME`] as key
    pub fn new(activity: String) -> Self {
        Event {
            attributes: vec![Attribute::new(
                ACTIVITY_NAME.to_string(),
                AttributeValue::String(activity),
            )],
        }
    }

    /// Create a new event with the provided activity and a numeric timestamp (in seconds)
    ///
    /// Uses [`ACTIVITY_NAME`] and [`TIMESTAMP_NAME`] as keys
    pub fn new_at(activity: String, seconds: f64) -> Self {
        let mut event = Self::new(activity);
        event
            .attributes
            .add_to_attributes(TIMESTAMP_NAME.to_string(), AttributeValue::Float(seconds));
        event
    }
}

///
/// A trace consists of a list of events and trace attributes (See also [`Event`] and [`Attributes`])
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Trace {
    /// Trace-level attributes
    pub attributes: Attributes,
    /// Events contained in trace
    pub events: Vec<Event>,
}

impl Trace {
    /// Initializes a new trace with no attributes and events
    pub fn new() -> Self {
        Self::default()
    }
}

///
/// Event log consisting of a list of [`Trace`]s and log [`Attributes`]
///
/// The log is treated as an immutable snapshot by all discovery functions.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EventLog {
    /// Top-level attributes
    pub attributes: Attributes,
    /// Traces contained in log
    pub traces: Vec<Trace>,
    /// Global trace attributes
    pub global_trace_attrs: Option<Attributes>,
    ///  Global event attributes
    pub global_event_attrs: Option<Attributes>,
}

impl EventLog {
    /// Initializes a new event log with no attributes, an empty trace list, no global trace
    /// attributes, and no global event attributes.
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Get an event attribute value using a key
    ///
    /// Uses global event attributes of the event log (if any) as fallback
    ///
    pub fn get_event_attribute<'a>(&'a self, event: &'a Event, key: &str) -> Option<&'a Attribute> {
        event
            .attributes
            .get_by_key_or_global(key, &self.global_event_attrs)
    }
}
