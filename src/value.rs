//! Dynamic configuration values and the mutable map they travel in.
//!
//! Construction and `perform` both take a [`Config`] — a string-keyed bag of
//! [`Value`]s. Validation writes declared defaults back into the map, so a
//! caller can read an applied default out of its own config afterward.

use std::collections::HashMap;

use serde::ser::{Serialize, Serializer};

use crate::audio::{AudioContext, SharedCache};
use crate::event::Event;

/// Runtime type tag a descriptor declares for its field.
///
/// `Number` and `Bool` are primitive tags; the rest are instance-check tags
/// for opaque handles and the event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Number,
    Bool,
    Context,
    Cache,
    Events,
}

impl ValueType {
    /// Display name used in validation messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Number => "number",
            ValueType::Bool => "boolean",
            ValueType::Context => "AudioContext",
            ValueType::Cache => "SharedCache",
            ValueType::Events => "EventList",
        }
    }

    /// Primitive tags are reported as type mismatches, instance-check tags
    /// as "not an instance of" failures.
    pub fn is_primitive(self) -> bool {
        matches!(self, ValueType::Number | ValueType::Bool)
    }
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// One configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Context(AudioContext),
    Cache(SharedCache),
    Events(Vec<Event>),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Number(_) => ValueType::Number,
            Value::Bool(_) => ValueType::Bool,
            Value::Context(_) => ValueType::Context,
            Value::Cache(_) => ValueType::Cache,
            Value::Events(_) => ValueType::Events,
        }
    }

    /// Display name of this value's runtime type.
    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_context(&self) -> Option<&AudioContext> {
        match self {
            Value::Context(ctx) => Some(ctx),
            _ => None,
        }
    }

    pub fn as_cache(&self) -> Option<&SharedCache> {
        match self {
            Value::Cache(cache) => Some(cache),
            _ => None,
        }
    }

    pub fn as_events(&self) -> Option<&[Event]> {
        match self {
            Value::Events(events) => Some(events),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Bool(b) => serializer.serialize_bool(*b),
            // Handles have no meaningful wire form; tooling dumps see the tag.
            Value::Context(_) => serializer.serialize_str("<AudioContext>"),
            Value::Cache(_) => serializer.serialize_str("<SharedCache>"),
            Value::Events(events) => events.serialize(serializer),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<AudioContext> for Value {
    fn from(ctx: AudioContext) -> Self {
        Value::Context(ctx)
    }
}

impl From<SharedCache> for Value {
    fn from(cache: SharedCache) -> Self {
        Value::Cache(cache)
    }
}

impl From<Vec<Event>> for Value {
    fn from(events: Vec<Event>) -> Self {
        Value::Events(events)
    }
}

/// The mutable bag of named values handed to construction and `perform`.
///
/// Unknown keys are allowed and ignored by validation; they are never frozen
/// onto an instrument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    values: HashMap<String, Value>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether the caller supplied an entry for `name`. An explicit entry is
    /// never overwritten by a default, even if its type is wrong.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn context(&self, name: &str) -> Option<&AudioContext> {
        self.get(name).and_then(Value::as_context)
    }

    pub fn cache(&self, name: &str) -> Option<&SharedCache> {
        self.get(name).and_then(Value::as_cache)
    }

    pub fn events(&self, name: &str) -> Option<&[Event]> {
        self.get(name).and_then(Value::as_events)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
