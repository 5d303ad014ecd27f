//! Declarative field schemas.
//!
//! A [`Descriptor`] is passive metadata for one configurable field: runtime
//! type, numeric bounds, step, and an optional default. Descriptors are
//! grouped into three [`Group`]s (constructor config, perform config, event
//! records) and layered across three [`Tier`]s (base, family, specific) —
//! nine lists per instrument kind, resolved by the [`SchemaSet`] registry.
//!
//! Descriptors serialize, so tooling can dump an instrument kind's schema
//! lists (for example to generate test fixtures or parameter forms).

pub mod base;
pub mod registry;
pub mod validator;

pub use registry::SchemaSet;

use std::fmt;

use serde::{Serialize, Serializer};

use crate::value::{Config, Value, ValueType};

/// Override layer. Base is fixed by this crate; family is shared by a whole
/// family of instrument kinds; specific belongs to one concrete kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Base,
    Family,
    Specific,
}

impl Tier {
    /// Validation order: base first, then family, then specific.
    pub const ALL: [Tier; 3] = [Tier::Base, Tier::Family, Tier::Specific];

    pub fn label(self) -> &'static str {
        match self {
            Tier::Base => "base",
            Tier::Family => "family",
            Tier::Specific => "specific",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which call a schema list validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Constructor,
    Perform,
    Events,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Constructor, Group::Perform, Group::Events];

    pub fn label(self) -> &'static str {
        match self {
            Group::Constructor => "constructor",
            Group::Perform => "perform",
            Group::Events => "events",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A field default: either a literal, or computed from sibling fields.
///
/// Computed defaults run against the in-progress config in declaration
/// order, so a descriptor may read any field declared before it (the base
/// `sample_rate` reads the already-validated `audio_context`). Returning
/// `None` means no default could be produced, which makes the field count
/// as mandatory-and-missing.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    Literal(Value),
    Computed(fn(&Config) -> Option<Value>),
}

impl DefaultValue {
    pub(crate) fn produce(&self, config: &Config) -> Option<Value> {
        match self {
            DefaultValue::Literal(value) => Some(value.clone()),
            DefaultValue::Computed(f) => f(config),
        }
    }
}

impl Serialize for DefaultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DefaultValue::Literal(value) => value.serialize(serializer),
            DefaultValue::Computed(_) => serializer.serialize_str("(computed)"),
        }
    }
}

/// Static metadata for one configurable field. No logic of its own — the
/// validator interprets it.
#[derive(Debug, Clone, Serialize)]
pub struct Descriptor {
    name: String,
    alias: String,
    #[serde(rename = "type")]
    value_type: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<DefaultValue>,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, alias: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            value_type,
            min: None,
            max: None,
            step: None,
            default: None,
        }
    }

    /// Shorthand for a numeric field.
    pub fn number(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(name, alias, ValueType::Number)
    }

    /// Inclusive lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Inclusive upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// The value must be an exact multiple of `step`, measured from zero.
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Literal default applied when the caller omits the field.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Default computed from fields declared earlier in the same list.
    pub fn default_with(mut self, f: fn(&Config) -> Option<Value>) -> Self {
        self.default = Some(DefaultValue::Computed(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn min_bound(&self) -> Option<f64> {
        self.min
    }

    pub fn max_bound(&self) -> Option<f64> {
        self.max
    }

    pub fn step_bound(&self) -> Option<f64> {
        self.step
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }
}
