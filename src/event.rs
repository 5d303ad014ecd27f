//! Timed actions within a perform request.
//!
//! An [`Event`] pins a moment in sample-frame time (`at`) to named numeric
//! actions. The base event vocabulary is `down` (key pressure) and `gain`
//! (volume fader); family and specific instrument kinds may declare their
//! own action fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single timed action.
///
/// `at` may be negative (scheduled before this performance window) or beyond
/// the window's end. Base-tier validation requires exactly one action field
/// per event; deeper tiers only check the fields they recognize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Sample-frame offset this event refers to.
    pub at: f64,
    #[serde(flatten)]
    actions: BTreeMap<String, f64>,
}

impl Event {
    /// Start an event at the given sample-frame offset, with no actions yet.
    pub fn at(at: f64) -> Self {
        Self {
            at,
            actions: BTreeMap::new(),
        }
    }

    /// Attach a named action value.
    pub fn action(mut self, name: impl Into<String>, value: f64) -> Self {
        self.actions.insert(name.into(), value);
        self
    }

    /// Key pressure, 0 (unpressed) to 9 (fully down) in the base vocabulary.
    pub fn down(self, value: f64) -> Self {
        self.action("down", value)
    }

    /// Volume fader in the base vocabulary.
    pub fn gain(self, value: f64) -> Self {
        self.action("gain", value)
    }

    /// The value of a named action, if this event carries it.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.actions.get(name).copied()
    }

    pub fn has(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Number of action fields present (excluding `at`).
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn actions(&self) -> impl Iterator<Item = (&str, f64)> {
        self.actions.iter().map(|(name, value)| (name.as_str(), *value))
    }
}
