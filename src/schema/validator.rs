//! Pure validation rules for a single descriptor/value pair.
//!
//! Each function reports the first failing rule as a detail string; the
//! registry wraps details into typed errors with field context. Rule order
//! is fixed and observable: apply-default, then type, then range (min, max,
//! step).

use crate::schema::Descriptor;
use crate::value::{Config, Value};

/// What [`apply_default`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultOutcome {
    /// The caller supplied the field explicitly; it was left untouched.
    Present,
    /// The declared default was written into the config.
    Applied,
    /// No explicit value and no producible default — a mandatory field is
    /// missing.
    MissingMandatory,
}

/// Fill in the descriptor's default when the field is absent.
///
/// An explicit entry always wins, even if a later rule will reject it.
pub fn apply_default(descriptor: &Descriptor, config: &mut Config) -> DefaultOutcome {
    if config.contains(descriptor.name()) {
        return DefaultOutcome::Present;
    }
    let Some(default) = descriptor.default_value() else {
        return DefaultOutcome::MissingMandatory;
    };
    match default.produce(config) {
        Some(value) => {
            config.set(descriptor.name(), value);
            DefaultOutcome::Applied
        }
        None => DefaultOutcome::MissingMandatory,
    }
}

/// Check the value's runtime type against the descriptor's tag.
///
/// Primitive tags report `is type X not Y`; handle and list tags report an
/// instance-check failure.
pub fn validate_type(descriptor: &Descriptor, value: &Value) -> Option<String> {
    let want = descriptor.value_type();
    if value.value_type() == want {
        return None;
    }
    if want.is_primitive() {
        Some(format!("is type {} not {}", value.type_name(), want.name()))
    } else {
        Some(format!("is not an instance of {}", want.name()))
    }
}

/// Check min, then max, then step. First failure wins; unset bounds are
/// skipped. Non-numeric values are the type rule's business, not ours.
pub fn validate_range(descriptor: &Descriptor, value: &Value) -> Option<String> {
    let Some(number) = value.as_number() else {
        return None;
    };
    if let Some(min) = descriptor.min_bound() {
        if number < min {
            return Some(format!("is less than the minimum {min}"));
        }
    }
    if let Some(max) = descriptor.max_bound() {
        if number > max {
            return Some(format!("is greater than the maximum {max}"));
        }
    }
    if let Some(step) = descriptor.step_bound() {
        let remainder = (number / step) % 1.0;
        if remainder != 0.0 {
            return Some(format!(
                "{number} leaves remainder {remainder} when divided by {step}"
            ));
        }
    }
    None
}
