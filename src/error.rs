//! Error taxonomy for configuration validation and the instrument lifecycle.
//!
//! Every validation error is raised synchronously at the call that triggered
//! it — construction or `perform` — never deferred into a future. Only
//! construction-step failures travel through `perform`'s future. All errors
//! are terminal for the call that produced them; the instrument itself stays
//! usable.

use std::fmt;

use crate::schema::{Group, Tier};

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A mandatory field (one with no declared default) was absent.
    MissingField { schema: String, field: String },
    /// A field's runtime type does not match its descriptor.
    TypeMismatch {
        schema: String,
        field: String,
        detail: String,
    },
    /// A numeric field violates a min/max bound or step divisibility.
    Range {
        schema: String,
        field: String,
        detail: String,
    },
    /// `samples_per_buffer` is not evenly divisible by `cycles_per_buffer` —
    /// only waveforms whose cycle length divides the buffer length are
    /// synthesizable.
    Ratio {
        samples_per_buffer: u32,
        cycles_per_buffer: u32,
    },
    /// An event carries zero action fields, or more than one (base tier only).
    EventShape { index: usize, detail: &'static str },
    /// A `name` or `alias` repeats somewhere across the nine schema lists.
    /// Fatal, detected once at construction before any field validation.
    DuplicateIdentifier {
        kind: &'static str,
        ident: String,
        group: Group,
        tier: Tier,
        index: usize,
    },
    /// The readiness transition was driven incorrectly. Not reachable
    /// through the public surface.
    Lifecycle(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingField { schema, field } => {
                write!(f, "{schema}: mandatory config.{field} is missing")
            }
            Error::TypeMismatch {
                schema,
                field,
                detail,
            } => write!(f, "{schema}: config.{field} {detail}"),
            Error::Range {
                schema,
                field,
                detail,
            } => write!(f, "{schema}: config.{field} {detail}"),
            Error::Ratio {
                samples_per_buffer,
                cycles_per_buffer,
            } => write!(
                f,
                "samples_per_buffer / cycles_per_buffer is not an integer \
                 ({samples_per_buffer} / {cycles_per_buffer})"
            ),
            Error::EventShape { index, detail } => {
                write!(f, "config.events[{index}] {detail}")
            }
            Error::DuplicateIdentifier {
                kind,
                ident,
                group,
                tier,
                index,
            } => write!(
                f,
                "duplicate {kind} \"{ident}\" in {tier} {group} schema [{index}]"
            ),
            Error::Lifecycle(detail) => write!(f, "lifecycle: {detail}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = Error::MissingField {
            schema: "base constructor".into(),
            field: "audio_context".into(),
        };
        assert_eq!(
            err.to_string(),
            "base constructor: mandatory config.audio_context is missing"
        );
    }

    #[test]
    fn display_ratio() {
        let err = Error::Ratio {
            samples_per_buffer: 5400,
            cycles_per_buffer: 124,
        };
        assert!(err.to_string().contains("5400 / 124"));
        assert!(err.to_string().contains("not an integer"));
    }

    #[test]
    fn display_duplicate_identifier() {
        let err = Error::DuplicateIdentifier {
            kind: "alias",
            ident: "sb".into(),
            group: Group::Perform,
            tier: Tier::Family,
            index: 0,
        };
        assert_eq!(
            err.to_string(),
            "duplicate alias \"sb\" in family perform schema [0]"
        );
    }

    #[test]
    fn display_event_shape() {
        let err = Error::EventShape {
            index: 3,
            detail: "does not specify an action",
        };
        assert_eq!(
            err.to_string(),
            "config.events[3] does not specify an action"
        );
    }
}
