//! The fixed base-tier schemas every instrument kind shares.

use crate::event::Event;
use crate::schema::Descriptor;
use crate::value::{Value, ValueType};

/// Constructor-config fields common to all instrument kinds.
///
/// Declaration order matters: `sample_rate`'s computed default reads the
/// already-validated `audio_context`.
pub fn constructor() -> Vec<Descriptor> {
    vec![
        Descriptor::new("audio_context", "ac", ValueType::Context),
        Descriptor::new("shared_cache", "sc", ValueType::Cache),
        Descriptor::number("samples_per_buffer", "sb")
            .min(8.0)
            .max(96000.0)
            .step(1.0)
            .default(5400u32),
        Descriptor::number("sample_rate", "sr")
            .min(22050.0)
            .max(96000.0)
            .step(1.0)
            .default_with(|cfg| {
                cfg.context("audio_context")
                    .map(|ctx| Value::Number(f64::from(ctx.sample_rate())))
            }),
        Descriptor::number("channel_count", "cc")
            .min(1.0)
            .max(32.0)
            .step(1.0)
            .default(1u32),
    ]
}

/// Perform-config fields common to all instrument kinds.
pub fn perform() -> Vec<Descriptor> {
    vec![
        Descriptor::number("buffer_count", "bc")
            .min(1.0)
            .max(65535.0)
            .step(1.0)
            .default(1u32),
        Descriptor::number("cycles_per_buffer", "cb")
            .min(1.0)
            .max(65535.0)
            .step(1.0)
            .default(1u32),
        Descriptor::new("is_looping", "il", ValueType::Bool).default(false),
        Descriptor::new("events", "ev", ValueType::Events).default(Vec::<Event>::new()),
    ]
}

/// Event fields in the base action vocabulary.
///
/// `at` has no bounds — events may be scheduled before the performance
/// window (negative) or after it ends.
pub fn events() -> Vec<Descriptor> {
    vec![
        Descriptor::number("at", "at").step(1.0),
        Descriptor::number("down", "dn").min(0.0).max(9.0).step(1.0),
        Descriptor::number("gain", "gn").min(0.0).max(9.0).step(1.0),
    ]
}
