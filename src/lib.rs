//! Overtone — an instrument base layer.
//!
//! An instrument kind is described by a [`Blueprint`]: static identity, tiered
//! declarative config schemas, and a buffer-construction step. Instantiating a
//! blueprint validates and freezes its configuration, then runs a one-shot
//! asynchronous readiness transition; once ready, [`Instrument::perform`]
//! produces fixed-shape sample buffers on demand. The base kind only produces
//! silence — everything interesting lives in the validation engine and the
//! readiness/production pipeline that other kinds reuse untouched.

pub mod audio;
pub mod buffer;
pub mod error;
pub mod event;
pub mod instrument;
pub mod lifecycle;
pub mod schema;
pub mod value;

pub use audio::{AudioContext, SharedCache};
pub use buffer::{AudioData, Buffer};
pub use error::Error;
pub use event::Event;
pub use instrument::{
    Blueprint, BuildBuffers, InstanceConfig, Instrument, Meta, PerformRequest, Silence, BASE_META,
};
pub use lifecycle::Ready;
pub use schema::{Descriptor, Group, SchemaSet, Tier};
pub use value::{Config, Value, ValueType};
