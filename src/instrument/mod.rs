//! The instrument core: blueprints, construction, readiness, and `perform`.
//!
//! A [`Blueprint`] describes a concrete instrument kind — static identity,
//! family/specific schema overrides, and a buffer-construction step.
//! [`Instrument::new`] validates the constructor config against the tiered
//! schemas, freezes it, and starts the one-shot setup transition;
//! [`Instrument::perform`] validates a request synchronously and produces
//! buffers once the instrument is ready.

pub mod silence;

pub use silence::Silence;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::audio::{AudioContext, SharedCache};
use crate::buffer::Buffer;
use crate::error::Error;
use crate::event::Event;
use crate::lifecycle::{Lifecycle, Ready};
use crate::schema::{Descriptor, Group, SchemaSet, Tier};
use crate::value::{Config, Value};

/// How long the base setup transition takes. The base kind has nothing to
/// prepare; the artificial delay keeps its observable behavior consistent
/// with kinds that really do slow asynchronous setup (fetching remote
/// assets, decoding sample banks).
const SETUP_DELAY: Duration = Duration::from_millis(5);

/// Static identity constants for an instrument kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    pub name: &'static str,
    /// Short identifier, also usable as a cache-id prefix.
    pub id: &'static str,
    pub version: &'static str,
    /// Revision date of the interface this kind implements, `YYYYMMDD`.
    pub spec_date: &'static str,
    pub help: &'static str,
}

/// Identity of the base kind.
pub const BASE_META: Meta = Meta {
    name: "Overtone",
    id: "base",
    version: env!("CARGO_PKG_VERSION"),
    spec_date: "20260829",
    help: "The base instrument kind. Not usually used directly - it only generates silent buffers.",
};

/// The buffer-construction step.
///
/// This is the only piece an instrument kind is expected to replace; tiered
/// validation and the readiness lifecycle are reused untouched. Construction
/// failures travel through the future `perform` returns.
pub trait BuildBuffers: Send + Sync {
    fn build(&self, config: &InstanceConfig, request: &PerformRequest)
        -> Result<Vec<Buffer>, Error>;
}

/// Describes a concrete instrument kind.
///
/// Kinds are composed, not subclassed: a family layer and a specific layer
/// each contribute descriptor lists per group, and the registry resolves
/// them in tier order. [`Blueprint::base`] is the silent base kind.
#[derive(Clone)]
pub struct Blueprint {
    meta: Meta,
    schemas: SchemaSet,
    builder: Arc<dyn BuildBuffers>,
}

impl Blueprint {
    pub fn base() -> Self {
        Self {
            meta: BASE_META,
            schemas: SchemaSet::base(),
            builder: Arc::new(Silence),
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn family_constructor(mut self, descriptors: Vec<Descriptor>) -> Self {
        self.schemas
            .set_list(Group::Constructor, Tier::Family, descriptors);
        self
    }

    pub fn family_perform(mut self, descriptors: Vec<Descriptor>) -> Self {
        self.schemas.set_list(Group::Perform, Tier::Family, descriptors);
        self
    }

    pub fn family_events(mut self, descriptors: Vec<Descriptor>) -> Self {
        self.schemas.set_list(Group::Events, Tier::Family, descriptors);
        self
    }

    pub fn specific_constructor(mut self, descriptors: Vec<Descriptor>) -> Self {
        self.schemas
            .set_list(Group::Constructor, Tier::Specific, descriptors);
        self
    }

    pub fn specific_perform(mut self, descriptors: Vec<Descriptor>) -> Self {
        self.schemas
            .set_list(Group::Perform, Tier::Specific, descriptors);
        self
    }

    pub fn specific_events(mut self, descriptors: Vec<Descriptor>) -> Self {
        self.schemas.set_list(Group::Events, Tier::Specific, descriptors);
        self
    }

    /// Swap in the kind's construction step.
    pub fn with_builder(mut self, builder: Arc<dyn BuildBuffers>) -> Self {
        self.builder = builder;
        self
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn schemas(&self) -> &SchemaSet {
        &self.schemas
    }
}

fn frozen_field_missing(field: &str) -> Error {
    Error::MissingField {
        schema: "base constructor".to_string(),
        field: field.to_string(),
    }
}

/// Validated constructor configuration, frozen for the instrument's
/// lifetime. Holds typed views of the base fields plus every validated
/// family/specific value.
#[derive(Debug, Clone)]
pub struct InstanceConfig {
    audio_context: AudioContext,
    shared_cache: SharedCache,
    samples_per_buffer: u32,
    sample_rate: u32,
    channel_count: u32,
    values: Config,
}

impl InstanceConfig {
    fn freeze(values: Config) -> Result<Self, Error> {
        let audio_context = values
            .context("audio_context")
            .cloned()
            .ok_or_else(|| frozen_field_missing("audio_context"))?;
        let shared_cache = values
            .cache("shared_cache")
            .cloned()
            .ok_or_else(|| frozen_field_missing("shared_cache"))?;
        let samples_per_buffer = values
            .number("samples_per_buffer")
            .ok_or_else(|| frozen_field_missing("samples_per_buffer"))? as u32;
        let sample_rate = values
            .number("sample_rate")
            .ok_or_else(|| frozen_field_missing("sample_rate"))? as u32;
        let channel_count = values
            .number("channel_count")
            .ok_or_else(|| frozen_field_missing("channel_count"))? as u32;
        Ok(Self {
            audio_context,
            shared_cache,
            samples_per_buffer,
            sample_rate,
            channel_count,
            values,
        })
    }

    pub fn audio_context(&self) -> &AudioContext {
        &self.audio_context
    }

    pub fn shared_cache(&self) -> &SharedCache {
        &self.shared_cache
    }

    /// Length of each produced buffer, in sample frames.
    pub fn samples_per_buffer(&self) -> u32 {
        self.samples_per_buffer
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u32 {
        self.channel_count
    }

    /// Any frozen value by name, including family/specific fields.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// A validated, ephemeral buffer-production request. Constructed by
/// `perform`, consumed by the construction step, not retained afterwards.
#[derive(Debug, Clone)]
pub struct PerformRequest {
    buffer_count: u32,
    cycles_per_buffer: u32,
    is_looping: bool,
    events: Vec<Event>,
    values: Config,
}

impl PerformRequest {
    fn freeze(values: Config) -> Result<Self, Error> {
        let buffer_count = values
            .number("buffer_count")
            .ok_or_else(|| frozen_field_missing("buffer_count"))? as u32;
        let cycles_per_buffer = values
            .number("cycles_per_buffer")
            .ok_or_else(|| frozen_field_missing("cycles_per_buffer"))? as u32;
        let is_looping = values
            .bool("is_looping")
            .ok_or_else(|| frozen_field_missing("is_looping"))?;
        let events = values
            .events("events")
            .ok_or_else(|| frozen_field_missing("events"))?
            .to_vec();
        Ok(Self {
            buffer_count,
            cycles_per_buffer,
            is_looping,
            events,
            values,
        })
    }

    pub fn buffer_count(&self) -> u32 {
        self.buffer_count
    }

    /// Number of waveform cycles per buffer — effectively the pitch.
    pub fn cycles_per_buffer(&self) -> u32 {
        self.cycles_per_buffer
    }

    pub fn is_looping(&self) -> bool {
        self.is_looping
    }

    /// The time-ordered event list as supplied by the caller.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Any validated perform value by name, including family/specific fields.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// A constructed instrument instance.
pub struct Instrument {
    meta: Meta,
    schemas: SchemaSet,
    config: InstanceConfig,
    lifecycle: Arc<Lifecycle>,
    builder: Arc<dyn BuildBuffers>,
}

// Not derivable: the construction step is a trait object.
impl fmt::Debug for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrument")
            .field("meta", &self.meta)
            .field("config", &self.config)
            .field("ready", &self.lifecycle.is_ready())
            .finish_non_exhaustive()
    }
}

impl Instrument {
    /// Validate `config` against the blueprint's tiered constructor schemas,
    /// freeze the result, and begin the setup transition.
    ///
    /// Identifier clashes across the nine schema lists fail here, before any
    /// field validation. Applied defaults are written back into `config`, so
    /// the caller can read them out afterward. Must be called within a tokio
    /// runtime: the setup transition is spawned onto it.
    pub fn new(blueprint: Blueprint, config: &mut Config) -> Result<Self, Error> {
        let Blueprint {
            meta,
            schemas,
            builder,
        } = blueprint;

        schemas.check_duplicates()?;
        schemas.validate_constructor(config)?;
        let frozen = InstanceConfig::freeze(schemas.collect(Group::Constructor, config))?;

        let lifecycle = Arc::new(Lifecycle::new());
        let setup = Arc::clone(&lifecycle);
        tokio::spawn(async move {
            tokio::time::sleep(SETUP_DELAY).await;
            if let Err(err) = setup.complete() {
                tracing::error!(%err, "readiness transition refused");
            }
        });
        tracing::debug!(name = meta.name, id = meta.id, "instrument constructed, setup started");

        Ok(Self {
            meta,
            schemas,
            config: frozen,
            lifecycle,
            builder,
        })
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// The nine resolved descriptor lists, for introspection and tooling.
    pub fn schemas(&self) -> &SchemaSet {
        &self.schemas
    }

    /// The frozen constructor configuration.
    pub fn config(&self) -> &InstanceConfig {
        &self.config
    }

    /// False until the setup transition fires, then permanently true.
    pub fn is_ready(&self) -> bool {
        self.lifecycle.is_ready()
    }

    /// A future resolving once setup has completed, with the elapsed setup
    /// delay. May be called any number of times, before or after readiness;
    /// it never re-triggers setup, and every resolution of a given instrument
    /// reports the same delay.
    pub fn ready(&self) -> impl Future<Output = Result<Ready, Error>> + Send + 'static {
        self.lifecycle.subscribe().wait()
    }

    /// Validate a perform request and produce buffers once ready.
    ///
    /// All validation is synchronous: bad input surfaces as an `Err` from
    /// this call, never through the returned future — a caller can never
    /// observe a pending result for an invalid request. The future waits for
    /// readiness (requests issued before readiness queue up and fire in call
    /// order), then runs the construction step; only construction failures
    /// travel through it.
    pub fn perform(
        &self,
        config: &mut Config,
    ) -> Result<impl Future<Output = Result<Vec<Buffer>, Error>> + Send + 'static, Error> {
        self.schemas
            .validate_perform(config, self.config.samples_per_buffer())?;
        let events = config.events("events").unwrap_or(&[]).to_vec();
        self.schemas.validate_events(&events)?;
        let request = PerformRequest::freeze(self.schemas.collect(Group::Perform, config))?;
        tracing::trace!(
            buffer_count = request.buffer_count(),
            events = request.events().len(),
            "perform request validated"
        );

        // Subscribe before returning so concurrent requests keep call order.
        let subscription = self.lifecycle.subscribe();
        let builder = Arc::clone(&self.builder);
        let instance = self.config.clone();
        Ok(async move {
            subscription.wait().await?;
            builder.build(&instance, &request)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config::new()
            .with("audio_context", AudioContext::new(44100))
            .with("shared_cache", SharedCache::new())
    }

    #[test]
    fn base_meta_constants() {
        assert_eq!(BASE_META.name, "Overtone");
        assert_eq!(BASE_META.id, "base");
        assert_eq!(BASE_META.version, env!("CARGO_PKG_VERSION"));
        assert!(BASE_META.help.contains("silent"));
    }

    #[tokio::test(start_paused = true)]
    async fn construction_freezes_defaults() {
        let mut config = valid_config();
        let instrument = Instrument::new(Blueprint::base(), &mut config).unwrap();
        assert_eq!(instrument.config().samples_per_buffer(), 5400);
        assert_eq!(instrument.config().sample_rate(), 44100);
        assert_eq!(instrument.config().channel_count(), 1);
        // Defaults were written back into the caller's config.
        assert_eq!(config.number("samples_per_buffer"), Some(5400.0));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_keys_are_not_frozen() {
        let mut config = valid_config().with("stray", 1u32);
        let instrument = Instrument::new(Blueprint::base(), &mut config).unwrap();
        assert!(instrument.config().get("stray").is_none());
        assert!(instrument.config().get("channel_count").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn blueprint_layers_are_frozen_too() {
        let blueprint = Blueprint::base().family_constructor(vec![
            Descriptor::number("voices", "vo").min(1.0).max(16.0).default(4u32),
        ]);
        let mut config = valid_config();
        let instrument = Instrument::new(blueprint, &mut config).unwrap();
        assert_eq!(
            instrument.config().get("voices"),
            Some(&Value::Number(4.0))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn debug_output_elides_the_builder() {
        let mut config = valid_config();
        let instrument = Instrument::new(Blueprint::base(), &mut config).unwrap();
        let debug = format!("{instrument:?}");
        assert!(debug.contains("Overtone"));
        assert!(debug.contains("ready: false"));
        assert!(!debug.contains("builder"));
    }

    #[tokio::test(start_paused = true)]
    async fn schemas_expose_all_nine_lists() {
        let mut config = valid_config();
        let instrument = Instrument::new(Blueprint::base(), &mut config).unwrap();
        for group in Group::ALL {
            for tier in Tier::ALL {
                // Base lists are populated, family/specific default empty.
                let list = instrument.schemas().descriptors(group, tier);
                if tier == Tier::Base {
                    assert!(!list.is_empty());
                } else {
                    assert!(list.is_empty());
                }
            }
        }
    }
}
