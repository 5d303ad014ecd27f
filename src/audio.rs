//! Opaque collaborator handles: the audio device link and the shared cache.
//!
//! Real hardware binding lives outside this crate. [`AudioContext`] stands in
//! for the host's audio output — it knows the native sample rate and
//! allocates sample storage. [`SharedCache`] lets instrument instances reuse
//! buffers whose content is fully determined by a cache id.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::buffer::AudioData;

/// Handle to the host's audio output.
///
/// All instrument instances in a program generally share one context; its
/// native rate is the default for an instrument's `sample_rate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioContext {
    sample_rate: u32,
}

impl AudioContext {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// The device's native sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Allocate a zeroed planar buffer of the given shape.
    pub fn create_buffer(&self, channel_count: u32, length: u32, sample_rate: u32) -> AudioData {
        AudioData::silent(channel_count, length, sample_rate)
    }
}

/// Buffer cache shared across instrument instances, keyed by cache id.
///
/// Cloning the handle shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    store: Arc<RwLock<HashMap<String, AudioData>>>,
}

impl SharedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: impl Into<String>, data: AudioData) {
        let mut store = self
            .store
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        store.insert(id.into(), data);
    }

    pub fn get(&self, id: &str) -> Option<AudioData> {
        let store = self
            .store
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        store.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        let store = self
            .store
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Two cache handles are equal when they share a store.
impl PartialEq for SharedCache {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }
}
