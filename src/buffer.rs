//! Fixed-shape sample containers returned by a performance.

/// Planar sample storage with a fixed channel count, frame length, and rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioData {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl AudioData {
    /// A zeroed buffer: `channel_count` channels of `length` frames.
    pub fn silent(channel_count: u32, length: u32, sample_rate: u32) -> Self {
        Self {
            channels: vec![vec![0.0; length as usize]; channel_count as usize],
            sample_rate,
        }
    }

    pub fn channel_count(&self) -> u32 {
        self.channels.len() as u32
    }

    /// Length in sample frames (every channel has the same length).
    pub fn len(&self) -> u32 {
        self.channels.first().map_or(0, |ch| ch.len() as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Mutable channel access for construction steps that fill buffers.
    pub fn channel_mut(&mut self, index: usize) -> Option<&mut [f32]> {
        self.channels.get_mut(index).map(Vec::as_mut_slice)
    }
}

/// One produced buffer.
///
/// `id` is a cache key: a construction step whose content is fully determined
/// by the frozen config can tag its buffers so a [`SharedCache`] entry may be
/// reused instead of rebuilding.
///
/// [`SharedCache`]: crate::audio::SharedCache
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    pub id: Option<String>,
    pub data: AudioData,
}
