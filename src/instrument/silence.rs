//! The base construction step: silent buffers.

use crate::buffer::Buffer;
use crate::error::Error;
use crate::instrument::{BuildBuffers, InstanceConfig, PerformRequest};

/// Cache id shared by every silent buffer — the content never varies for a
/// fixed config, so any entry under this key is reusable.
pub const SILENCE_ID: &str = "silence";

/// Produces `buffer_count` zeroed buffers of the frozen shape.
///
/// Events and looping are validated upstream for parity with real
/// construction steps, but have no effect on silence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl BuildBuffers for Silence {
    fn build(
        &self,
        config: &InstanceConfig,
        request: &PerformRequest,
    ) -> Result<Vec<Buffer>, Error> {
        let mut buffers = Vec::with_capacity(request.buffer_count() as usize);
        for _ in 0..request.buffer_count() {
            // TODO: serve repeat shapes out of config.shared_cache() instead
            // of reallocating per request.
            buffers.push(Buffer {
                id: Some(SILENCE_ID.to_string()),
                data: config.audio_context().create_buffer(
                    config.channel_count(),
                    config.samples_per_buffer(),
                    config.sample_rate(),
                ),
            });
        }
        Ok(buffers)
    }
}
