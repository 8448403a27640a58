//! Hardware buffer sizing.
//!
//! Both devices of a session are sized with the playback parameters: the
//! capture device reuses the output channel mask for its buffer size.

use crate::models::audio_params::{OutputChannelMask, SampleEncoding};
use crate::models::error::PassthroughError;
use crate::models::status::PlatformStatus;
use crate::traits::audio_platform::AudioPlatform;

/// Minimum buffer size in bytes for the given output combination.
///
/// A negative platform answer becomes `PassthroughError::BufferSizing`,
/// which names the classified cause and echoes all three inputs.
pub fn min_buffer_size(
    platform: &dyn AudioPlatform,
    sample_rate_hz: u32,
    channel_mask: OutputChannelMask,
    encoding: SampleEncoding,
) -> Result<usize, PassthroughError> {
    let raw = platform.min_buffer_size(sample_rate_hz, channel_mask, encoding);

    PlatformStatus::check(raw).map_err(|status| {
        log::warn!(
            "min buffer size query failed with {} for {} Hz, {}, {}",
            raw,
            sample_rate_hz,
            channel_mask,
            encoding
        );
        PassthroughError::BufferSizing {
            status,
            sample_rate_hz,
            channel_mask,
            encoding,
        }
    })
}
