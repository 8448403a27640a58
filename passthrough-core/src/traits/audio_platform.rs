use std::thread;
use std::time::Duration;

use crate::models::audio_params::{
    CaptureSource, InputChannelMask, OutputChannelMask, SampleEncoding, StreamClass,
};
use crate::models::error::PassthroughError;
use crate::traits::audio_device::{CaptureDevice, PlaybackDevice};

/// Everything needed to open the capture device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureParams {
    pub source: CaptureSource,
    pub sample_rate_hz: u32,
    pub channel_mask: InputChannelMask,
    pub encoding: SampleEncoding,
    pub buffer_size: usize,
}

/// Everything needed to open the playback device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackParams {
    pub stream_class: StreamClass,
    pub sample_rate_hz: u32,
    pub channel_mask: OutputChannelMask,
    pub encoding: SampleEncoding,
    pub buffer_size: usize,
}

/// Interface to the platform audio subsystem.
///
/// Implemented by:
/// - `SimulatedPlatform` (this crate, scripted for tests)
/// - `CpalPlatform` (`passthrough-cpal`)
///
/// Shared between the controller and the pump thread, hence `Send + Sync`.
/// The devices it opens are not required to be `Send`.
pub trait AudioPlatform: Send + Sync {
    /// Native output sample rate for the given stream class.
    fn native_output_sample_rate(&self, stream_class: StreamClass) -> Result<u32, PassthroughError>;

    /// Raw minimum buffer size in bytes, or a negative sentinel
    /// (see `PlatformStatus`).
    fn min_buffer_size(
        &self,
        sample_rate_hz: u32,
        channel_mask: OutputChannelMask,
        encoding: SampleEncoding,
    ) -> i32;

    fn open_capture(&self, params: &CaptureParams) -> Result<Box<dyn CaptureDevice>, PassthroughError>;

    fn open_playback(&self, params: &PlaybackParams) -> Result<Box<dyn PlaybackDevice>, PassthroughError>;

    /// Wait out device warm-up before the first write.
    fn warm_up(&self, delay: Duration) {
        thread::sleep(delay);
    }
}
