use thiserror::Error;

use super::audio_params::{OutputChannelMask, SampleEncoding};
use super::status::PlatformStatus;

/// Errors that end a passthrough session or reject a controller command.
///
/// A session that is cancelled is not an error and produces none of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PassthroughError {
    /// The platform refused to size a buffer for the requested combination.
    /// Raised before any device is opened.
    #[error("{status}\nsampleRateInHz = {sample_rate_hz}\nchannelConfig = {channel_mask}\naudioFormat = {encoding}")]
    BufferSizing {
        status: PlatformStatus,
        sample_rate_hz: u32,
        channel_mask: OutputChannelMask,
        encoding: SampleEncoding,
    },

    #[error("Unable to read from capture device (code {}): {status}", .status.code())]
    CaptureRead { status: PlatformStatus },

    #[error("Unable to write to playback device (code {}): {status}", .status.code())]
    PlaybackWrite { status: PlatformStatus },

    #[error("native output sample rate unavailable: {0}")]
    SampleRate(String),

    #[error("failed to open capture device: {0}")]
    CaptureOpen(String),

    #[error("failed to open playback device: {0}")]
    PlaybackOpen(String),

    #[error("failed to start device: {0}")]
    DeviceStart(String),

    #[error("invalid engine settings: {0}")]
    InvalidSettings(String),

    #[error("a passthrough session is already active")]
    SessionActive,

    #[error("unknown or finished passthrough session")]
    UnknownSession,

    #[error("failed to spawn pump thread: {0}")]
    Spawn(String),

    #[error("pump thread panicked")]
    WorkerPanicked,
}

impl PassthroughError {
    /// Whether the error came from the device I/O loop rather than setup.
    pub fn is_stream_error(&self) -> bool {
        matches!(self, Self::CaptureRead { .. } | Self::PlaybackWrite { .. })
    }
}
