use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::audio_params::{
    CaptureSource, InputChannelMask, OutputChannelMask, SampleEncoding, StreamClass,
};

/// Bytes moved from capture to playback per pump iteration.
pub const DEFAULT_FRAME_SIZE: usize = 1024;

/// One-time pause between the first captured frame and the first write.
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_millis(100);

/// The parameter set selected for one passthrough session.
///
/// Built fresh on every start; never mutated while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub source: CaptureSource,
    pub encoding: SampleEncoding,
    pub input_mask: InputChannelMask,
    pub output_mask: OutputChannelMask,
    pub stream_class: StreamClass,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            source: CaptureSource::Mic,
            encoding: SampleEncoding::Pcm16Bit,
            input_mask: InputChannelMask::Stereo,
            output_mask: OutputChannelMask::Stereo,
            stream_class: StreamClass::Music,
        }
    }
}

/// Tunables for the streaming loop engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Size of the frame buffer filled from capture before each write
    /// (default: 1024 bytes).
    pub frame_size: usize,

    /// Pause inserted once, after the first complete frame and before the
    /// first write (default: 100 ms). Absorbs device warm-up.
    pub startup_delay: Duration,

    /// Name given to the pump worker thread.
    pub thread_name: String,
}

impl EngineSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_size == 0 {
            return Err("frame size must be positive".into());
        }
        if self.thread_name.is_empty() {
            return Err("thread name must not be empty".into());
        }
        Ok(())
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            frame_size: DEFAULT_FRAME_SIZE,
            startup_delay: DEFAULT_STARTUP_DELAY,
            thread_name: "passthrough-pump".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_session() {
        let config = SessionConfig::default();
        assert_eq!(config.source, CaptureSource::Mic);
        assert_eq!(config.encoding, SampleEncoding::Pcm16Bit);
        assert_eq!(config.input_mask, InputChannelMask::Stereo);
        assert_eq!(config.output_mask, OutputChannelMask::Stereo);
        assert_eq!(config.stream_class, StreamClass::Music);

        let settings = EngineSettings::default();
        assert_eq!(settings.frame_size, 1024);
        assert_eq!(settings.startup_delay, Duration::from_millis(100));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn zero_frame_size_is_rejected() {
        let settings = EngineSettings {
            frame_size: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SessionConfig {
            source: CaptureSource::Camcorder,
            encoding: SampleEncoding::PcmFloat,
            input_mask: InputChannelMask::Mono,
            output_mask: OutputChannelMask::Mono,
            stream_class: StreamClass::Alarm,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"inputMask\":\"CHANNEL_IN_MONO\""));
        let back: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
