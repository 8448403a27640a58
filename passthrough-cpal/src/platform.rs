use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{BufferSize, Device, Host, HostId, SampleFormat, StreamConfig, SupportedBufferSize};
use passthrough_core::{
    AudioPlatform, CaptureDevice, CaptureParams, OutputChannelMask, PassthroughError,
    PlatformStatus, PlaybackDevice, PlaybackParams, SampleEncoding, StreamClass,
};

use crate::device::{build_capture_stream, build_playback_stream, CpalCapture, CpalPlayback};
use crate::format;
use crate::pipe::BytePipe;

/// Pipes hold this many platform minimum buffers.
const PIPE_BUFFERS: usize = 4;

/// Period assumed when the host does not report a buffer size range.
const FALLBACK_PERIOD_MS: u32 = 20;

/// `AudioPlatform` over the default input and output devices of a cpal
/// host.
///
/// Stream classes and capture sources have no desktop equivalent; they are
/// logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct CpalPlatform {
    host_id: HostId,
    io_timeout: Duration,
}

impl CpalPlatform {
    pub fn new() -> Self {
        Self::with_host(cpal::default_host().id())
    }

    pub fn with_host(host_id: HostId) -> Self {
        Self {
            host_id,
            io_timeout: Duration::from_millis(20),
        }
    }

    /// Longest a blocking read or write waits before returning zero bytes.
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    fn host(&self) -> Result<Host, String> {
        cpal::host_from_id(self.host_id).map_err(|e| e.to_string())
    }

    fn output_device(&self) -> Result<Device, String> {
        self.host()?
            .default_output_device()
            .ok_or_else(|| "no output device available".to_string())
    }

    fn input_device(&self) -> Result<Device, String> {
        self.host()?
            .default_input_device()
            .ok_or_else(|| "no input device available".to_string())
    }

    /// Minimum buffer in bytes, or the status code explaining the refusal.
    fn query_min_buffer(
        &self,
        sample_rate_hz: u32,
        channel_mask: OutputChannelMask,
        encoding: SampleEncoding,
    ) -> Result<i32, i32> {
        let (sample_format, width) =
            format::pcm_layout(encoding).ok_or(PlatformStatus::ERROR_BAD_VALUE)?;
        if sample_rate_hz == 0 {
            return Err(PlatformStatus::ERROR_BAD_VALUE);
        }

        let device = self.output_device().map_err(|_| PlatformStatus::ERROR)?;
        let channels = match channel_mask.channel_count() {
            Some(channels) => channels,
            None => device
                .default_output_config()
                .map_err(|_| PlatformStatus::ERROR)?
                .channels(),
        };

        let range = device
            .supported_output_configs()
            .map_err(|_| PlatformStatus::ERROR)?
            .find(|range| {
                range.channels() == channels
                    && range.sample_format() == sample_format
                    && range.min_sample_rate().0 <= sample_rate_hz
                    && sample_rate_hz <= range.max_sample_rate().0
            })
            .ok_or(PlatformStatus::ERROR_BAD_VALUE)?;

        let frames = match range.buffer_size() {
            SupportedBufferSize::Range { min, .. } if *min > 0 => *min,
            _ => sample_rate_hz * FALLBACK_PERIOD_MS / 1000,
        };
        match format::frames_to_bytes(frames, channels, width) {
            bytes if bytes < 0 => Err(bytes),
            bytes => Ok(bytes),
        }
    }
}

impl Default for CpalPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlatform for CpalPlatform {
    fn native_output_sample_rate(&self, stream_class: StreamClass) -> Result<u32, PassthroughError> {
        let device = self.output_device().map_err(PassthroughError::SampleRate)?;
        let config = device
            .default_output_config()
            .map_err(|e| PassthroughError::SampleRate(e.to_string()))?;
        let rate = config.sample_rate().0;
        log::debug!("native output rate for {} is {} Hz", stream_class, rate);
        Ok(rate)
    }

    fn min_buffer_size(
        &self,
        sample_rate_hz: u32,
        channel_mask: OutputChannelMask,
        encoding: SampleEncoding,
    ) -> i32 {
        match self.query_min_buffer(sample_rate_hz, channel_mask, encoding) {
            Ok(bytes) | Err(bytes) => bytes,
        }
    }

    fn open_capture(&self, params: &CaptureParams) -> Result<Box<dyn CaptureDevice>, PassthroughError> {
        let (sample_format, width) = format::pcm_layout(params.encoding).ok_or_else(|| {
            PassthroughError::CaptureOpen(format!("{} cannot be captured", params.encoding))
        })?;
        let device = self.input_device().map_err(PassthroughError::CaptureOpen)?;
        let channels = match params.channel_mask.channel_count() {
            Some(channels) => channels,
            None => device
                .default_input_config()
                .map_err(|e| PassthroughError::CaptureOpen(e.to_string()))?
                .channels(),
        };

        log::info!(
            "opening capture on {} for {} ({} Hz, {} ch, {})",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            params.source,
            params.sample_rate_hz,
            channels,
            params.encoding
        );

        let config = StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(params.sample_rate_hz),
            buffer_size: BufferSize::Default,
        };
        let pipe = Arc::new(BytePipe::new(
            params.buffer_size * PIPE_BUFFERS,
            channels as usize * width,
            self.io_timeout,
        ));

        let stream = match sample_format {
            SampleFormat::U8 => build_capture_stream::<u8>(&device, &config, &pipe),
            SampleFormat::I16 => build_capture_stream::<i16>(&device, &config, &pipe),
            SampleFormat::F32 => build_capture_stream::<f32>(&device, &config, &pipe),
            other => {
                return Err(PassthroughError::CaptureOpen(format!(
                    "unsupported sample format {:?}",
                    other
                )))
            }
        }
        .map_err(|e| PassthroughError::CaptureOpen(e.to_string()))?;

        Ok(Box::new(CpalCapture::new(stream, pipe)))
    }

    fn open_playback(&self, params: &PlaybackParams) -> Result<Box<dyn PlaybackDevice>, PassthroughError> {
        let (sample_format, width) = format::pcm_layout(params.encoding).ok_or_else(|| {
            PassthroughError::PlaybackOpen(format!("{} cannot be played", params.encoding))
        })?;
        let device = self.output_device().map_err(PassthroughError::PlaybackOpen)?;
        let channels = match params.channel_mask.channel_count() {
            Some(channels) => channels,
            None => device
                .default_output_config()
                .map_err(|e| PassthroughError::PlaybackOpen(e.to_string()))?
                .channels(),
        };

        log::info!(
            "opening playback on {} as {} ({} Hz, {} ch, {})",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            params.stream_class,
            params.sample_rate_hz,
            channels,
            params.encoding
        );

        let config = StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(params.sample_rate_hz),
            buffer_size: BufferSize::Default,
        };
        let pipe = Arc::new(BytePipe::new(
            params.buffer_size * PIPE_BUFFERS,
            channels as usize * width,
            self.io_timeout,
        ));

        let stream = match sample_format {
            SampleFormat::U8 => build_playback_stream::<u8>(&device, &config, &pipe),
            SampleFormat::I16 => build_playback_stream::<i16>(&device, &config, &pipe),
            SampleFormat::F32 => build_playback_stream::<f32>(&device, &config, &pipe),
            other => {
                return Err(PassthroughError::PlaybackOpen(format!(
                    "unsupported sample format {:?}",
                    other
                )))
            }
        }
        .map_err(|e| PassthroughError::PlaybackOpen(e.to_string()))?;

        Ok(Box::new(CpalPlayback::new(stream, pipe)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_encodings_are_bad_values() {
        let platform = CpalPlatform::new();
        for encoding in [SampleEncoding::Ac3, SampleEncoding::Dts, SampleEncoding::Iec61937] {
            assert_eq!(
                platform.min_buffer_size(48000, OutputChannelMask::Stereo, encoding),
                PlatformStatus::ERROR_BAD_VALUE
            );
        }
    }

    #[test]
    fn zero_rate_is_a_bad_value() {
        let platform = CpalPlatform::new();
        assert_eq!(
            platform.min_buffer_size(0, OutputChannelMask::Stereo, SampleEncoding::Pcm16Bit),
            PlatformStatus::ERROR_BAD_VALUE
        );
    }

    #[test]
    fn bad_value_surfaces_as_buffer_sizing_error() {
        let platform = CpalPlatform::new();
        let err = passthrough_core::min_buffer_size(
            &platform,
            48000,
            OutputChannelMask::Stereo,
            SampleEncoding::Ac3,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            PassthroughError::BufferSizing {
                status: PlatformStatus::BadValue,
                sample_rate_hz: 48000,
                ..
            }
        ));
        assert!(err.to_string().contains("invalid value"));
        assert!(err.to_string().contains("ENCODING_AC3"));
    }
}
