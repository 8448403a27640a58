//! Capture and playback devices backed by cpal streams.
//!
//! The stream lives as long as the device. Its callback only touches the
//! shared `BytePipe`, so `read`/`write` on the pump thread never call into
//! cpal directly.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use passthrough_core::{CaptureDevice, PassthroughError, PlatformStatus, PlaybackDevice};

use crate::format::{self, PcmSample};
use crate::pipe::BytePipe;

pub struct CpalCapture {
    stream: Option<Stream>,
    pipe: Arc<BytePipe>,
}

impl CpalCapture {
    pub(crate) fn new(stream: Stream, pipe: Arc<BytePipe>) -> Self {
        Self {
            stream: Some(stream),
            pipe,
        }
    }
}

impl CaptureDevice for CpalCapture {
    fn start_recording(&mut self) -> Result<(), PassthroughError> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| PassthroughError::DeviceStart("capture stream was released".into()))?;
        stream
            .play()
            .map_err(|e| PassthroughError::DeviceStart(format!("capture: {}", e)))
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, PlatformStatus> {
        self.pipe.read(buf)
    }

    fn stop(&mut self) {
        if let Some(ref stream) = self.stream {
            if let Err(e) = stream.pause() {
                log::warn!("failed to pause capture stream: {}", e);
            }
        }
        self.pipe.close();
    }

    fn release(&mut self) {
        if self.stream.take().is_some() {
            let overrun = self.pipe.overrun_bytes();
            if overrun > 0 {
                log::warn!("capture overran by {} bytes during the session", overrun);
            }
            log::debug!("capture stream released");
        }
    }
}

pub struct CpalPlayback {
    stream: Option<Stream>,
    pipe: Arc<BytePipe>,
}

impl CpalPlayback {
    pub(crate) fn new(stream: Stream, pipe: Arc<BytePipe>) -> Self {
        Self {
            stream: Some(stream),
            pipe,
        }
    }
}

impl PlaybackDevice for CpalPlayback {
    fn play(&mut self) -> Result<(), PassthroughError> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| PassthroughError::DeviceStart("playback stream was released".into()))?;
        stream
            .play()
            .map_err(|e| PassthroughError::DeviceStart(format!("playback: {}", e)))
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, PlatformStatus> {
        self.pipe.write(buf)
    }

    fn stop(&mut self) {
        if let Some(ref stream) = self.stream {
            if let Err(e) = stream.pause() {
                log::warn!("failed to pause playback stream: {}", e);
            }
        }
        self.pipe.close();
    }

    fn release(&mut self) {
        if self.stream.take().is_some() {
            log::debug!("playback stream released ({} bytes unplayed)", self.pipe.buffered());
        }
    }
}

/// Input stream that encodes every callback buffer into `pipe`.
pub(crate) fn build_capture_stream<T: PcmSample>(
    device: &Device,
    config: &StreamConfig,
    pipe: &Arc<BytePipe>,
) -> Result<Stream, cpal::BuildStreamError> {
    let data_pipe = Arc::clone(pipe);
    let error_pipe = Arc::clone(pipe);
    let mut scratch = Vec::new();

    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            scratch.clear();
            format::encode(data, &mut scratch);
            data_pipe.push_overwrite(&scratch);
        },
        move |err| {
            log::error!("capture stream error: {}", err);
            error_pipe.mark_dead();
        },
        None,
    )
}

/// Output stream that drains `pipe`, padding with silence on underrun.
pub(crate) fn build_playback_stream<T: PcmSample>(
    device: &Device,
    config: &StreamConfig,
    pipe: &Arc<BytePipe>,
) -> Result<Stream, cpal::BuildStreamError> {
    let data_pipe = Arc::clone(pipe);
    let error_pipe = Arc::clone(pipe);
    let mut scratch = Vec::new();

    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            scratch.resize(data.len() * T::WIDTH, 0);
            let n = data_pipe.pop_available(&mut scratch);
            format::decode(&scratch[..n], data);
        },
        move |err| {
            log::error!("playback stream error: {}", err);
            error_pipe.mark_dead();
        },
        None,
    )
}
