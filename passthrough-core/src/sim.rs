//! Scripted in-memory platform.
//!
//! Records every call the engine makes so tests can assert on ordering,
//! byte counts and device lifetimes without audio hardware.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::audio_params::{OutputChannelMask, SampleEncoding, StreamClass};
use crate::models::error::PassthroughError;
use crate::models::status::PlatformStatus;
use crate::traits::audio_device::{CaptureDevice, PlaybackDevice};
use crate::traits::audio_platform::{AudioPlatform, CaptureParams, PlaybackParams};

/// Behavior of one capture read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStep {
    /// Deliver up to this many bytes (capped by the caller's buffer).
    Bytes(usize),
    /// Return this negative platform code.
    Fail(i32),
}

/// A call observed by the simulated platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    OpenPlayback(PlaybackParams),
    OpenCapture(CaptureParams),
    StartRecording,
    Play,
    Read(usize),
    ReadFailed(i32),
    WarmUp(Duration),
    Write(usize),
    WriteFailed(i32),
    StopCapture,
    ReleaseCapture,
    StopPlayback,
    ReleasePlayback,
}

/// Hook invoked after every successful read or write with the running
/// count of such calls.
pub type CallHook = Arc<dyn Fn(u64) + Send + Sync + 'static>;

#[derive(Default)]
struct SimState {
    events: Vec<SimEvent>,
    read_script: VecDeque<ReadStep>,
    sizing_queries: Vec<(u32, OutputChannelMask, SampleEncoding)>,
    captured: Vec<u8>,
    played: Vec<u8>,
    next_byte: u8,
    open_devices: usize,
    reads: u64,
    writes: u64,
}

/// In-memory `AudioPlatform` with scripted capture reads.
///
/// Reads not covered by the script deliver the full requested length.
/// Captured bytes follow a running counter pattern so passthrough fidelity
/// can be checked by comparing `captured()` with `played()`.
pub struct SimulatedPlatform {
    native_rate: u32,
    min_buffer: i32,
    capture_open_error: Option<String>,
    playback_open_error: Option<String>,
    start_error: Option<String>,
    write_failure: Option<(u64, i32)>,
    max_write: Option<usize>,
    read_hook: Option<CallHook>,
    write_hook: Option<CallHook>,
    state: Arc<Mutex<SimState>>,
}

impl SimulatedPlatform {
    pub fn new() -> Self {
        Self {
            native_rate: 48000,
            min_buffer: 3840,
            capture_open_error: None,
            playback_open_error: None,
            start_error: None,
            write_failure: None,
            max_write: None,
            read_hook: None,
            write_hook: None,
            state: Arc::new(Mutex::new(SimState::default())),
        }
    }

    pub fn with_native_rate(mut self, rate: u32) -> Self {
        self.native_rate = rate;
        self
    }

    /// Raw answer of the minimum buffer size query (negative for a sentinel).
    pub fn with_min_buffer_size(mut self, raw: i32) -> Self {
        self.min_buffer = raw;
        self
    }

    pub fn with_reads(self, steps: impl IntoIterator<Item = ReadStep>) -> Self {
        self.state.lock().read_script.extend(steps);
        self
    }

    pub fn with_capture_open_error(mut self, message: &str) -> Self {
        self.capture_open_error = Some(message.into());
        self
    }

    pub fn with_playback_open_error(mut self, message: &str) -> Self {
        self.playback_open_error = Some(message.into());
        self
    }

    /// Make `start_recording` fail.
    pub fn with_start_error(mut self, message: &str) -> Self {
        self.start_error = Some(message.into());
        self
    }

    /// Fail the `nth` write (1-based) with `code`.
    pub fn with_write_failure(mut self, nth: u64, code: i32) -> Self {
        self.write_failure = Some((nth, code));
        self
    }

    /// Accept at most `max` bytes per write call.
    pub fn with_max_write(mut self, max: usize) -> Self {
        self.max_write = Some(max);
        self
    }

    pub fn with_read_hook(mut self, hook: CallHook) -> Self {
        self.read_hook = Some(hook);
        self
    }

    pub fn with_write_hook(mut self, hook: CallHook) -> Self {
        self.write_hook = Some(hook);
        self
    }

    pub fn events(&self) -> Vec<SimEvent> {
        self.state.lock().events.clone()
    }

    pub fn count(&self, pred: impl Fn(&SimEvent) -> bool) -> usize {
        self.state.lock().events.iter().filter(|e| pred(e)).count()
    }

    /// Sizes of successful writes, in order.
    pub fn writes(&self) -> Vec<usize> {
        self.state
            .lock()
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Write(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    /// Devices opened and not yet released.
    pub fn open_device_count(&self) -> usize {
        self.state.lock().open_devices
    }

    pub fn captured(&self) -> Vec<u8> {
        self.state.lock().captured.clone()
    }

    pub fn played(&self) -> Vec<u8> {
        self.state.lock().played.clone()
    }

    pub fn sizing_queries(&self) -> Vec<(u32, OutputChannelMask, SampleEncoding)> {
        self.state.lock().sizing_queries.clone()
    }

    fn record(&self, event: SimEvent) {
        self.state.lock().events.push(event);
    }
}

impl Default for SimulatedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlatform for SimulatedPlatform {
    fn native_output_sample_rate(&self, _stream_class: StreamClass) -> Result<u32, PassthroughError> {
        if self.native_rate == 0 {
            return Err(PassthroughError::SampleRate("no output route".into()));
        }
        Ok(self.native_rate)
    }

    fn min_buffer_size(
        &self,
        sample_rate_hz: u32,
        channel_mask: OutputChannelMask,
        encoding: SampleEncoding,
    ) -> i32 {
        self.state
            .lock()
            .sizing_queries
            .push((sample_rate_hz, channel_mask, encoding));
        self.min_buffer
    }

    fn open_capture(&self, params: &CaptureParams) -> Result<Box<dyn CaptureDevice>, PassthroughError> {
        if let Some(ref message) = self.capture_open_error {
            return Err(PassthroughError::CaptureOpen(message.clone()));
        }
        let mut state = self.state.lock();
        state.events.push(SimEvent::OpenCapture(*params));
        state.open_devices += 1;
        Ok(Box::new(SimCapture {
            state: Arc::clone(&self.state),
            start_error: self.start_error.clone(),
            read_hook: self.read_hook.clone(),
        }))
    }

    fn open_playback(&self, params: &PlaybackParams) -> Result<Box<dyn PlaybackDevice>, PassthroughError> {
        if let Some(ref message) = self.playback_open_error {
            return Err(PassthroughError::PlaybackOpen(message.clone()));
        }
        let mut state = self.state.lock();
        state.events.push(SimEvent::OpenPlayback(*params));
        state.open_devices += 1;
        Ok(Box::new(SimPlayback {
            state: Arc::clone(&self.state),
            write_failure: self.write_failure,
            max_write: self.max_write,
            write_hook: self.write_hook.clone(),
        }))
    }

    fn warm_up(&self, delay: Duration) {
        self.record(SimEvent::WarmUp(delay));
    }
}

struct SimCapture {
    state: Arc<Mutex<SimState>>,
    start_error: Option<String>,
    read_hook: Option<CallHook>,
}

impl CaptureDevice for SimCapture {
    fn start_recording(&mut self) -> Result<(), PassthroughError> {
        if let Some(ref message) = self.start_error {
            return Err(PassthroughError::DeviceStart(message.clone()));
        }
        self.state.lock().events.push(SimEvent::StartRecording);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, PlatformStatus> {
        let (n, reads) = {
            let mut state = self.state.lock();
            let step = state
                .read_script
                .pop_front()
                .unwrap_or(ReadStep::Bytes(buf.len()));

            let n = match step {
                ReadStep::Bytes(n) => n.min(buf.len()),
                ReadStep::Fail(code) => {
                    state.events.push(SimEvent::ReadFailed(code));
                    return Err(PlatformStatus::from_code(code));
                }
            };
            for byte in &mut buf[..n] {
                *byte = state.next_byte;
                state.next_byte = state.next_byte.wrapping_add(1);
            }
            state.captured.extend_from_slice(&buf[..n]);
            state.events.push(SimEvent::Read(n));
            state.reads += 1;
            (n, state.reads)
        };

        if let Some(ref hook) = self.read_hook {
            hook(reads);
        }
        Ok(n)
    }

    fn stop(&mut self) {
        self.state.lock().events.push(SimEvent::StopCapture);
    }

    fn release(&mut self) {
        let mut state = self.state.lock();
        state.events.push(SimEvent::ReleaseCapture);
        state.open_devices -= 1;
    }
}

struct SimPlayback {
    state: Arc<Mutex<SimState>>,
    write_failure: Option<(u64, i32)>,
    max_write: Option<usize>,
    write_hook: Option<CallHook>,
}

impl PlaybackDevice for SimPlayback {
    fn play(&mut self) -> Result<(), PassthroughError> {
        self.state.lock().events.push(SimEvent::Play);
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, PlatformStatus> {
        let (n, writes) = {
            let mut state = self.state.lock();
            let attempt = state.writes + 1;
            if let Some((nth, code)) = self.write_failure {
                if attempt == nth {
                    state.events.push(SimEvent::WriteFailed(code));
                    return Err(PlatformStatus::from_code(code));
                }
            }
            let n = self.max_write.map_or(buf.len(), |max| max.min(buf.len()));
            state.played.extend_from_slice(&buf[..n]);
            state.events.push(SimEvent::Write(n));
            state.writes = attempt;
            (n, attempt)
        };

        if let Some(ref hook) = self.write_hook {
            hook(writes);
        }
        Ok(n)
    }

    fn stop(&mut self) {
        self.state.lock().events.push(SimEvent::StopPlayback);
    }

    fn release(&mut self) {
        let mut state = self.state.lock();
        state.events.push(SimEvent::ReleasePlayback);
        state.open_devices -= 1;
    }
}
