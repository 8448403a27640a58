use std::sync::atomic::AtomicBool;
use std::time::Instant;

use chrono::Utc;

use crate::models::config::{EngineSettings, SessionConfig};
use crate::models::error::PassthroughError;
use crate::models::session_summary::{SessionId, SessionSummary};
use crate::models::state::EngineState;
use crate::processing::buffer_sizing;
use crate::processing::frame_pump::FramePump;
use crate::traits::audio_device::{CaptureDevice, PlaybackDevice};
use crate::traits::audio_platform::{AudioPlatform, CaptureParams, PlaybackParams};
use crate::traits::session_delegate::SessionDelegate;

/// Devices held by one session.
///
/// Dropping the set stops and releases capture, then playback, whatever
/// the exit path (error return, cancellation or unwinding).
#[derive(Default)]
struct OpenDevices {
    capture: Option<Box<dyn CaptureDevice>>,
    playback: Option<Box<dyn PlaybackDevice>>,
}

impl Drop for OpenDevices {
    fn drop(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            capture.stop();
            capture.release();
        }
        if let Some(mut playback) = self.playback.take() {
            playback.stop();
            playback.release();
        }
    }
}

/// Runs one passthrough session to completion on the calling thread.
///
/// Data flow:
/// ```text
/// [native rate] → [buffer sizing] → open playback, open capture
///     → start both → [FramePump: capture → frame → playback] → release
/// ```
pub struct StreamingEngine<'a> {
    platform: &'a dyn AudioPlatform,
    settings: &'a EngineSettings,
    delegate: Option<&'a dyn SessionDelegate>,
}

impl<'a> StreamingEngine<'a> {
    pub fn new(platform: &'a dyn AudioPlatform, settings: &'a EngineSettings) -> Self {
        Self {
            platform,
            settings,
            delegate: None,
        }
    }

    pub fn with_delegate(mut self, delegate: &'a dyn SessionDelegate) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Run until `cancel` is set or a device fails. Blocks.
    ///
    /// Cancellation yields `Ok`; the engine is back in `Idle` with no
    /// device open whenever this returns.
    pub fn run(
        &self,
        id: SessionId,
        config: &SessionConfig,
        cancel: &AtomicBool,
    ) -> Result<SessionSummary, PassthroughError> {
        self.settings
            .validate()
            .map_err(PassthroughError::InvalidSettings)?;

        self.set_state(EngineState::Starting);
        let mut devices = OpenDevices::default();
        let result = self.open_and_pump(id, config, cancel, &mut devices);

        self.set_state(EngineState::Stopping);
        drop(devices);
        self.set_state(EngineState::Idle);

        match &result {
            Ok(summary) => log::info!(
                "session {} stopped after {} frames ({:.2}s)",
                id,
                summary.frames,
                summary.duration_secs
            ),
            Err(e) => log::error!("session {} failed: {}", id, e),
        }
        result
    }

    fn open_and_pump(
        &self,
        id: SessionId,
        config: &SessionConfig,
        cancel: &AtomicBool,
        devices: &mut OpenDevices,
    ) -> Result<SessionSummary, PassthroughError> {
        let started_at = Utc::now();
        let clock = Instant::now();

        let sample_rate_hz = self.platform.native_output_sample_rate(config.stream_class)?;

        // The output mask sizes both devices.
        let buffer_size = buffer_sizing::min_buffer_size(
            self.platform,
            sample_rate_hz,
            config.output_mask,
            config.encoding,
        )?;

        log::info!(
            "session {}: {} → {} at {} Hz, {}, buffer {} bytes",
            id,
            config.source,
            config.stream_class,
            sample_rate_hz,
            config.encoding,
            buffer_size
        );

        let playback = devices.playback.insert(self.platform.open_playback(&PlaybackParams {
            stream_class: config.stream_class,
            sample_rate_hz,
            channel_mask: config.output_mask,
            encoding: config.encoding,
            buffer_size,
        })?);
        let capture = devices.capture.insert(self.platform.open_capture(&CaptureParams {
            source: config.source,
            sample_rate_hz,
            channel_mask: config.input_mask,
            encoding: config.encoding,
            buffer_size,
        })?);

        capture.start_recording()?;
        playback.play()?;

        self.set_state(EngineState::Running);

        let stats = FramePump::new(
            &mut **capture,
            &mut **playback,
            self.platform,
            cancel,
            self.settings.frame_size,
            self.settings.startup_delay,
        )
        .run()?;

        Ok(SessionSummary {
            id,
            config: *config,
            started_at,
            sample_rate_hz,
            buffer_size,
            frames: stats.frames,
            bytes_captured: stats.bytes_captured,
            bytes_played: stats.bytes_played,
            bytes_discarded: stats.bytes_discarded,
            duration_secs: clock.elapsed().as_secs_f64(),
        })
    }

    fn set_state(&self, state: EngineState) {
        log::debug!("engine state → {:?}", state);
        if let Some(delegate) = self.delegate {
            delegate.on_state_changed(state);
        }
    }
}
