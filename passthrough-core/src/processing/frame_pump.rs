//! Strict-framing capture → playback pump.
//!
//! Each iteration fills one frame completely from the capture device, then
//! writes it to the playback device. Reads and writes strictly alternate
//! per frame; nothing is read ahead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::models::error::PassthroughError;
use crate::traits::audio_device::{CaptureDevice, PlaybackDevice};
use crate::traits::audio_platform::AudioPlatform;

/// Byte accounting for one pump run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub frames: u64,
    pub bytes_captured: u64,
    pub bytes_played: u64,
    pub bytes_discarded: u64,
}

enum FrameFill {
    Complete,
    /// Cancellation observed with `partial` bytes already in the frame.
    Cancelled { partial: usize },
}

pub struct FramePump<'a> {
    capture: &'a mut dyn CaptureDevice,
    playback: &'a mut dyn PlaybackDevice,
    platform: &'a dyn AudioPlatform,
    cancel: &'a AtomicBool,
    startup_delay: Duration,
    frame: Vec<u8>,
    stats: PumpStats,
}

impl<'a> FramePump<'a> {
    pub fn new(
        capture: &'a mut dyn CaptureDevice,
        playback: &'a mut dyn PlaybackDevice,
        platform: &'a dyn AudioPlatform,
        cancel: &'a AtomicBool,
        frame_size: usize,
        startup_delay: Duration,
    ) -> Self {
        Self {
            capture,
            playback,
            platform,
            cancel,
            startup_delay,
            frame: vec![0; frame_size],
            stats: PumpStats::default(),
        }
    }

    /// Pump until cancelled or until a device reports an error.
    ///
    /// The caller owns the devices and releases them on every exit path.
    pub fn run(mut self) -> Result<PumpStats, PassthroughError> {
        while !self.is_cancelled() {
            if let FrameFill::Cancelled { partial } = self.fill_frame()? {
                if partial > 0 {
                    log::debug!("dropping {} bytes of a partial frame", partial);
                }
                self.stats.bytes_discarded += partial as u64;
                break;
            }
            self.stats.bytes_captured += self.frame.len() as u64;

            if self.stats.frames == 0 {
                log::debug!("first frame captured, warming up for {:?}", self.startup_delay);
                self.platform.warm_up(self.startup_delay);
            }

            self.write_frame()?;
            self.stats.frames += 1;
        }

        Ok(self.stats)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Read until the frame is full. Short reads are accumulated at
    /// increasing offsets; cancellation is polled before every read.
    fn fill_frame(&mut self) -> Result<FrameFill, PassthroughError> {
        let mut filled = 0;
        while filled < self.frame.len() {
            if self.is_cancelled() {
                return Ok(FrameFill::Cancelled { partial: filled });
            }
            match self.capture.read(&mut self.frame[filled..]) {
                Ok(n) => filled += n,
                Err(status) => {
                    log::error!(
                        "capture read failed after {} frames: {} ({})",
                        self.stats.frames,
                        status,
                        status.code()
                    );
                    return Err(PassthroughError::CaptureRead { status });
                }
            }
        }
        Ok(FrameFill::Complete)
    }

    /// Write the whole frame. A write in progress is never interrupted.
    fn write_frame(&mut self) -> Result<(), PassthroughError> {
        let mut written = 0;
        while written < self.frame.len() {
            match self.playback.write(&self.frame[written..]) {
                Ok(n) => written += n,
                Err(status) => {
                    log::error!(
                        "playback write failed after {} frames: {} ({})",
                        self.stats.frames,
                        status,
                        status.code()
                    );
                    return Err(PassthroughError::PlaybackWrite { status });
                }
            }
        }
        self.stats.bytes_played += written as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audio_params::{
        CaptureSource, InputChannelMask, OutputChannelMask, SampleEncoding, StreamClass,
    };
    use crate::models::status::PlatformStatus;
    use crate::sim::{ReadStep, SimEvent, SimulatedPlatform};
    use crate::traits::audio_platform::{CaptureParams, PlaybackParams};
    use std::sync::Arc;

    const FRAME: usize = 1024;

    fn open(
        platform: &SimulatedPlatform,
    ) -> (Box<dyn CaptureDevice>, Box<dyn PlaybackDevice>) {
        let capture = platform
            .open_capture(&CaptureParams {
                source: CaptureSource::Mic,
                sample_rate_hz: 48000,
                channel_mask: InputChannelMask::Stereo,
                encoding: SampleEncoding::Pcm16Bit,
                buffer_size: 3840,
            })
            .unwrap();
        let playback = platform
            .open_playback(&PlaybackParams {
                stream_class: StreamClass::Music,
                sample_rate_hz: 48000,
                channel_mask: OutputChannelMask::Stereo,
                encoding: SampleEncoding::Pcm16Bit,
                buffer_size: 3840,
            })
            .unwrap();
        (capture, playback)
    }

    /// Platform whose playback cancels `cancel` after `frames` writes.
    fn stopping_after(frames: u64, cancel: &Arc<AtomicBool>) -> SimulatedPlatform {
        let flag = Arc::clone(cancel);
        SimulatedPlatform::new().with_write_hook(Arc::new(move |writes| {
            if writes >= frames {
                flag.store(true, Ordering::SeqCst);
            }
        }))
    }

    fn pump(
        platform: &SimulatedPlatform,
        cancel: &AtomicBool,
    ) -> Result<PumpStats, PassthroughError> {
        let (mut capture, mut playback) = open(platform);
        FramePump::new(
            capture.as_mut(),
            playback.as_mut(),
            platform,
            cancel,
            FRAME,
            Duration::from_millis(100),
        )
        .run()
    }

    #[test]
    fn pre_cancelled_pump_moves_nothing() {
        let platform = SimulatedPlatform::new();
        let cancel = AtomicBool::new(true);

        let stats = pump(&platform, &cancel).unwrap();
        assert_eq!(stats, PumpStats::default());
        assert_eq!(platform.count(|e| matches!(e, SimEvent::Read(_))), 0);
        assert_eq!(platform.count(|e| matches!(e, SimEvent::WarmUp(_))), 0);
    }

    #[test]
    fn short_reads_are_accumulated_into_full_frames() {
        let cancel = Arc::new(AtomicBool::new(false));
        let platform = stopping_after(2, &cancel).with_reads([
            ReadStep::Bytes(300),
            ReadStep::Bytes(0),
            ReadStep::Bytes(700),
            ReadStep::Bytes(24),
            ReadStep::Bytes(1),
        ]);

        let stats = pump(&platform, &cancel).unwrap();
        assert_eq!(stats.frames, 2);
        assert_eq!(platform.writes(), vec![FRAME, FRAME]);
        assert_eq!(platform.captured(), platform.played());
    }

    #[test]
    fn warm_up_happens_once_before_first_write() {
        let cancel = Arc::new(AtomicBool::new(false));
        let platform = stopping_after(3, &cancel);

        pump(&platform, &cancel).unwrap();

        let events = platform.events();
        let warm_ups: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, SimEvent::WarmUp(_)))
            .map(|(i, _)| i)
            .collect();
        let first_write = events
            .iter()
            .position(|e| matches!(e, SimEvent::Write(_)))
            .unwrap();
        let first_read = events
            .iter()
            .position(|e| matches!(e, SimEvent::Read(_)))
            .unwrap();

        assert_eq!(warm_ups.len(), 1);
        assert!(first_read < warm_ups[0]);
        assert_eq!(warm_ups[0] + 1, first_write);
        assert_eq!(events[warm_ups[0]], SimEvent::WarmUp(Duration::from_millis(100)));
    }

    #[test]
    fn read_error_aborts_after_previous_complete_frames() {
        // Frame 4 fails halfway through.
        let cancel = AtomicBool::new(false);
        let platform = SimulatedPlatform::new().with_reads([
            ReadStep::Bytes(FRAME),
            ReadStep::Bytes(FRAME),
            ReadStep::Bytes(FRAME),
            ReadStep::Bytes(512),
            ReadStep::Fail(-3),
        ]);

        let err = pump(&platform, &cancel).unwrap_err();
        assert_eq!(
            err,
            PassthroughError::CaptureRead {
                status: PlatformStatus::InvalidOperation
            }
        );
        assert_eq!(platform.writes(), vec![FRAME; 3]);
    }

    #[test]
    fn write_error_aborts() {
        let cancel = AtomicBool::new(false);
        let platform = SimulatedPlatform::new().with_write_failure(2, -6);

        let err = pump(&platform, &cancel).unwrap_err();
        assert_eq!(
            err,
            PassthroughError::PlaybackWrite {
                status: PlatformStatus::DeadObject
            }
        );
        assert_eq!(platform.writes(), vec![FRAME]);
    }

    #[test]
    fn short_writes_complete_the_frame() {
        let cancel = Arc::new(AtomicBool::new(false));
        let platform = stopping_after(4, &cancel).with_max_write(300);

        let stats = pump(&platform, &cancel).unwrap();
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.bytes_played, FRAME as u64);
        assert_eq!(platform.writes(), vec![300, 300, 300, 124]);
    }

    #[test]
    fn cancellation_between_frames_discards_nothing() {
        let cancel = Arc::new(AtomicBool::new(false));
        let platform = stopping_after(1, &cancel);

        let stats = pump(&platform, &cancel).unwrap();
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.bytes_discarded, 0);
        assert_eq!(stats.bytes_captured, stats.bytes_played);
        assert_eq!(platform.count(|e| matches!(e, SimEvent::Read(_))), 1);
    }

    #[test]
    fn cancellation_mid_frame_discards_partial_bytes() {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let platform = SimulatedPlatform::new()
            .with_reads([ReadStep::Bytes(FRAME), ReadStep::Bytes(400)])
            .with_read_hook(Arc::new(move |reads| {
                if reads == 2 {
                    flag.store(true, Ordering::SeqCst);
                }
            }));

        let stats = pump(&platform, &cancel).unwrap();
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.bytes_captured, FRAME as u64);
        assert_eq!(stats.bytes_played, FRAME as u64);
        assert_eq!(stats.bytes_discarded, 400);
        assert_eq!(platform.writes(), vec![FRAME]);
    }
}
