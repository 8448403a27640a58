//! # passthrough-cpal
//!
//! cpal backend for audio-passthrough.
//!
//! Provides:
//! - `CpalPlatform`: `AudioPlatform` over the default input/output devices
//! - `CpalCapture` / `CpalPlayback`: blocking devices fed by cpal callbacks
//! - `BytePipe`: the condvar-guarded byte ring between callback and pump
//!
//! ## Platform Requirements
//! - Linux: ALSA development headers (`libasound2-dev`) for linking
//! - Windows and macOS: no extra setup
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use passthrough_core::{PassthroughController, Selection};
//! use passthrough_cpal::CpalPlatform;
//!
//! let controller = PassthroughController::new(Arc::new(CpalPlatform::new()));
//! controller.toggle(true, &Selection::default()).unwrap();
//! ```

pub mod device;
pub mod format;
pub mod pipe;
pub mod platform;
pub mod ring_buffer;

pub use device::{CpalCapture, CpalPlayback};
pub use pipe::BytePipe;
pub use platform::CpalPlatform;
pub use ring_buffer::RingBuffer;
