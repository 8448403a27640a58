//! # passthrough-core
//!
//! Platform-agnostic core of a live audio passthrough: capture from an
//! input device and immediately replay to an output device.
//!
//! Provides the parameter catalog, buffer sizing, the strict-framing pump
//! and session orchestration. Platform backends (cpal, or the in-memory
//! `SimulatedPlatform`) implement the `AudioPlatform` trait and plug into
//! the generic `PassthroughController`.
//!
//! ## Architecture
//!
//! ```text
//! passthrough-core (this crate)
//! ├── catalog/      ← ParameterCatalog, ParameterTable, Selection
//! ├── traits/       ← AudioPlatform, CaptureDevice, PlaybackDevice, SessionDelegate
//! ├── models/       ← PassthroughError, PlatformStatus, EngineState, SessionConfig, etc.
//! ├── processing/   ← buffer sizing, FramePump
//! ├── session/      ← StreamingEngine, PassthroughController
//! └── sim           ← SimulatedPlatform (scripted, no hardware)
//! ```

pub mod catalog;
pub mod models;
pub mod processing;
pub mod session;
pub mod sim;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use catalog::{ParameterCatalog, ParameterCategory, ParameterValue, Selection};
pub use models::audio_params::{
    CaptureSource, InputChannelMask, OutputChannelMask, Parameter, SampleEncoding, StreamClass,
};
pub use models::config::{EngineSettings, SessionConfig, DEFAULT_FRAME_SIZE, DEFAULT_STARTUP_DELAY};
pub use models::error::PassthroughError;
pub use models::session_summary::{SessionId, SessionSummary};
pub use models::state::EngineState;
pub use models::status::PlatformStatus;
pub use processing::buffer_sizing::min_buffer_size;
pub use processing::frame_pump::{FramePump, PumpStats};
pub use session::controller::PassthroughController;
pub use session::engine::StreamingEngine;
pub use sim::SimulatedPlatform;
pub use traits::audio_device::{CaptureDevice, PlaybackDevice};
pub use traits::audio_platform::{AudioPlatform, CaptureParams, PlaybackParams};
pub use traits::session_delegate::SessionDelegate;
