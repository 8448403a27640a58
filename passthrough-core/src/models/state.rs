/// Streaming loop engine state machine.
///
/// State transitions:
/// ```text
/// idle → starting → running → stopping → idle
///            ↓                   ↑
///            └───────────────────┘   (setup failure)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// No devices open, no pump running.
    #[default]
    Idle,
    /// Sizing the buffer, opening and starting devices.
    Starting,
    /// The read→write pump is executing.
    Running,
    /// Devices are being stopped and released.
    Stopping,
}
