use crate::models::error::PassthroughError;
use crate::models::status::PlatformStatus;

/// An open audio-input stream.
///
/// Devices are opened on the pump thread and never leave it, so
/// implementations may hold thread-bound platform objects.
pub trait CaptureDevice {
    /// Begin capturing. Reads before this call are undefined.
    fn start_recording(&mut self) -> Result<(), PassthroughError>;

    /// Blocking read into `buf`.
    ///
    /// May return fewer bytes than `buf.len()` (a short read). A negative
    /// platform code is reported as `Err`.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, PlatformStatus>;

    /// Stop capturing. Must tolerate a device that never started.
    fn stop(&mut self);

    /// Release the underlying platform resources. Called exactly once,
    /// after `stop`.
    fn release(&mut self);
}

/// An open audio-output stream.
pub trait PlaybackDevice {
    /// Begin consuming written data.
    fn play(&mut self) -> Result<(), PassthroughError>;

    /// Blocking write of `buf`. May accept fewer bytes than offered.
    fn write(&mut self, buf: &[u8]) -> Result<usize, PlatformStatus>;

    /// Stop playback. Must tolerate a device that never started.
    fn stop(&mut self);

    /// Release the underlying platform resources. Called exactly once,
    /// after `stop`.
    fn release(&mut self);
}
