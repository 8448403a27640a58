pub mod audio_device;
pub mod audio_platform;
pub mod session_delegate;
