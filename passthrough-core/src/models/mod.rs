pub mod audio_params;
pub mod config;
pub mod error;
pub mod session_summary;
pub mod state;
pub mod status;
