pub mod buffer_sizing;
pub mod frame_pump;
