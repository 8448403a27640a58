pub mod controller;
pub mod engine;
