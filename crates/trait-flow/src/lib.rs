pub mod config;
pub mod error;
pub mod navigation;
pub mod telemetry;
pub mod workflows;
