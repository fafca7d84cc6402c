pub mod app;
pub mod config;
pub mod jobs;
pub mod logging;
pub mod telemetry;
