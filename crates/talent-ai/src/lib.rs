//! Bias-aware candidate scoring and ranking for executive-search mandates.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use config::{AppConfig, AppEnvironment, ConfigError, ServerConfig, TelemetryConfig};
pub use error::AppError;
