pub mod config;
pub mod core;
pub mod errors;

// Re-export commonly used items for convenience
pub use config::{AppConfig, ConfigError, ConfigLayer};
pub use core::*;
pub use errors::{PipelineError, PipelineResult};
