pub mod context;
pub mod log_config;
pub mod log_level;

pub use context::dispatcher_span;
pub use log_config::{LogConfig, OutputFormat};
pub use log_level::LogLevel;
