use crate::logging::log_level::LogLevel;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: LogLevel,
    /// Output format for logs
    pub format: OutputFormat,
    /// Level applied to the Kafka client library's own diagnostics
    pub client_level: LogLevel,
}

/// Output format for log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// Human readable, multi-line format
    Pretty,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: OutputFormat::Json,
            client_level: LogLevel::Warn,
        }
    }
}

impl LogConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LogConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup("LOG_LEVEL").and_then(|s| s.parse::<LogLevel>().ok()) {
            config.level = level;
        }

        if let Some(format_str) = lookup("LOG_FORMAT") {
            config.format = match format_str.to_lowercase().as_str() {
                "pretty" | "text" => OutputFormat::Pretty,
                _ => OutputFormat::Json,
            };
        }

        config
    }

    /// Default `EnvFilter` directives used when `RUST_LOG` is not set.
    pub fn filter_directives(&self) -> String {
        format!(
            "{},rskafka={}",
            self.level.as_directive(),
            self.client_level.as_directive()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = LogConfig::from_lookup(|_| None);
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.filter_directives(), "info,rskafka=warn");
    }

    #[test]
    fn test_env_overrides() {
        let config = LogConfig::from_lookup(lookup_from(&[
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "pretty"),
        ]));
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, OutputFormat::Pretty);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = LogConfig::from_lookup(lookup_from(&[
            ("LOG_LEVEL", "loud"),
            ("LOG_FORMAT", "xml"),
        ]));
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, OutputFormat::Json);
    }
}
