use core_config::{ConfigError, FromEnv, env_parse};

/// - `VISITOR_CHANNEL_CAPACITY` (default 1024): visits buffered between
///   handlers and the writer before new ones are dropped
#[derive(Debug, Clone)]
pub struct VisitorConfig {
    pub channel_capacity: usize,
}

impl Default for VisitorConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

impl FromEnv for VisitorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let channel_capacity = env_parse("VISITOR_CHANNEL_CAPACITY", 1024usize)?;
        if channel_capacity == 0 {
            return Err(ConfigError::ParseError {
                key: "VISITOR_CHANNEL_CAPACITY".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }
        Ok(Self { channel_capacity })
    }
}
