//! Server configuration.
//!
//! Read once at startup from the environment. Every value has a default,
//! so an empty environment yields a working configuration.

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default maximum request body size buffered for validation: 2 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Port to bind.
    pub port: u16,
    /// Largest body, in bytes, the validation middleware will buffer.
    pub body_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `REQCHECK_BODY_LIMIT` in bytes (default: 2097152)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set but does not
    /// parse, or [`ConfigError::ZeroBodyLimit`] for a zero body limit.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let body_limit = env_parse("REQCHECK_BODY_LIMIT", defaults.body_limit)?;
        if body_limit == 0 {
            return Err(ConfigError::ZeroBodyLimit);
        }
        Ok(Self {
            port: env_parse("PORT", defaults.port)?,
            body_limit,
        })
    }
}

fn env_parse<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var: var.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: String, value: String },
    #[error("REQCHECK_BODY_LIMIT must be greater than zero")]
    ZeroBodyLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = ApiConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.body_limit, 2_097_152);
    }

    #[test]
    fn env_parse_uses_default_when_var_absent() {
        let port: u16 = env_parse("NONEXISTENT_VAR_REQCHECK_1", 1234).unwrap();
        assert_eq!(port, 1234);
    }

    #[test]
    fn env_parse_reads_and_trims() {
        std::env::set_var("TEST_REQCHECK_LIMIT_OK", " 4096 ");
        let limit: usize = env_parse("TEST_REQCHECK_LIMIT_OK", 1).unwrap();
        std::env::remove_var("TEST_REQCHECK_LIMIT_OK");
        assert_eq!(limit, 4096);
    }

    #[test]
    fn env_parse_rejects_garbage() {
        std::env::set_var("TEST_REQCHECK_PORT_BAD", "eighty");
        let result: Result<u16, _> = env_parse("TEST_REQCHECK_PORT_BAD", 8080);
        std::env::remove_var("TEST_REQCHECK_PORT_BAD");
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for TEST_REQCHECK_PORT_BAD: \"eighty\""
        );
    }
}
