use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Exclusion tokens are not blank
/// - Cache path is set when the cache is enabled
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.filter.exclusion.iter().any(|t| t.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "filter.exclusion cannot contain blank tokens".to_string(),
        ));
    }

    if config.cache.enabled && config.cache.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "cache.path must be set when the cache is enabled".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheConfig, ServerConfig};
    use std::path::PathBuf;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                port: 0,
                ..ServerConfig::default()
            },
            ..Config::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_blank_exclusion_fails() {
        let mut config = Config::default();
        config.filter.exclusion = vec!["CAM".to_string(), "  ".to_string()];
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_empty_cache_path() {
        let mut config = Config {
            cache: CacheConfig {
                enabled: true,
                path: PathBuf::new(),
            },
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());

        config.cache.enabled = false;
        assert!(validate_config(&config).is_ok());
    }
}
