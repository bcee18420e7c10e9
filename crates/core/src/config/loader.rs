use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix of environment overrides. `_` separates nesting levels, so
/// `RECONCILER_SERVER_PORT` sets `server.port`.
pub const ENV_PREFIX: &str = "RECONCILER_";

/// Sources read by [`load_config`], lowest precedence first.
///
/// `RECONCILER_CONFIG` names the file itself and is not a config key.
pub fn config_sources(path: &Path) -> Figment {
    Figment::from(Toml::file(path)).merge(Env::prefixed(ENV_PREFIX).split("_").ignore(&["config"]))
}

/// Load configuration from a TOML file, then apply environment overrides.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }
    extract(config_sources(path))
}

/// Parse configuration from TOML text alone, without environment overrides.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn extract(sources: Figment) -> Result<Config, ConfigError> {
    sources
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::Serialized;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[server]
port = 9000

[filter]
exclusion = ["CAM"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.filter.exclusion, vec!["CAM"]);
    }

    #[test]
    fn test_load_config_from_str_invalid() {
        let toml = r#"
[filter]
exclusion = "CAM"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"
port = 3000

[cache]
enabled = false
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert!(!config.cache.enabled);
    }

    #[test]
    fn test_later_sources_override_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[server]\nport = 3000\n\n[filter]\nexclusion = [\"CAM\"]").unwrap();

        let config = extract(
            config_sources(temp_file.path()).merge(Serialized::default("server.port", 9100)),
        )
        .unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.filter.exclusion, vec!["CAM"]);
    }

    #[test]
    fn test_directory_is_not_a_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = load_config(dir.path());
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
