use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_POSITION_URL: &str = "http://api.open-notify.org/iss-now.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub passes: PassesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Answer client errors with 400 and upstream errors with 502 instead of
    /// always returning 200
    #[serde(default)]
    pub strict_status_codes: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            strict_status_codes: false,
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_POSITION_URL.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PassesConfig {
    /// Upper bound on `n`; unlimited when unset
    #[serde(default)]
    pub max_count: Option<u32>,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Read `path` if given, otherwise fall back to built-in defaults
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert!(!config.web.strict_status_codes);
        assert_eq!(config.upstream.url, DEFAULT_POSITION_URL);
        assert_eq!(config.upstream.timeout, Duration::from_secs(5));
        assert_eq!(config.passes.max_count, None);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "web:\n  strict_status_codes: true\nupstream:\n  timeout: 1500ms\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert!(config.web.strict_status_codes);
        assert_eq!(config.upstream.url, DEFAULT_POSITION_URL);
        assert_eq!(config.upstream.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn full_yaml() {
        let yaml = r#"
web:
  bind: 127.0.0.1:9000
upstream:
  url: http://localhost:1234/now.json
  timeout: 2s
passes:
  max_count: 12
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.web.bind, "127.0.0.1:9000");
        assert_eq!(config.upstream.url, "http://localhost:1234/now.json");
        assert_eq!(config.upstream.timeout, Duration::from_secs(2));
        assert_eq!(config.passes.max_count, Some(12));
    }

    #[test]
    fn rejects_bad_timeout() {
        let yaml = "upstream:\n  timeout: soon\n";
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Config::from_file("/nonexistent/iss-pass.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
