//! Environment-driven configuration

use crate::error::ConfigError;
use crate::http_generator::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use crate::selection::DEFAULT_MATCH_LIMIT;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CORPUS_PATH: &str = "data/reglamento.json";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:8080",
    "http://localhost:8081",
    "http://localhost:5173",
];

/// Hosted text-generation settings. Present only when an API key is set.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub corpus_path: PathBuf,
    pub max_results: usize,
    pub generator: Option<GeneratorConfig>,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let generator = match get("HUGGINGFACE_API_KEY") {
            Some(api_key) => {
                let timeout_secs: u64 = parse_or("REGLAMENTO_LLM_TIMEOUT_SECS", get("REGLAMENTO_LLM_TIMEOUT_SECS"), DEFAULT_TIMEOUT.as_secs())?;
                if timeout_secs == 0 {
                    return Err(invalid("REGLAMENTO_LLM_TIMEOUT_SECS", "0", "must be positive"));
                }
                Some(GeneratorConfig {
                    api_key,
                    endpoint: get("REGLAMENTO_LLM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
                    model: get("REGLAMENTO_LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
            None => None,
        };

        let max_results: usize = parse_or("REGLAMENTO_MAX_RESULTS", get("REGLAMENTO_MAX_RESULTS"), DEFAULT_MATCH_LIMIT)?;
        if max_results == 0 {
            return Err(invalid("REGLAMENTO_MAX_RESULTS", "0", "must be positive"));
        }

        let allowed_origins = match get("REGLAMENTO_CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            corpus_path: get("REGLAMENTO_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CORPUS_PATH)),
            max_results,
            generator,
            server: ServerConfig {
                port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
                allowed_origins,
            },
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| invalid(key, &raw, &e.to_string())),
        None => Ok(default),
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.corpus_path, PathBuf::from(DEFAULT_CORPUS_PATH));
        assert_eq!(config.max_results, 3);
        assert_eq!(config.generator, None);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.allowed_origins.len(), 3);
    }

    #[test]
    fn test_api_key_enables_generator() {
        let config = config_from(&[("HUGGINGFACE_API_KEY", "hf_abc")]).unwrap();
        let generator = config.generator.unwrap();
        assert_eq!(generator.api_key, "hf_abc");
        assert_eq!(generator.model, DEFAULT_MODEL);
        assert_eq!(generator.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(generator.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_blank_api_key_disables_generator() {
        let config = config_from(&[("HUGGINGFACE_API_KEY", "  ")]).unwrap();
        assert_eq!(config.generator, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HUGGINGFACE_API_KEY", "hf_abc"),
            ("REGLAMENTO_LLM_MODEL", "org/otro-modelo"),
            ("REGLAMENTO_LLM_TIMEOUT_SECS", "30"),
            ("REGLAMENTO_PATH", "/srv/reglamento.json"),
            ("REGLAMENTO_MAX_RESULTS", "5"),
            ("REGLAMENTO_CORS_ORIGINS", "https://a.mx, https://b.mx,"),
            ("PORT", "9000"),
        ])
        .unwrap();

        let generator = config.generator.unwrap();
        assert_eq!(generator.model, "org/otro-modelo");
        assert_eq!(generator.timeout, Duration::from_secs(30));
        assert_eq!(config.corpus_path, PathBuf::from("/srv/reglamento.json"));
        assert_eq!(config.max_results, 5);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.allowed_origins, vec!["https://a.mx", "https://b.mx"]);
    }

    #[test]
    fn test_invalid_numbers() {
        let err = config_from(&[("PORT", "ochenta")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));

        let err = config_from(&[("REGLAMENTO_MAX_RESULTS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "REGLAMENTO_MAX_RESULTS", .. }));
    }
}
