//! Client configuration: where rendered requests are sent.
//!
//! Loaded from YAML (or JSON, which YAML accepts) or from the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::error::Error;
use crate::params::QueryValues;
use crate::Result;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9200";
pub const BASE_URL_ENV: &str = "SEARCH_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Values sent with every request, ahead of the request's own values
    #[serde(default, skip_serializing_if = "QueryValues::is_empty")]
    pub default_params: QueryValues,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_params: QueryValues::new(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid absolute URL")
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            default_params: QueryValues::new(),
        }
    }

    pub fn with_default_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_params.add(key, value);
        self
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str::<ClientConfig>(content)
            .map_err(|e| Error::configuration(format!("Invalid client config: {}", e)))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Read the base URL from `SEARCH_BASE_URL`, falling back to localhost.
    pub fn from_env() -> Result<Self> {
        match std::env::var(BASE_URL_ENV) {
            Ok(raw) if !raw.trim().is_empty() => Ok(Self::new(Self::parse_base_url(&raw)?)),
            _ => Ok(Self::default()),
        }
    }

    pub fn parse_base_url(raw: &str) -> Result<Url> {
        let url = Url::parse(raw.trim())?;
        if url.cannot_be_a_base() {
            return Err(Error::configuration(format!(
                "Base URL '{}' cannot carry a path",
                raw
            )));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_localhost() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:9200/");
        assert!(config.default_params.is_empty());
    }

    #[test]
    fn test_from_yaml_with_default_params() {
        let yaml = r#"
base_url: "https://search.internal:9243/"
default_params:
  timeout: 30s
  filter_path: [took, items]
"#;
        let config = ClientConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.base_url.host_str(), Some("search.internal"));
        assert_eq!(config.default_params.get("timeout"), Some("30s"));
        assert_eq!(config.default_params.get_all("filter_path"), ["took", "items"]);
    }

    #[test]
    fn test_from_json() {
        let config = ClientConfig::from_yaml_str(r#"{"base_url": "http://es:9200"}"#).unwrap();
        assert_eq!(config.base_url.port(), Some(9200));
    }

    #[test]
    fn test_invalid_base_url_is_configuration_error() {
        let err = ClientConfig::from_yaml_str("base_url: not a url").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));

        let err = ClientConfig::parse_base_url("mailto:ops@example.com").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
