//! Router configuration.
//!
//! Two options: a base URI stripped from incoming paths before matching, and
//! the origin allow-list. Both can be built in code or read from TOML:
//!
//! ```toml
//! base_uri = "/api"
//!
//! [allowed_origins]
//! "https://a.example" = ["GET", "POST"]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::cors::CorsPolicy;
use crate::error::ConfigError;
use crate::method::Method;

/// Dispatcher configuration. The default strips nothing and enforces no CORS.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Literal prefix removed from request paths before lookup.
    pub base_uri: String,

    /// Origin → allowed methods. Empty disables CORS enforcement.
    pub allowed_origins: CorsPolicy,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_uri(mut self, base: impl Into<String>) -> Self {
        self.base_uri = base.into();
        self
    }

    pub fn allow_origin(mut self, origin: impl Into<String>, methods: impl IntoIterator<Item = Method>) -> Self {
        self.allowed_origins = self.allowed_origins.allow(origin, methods);
        self
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_uri.is_empty() && !self.base_uri.starts_with('/') {
            return Err(ConfigError::BaseUri(self.base_uri.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_the_default() {
        let config = Config::from_toml_str("").unwrap();
        assert!(config.base_uri.is_empty());
        assert!(!config.allowed_origins.is_enabled());
    }

    #[test]
    fn parses_base_uri_and_origins() {
        let config = Config::from_toml_str(
            r#"
            base_uri = "/api"

            [allowed_origins]
            "https://a.example" = ["GET", "POST"]
            "*" = ["OPTIONS"]
            "#,
        )
        .unwrap();
        assert_eq!(config.base_uri, "/api");
        assert!(config.allowed_origins.is_allowed("https://a.example", &Method::Post));
        assert!(config.allowed_origins.is_allowed("https://b.example", &Method::Options));
        assert!(!config.allowed_origins.is_allowed("https://b.example", &Method::Get));
    }

    #[test]
    fn rejects_lowercase_methods() {
        let err = Config::from_toml_str(
            r#"
            [allowed_origins]
            "*" = ["get"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_relative_base_uri() {
        let err = Config::from_toml_str(r#"base_uri = "api""#).unwrap_err();
        assert!(matches!(err, ConfigError::BaseUri(ref b) if b == "api"));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::from_toml_str(r#"baseUri = "/api""#).is_err());
    }

    #[test]
    fn load_reports_missing_files() {
        let err = Config::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
