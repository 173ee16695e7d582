//! Expression builder configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`BuilderConfig::max_nesting_depth`]
pub const MAX_NESTING_DEPTH_ENV: &str = "FEDSQL_MAX_NESTING_DEPTH";

/// Limits and rendering defaults for expression building
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Deepest expression nesting accepted before a statement is rejected
    pub max_nesting_depth: usize,
    /// Separator between positional function arguments
    pub default_separator: String,
    /// Separator used when keyword tokens are interleaved with arguments
    pub keyword_separator: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            max_nesting_depth: 256,
            default_separator: ", ".to_string(),
            keyword_separator: " ".to_string(),
        }
    }
}

impl BuilderConfig {
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Load a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: BuilderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the default configuration, applying environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = BuilderConfig::default();
        if let Ok(raw) = std::env::var(MAX_NESTING_DEPTH_ENV) {
            config.max_nesting_depth = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a positive integer, got '{}'", MAX_NESTING_DEPTH_ENV, raw))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_nesting_depth == 0 {
            return Err(Error::Config("max_nesting_depth must be at least 1".to_string()));
        }
        if self.default_separator.is_empty() || self.keyword_separator.is_empty() {
            return Err(Error::Config("argument separators must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuilderConfig::default();
        assert_eq!(config.max_nesting_depth, 256);
        assert_eq!(config.default_separator, ", ");
        assert_eq!(config.keyword_separator, " ");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = BuilderConfig::from_json_str(r#"{"max_nesting_depth": 16}"#).unwrap();
        assert_eq!(config.max_nesting_depth, 16);
        assert_eq!(config.default_separator, ", ");
    }

    #[test]
    fn test_rejects_zero_depth() {
        let result = BuilderConfig::from_json_str(r#"{"max_nesting_depth": 0}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = BuilderConfig::from_json_str("{max_nesting_depth");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
