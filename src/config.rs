//! Compiler configuration
//!
//! Configuration is read from a TOML file. Every section and key is optional;
//! anything missing falls back to its default.
//!
//! ```toml
//! [codegen]
//! indent = 2
//! builder = "b"
//!
//! [diagnostics]
//! color = false
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::codegen::CodegenConfig;

/// Errors that can occur when loading or parsing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Options for rendering diagnostics
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Colour rendered reports with ANSI escapes
    pub color: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Configuration for the complete compile pipeline
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Generated code options
    pub codegen: CodegenConfig,
    /// Diagnostic rendering options
    pub diagnostics: DiagnosticsConfig,
}

impl CompilerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the code generation configuration
    pub fn with_codegen(mut self, codegen: CodegenConfig) -> Self {
        self.codegen = codegen;
        self
    }

    /// Enable or disable coloured diagnostics
    pub fn with_color(mut self, color: bool) -> Self {
        self.diagnostics.color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CompilerConfig::from_str("").expect("Should parse");
        assert_eq!(config, CompilerConfig::default());
        assert!(config.diagnostics.color);
        assert_eq!(config.codegen.indent, 4);
    }

    #[test]
    fn test_full_config() {
        let config = CompilerConfig::from_str(
            r#"
            [codegen]
            indent = 2
            builder = "b"

            [diagnostics]
            color = false
        "#,
        )
        .expect("Should parse");
        assert_eq!(config.codegen, CodegenConfig::new().with_indent(2).with_builder("b"));
        assert!(!config.diagnostics.color);
    }

    #[test]
    fn test_partial_section() {
        let config = CompilerConfig::from_str("[codegen]\nindent = 8\n").expect("Should parse");
        assert_eq!(config.codegen.indent, 8);
        assert_eq!(config.codegen.builder, "builder");
    }

    #[test]
    fn test_invalid_toml() {
        let result = CompilerConfig::from_str("[codegen\nindent = 2");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_wrong_type() {
        let result = CompilerConfig::from_str("[codegen]\nindent = \"wide\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = CompilerConfig::from_file(Path::new("/nonexistent/compiler.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
