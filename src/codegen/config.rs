//! Configuration for generated code

use serde::Deserialize;

/// Configuration options for render-tree output
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Spaces per nesting level inside child content blocks
    pub indent: usize,

    /// Name of the render-tree builder variable
    pub builder: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            indent: 4,
            builder: "builder".to_string(),
        }
    }
}

impl CodegenConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set the builder variable name
    pub fn with_builder(mut self, builder: impl Into<String>) -> Self {
        self.builder = builder.into();
        self
    }
}
