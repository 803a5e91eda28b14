//! Component Compiler - a templating compiler for generic UI components
//!
//! This library parses component declarations and markup templates, resolves
//! the type arguments of generic components at every usage site, and emits
//! render-tree builder code together with any diagnostics.
//!
//! # Example
//!
//! ```rust
//! use component_compiler::compile;
//!
//! let components = r#"
//!     component GenericContext<TItem> {
//!         param Items: List<TItem>
//!     }
//! "#;
//!
//! let output = compile("<GenericContext />", &[components]).unwrap();
//! assert_eq!(output.diagnostics.len(), 1);
//! assert!(output.generated.contains("GenericContext<?>"));
//! ```

pub mod codegen;
pub mod component;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod parser;

pub use codegen::CodegenConfig;
pub use component::{ComponentRegistry, Outcome, RegistryError, SiteResolution};
pub use config::{CompilerConfig, ConfigError};
pub use diagnostic::{Diagnostic, DiagnosticId, Severity};
pub use error::ParseError;
pub use parser::{parse, Document};

use std::fmt;

use thiserror::Error;
use tracing::debug;

use component::BindingScope;

/// Which input an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    /// The template being compiled
    Template,
    /// The component source at this index
    Components(usize),
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOrigin::Template => write!(f, "template"),
            SourceOrigin::Components(i) => write!(f, "component source #{}", i + 1),
        }
    }
}

/// Errors that abort compilation
#[derive(Debug, Error)]
pub enum CompileError {
    /// Error during parsing
    #[error("parse errors in {origin}: {}", format_parse_errors(errors))]
    Parse {
        origin: SourceOrigin,
        errors: Vec<ParseError>,
    },

    /// Error collecting declarations
    #[error("declaration error in {origin}: {error}")]
    Registry {
        origin: SourceOrigin,
        error: RegistryError,
    },
}

impl CompileError {
    /// Input the error was found in
    pub fn origin(&self) -> SourceOrigin {
        match self {
            CompileError::Parse { origin, .. } | CompileError::Registry { origin, .. } => *origin,
        }
    }
}

/// Collect component declarations and `let` bindings from one parsed input
fn collect_declarations(
    doc: &Document,
    origin: SourceOrigin,
    registry: &mut ComponentRegistry,
    scope: &mut BindingScope,
) -> Result<(), CompileError> {
    registry
        .collect_from_document(doc)
        .and_then(|()| scope.collect_from_document(doc))
        .map_err(|error| CompileError::Registry { origin, error })
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result of a successful compilation
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// Generated render-tree builder code
    pub generated: String,
    /// Diagnostics ordered by source position
    pub diagnostics: Vec<Diagnostic>,
    /// Type resolution of every component usage site, in document order
    pub resolutions: Vec<SiteResolution>,
}

impl CompileOutput {
    /// True when any error diagnostic was reported
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Compile a template with default configuration
///
/// `components` are additional sources whose component declarations and
/// `let` bindings are visible to the template; their markup is ignored.
pub fn compile(template: &str, components: &[&str]) -> Result<CompileOutput, CompileError> {
    compile_with_config(template, components, &CompilerConfig::default())
}

/// Compile a template with custom configuration
///
/// # Example
///
/// ```rust
/// use component_compiler::{compile_with_config, CodegenConfig, CompilerConfig};
///
/// let config = CompilerConfig::new().with_codegen(CodegenConfig::new().with_builder("b"));
/// let output = compile_with_config(r#"<p>"hi"</p>"#, &[], &config).unwrap();
/// assert!(output.generated.starts_with("b.open_element(0, \"p\");"));
/// ```
pub fn compile_with_config(
    template: &str,
    components: &[&str],
    config: &CompilerConfig,
) -> Result<CompileOutput, CompileError> {
    let mut registry = ComponentRegistry::new();
    let mut scope = BindingScope::new();

    for (index, source) in components.iter().enumerate() {
        let doc = parse(source).map_err(|errors| CompileError::Parse {
            origin: SourceOrigin::Components(index),
            errors,
        })?;
        collect_declarations(&doc, SourceOrigin::Components(index), &mut registry, &mut scope)?;
        if doc.markup().next().is_some() {
            debug!(source = index, "ignoring markup in component source");
        }
    }

    let doc = parse(template).map_err(|errors| CompileError::Parse {
        origin: SourceOrigin::Template,
        errors,
    })?;
    collect_declarations(&doc, SourceOrigin::Template, &mut registry, &mut scope)?;
    let names = registry.names();
    debug!(
        components = names.len(),
        names = ?names,
        "collected component declarations"
    );

    let resolutions = component::resolve_document(&doc, &registry, &scope);
    let mut diagnostics: Vec<Diagnostic> =
        resolutions.iter().filter_map(SiteResolution::diagnostic).collect();
    diagnostics.sort_by_key(|d| d.span.start);
    debug!(
        sites = resolutions.len(),
        diagnostics = diagnostics.len(),
        "resolved usage sites"
    );

    let generated = codegen::generate(&doc, &registry, &resolutions, &config.codegen);

    Ok(CompileOutput {
        generated,
        diagnostics,
        resolutions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_plain_markup() {
        let output = compile(r#"<p class="lead">"Hello"</p>"#, &[]).unwrap();
        assert!(output.diagnostics.is_empty());
        assert!(!output.has_errors());
        assert!(output.generated.contains(r#"builder.open_element(0, "p");"#));
        assert!(output.generated.contains(r#"builder.add_content(2, "Hello");"#));
    }

    #[test]
    fn test_template_may_declare_components() {
        let output = compile(
            "component Box<T> { param Value: T }\n<Box Value=1 />",
            &[],
        )
        .unwrap();
        assert!(output.diagnostics.is_empty());
        assert!(output.generated.contains("open_component::<Box<int>>"));
    }

    #[test]
    fn test_parse_error_in_template() {
        let err = compile("<p>", &[]).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Parse {
                origin: SourceOrigin::Template,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_error_in_components() {
        let err = compile("<p />", &["component { }"]).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Parse {
                origin: SourceOrigin::Components(0),
                ..
            }
        ));
        assert!(err.to_string().starts_with("parse errors in component source #1"));
    }

    #[test]
    fn test_duplicate_component_across_sources() {
        let err = compile("component A { }", &["component A { }"]).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Registry {
                origin: SourceOrigin::Template,
                error: RegistryError::Duplicate { .. },
            }
        ));
    }

    #[test]
    fn test_duplicate_in_second_component_source() {
        let err = compile("<p />", &["component A { }", "let x: int\ncomponent A { }"]).unwrap_err();
        assert_eq!(err.origin(), SourceOrigin::Components(1));
        assert_eq!(
            err.to_string(),
            "declaration error in component source #2: duplicate component definition: A"
        );
        let CompileError::Registry { error, .. } = err else {
            panic!("Expected declaration error");
        };
        assert_eq!(error.span(), &(21..22));
    }

    #[test]
    fn test_duplicate_binding_in_template() {
        let err = compile("let rows: int\n<p />", &["let rows: string"]).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Registry {
                origin: SourceOrigin::Template,
                error: RegistryError::DuplicateBinding { .. },
            }
        ));
    }

    #[test]
    fn test_markup_in_component_source_is_ignored() {
        let output = compile("", &["component A { } <A />"]).unwrap();
        assert!(output.generated.is_empty());
        assert!(output.resolutions.is_empty());
    }
}
