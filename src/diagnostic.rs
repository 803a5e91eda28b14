//! Compile-time diagnostics for component usage sites
//!
//! Diagnostics are reported alongside generated output rather than aborting
//! compilation. Each diagnostic carries a stable [`DiagnosticId`], a fully
//! formatted message and the span of the offending usage site.

use std::fmt;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::parser::ast::{Span, TypeExpr};

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Stable identifiers for every diagnostic the compiler can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticId {
    /// Some, but not all, type arguments were given explicitly
    GenericComponentMissingTypeArgument,
    /// Attribute values do not determine every type parameter
    GenericComponentTypeInferenceUnderspecified,
    /// Two attribute values imply different types for one type parameter
    GenericComponentTypeInferenceConflict,
}

impl DiagnosticId {
    /// Stable code, e.g. `CMP10001`
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticId::GenericComponentMissingTypeArgument => "CMP10000",
            DiagnosticId::GenericComponentTypeInferenceUnderspecified => "CMP10001",
            DiagnosticId::GenericComponentTypeInferenceConflict => "CMP10002",
        }
    }

    /// Descriptor name
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticId::GenericComponentMissingTypeArgument => {
                "GenericComponentMissingTypeArgument"
            }
            DiagnosticId::GenericComponentTypeInferenceUnderspecified => {
                "GenericComponentTypeInferenceUnderspecified"
            }
            DiagnosticId::GenericComponentTypeInferenceConflict => {
                "GenericComponentTypeInferenceConflict"
            }
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for DiagnosticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A reported problem at a usage site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub id: DiagnosticId,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(id: DiagnosticId, message: impl Into<String>, span: Span) -> Self {
        Self {
            id,
            severity: id.severity(),
            message: message.into(),
            span,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Format the diagnostic with source context using ariadne
    pub fn format(&self, source: &str, filename: &str, color: bool) -> String {
        let (kind, label_color) = match self.severity {
            Severity::Error => (ReportKind::Error, Color::Red),
        };

        let mut buf = Vec::new();
        let written = Report::build(kind, filename, self.span.start)
            .with_config(Config::default().with_color(color))
            .with_code(self.id.code())
            .with_message(&self.message)
            .with_label(
                Label::new((filename, self.span.clone()))
                    .with_message(self.id.name())
                    .with_color(label_color),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        if written.is_err() {
            return self.to_string();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.id.code(), self.message)
    }
}

/// `'A', 'B', 'C'`
fn quoted_list<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Usage site gave explicit type arguments for only some type parameters
pub fn generic_component_missing_type_argument<S: AsRef<str>>(
    component: &str,
    missing: &[S],
    span: Span,
) -> Diagnostic {
    Diagnostic::new(
        DiagnosticId::GenericComponentMissingTypeArgument,
        format!(
            "The component '{}' is missing required type arguments. \
             Specify the missing types using the attributes: {}.",
            component,
            quoted_list(missing)
        ),
        span,
    )
}

/// Usage site gave no explicit type arguments and inference left some unbound
pub fn generic_component_type_inference_underspecified<S: AsRef<str>>(
    component: &str,
    unresolved: &[S],
    span: Span,
) -> Diagnostic {
    Diagnostic::new(
        DiagnosticId::GenericComponentTypeInferenceUnderspecified,
        format!(
            "The type of component '{}' cannot be inferred based on the values provided. \
             Consider specifying the type arguments directly using the following attributes: {}.",
            component,
            quoted_list(unresolved)
        ),
        span,
    )
}

/// Two attribute values bind one type parameter to different types
pub fn generic_component_type_inference_conflict(
    component: &str,
    type_param: &str,
    first: &TypeExpr,
    second: &TypeExpr,
    span: Span,
) -> Diagnostic {
    Diagnostic::new(
        DiagnosticId::GenericComponentTypeInferenceConflict,
        format!(
            "The type argument '{}' of component '{}' was inferred as both '{}' and '{}'. \
             Specify the type argument directly using the attribute: '{}'.",
            type_param, component, first, second, type_param
        ),
        span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_underspecified_message() {
        let d = generic_component_type_inference_underspecified("GenericContext", &["TItem"], 1..19);
        assert_eq!(d.id, DiagnosticId::GenericComponentTypeInferenceUnderspecified);
        assert_snapshot!(d.message(), @"The type of component 'GenericContext' cannot be inferred based on the values provided. Consider specifying the type arguments directly using the following attributes: 'TItem'.");
    }

    #[test]
    fn test_missing_type_argument_message() {
        let d = generic_component_missing_type_argument(
            "MultipleGenericParameter",
            &["TItem2".to_string(), "TItem3".to_string()],
            0..1,
        );
        assert_snapshot!(d.message(), @"The component 'MultipleGenericParameter' is missing required type arguments. Specify the missing types using the attributes: 'TItem2', 'TItem3'.");
    }

    #[test]
    fn test_conflict_message() {
        let d = generic_component_type_inference_conflict(
            "Pair",
            "T",
            &TypeExpr::named("int"),
            &TypeExpr::named("string"),
            0..1,
        );
        assert_snapshot!(d.message(), @"The type argument 'T' of component 'Pair' was inferred as both 'int' and 'string'. Specify the type argument directly using the attribute: 'T'.");
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(DiagnosticId::GenericComponentMissingTypeArgument.code(), "CMP10000");
        assert_eq!(
            DiagnosticId::GenericComponentTypeInferenceUnderspecified.code(),
            "CMP10001"
        );
        assert_eq!(DiagnosticId::GenericComponentTypeInferenceConflict.code(), "CMP10002");
    }

    #[test]
    fn test_every_diagnostic_is_an_error() {
        for id in [
            DiagnosticId::GenericComponentMissingTypeArgument,
            DiagnosticId::GenericComponentTypeInferenceUnderspecified,
            DiagnosticId::GenericComponentTypeInferenceConflict,
        ] {
            let d = Diagnostic::new(id, "message", 0..1);
            assert_eq!(d.severity, Severity::Error);
            assert!(d.is_error());
        }
    }

    #[test]
    fn test_display() {
        let d = generic_component_missing_type_argument("Grid", &["TRow"], 0..1);
        assert!(d.to_string().starts_with("error CMP10000: The component 'Grid'"));
    }

    #[test]
    fn test_format_with_source() {
        let source = "\n<GenericContext />";
        let d = generic_component_type_inference_underspecified("GenericContext", &["TItem"], 1..19);
        let rendered = d.format(source, "page.cmp", false);
        assert!(rendered.contains("CMP10001"));
        assert!(rendered.contains("page.cmp"));
        assert!(rendered.contains("GenericComponentTypeInferenceUnderspecified"));
    }
}
