//! Component registry for storing and retrieving component definitions

use std::collections::HashMap;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::ast::{ComponentDecl, Document, LetDecl, Span, Spanned, TypeExpr};

/// Errors that can occur while collecting declarations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Duplicate component definition
    #[error("duplicate component definition: {name}")]
    Duplicate { name: String, span: Span },

    /// A type parameter listed twice on one component
    #[error("duplicate type parameter {param} on component {component}")]
    DuplicateTypeParameter {
        component: String,
        param: String,
        span: Span,
    },

    /// A parameter declared twice on one component
    #[error("duplicate parameter {param} on component {component}")]
    DuplicateParameter {
        component: String,
        param: String,
        span: Span,
    },

    /// A `let` binding declared twice
    #[error("duplicate binding: {name}")]
    DuplicateBinding { name: String, span: Span },
}

impl RegistryError {
    /// Source range of the offending declaration
    pub fn span(&self) -> &Span {
        match self {
            RegistryError::Duplicate { span, .. }
            | RegistryError::DuplicateTypeParameter { span, .. }
            | RegistryError::DuplicateParameter { span, .. }
            | RegistryError::DuplicateBinding { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        self.format_with_color(source, filename, false)
    }

    /// Format the error, optionally with ANSI colours
    pub fn format_with_color(&self, source: &str, filename: &str, color: bool) -> String {
        let label = match self {
            RegistryError::Duplicate { .. } => "component already declared",
            RegistryError::DuplicateTypeParameter { .. } => "type parameter repeated here",
            RegistryError::DuplicateParameter { .. } => "parameter repeated here",
            RegistryError::DuplicateBinding { .. } => "binding already declared",
        };
        let span = self.span().clone();

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_config(Config::default().with_color(color))
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        if written.is_err() {
            return self.to_string();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// A declared component parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    pub name: String,
    pub ty: TypeExpr,
}

/// A stored component definition
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDefinition {
    /// Component name, matched against tag names
    pub name: String,
    /// Generic type parameters in declaration order
    pub type_params: Vec<String>,
    /// Declared parameters in declaration order
    pub params: Vec<ParameterDefinition>,
    /// Location of the declaration
    pub span: Span,
}

impl ComponentDefinition {
    /// Create a definition from a declaration, rejecting repeated names
    pub fn from_decl(decl: &Spanned<ComponentDecl>) -> Result<Self, RegistryError> {
        let name = decl.node.name.node.0.clone();

        let mut type_params: Vec<String> = Vec::new();
        for tp in &decl.node.type_params {
            if type_params.iter().any(|t| t == tp.node.as_str()) {
                return Err(RegistryError::DuplicateTypeParameter {
                    component: name,
                    param: tp.node.0.clone(),
                    span: tp.span.clone(),
                });
            }
            type_params.push(tp.node.0.clone());
        }

        let mut params: Vec<ParameterDefinition> = Vec::new();
        for p in &decl.node.params {
            if params.iter().any(|existing| existing.name == p.node.name.node.as_str()) {
                return Err(RegistryError::DuplicateParameter {
                    component: name,
                    param: p.node.name.node.0.clone(),
                    span: p.node.name.span.clone(),
                });
            }
            params.push(ParameterDefinition {
                name: p.node.name.node.0.clone(),
                ty: p.node.ty.node.clone(),
            });
        }

        Ok(Self {
            name,
            type_params,
            params,
            span: decl.span.clone(),
        })
    }

    /// Check if this component takes type parameters
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Get a declared parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Position of a type parameter in the declaration
    pub fn type_parameter_index(&self, name: &str) -> Option<usize> {
        self.type_params.iter().position(|t| t == name)
    }

    /// Check if this component has a type parameter
    pub fn has_type_parameter(&self, name: &str) -> bool {
        self.type_parameter_index(name).is_some()
    }
}

/// Registry for storing component definitions
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, ComponentDefinition>,
}

impl ComponentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component from a declaration
    pub fn register(&mut self, decl: &Spanned<ComponentDecl>) -> Result<(), RegistryError> {
        let def = ComponentDefinition::from_decl(decl)?;
        if self.components.contains_key(&def.name) {
            return Err(RegistryError::Duplicate {
                name: def.name,
                span: decl.node.name.span.clone(),
            });
        }
        self.components.insert(def.name.clone(), def);
        Ok(())
    }

    /// Get a component by name
    pub fn get(&self, name: &str) -> Option<&ComponentDefinition> {
        self.components.get(name)
    }

    /// Check if a component exists
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Get all component names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Collect all component declarations from a document
    pub fn collect_from_document(&mut self, doc: &Document) -> Result<(), RegistryError> {
        for decl in doc.components() {
            self.register(decl)?;
        }
        Ok(())
    }
}

/// Typed `let` bindings visible to attribute values
#[derive(Debug, Default)]
pub struct BindingScope {
    bindings: HashMap<String, TypeExpr>,
}

impl BindingScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a binding
    pub fn declare(&mut self, decl: &Spanned<LetDecl>) -> Result<(), RegistryError> {
        let name = decl.node.name.node.0.clone();
        if self.bindings.contains_key(&name) {
            return Err(RegistryError::DuplicateBinding {
                name,
                span: decl.node.name.span.clone(),
            });
        }
        self.bindings.insert(name, decl.node.ty.node.clone());
        Ok(())
    }

    /// Static type of a binding
    pub fn get(&self, name: &str) -> Option<&TypeExpr> {
        self.bindings.get(name)
    }

    /// Collect all `let` declarations from a document
    pub fn collect_from_document(&mut self, doc: &Document) -> Result<(), RegistryError> {
        for decl in doc.bindings() {
            self.declare(decl)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn registry_for(source: &str) -> Result<ComponentRegistry, RegistryError> {
        let doc = parse(source).expect("Should parse");
        let mut registry = ComponentRegistry::new();
        registry.collect_from_document(&doc)?;
        Ok(registry)
    }

    #[test]
    fn test_registry_register_and_get() {
        let registry = registry_for(
            "component MultipleGenericParameter<TItem1, TItem2, TItem3> {
                param Item1: TItem1
                param Item2: TItem2
                param Item3: TItem3
            }",
        )
        .expect("Should register");

        let def = registry.get("MultipleGenericParameter").expect("Should exist");
        assert!(def.is_generic());
        assert_eq!(def.type_params, vec!["TItem1", "TItem2", "TItem3"]);
        assert_eq!(def.type_parameter_index("TItem3"), Some(2));
        assert_eq!(def.parameter("Item2").map(|p| p.ty.to_string()), Some("TItem2".to_string()));
        assert!(def.parameter("Item4").is_none());
    }

    #[test]
    fn test_registry_duplicate_error() {
        let result = registry_for("component A { } component A { }");
        assert!(matches!(result, Err(RegistryError::Duplicate { name, .. }) if name == "A"));
    }

    #[test]
    fn test_duplicate_points_at_second_name() {
        let err = registry_for("component A { }\ncomponent A { }").unwrap_err();
        assert_eq!(err.span(), &(26..27));
    }

    #[test]
    fn test_format_with_source() {
        let source = "let rows: int\nlet rows: string";
        let doc = parse(source).expect("Should parse");
        let err = BindingScope::new().collect_from_document(&doc).unwrap_err();
        let rendered = err.format(source, "page.cmp");
        assert!(rendered.contains("duplicate binding: rows"));
        assert!(rendered.contains("page.cmp"));
        assert!(rendered.contains("binding already declared"));
    }

    #[test]
    fn test_duplicate_type_parameter() {
        let result = registry_for("component Pair<T, T> { }");
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateTypeParameter { param, .. }) if param == "T"
        ));
    }

    #[test]
    fn test_duplicate_parameter() {
        let result = registry_for("component Box { param Value: int param Value: string }");
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateParameter { param, .. }) if param == "Value"
        ));
    }

    #[test]
    fn test_registry_collects_across_documents() {
        let mut registry = ComponentRegistry::new();
        for source in ["component B { }", "component A<T> { }"] {
            let doc = parse(source).expect("Should parse");
            registry.collect_from_document(&doc).expect("Should register");
        }
        assert_eq!(registry.names(), vec!["A", "B"]);
        assert!(registry.contains("B"));
        assert!(!registry.get("B").expect("B").is_generic());
    }

    #[test]
    fn test_binding_scope() {
        let doc = parse("let rows: List<int> let title: string").expect("Should parse");
        let mut scope = BindingScope::new();
        scope.collect_from_document(&doc).expect("Should declare");
        assert_eq!(scope.get("rows").map(|t| t.to_string()), Some("List<int>".to_string()));
        assert!(scope.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_binding() {
        let doc = parse("let rows: int let rows: string").expect("Should parse");
        let mut scope = BindingScope::new();
        let result = scope.collect_from_document(&doc);
        assert!(matches!(result, Err(RegistryError::DuplicateBinding { .. })));
    }
}
