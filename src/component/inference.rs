//! Generic type argument resolution for component usage sites
//!
//! A usage site either pins type parameters explicitly through attributes named
//! after them (`<Grid TItem=int />`) or leaves them to be inferred from the
//! static types of the values bound to the component's parameters.
//!
//! Explicit specification is all-or-nothing: naming some but not all type
//! parameters is reported, and no inference is attempted for the rest.

use std::collections::HashMap;

use tracing::trace;

use crate::diagnostic::{self, Diagnostic};
use crate::parser::ast::{Attribute, AttributeValue, Document, Element, Node, Span, Spanned, TypeExpr};

use super::registry::{BindingScope, ComponentDefinition, ComponentRegistry};

/// How a usage site's type arguments were (or were not) determined
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The component takes no type parameters
    NotGeneric,
    /// Every type parameter was given as an attribute
    Explicit,
    /// Every type parameter was inferred from attribute values
    Inferred,
    /// Some, but not all, type parameters were given explicitly
    MissingTypeArguments(Vec<String>),
    /// No explicit type arguments and inference left these unbound
    Underspecified(Vec<String>),
    /// One type parameter inferred as two different types
    Conflict {
        type_param: String,
        first: TypeExpr,
        second: TypeExpr,
    },
}

impl Outcome {
    /// True for outcomes that leave the site without concrete type arguments
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Outcome::MissingTypeArguments(_) | Outcome::Underspecified(_) | Outcome::Conflict { .. }
        )
    }
}

/// Result of resolving one usage site
#[derive(Debug, Clone, PartialEq)]
pub struct SiteResolution {
    /// Component name
    pub component: String,
    /// Span of the usage site
    pub span: Span,
    /// One entry per type parameter, in declaration order
    pub type_arguments: Vec<Option<TypeExpr>>,
    pub outcome: Outcome,
}

impl SiteResolution {
    /// True when the attribute should be consumed as a type argument
    /// rather than passed to the component
    pub fn is_type_argument(def: &ComponentDefinition, attr: &Attribute) -> bool {
        def.has_type_parameter(attr.name.node.as_str()) && explicit_type(&attr.value.node).is_some()
    }

    /// The single diagnostic a failing site reports
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match &self.outcome {
            Outcome::MissingTypeArguments(missing) => {
                Some(diagnostic::generic_component_missing_type_argument(
                    &self.component,
                    missing,
                    self.span.clone(),
                ))
            }
            Outcome::Underspecified(unresolved) => {
                Some(diagnostic::generic_component_type_inference_underspecified(
                    &self.component,
                    unresolved,
                    self.span.clone(),
                ))
            }
            Outcome::Conflict {
                type_param,
                first,
                second,
            } => Some(diagnostic::generic_component_type_inference_conflict(
                &self.component,
                type_param,
                first,
                second,
                self.span.clone(),
            )),
            Outcome::NotGeneric | Outcome::Explicit | Outcome::Inferred => None,
        }
    }
}

/// Type argument carried by an explicit type-argument attribute
///
/// Bare type paths are taken as-is; string literals are parsed as a type.
/// Any other value form does not name a type.
pub fn explicit_type(value: &AttributeValue) -> Option<TypeExpr> {
    match value {
        AttributeValue::Path(ty) => Some(ty.clone()),
        AttributeValue::String(s) => crate::parser::parse_type(s),
        _ => None,
    }
}

/// Static type of an attribute value, if it can be known without a host compiler
pub fn value_type(value: &AttributeValue, scope: &BindingScope) -> Option<TypeExpr> {
    match value {
        AttributeValue::String(_) => Some(TypeExpr::named("string")),
        AttributeValue::Integer(_) => Some(TypeExpr::named("int")),
        AttributeValue::Float(_) => Some(TypeExpr::named("double")),
        AttributeValue::Bool(_) => Some(TypeExpr::named("bool")),
        AttributeValue::Binding(id) => scope.get(id.as_str()).cloned(),
        AttributeValue::Path(path) if path.is_simple() => scope.get(&path.name).cloned(),
        AttributeValue::Path(_) => None,
    }
}

/// Bindings from type parameter names to inferred types
#[derive(Debug, Default)]
struct Substitution {
    bound: HashMap<String, TypeExpr>,
}

/// Same type parameter bound to two different types
struct Mismatch {
    type_param: String,
    first: TypeExpr,
    second: TypeExpr,
}

impl Substitution {
    /// Structurally match a declared parameter type against a value type
    ///
    /// A type parameter reference binds to the whole value type. Constructed
    /// types match argument-wise when name and arity agree; any other shape
    /// difference yields no information.
    fn unify(
        &mut self,
        pattern: &TypeExpr,
        actual: &TypeExpr,
        type_params: &[String],
    ) -> Result<(), Mismatch> {
        if pattern.is_simple() && type_params.iter().any(|t| *t == pattern.name) {
            return match self.bound.get(&pattern.name) {
                Some(existing) if existing != actual => Err(Mismatch {
                    type_param: pattern.name.clone(),
                    first: existing.clone(),
                    second: actual.clone(),
                }),
                Some(_) => Ok(()),
                None => {
                    self.bound.insert(pattern.name.clone(), actual.clone());
                    Ok(())
                }
            };
        }

        if pattern.name == actual.name && pattern.args.len() == actual.args.len() {
            for (p, a) in pattern.args.iter().zip(&actual.args) {
                self.unify(p, a, type_params)?;
            }
        }
        Ok(())
    }
}

/// Determine the type arguments of one usage site
pub fn resolve_site(
    def: &ComponentDefinition,
    element: &Element,
    span: &Span,
    scope: &BindingScope,
) -> SiteResolution {
    let mut resolution = SiteResolution {
        component: def.name.clone(),
        span: span.clone(),
        type_arguments: vec![None; def.type_params.len()],
        outcome: Outcome::NotGeneric,
    };

    if !def.is_generic() {
        return resolution;
    }

    // Explicit type-argument attributes
    let mut explicit_count = 0;
    for (slot, name) in resolution.type_arguments.iter_mut().zip(&def.type_params) {
        if let Some(ty) = element
            .attribute(name)
            .and_then(|attr| explicit_type(&attr.node.value.node))
        {
            *slot = Some(ty);
            explicit_count += 1;
        }
    }

    if explicit_count == def.type_params.len() {
        resolution.outcome = Outcome::Explicit;
        return resolution;
    }

    if explicit_count > 0 {
        resolution.outcome = Outcome::MissingTypeArguments(unbound(def, &resolution.type_arguments));
        return resolution;
    }

    resolution.outcome = infer(def, &element.attributes, scope, &mut resolution.type_arguments);
    trace!(
        component = %def.name,
        outcome = ?resolution.outcome,
        "resolved usage site"
    );
    resolution
}

/// Resolve every component usage site in a document, in document order
pub fn resolve_document(
    doc: &Document,
    registry: &ComponentRegistry,
    scope: &BindingScope,
) -> Vec<SiteResolution> {
    let mut resolutions = Vec::new();
    for node in doc.markup() {
        resolve_node(node, registry, scope, &mut resolutions);
    }
    resolutions
}

fn resolve_node(
    node: &Spanned<Node>,
    registry: &ComponentRegistry,
    scope: &BindingScope,
    resolutions: &mut Vec<SiteResolution>,
) {
    let Node::Element(element) = &node.node else {
        return;
    };
    if let Some(def) = registry.get(element.name.node.as_str()) {
        resolutions.push(resolve_site(def, element, &node.span, scope));
    }
    for child in &element.children {
        resolve_node(child, registry, scope, resolutions);
    }
}

/// Infer type arguments from the attributes bound to declared parameters
fn infer(
    def: &ComponentDefinition,
    attributes: &[Spanned<Attribute>],
    scope: &BindingScope,
    type_arguments: &mut [Option<TypeExpr>],
) -> Outcome {
    let mut subst = Substitution::default();

    for attr in attributes {
        let Some(param) = def.parameter(attr.node.name.node.as_str()) else {
            continue;
        };
        if !def.type_params.iter().any(|t| param.ty.mentions(t)) {
            continue;
        }
        let Some(actual) = value_type(&attr.node.value.node, scope) else {
            continue;
        };
        if let Err(mismatch) = subst.unify(&param.ty, &actual, &def.type_params) {
            return Outcome::Conflict {
                type_param: mismatch.type_param,
                first: mismatch.first,
                second: mismatch.second,
            };
        }
    }

    for (slot, name) in type_arguments.iter_mut().zip(&def.type_params) {
        *slot = subst.bound.get(name).cloned();
    }

    if type_arguments.iter().all(Option::is_some) {
        Outcome::Inferred
    } else {
        Outcome::Underspecified(unbound(def, type_arguments))
    }
}

/// Names of type parameters without an argument, in declaration order
fn unbound(def: &ComponentDefinition, type_arguments: &[Option<TypeExpr>]) -> Vec<String> {
    def.type_params
        .iter()
        .zip(type_arguments)
        .filter(|(_, arg)| arg.is_none())
        .map(|(name, _)| name.clone())
        .collect()
}
