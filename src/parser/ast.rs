//! Abstract Syntax Tree types for component documents

use std::fmt;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Valid identifier (alphanumeric, underscore, dot and dash; starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A (possibly constructed) type: `int`, `List<TItem>`, `Dictionary<string, T>`
///
/// Array types written `T[]` are stored as `Array<T>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeExpr {
    pub name: String,
    pub args: Vec<TypeExpr>,
}

impl TypeExpr {
    /// A type with no type arguments
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A constructed type such as `List<int>`
    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// `T[]`
    pub fn array(element: TypeExpr) -> Self {
        Self::generic("Array", vec![element])
    }

    /// True when this is a bare name without type arguments
    pub fn is_simple(&self) -> bool {
        self.args.is_empty()
    }

    /// Check whether `name` appears anywhere in this type
    pub fn mentions(&self, name: &str) -> bool {
        (self.args.is_empty() && self.name == name) || self.args.iter().any(|a| a.mentions(name))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == "Array" && self.args.len() == 1 {
            return write!(f, "{}[]", self.args[0]);
        }
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// Root AST node - a complete component document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub items: Vec<Item>,
}

impl Document {
    /// Iterate over component declarations
    pub fn components(&self) -> impl Iterator<Item = &Spanned<ComponentDecl>> + '_ {
        self.items.iter().filter_map(|item| match item {
            Item::Component(decl) => Some(decl),
            _ => None,
        })
    }

    /// Iterate over typed binding declarations
    pub fn bindings(&self) -> impl Iterator<Item = &Spanned<LetDecl>> + '_ {
        self.items.iter().filter_map(|item| match item {
            Item::Let(decl) => Some(decl),
            _ => None,
        })
    }

    /// Iterate over top-level markup nodes in document order
    pub fn markup(&self) -> impl Iterator<Item = &Spanned<Node>> + '_ {
        self.items.iter().filter_map(|item| match item {
            Item::Markup(node) => Some(node),
            _ => None,
        })
    }
}

/// Top-level item in a document
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Component declaration: `component Name<T> { param P: T }`
    Component(Spanned<ComponentDecl>),
    /// Typed binding: `let rows: List<string>`
    Let(Spanned<LetDecl>),
    /// Markup node
    Markup(Spanned<Node>),
}

/// Component declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDecl {
    pub name: Spanned<Identifier>,
    pub type_params: Vec<Spanned<Identifier>>,
    pub params: Vec<Spanned<ParamDecl>>,
}

/// Declared component parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: Spanned<Identifier>,
    pub ty: Spanned<TypeExpr>,
}

/// Typed binding visible to attribute values
#[derive(Debug, Clone, PartialEq)]
pub struct LetDecl {
    pub name: Spanned<Identifier>,
    pub ty: Spanned<TypeExpr>,
}

/// Markup node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// String literal content
    Text(String),
    /// `@name` content expression
    Expression(Identifier),
}

/// Markup element or component usage site
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: Spanned<Identifier>,
    pub attributes: Vec<Spanned<Attribute>>,
    pub children: Vec<Spanned<Node>>,
    /// Name in the closing tag; `None` for `<Name />`
    pub closing_name: Option<Spanned<Identifier>>,
}

impl Element {
    pub fn is_self_closing(&self) -> bool {
        self.closing_name.is_none()
    }

    /// Find an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Spanned<Attribute>> {
        self.attributes.iter().find(|a| a.node.name.node.as_str() == name)
    }
}

/// `name=value` attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Spanned<Identifier>,
    pub value: Spanned<AttributeValue>,
}

/// Attribute value expression
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Bare type or identifier: `int`, `List<string>`, `rows`
    Path(TypeExpr),
    /// `@rows`
    Binding(Identifier),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{:?}", s),
            AttributeValue::Integer(n) => write!(f, "{}", n),
            AttributeValue::Float(n) => write!(f, "{:?}", n),
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Path(ty) => write!(f, "{}", ty),
            AttributeValue::Binding(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display() {
        let ty = TypeExpr::generic(
            "Dictionary",
            vec![TypeExpr::named("string"), TypeExpr::generic("List", vec![TypeExpr::named("int")])],
        );
        assert_eq!(ty.to_string(), "Dictionary<string, List<int>>");
    }

    #[test]
    fn test_array_display() {
        let ty = TypeExpr::array(TypeExpr::named("TItem"));
        assert_eq!(ty.to_string(), "TItem[]");
    }

    #[test]
    fn test_mentions() {
        let ty = TypeExpr::generic("List", vec![TypeExpr::named("TItem")]);
        assert!(ty.mentions("TItem"));
        assert!(!ty.mentions("List"));
        assert!(!ty.mentions("TOther"));
    }

    #[test]
    fn test_attribute_value_display() {
        assert_eq!(AttributeValue::String("a\"b".into()).to_string(), r#""a\"b""#);
        assert_eq!(AttributeValue::Float(2.0).to_string(), "2.0");
        assert_eq!(AttributeValue::Integer(-3).to_string(), "-3");
    }
}
