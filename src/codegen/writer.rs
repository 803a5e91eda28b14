//! Render-tree builder code generation from resolved documents

use std::collections::HashMap;

use crate::component::{ComponentRegistry, SiteResolution};
use crate::parser::ast::{AttributeValue, Document, Element, Node, Spanned, TypeExpr};

use super::CodegenConfig;

/// Build generated code incrementally
pub struct CodeWriter {
    config: CodegenConfig,
    lines: Vec<String>,
    depth: usize,
    sequence: usize,
}

impl CodeWriter {
    /// Create a new writer
    pub fn new(config: CodegenConfig) -> Self {
        Self {
            config,
            lines: vec![],
            depth: 0,
            sequence: 0,
        }
    }

    fn indent_str(&self) -> String {
        " ".repeat(self.depth * self.config.indent)
    }

    fn line(&mut self, text: String) {
        let indent = self.indent_str();
        self.lines.push(format!("{}{}", indent, text));
    }

    fn next_sequence(&mut self) -> usize {
        let seq = self.sequence;
        self.sequence += 1;
        seq
    }

    /// `builder.open_element(seq, "name");`
    pub fn open_element(&mut self, name: &str) {
        let seq = self.next_sequence();
        self.line(format!("{}.open_element({}, {:?});", self.config.builder, seq, name));
    }

    pub fn close_element(&mut self) {
        self.line(format!("{}.close_element();", self.config.builder));
    }

    /// `builder.open_component::<Type>(seq);`
    pub fn open_component(&mut self, ty: &str) {
        let seq = self.next_sequence();
        self.line(format!(
            "{}.open_component::<{}>({});",
            self.config.builder, ty, seq
        ));
    }

    pub fn close_component(&mut self) {
        self.line(format!("{}.close_component();", self.config.builder));
    }

    /// `builder.add_attribute(seq, "name", value);`
    pub fn add_attribute(&mut self, name: &str, value: &AttributeValue) {
        let seq = self.next_sequence();
        self.line(format!(
            "{}.add_attribute({}, {:?}, {});",
            self.config.builder, seq, name, value
        ));
    }

    /// `builder.add_content(seq, expr);` where `expr` is already rendered
    pub fn add_content(&mut self, expr: &str) {
        let seq = self.next_sequence();
        self.line(format!("{}.add_content({}, {});", self.config.builder, seq, expr));
    }

    /// Open a child content closure; children are written one level deeper
    pub fn begin_child_content(&mut self) {
        let seq = self.next_sequence();
        let builder = self.config.builder.clone();
        self.line(format!(
            "{}.add_child_content({}, |{}| {{",
            builder, seq, builder
        ));
        self.depth += 1;
    }

    pub fn end_child_content(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("});".to_string());
    }

    /// Finish and return the generated code
    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Render a component type with its (possibly unresolved) type arguments
///
/// Unresolved arguments are written as `?`.
pub fn component_type(name: &str, type_arguments: &[Option<TypeExpr>]) -> String {
    if type_arguments.is_empty() {
        return name.to_string();
    }
    let args: Vec<String> = type_arguments
        .iter()
        .map(|a| a.as_ref().map(|t| t.to_string()).unwrap_or_else(|| "?".to_string()))
        .collect();
    format!("{}<{}>", name, args.join(", "))
}

/// Generate render-tree builder code for a document's markup
pub fn generate(
    doc: &Document,
    registry: &ComponentRegistry,
    resolutions: &[SiteResolution],
    config: &CodegenConfig,
) -> String {
    let by_site: HashMap<usize, &SiteResolution> =
        resolutions.iter().map(|r| (r.span.start, r)).collect();

    let mut writer = CodeWriter::new(config.clone());
    for node in doc.markup() {
        write_node(&mut writer, node, registry, &by_site);
    }
    writer.finish()
}

fn write_node(
    writer: &mut CodeWriter,
    node: &Spanned<Node>,
    registry: &ComponentRegistry,
    by_site: &HashMap<usize, &SiteResolution>,
) {
    match &node.node {
        Node::Text(text) => writer.add_content(&format!("{:?}", text)),
        Node::Expression(id) => writer.add_content(id.as_str()),
        Node::Element(element) => {
            let site = by_site.get(&node.span.start).copied();
            match (registry.get(element.name.node.as_str()), site) {
                (Some(def), Some(site)) => {
                    write_component(writer, element, def, site, registry, by_site)
                }
                _ => write_element(writer, element, registry, by_site),
            }
        }
    }
}

fn write_element(
    writer: &mut CodeWriter,
    element: &Element,
    registry: &ComponentRegistry,
    by_site: &HashMap<usize, &SiteResolution>,
) {
    writer.open_element(element.name.node.as_str());
    for attr in &element.attributes {
        writer.add_attribute(attr.node.name.node.as_str(), &attr.node.value.node);
    }
    for child in &element.children {
        write_node(writer, child, registry, by_site);
    }
    writer.close_element();
}

fn write_component(
    writer: &mut CodeWriter,
    element: &Element,
    def: &crate::component::ComponentDefinition,
    site: &SiteResolution,
    registry: &ComponentRegistry,
    by_site: &HashMap<usize, &SiteResolution>,
) {
    writer.open_component(&component_type(&def.name, &site.type_arguments));
    for attr in &element.attributes {
        if SiteResolution::is_type_argument(def, &attr.node) {
            continue;
        }
        writer.add_attribute(attr.node.name.node.as_str(), &attr.node.value.node);
    }
    if !element.children.is_empty() {
        writer.begin_child_content();
        for child in &element.children {
            write_node(writer, child, registry, by_site);
        }
        writer.end_child_content();
    }
    writer.close_component();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_sequence_numbers() {
        let mut writer = CodeWriter::new(CodegenConfig::default());
        writer.open_element("div");
        writer.add_attribute("id", &AttributeValue::String("main".to_string()));
        writer.add_content("\"hi\"");
        writer.close_element();
        assert_eq!(
            writer.finish(),
            "builder.open_element(0, \"div\");\n\
             builder.add_attribute(1, \"id\", \"main\");\n\
             builder.add_content(2, \"hi\");\n\
             builder.close_element();\n"
        );
    }

    #[test]
    fn test_child_content_indentation() {
        let mut writer = CodeWriter::new(CodegenConfig::new().with_indent(2).with_builder("b"));
        writer.open_component("Panel");
        writer.begin_child_content();
        writer.add_content("x");
        writer.end_child_content();
        writer.close_component();
        assert_eq!(
            writer.finish(),
            "b.open_component::<Panel>(0);\n\
             b.add_child_content(1, |b| {\n\
             \x20 b.add_content(2, x);\n\
             });\n\
             b.close_component();\n"
        );
    }

    #[test]
    fn test_component_type_rendering() {
        assert_eq!(component_type("Counter", &[]), "Counter");
        assert_eq!(
            component_type(
                "Grid",
                &[Some(TypeExpr::generic("List", vec![TypeExpr::named("int")])), None]
            ),
            "Grid<List<int>, ?>"
        );
    }

    #[test]
    fn test_empty_document() {
        let writer = CodeWriter::new(CodegenConfig::default());
        assert_eq!(writer.finish(), "");
    }
}
