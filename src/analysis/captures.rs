//! Capture taxonomy and extraction of containers and references.
//!
//! Capture names in a language query follow a dotted taxonomy:
//!
//! | Capture               | Produces                                   |
//! |-----------------------|--------------------------------------------|
//! | `definition.<kind>`   | a [`Container`] spanning the captured node |
//! | `name`                | the container name, within the same match  |
//! | `reference.call`      | a call [`Reference`] at the node's line    |
//! | `reference.extends`   | an inheritance [`Reference`]               |
//! | `reference.import`    | a raw import string                        |
//!
//! Anything else is ignored. Only the first two segments of a tag are
//! significant, so `definition.function.async` is a `function`.

use std::borrow::Cow;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

use super::complexity;
use super::facts::{Container, ContainerKind, Extraction, Reference, ReferenceKind, Span};

/// Capture name carrying the identifier of a definition.
pub const NAME_CAPTURE: &str = "name";

/// Parsed capture name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureTag {
    Definition(ContainerKind),
    Reference(ReferenceKind),
    Import,
    Name,
    Ignored,
}

impl CaptureTag {
    pub fn parse(tag: &str) -> Self {
        let mut parts = tag.split('.');
        let head = parts.next().unwrap_or("");
        let kind = parts.next();

        match (head, kind) {
            ("definition", Some(kind)) if !kind.is_empty() => {
                CaptureTag::Definition(ContainerKind::parse(kind))
            }
            ("reference", Some("call")) => CaptureTag::Reference(ReferenceKind::Call),
            ("reference", Some("extends")) => CaptureTag::Reference(ReferenceKind::Extends),
            ("reference", Some("import")) => CaptureTag::Import,
            (NAME_CAPTURE, None) => CaptureTag::Name,
            _ => CaptureTag::Ignored,
        }
    }
}

fn node_text<'s>(node: Node, source: &'s [u8]) -> Cow<'s, str> {
    String::from_utf8_lossy(&source[node.byte_range()])
}

fn start_line(node: Node) -> usize {
    node.start_position().row + 1
}

/// Sink for captures, in capture order.
#[derive(Debug, Default)]
pub struct Extractor {
    extraction: Extraction,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a definition. `name` is the `@name` capture of the same match,
    /// if the query provides one; otherwise the node's own text is used.
    pub fn definition(&mut self, kind: ContainerKind, node: Node, name: Option<Node>, source: &[u8]) {
        let name = node_text(name.unwrap_or(node), source).into_owned();
        let complexity = if kind.is_callable() {
            complexity::estimate(node)
        } else {
            0
        };

        self.extraction
            .containers
            .push(Container::new(kind, name, Span::from_node(node)).with_complexity(complexity));
    }

    pub fn reference(&mut self, kind: ReferenceKind, node: Node, source: &[u8]) {
        let reference = Reference {
            kind,
            name: node_text(node, source).into_owned(),
            line: start_line(node),
        };
        match kind {
            ReferenceKind::Call => self.extraction.calls.push(reference),
            ReferenceKind::Extends => self.extraction.extends.push(reference),
        }
    }

    pub fn import(&mut self, node: Node, source: &[u8]) {
        self.extraction.imports.push(node_text(node, source).into_owned());
    }

    pub fn finish(self) -> Extraction {
        self.extraction
    }
}

/// Run `query` over `root` and extract containers, references and imports
/// in capture order.
pub fn extract(query: &Query, root: Node, source: &[u8]) -> Extraction {
    let tags: Vec<CaptureTag> = query
        .capture_names()
        .iter()
        .map(|name| CaptureTag::parse(name))
        .collect();

    let mut extractor = Extractor::new();
    let mut cursor = QueryCursor::new();
    let mut captures = cursor.captures(query, root, source);

    while let Some((m, index)) = captures.next() {
        let capture = m.captures[*index];
        match &tags[capture.index as usize] {
            CaptureTag::Definition(kind) => {
                let name = m
                    .captures
                    .iter()
                    .find(|c| tags[c.index as usize] == CaptureTag::Name)
                    .map(|c| c.node);
                extractor.definition(kind.clone(), capture.node, name, source);
            }
            CaptureTag::Reference(kind) => extractor.reference(*kind, capture.node, source),
            CaptureTag::Import => extractor.import(capture.node, source),
            CaptureTag::Name | CaptureTag::Ignored => {}
        }
    }

    extractor.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::{Language, Parser};

    fn run(language: Language, query: &str, source: &str) -> Extraction {
        let mut parser = Parser::new();
        parser.set_language(&language).unwrap();
        let tree = parser.parse(source, None).unwrap();
        let query = Query::new(&language, query).unwrap();
        extract(&query, tree.root_node(), source.as_bytes())
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!(
            CaptureTag::parse("definition.function"),
            CaptureTag::Definition(ContainerKind::Function)
        );
        assert_eq!(
            CaptureTag::parse("definition.function.async"),
            CaptureTag::Definition(ContainerKind::Function)
        );
        assert_eq!(
            CaptureTag::parse("definition.module"),
            CaptureTag::Definition(ContainerKind::Other("module".to_string()))
        );
        assert_eq!(
            CaptureTag::parse("reference.call"),
            CaptureTag::Reference(ReferenceKind::Call)
        );
        assert_eq!(
            CaptureTag::parse("reference.extends"),
            CaptureTag::Reference(ReferenceKind::Extends)
        );
        assert_eq!(CaptureTag::parse("reference.import"), CaptureTag::Import);
        assert_eq!(CaptureTag::parse("name"), CaptureTag::Name);
        assert_eq!(CaptureTag::parse("definition"), CaptureTag::Ignored);
        assert_eq!(CaptureTag::parse("reference.type"), CaptureTag::Ignored);
        assert_eq!(CaptureTag::parse("doc"), CaptureTag::Ignored);
    }

    #[test]
    fn test_definitions_with_name_capture() {
        let source = "def a():\n    pass\n\n\ndef b(x):\n    if x:\n        return 1\n";
        let extraction = run(
            tree_sitter_python::LANGUAGE.into(),
            "(function_definition name: (identifier) @name) @definition.function",
            source,
        );

        let names: Vec<_> = extraction.containers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(extraction.containers[0].span, Span::new(1, 2));
        assert_eq!(extraction.containers[1].span, Span::new(5, 7));
        assert_eq!(extraction.containers[0].complexity, 1);
        assert_eq!(extraction.containers[1].complexity, 2);
    }

    #[test]
    fn test_definition_without_name_uses_node_text() {
        let source = "class A:\n    pass\n";
        let extraction = run(
            tree_sitter_python::LANGUAGE.into(),
            "(class_definition) @definition.class",
            source,
        );

        assert_eq!(extraction.containers.len(), 1);
        assert_eq!(extraction.containers[0].name, "class A:\n    pass");
        assert_eq!(extraction.containers[0].complexity, 0);
    }

    #[test]
    fn test_references_and_imports() {
        let source = "import os\nfrom pkg import thing\n\nclass A(Base):\n    pass\n\nprint(os.getcwd())\n";
        let extraction = run(
            tree_sitter_python::LANGUAGE.into(),
            r#"
            (import_statement name: (dotted_name) @reference.import)
            (import_from_statement module_name: (dotted_name) @reference.import)
            (class_definition superclasses: (argument_list (identifier) @reference.extends))
            (call function: (identifier) @reference.call)
            (call function: (attribute attribute: (identifier) @reference.call))
            "#,
            source,
        );

        assert_eq!(extraction.imports, vec!["os", "pkg"]);
        assert_eq!(extraction.extends, vec![Reference::extends("Base", 4)]);
        assert_eq!(
            extraction.calls,
            vec![Reference::call("print", 7), Reference::call("getcwd", 7)]
        );
        assert!(extraction.containers.is_empty());
    }

    #[test]
    fn test_unknown_captures_are_ignored() {
        let source = "def a():\n    pass\n";
        let extraction = run(
            tree_sitter_python::LANGUAGE.into(),
            "(function_definition name: (identifier) @doc.name) @definition.function",
            source,
        );
        assert_eq!(extraction.containers.len(), 1);
        assert!(extraction.calls.is_empty());
    }

    #[test]
    fn test_outer_container_precedes_inner() {
        let source = "class Outer:\n    class Inner:\n        pass\n";
        let extraction = run(
            tree_sitter_python::LANGUAGE.into(),
            "(class_definition name: (identifier) @name) @definition.class",
            source,
        );

        let names: Vec<_> = extraction.containers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Outer", "Inner"]);
    }
}
