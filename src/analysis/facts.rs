//! Fact structures extracted from capture analysis.

use std::fmt;

/// Inclusive 1-indexed line span of a definition node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start line (1-indexed).
    pub start_line: usize,
    /// End line (1-indexed, inclusive).
    pub end_line: usize,
}

impl Span {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        Self {
            start_line: node.start_position().row + 1, // tree-sitter is 0-indexed
            end_line: node.end_position().row + 1,
        }
    }

    /// Whether `line` falls inside the span. An inverted span contains nothing.
    pub fn contains(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    /// `end_line - start_line`, 0 for a one-line or inverted span. This is
    /// the tie-break key for call attribution.
    pub fn extent(&self) -> usize {
        self.end_line.saturating_sub(self.start_line)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_line, self.end_line)
    }
}

/// Kind of container, as named by the `definition.<kind>` capture tag.
///
/// Query files may introduce kinds this crate does not know about; those
/// are kept verbatim in `Other` and treated as neither callable nor type-like.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Function,
    Method,
    Class,
    Struct,
    Interface,
    Other(String),
}

impl ContainerKind {
    /// Parse the `<kind>` suffix of a definition tag.
    pub fn parse(kind: &str) -> Self {
        match kind {
            "function" => ContainerKind::Function,
            "method" => ContainerKind::Method,
            "class" => ContainerKind::Class,
            "struct" => ContainerKind::Struct,
            "interface" => ContainerKind::Interface,
            other => ContainerKind::Other(other.to_string()),
        }
    }

    /// Convert to a string representation.
    pub fn as_str(&self) -> &str {
        match self {
            ContainerKind::Function => "function",
            ContainerKind::Method => "method",
            ContainerKind::Class => "class",
            ContainerKind::Struct => "struct",
            ContainerKind::Interface => "interface",
            ContainerKind::Other(kind) => kind,
        }
    }

    /// Check if this is a callable (function or method).
    pub fn is_callable(&self) -> bool {
        matches!(self, ContainerKind::Function | ContainerKind::Method)
    }

    /// Check if this is a class, struct or interface.
    pub fn is_type_like(&self) -> bool {
        matches!(
            self,
            ContainerKind::Class | ContainerKind::Struct | ContainerKind::Interface
        )
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named, line-ranged unit of source structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub kind: ContainerKind,
    /// Raw text of the captured name. Not unique within a file.
    pub name: String,
    pub span: Span,
    /// Cyclomatic complexity; 0 for anything that is not callable.
    pub complexity: u32,
    /// Called names, deduplicated, in first-seen order.
    pub calls: Vec<String>,
    /// Inheritance targets in attribution order, duplicates kept.
    pub extends: Vec<String>,
}

impl Container {
    pub fn new(kind: ContainerKind, name: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            name: name.into(),
            span,
            complexity: 0,
            calls: Vec::new(),
            extends: Vec::new(),
        }
    }

    pub fn with_complexity(mut self, complexity: u32) -> Self {
        self.complexity = complexity;
        self
    }

    /// Record a call target. Repeated names are coalesced.
    pub fn add_call(&mut self, name: &str) {
        if !self.calls.iter().any(|c| c == name) {
            self.calls.push(name.to_string());
        }
    }

    /// Record an inheritance target.
    pub fn add_extends(&mut self, name: &str) {
        self.extends.push(name.to_string());
    }
}

/// What a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Call,
    Extends,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Call => "call",
            ReferenceKind::Extends => "extends",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single-line occurrence of a call target or inheritance target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub name: String,
    /// 1-indexed line of the occurrence.
    pub line: usize,
}

impl Reference {
    pub fn call(name: impl Into<String>, line: usize) -> Self {
        Self {
            kind: ReferenceKind::Call,
            name: name.into(),
            line,
        }
    }

    pub fn extends(name: impl Into<String>, line: usize) -> Self {
        Self {
            kind: ReferenceKind::Extends,
            name: name.into(),
            line,
        }
    }
}

/// Everything extracted from one file's captures, before attribution.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Containers in extraction order.
    pub containers: Vec<Container>,
    pub calls: Vec<Reference>,
    pub extends: Vec<Reference>,
    /// Raw import texts in extraction order, uncapped.
    pub imports: Vec<String>,
}
