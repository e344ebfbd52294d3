//! Output formatting for analysis results.
//!
//! Supports two output formats:
//! - JSON: one report object per file (or a path-keyed object in directory mode)
//! - Pretty: colored terminal outline for human readability

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analysis::Container;

/// Marker appended to a `calls` list that was cut short.
pub const TRUNCATION_SENTINEL: &str = "...truncated...";

/// Default cap on `calls` entries per container.
pub const DEFAULT_MAX_CALLS: usize = 50;

/// Default cap on `imports` entries per file.
pub const DEFAULT_MAX_IMPORTS: usize = 100;

/// Output list caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_calls: usize,
    pub max_imports: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_calls: DEFAULT_MAX_CALLS,
            max_imports: DEFAULT_MAX_IMPORTS,
        }
    }
}

/// One container in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEntry {
    pub kind: String,
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub complexity: u32,
    pub calls: Vec<String>,
    pub extends: Vec<String>,
}

impl ContainerEntry {
    /// Build an entry, capping `calls` at `max_calls` plus the sentinel.
    pub fn from_container(container: Container, max_calls: usize) -> Self {
        Self {
            kind: container.kind.as_str().to_string(),
            name: container.name,
            start_line: container.span.start_line,
            end_line: container.span.end_line,
            complexity: container.complexity,
            calls: truncate_calls(container.calls, max_calls),
            extends: container.extends,
        }
    }
}

/// Keep the first `max` names, appending [`TRUNCATION_SENTINEL`] if any were cut.
pub fn truncate_calls(mut calls: Vec<String>, max: usize) -> Vec<String> {
    if calls.len() > max {
        calls.truncate(max);
        calls.push(TRUNCATION_SENTINEL.to_string());
    }
    calls
}

/// Containers split into type-like and everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub classes: Vec<ContainerEntry>,
    pub functions: Vec<ContainerEntry>,
}

impl Structure {
    /// Partition containers, preserving extraction order within each list.
    pub fn from_containers(containers: Vec<Container>, max_calls: usize) -> Self {
        let mut structure = Structure::default();
        for container in containers {
            let type_like = container.kind.is_type_like();
            let entry = ContainerEntry::from_container(container, max_calls);
            if type_like {
                structure.classes.push(entry);
            } else {
                structure.functions.push(entry);
            }
        }
        structure
    }
}

/// Successful analysis of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub language: String,
    pub loc: usize,
    pub imports: Vec<String>,
    pub structure: Structure,
}

/// Failed analysis of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
}

/// Result of analyzing one file: a full report or a single error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutput {
    Report(FileReport),
    Error(ErrorReport),
}

impl AnalysisOutput {
    pub fn error(message: impl Into<String>) -> Self {
        AnalysisOutput::Error(ErrorReport {
            error: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisOutput::Error(_))
    }

    pub fn as_report(&self) -> Option<&FileReport> {
        match self {
            AnalysisOutput::Report(r) => Some(r),
            AnalysisOutput::Error(_) => None,
        }
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Render a single file's output as pretty JSON.
pub fn to_json(output: &AnalysisOutput) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

/// Render a directory scan, keyed and ordered by path.
pub fn to_json_map(outputs: &BTreeMap<String, AnalysisOutput>) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(outputs)?)
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Render one file's output as a colored outline.
pub fn to_pretty(label: &str, output: &AnalysisOutput) -> String {
    let mut out = String::new();

    let report = match output {
        AnalysisOutput::Error(e) => {
            out.push_str(&format!("{} {}\n", label.bold(), "error".red().bold()));
            out.push_str(&format!("  {}\n", e.error.red()));
            return out;
        }
        AnalysisOutput::Report(r) => r,
    };

    out.push_str(&format!(
        "{} {} {}\n",
        label.bold(),
        format!("[{}]", report.language).cyan(),
        format!("{} lines", report.loc).dimmed()
    ));

    if !report.imports.is_empty() {
        out.push_str(&format!("  {} {}\n", "imports:".dimmed(), report.imports.join(", ")));
    }

    for class in &report.structure.classes {
        out.push_str(&format!(
            "  {} {} {}\n",
            class.kind.blue(),
            class.name.bold(),
            format!("L{}-{}", class.start_line, class.end_line).dimmed()
        ));
        if !class.extends.is_empty() {
            out.push_str(&format!("      extends {}\n", class.extends.join(", ")));
        }
        if !class.calls.is_empty() {
            out.push_str(&format!("      calls {}\n", class.calls.join(", ")));
        }
    }

    for func in &report.structure.functions {
        let complexity = format!("cc={}", func.complexity);
        let complexity = if func.complexity >= 10 {
            complexity.red()
        } else if func.complexity >= 5 {
            complexity.yellow()
        } else {
            complexity.green()
        };
        out.push_str(&format!(
            "  {} {} {} {}\n",
            func.kind.magenta(),
            func.name.bold(),
            format!("L{}-{}", func.start_line, func.end_line).dimmed(),
            complexity
        ));
        if !func.calls.is_empty() {
            out.push_str(&format!("      calls {}\n", func.calls.join(", ")));
        }
    }

    out
}
