//! Codeshape - structural code analyzer.
//!
//! Codeshape reads a source file, runs a tree-sitter capture query over it,
//! and reports the file's containers (classes, structs, interfaces,
//! functions, methods) with their line spans, the cyclomatic complexity of
//! every function and method, and the call and inheritance edges attributed
//! to the container that encloses them.
//!
//! # Architecture
//!
//! - `analysis`: capture extraction, complexity estimation, reference attribution
//! - `report`: report types, output caps, JSON and pretty output
//! - `config`: YAML configuration
//! - `cli`: command-line interface
//! - `error`: per-file error taxonomy
//!
//! # Example
//!
//! ```no_run
//! use codeshape::{AnalysisOutput, Analyzer};
//! use std::path::Path;
//!
//! let output = Analyzer::new().analyze_file(Path::new("src/app.py"));
//! if let AnalysisOutput::Report(report) = output {
//!     for func in &report.structure.functions {
//!         println!("{} cc={} calls={:?}", func.name, func.complexity, func.calls);
//!     }
//! }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;

pub use analysis::{
    attribute, estimate, AttributionPass, Analyzer, Container, ContainerKind, Lang, Reference,
    ReferenceKind, Span, TieBreak,
};
pub use config::Config;
pub use error::AnalyzeError;
pub use report::{AnalysisOutput, ContainerEntry, ErrorReport, FileReport, Limits, Structure};
