//! Per-file analysis driver.
//!
//! ```text
//! path ─▶ Lang ─▶ parse ─▶ query captures ─▶ Extraction
//!                                               │
//!              FileReport ◀─ Structure ◀─ attribute (extends, calls)
//! ```
//!
//! Any failure along the way ends the file's analysis; [`Analyzer::analyze_file`]
//! turns it into a single error report.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tree_sitter::{Parser, Tree};

use super::attribution::attribute;
use super::captures::extract;
use super::languages::{Lang, LangQuery};
use crate::config::Config;
use crate::error::{AnalyzeError, Result};
use crate::report::{AnalysisOutput, FileReport, Limits, Structure};

/// Analyzes source files into structural reports.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    query_dir: Option<PathBuf>,
    limits: Limits,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            query_dir: config.query_dir.clone(),
            limits: config.limits(),
        }
    }

    /// Load capture queries from `dir` instead of the bundled ones.
    pub fn query_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.query_dir = dir;
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Analyze one file. Never fails: errors become `{ "error": ... }`.
    pub fn analyze_file(&self, path: &Path) -> AnalysisOutput {
        match self.try_analyze_file(path) {
            Ok(report) => AnalysisOutput::Report(report),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "analysis failed");
                AnalysisOutput::error(e.to_string())
            }
        }
    }

    /// Analyze one file, propagating the first error.
    pub fn try_analyze_file(&self, path: &Path) -> Result<FileReport> {
        let lang = Lang::from_path(path)?;
        let source = fs::read_to_string(path)?;
        self.analyze_source(&path.to_string_lossy(), lang, &source)
    }

    /// Analyze in-memory source. `file` is reported verbatim.
    pub fn analyze_source(&self, file: &str, lang: Lang, source: &str) -> Result<FileReport> {
        let tree = parse(lang, source, file)?;
        let query = LangQuery::resolve(lang, self.query_dir.as_deref())?;

        let extraction = extract(query.query(), tree.root_node(), source.as_bytes());
        tracing::debug!(
            file,
            language = lang.name(),
            containers = extraction.containers.len(),
            calls = extraction.calls.len(),
            extends = extraction.extends.len(),
            imports = extraction.imports.len(),
            "extracted captures"
        );

        let containers = attribute(extraction.containers, &extraction.extends, &extraction.calls);

        let mut imports = extraction.imports;
        imports.truncate(self.limits.max_imports);

        Ok(FileReport {
            file: file.to_string(),
            language: lang.name().to_string(),
            loc: count_lines(source),
            imports,
            structure: Structure::from_containers(containers, self.limits.max_calls),
        })
    }

    /// Analyze many files in parallel. Each file is analyzed independently;
    /// results are keyed and ordered by path.
    pub fn analyze_files(&self, paths: &[PathBuf]) -> BTreeMap<String, AnalysisOutput> {
        paths
            .par_iter()
            .map(|p| (p.to_string_lossy().to_string(), self.analyze_file(p)))
            .collect()
    }
}

/// Count lines the way a line-splitting reader would: every boundary ends a
/// line (`\n`, `\r`, `\r\n`, vertical tab, form feed, `\x1c`-`\x1e`, NEL,
/// U+2028, U+2029), and trailing text without a boundary is one more line.
pub fn count_lines(source: &str) -> usize {
    let mut lines = 0;
    let mut open = false;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                chars.next_if_eq(&'\n');
                lines += 1;
                open = false;
            }
            '\n' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}'
            | '\u{2029}' => {
                lines += 1;
                open = false;
            }
            _ => open = true,
        }
    }

    lines + usize::from(open)
}

fn parse(lang: Lang, source: &str, file: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser.set_language(&lang.grammar())?;
    parser
        .parse(source, None)
        .ok_or_else(|| AnalyzeError::Parse(file.to_string()))
}
