//! Errors that end a single file's analysis.

use thiserror::Error;

/// Fatal conditions for one file. Every variant is converted into a single
/// `{ "error": ... }` report at the analysis boundary.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Unsupported extension: {0}")]
    UnsupportedExtension(String),
    #[error("Missing query for {0}")]
    MissingQuery(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("failed to load grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
    #[error("invalid query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    #[error("failed to parse {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, AnalyzeError>;
