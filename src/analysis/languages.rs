//! Language resolution and capture queries.
//!
//! Each supported language pairs a tree-sitter grammar with a capture query
//! whose capture names follow the `definition.<kind>` / `reference.<kind>`
//! taxonomy understood by the capture extractor. Queries are bundled
//! into the binary; a query directory may be configured to replace them with
//! `<dir>/<language>.scm`.

use std::fs;
use std::path::Path;

use once_cell::sync::OnceCell;
use tree_sitter::{Language, Query};

use crate::error::{AnalyzeError, Result};

/// Supported source languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Python,
    Java,
    Go,
    Rust,
    C,
    Cpp,
    JavaScript,
    TypeScript,
    Tsx,
    Php,
}

impl Lang {
    /// All supported languages.
    pub const ALL: [Lang; 10] = [
        Lang::Python,
        Lang::Java,
        Lang::Go,
        Lang::Rust,
        Lang::C,
        Lang::Cpp,
        Lang::JavaScript,
        Lang::TypeScript,
        Lang::Tsx,
        Lang::Php,
    ];

    /// Resolve a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(Lang::Python),
            "java" => Some(Lang::Java),
            "go" => Some(Lang::Go),
            "rs" => Some(Lang::Rust),
            "c" | "h" => Some(Lang::C),
            "cpp" | "hpp" | "cc" => Some(Lang::Cpp),
            "js" | "jsx" => Some(Lang::JavaScript),
            "ts" => Some(Lang::TypeScript),
            "tsx" => Some(Lang::Tsx),
            "php" => Some(Lang::Php),
            _ => None,
        }
    }

    /// Resolve a path by its extension.
    ///
    /// The error message carries the extension with its leading dot, or an
    /// empty string when the path has none.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext).ok_or_else(|| {
            let shown = if ext.is_empty() {
                String::new()
            } else {
                format!(".{}", ext)
            };
            AnalyzeError::UnsupportedExtension(shown)
        })
    }

    /// Canonical language name, also the query file stem.
    pub fn name(&self) -> &'static str {
        match self {
            Lang::Python => "python",
            Lang::Java => "java",
            Lang::Go => "go",
            Lang::Rust => "rust",
            Lang::C => "c",
            Lang::Cpp => "cpp",
            Lang::JavaScript => "javascript",
            Lang::TypeScript => "typescript",
            Lang::Tsx => "tsx",
            Lang::Php => "php",
        }
    }

    /// The tree-sitter grammar.
    pub fn grammar(&self) -> Language {
        match self {
            Lang::Python => tree_sitter_python::LANGUAGE.into(),
            Lang::Java => tree_sitter_java::LANGUAGE.into(),
            Lang::Go => tree_sitter_go::LANGUAGE.into(),
            Lang::Rust => tree_sitter_rust::LANGUAGE.into(),
            Lang::C => tree_sitter_c::LANGUAGE.into(),
            Lang::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            Lang::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Lang::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Lang::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Lang::Php => tree_sitter_php::LANGUAGE_PHP.into(),
        }
    }

    /// Source of the bundled capture query.
    pub fn bundled_query_source(&self) -> &'static str {
        match self {
            Lang::Python => include_str!("../queries/python.scm"),
            Lang::Java => include_str!("../queries/java.scm"),
            Lang::Go => include_str!("../queries/go.scm"),
            Lang::Rust => include_str!("../queries/rust.scm"),
            Lang::C => include_str!("../queries/c.scm"),
            Lang::Cpp => include_str!("../queries/cpp.scm"),
            Lang::JavaScript => include_str!("../queries/javascript.scm"),
            Lang::TypeScript | Lang::Tsx => include_str!("../queries/typescript.scm"),
            Lang::Php => include_str!("../queries/php.scm"),
        }
    }

    /// Compiled bundled query, built once per language.
    pub fn bundled_query(&self) -> Result<&'static Query> {
        #[allow(clippy::declare_interior_mutable_const)]
        const EMPTY: OnceCell<Query> = OnceCell::new();
        static COMPILED: [OnceCell<Query>; Lang::ALL.len()] = [EMPTY; Lang::ALL.len()];

        COMPILED[*self as usize]
            .get_or_try_init(|| Query::new(&self.grammar(), self.bundled_query_source()))
            .map_err(AnalyzeError::from)
    }

    /// Load and compile `<dir>/<name>.scm`.
    pub fn load_query(&self, dir: &Path) -> Result<Query> {
        let path = dir.join(format!("{}.scm", self.name()));
        if !path.is_file() {
            return Err(AnalyzeError::MissingQuery(self.name().to_string()));
        }
        let source = fs::read_to_string(&path)?;
        Ok(Query::new(&self.grammar(), &source)?)
    }
}

/// A capture query, bundled or loaded from disk.
pub enum LangQuery {
    Bundled(&'static Query),
    Loaded(Query),
}

impl LangQuery {
    /// Resolve the query for `lang`, preferring `query_dir` when given.
    pub fn resolve(lang: Lang, query_dir: Option<&Path>) -> Result<Self> {
        match query_dir {
            Some(dir) => lang.load_query(dir).map(LangQuery::Loaded),
            None => lang.bundled_query().map(LangQuery::Bundled),
        }
    }

    pub fn query(&self) -> &Query {
        match self {
            LangQuery::Bundled(q) => q,
            LangQuery::Loaded(q) => q,
        }
    }
}

/// All extensions with a language mapping.
pub fn supported_extensions() -> &'static [&'static str] {
    &[
        "py", "java", "go", "rs", "c", "h", "cpp", "hpp", "cc", "js", "jsx", "ts", "tsx", "php",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extension_table() {
        assert_eq!(Lang::from_extension("py"), Some(Lang::Python));
        assert_eq!(Lang::from_extension("h"), Some(Lang::C));
        assert_eq!(Lang::from_extension("cc"), Some(Lang::Cpp));
        assert_eq!(Lang::from_extension("jsx"), Some(Lang::JavaScript));
        assert_eq!(Lang::from_extension("tsx"), Some(Lang::Tsx));
        assert_eq!(Lang::from_extension("php"), Some(Lang::Php));
        assert_eq!(Lang::from_extension("rb"), None);

        for ext in supported_extensions() {
            assert!(Lang::from_extension(ext).is_some(), "{} should resolve", ext);
        }
    }

    #[test]
    fn test_from_path_error_message() {
        let err = Lang::from_path(Path::new("notes.xyz")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported extension: .xyz");

        let err = Lang::from_path(Path::new("Makefile")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported extension: ");
    }

    #[test]
    fn test_all_bundled_queries_compile() {
        for lang in Lang::ALL {
            let query = lang.bundled_query();
            assert!(query.is_ok(), "{} query failed: {:?}", lang.name(), query.err());
        }
    }

    #[test]
    fn test_lang_index_matches_all() {
        for (i, lang) in Lang::ALL.iter().enumerate() {
            assert_eq!(*lang as usize, i);
        }
    }

    #[test]
    fn test_query_dir_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = LangQuery::resolve(Lang::Go, Some(temp.path())).err().unwrap();
        assert_eq!(err.to_string(), "Missing query for go");
    }

    #[test]
    fn test_query_dir_override() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("python.scm"),
            "(function_definition name: (identifier) @name) @definition.function\n",
        )
        .unwrap();

        let query = LangQuery::resolve(Lang::Python, Some(temp.path())).unwrap();
        assert!(matches!(query, LangQuery::Loaded(_)));
        assert!(query.query().capture_names().contains(&"definition.function"));
    }

    #[test]
    fn test_query_dir_invalid_query() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("python.scm"), "(not_a_node) @x").unwrap();

        let err = LangQuery::resolve(Lang::Python, Some(temp.path())).err().unwrap();
        assert!(matches!(err, AnalyzeError::Query(_)));
    }
}
