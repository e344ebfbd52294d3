//! Configuration file for codeshape.
//!
//! All fields are optional; an absent file means defaults throughout.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::{Limits, DEFAULT_MAX_CALLS, DEFAULT_MAX_IMPORTS};

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["codeshape.yaml", ".codeshape.yaml"];

/// Template written by `codeshape init`.
pub const DEFAULT_TEMPLATE: &str = include_str!("templates/codeshape.yaml");

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Maximum `calls` entries per container before truncation.
    pub max_calls: usize,
    /// Maximum `imports` entries per file.
    pub max_imports: usize,
    /// Directory holding `<language>.scm` capture queries. When unset the
    /// bundled queries are used.
    pub query_dir: Option<PathBuf>,
    /// Glob patterns for paths to skip in directory mode (e.g., "**/generated/**")
    pub excluded_paths: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_calls: DEFAULT_MAX_CALLS,
            max_imports: DEFAULT_MAX_IMPORTS,
            query_dir: None,
            excluded_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse a config from YAML text. An empty document yields defaults.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load from `explicit` if given, else from a discovered file in `dir`,
    /// else defaults. The result is validated.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        let config = match explicit {
            Some(path) => Self::parse_file(path)?,
            None => match discover(dir) {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "using discovered config");
                    Self::parse_file(&path)?
                }
                None => Self::default(),
            },
        };
        validate(&config)?;
        Ok(config)
    }

    /// Output caps.
    pub fn limits(&self) -> Limits {
        Limits {
            max_calls: self.max_calls,
            max_imports: self.max_imports,
        }
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    /// Uses globset for matching, which supports `**` for recursive directory matching.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }
}

/// Find a config file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Validate a parsed config.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if let Some(dir) = &config.query_dir {
        if !dir.is_dir() {
            anyhow::bail!("query_dir {:?} is not a directory", dir);
        }
    }

    // Validate excluded_paths glob patterns compile
    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    Ok(())
}
