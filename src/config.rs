use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::lang::{LanguageTable, PatternLanguage, PatternLanguageConfig};

/// Output format for rendered reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
    Markdown,
}

/// Engine configuration. Every field has a default, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory names pruned from the project walk
    pub skip_dirs: Vec<String>,
    /// Extensions (without the dot) of files considered as dependents
    pub search_extensions: Vec<String>,
    /// Maximum usages recorded per (symbol, dependent) pair
    pub usage_limit: usize,
    /// Snippets are trimmed and cut to this many characters
    pub snippet_width: usize,
    /// Stop scanning after this many milliseconds and return a partial result
    pub deadline_ms: Option<u64>,
    /// Candidates larger than this (in bytes) are skipped
    pub max_file_size: Option<u64>,
    /// Honor .gitignore files while walking
    pub respect_gitignore: bool,
    /// Extra pattern-defined languages, registered after the built-ins
    pub languages: Vec<PatternLanguageConfig>,
    pub output_format: OutputFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let skip_dirs = [
            "node_modules",
            ".git",
            "__pycache__",
            ".venv",
            "venv",
            "dist",
            "build",
            ".next",
        ];
        let search_extensions = ["py", "js", "ts", "jsx", "tsx", "go", "rs", "java"];

        Self {
            skip_dirs: skip_dirs.into_iter().map(String::from).collect(),
            search_extensions: search_extensions.into_iter().map(String::from).collect(),
            usage_limit: 5,
            snippet_width: 100,
            deadline_ms: None,
            max_file_size: Some(1024 * 1024),
            respect_gitignore: false,
            languages: Vec::new(),
            output_format: OutputFormat::Plain,
        }
    }
}

impl EngineConfig {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Looks for `fathom.toml` in the working directory, then
    /// `fathom/config.toml` under the user config directory.
    pub fn discover() -> anyhow::Result<Self> {
        for candidate in Self::candidate_paths() {
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "loading config");
                return Self::load_from_file(&candidate);
            }
        }
        Ok(Self::default())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("fathom.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("fathom").join("config.toml"));
        }
        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.search_extensions.is_empty() {
            return Err(AnalysisError::Config(
                "search_extensions must not be empty".into(),
            ));
        }
        if self.usage_limit == 0 {
            return Err(AnalysisError::Config("usage_limit must be at least 1".into()));
        }
        if self.snippet_width == 0 {
            return Err(AnalysisError::Config("snippet_width must be at least 1".into()));
        }
        Ok(())
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// Built-in languages plus the configured ones.
    pub fn build_table(&self) -> Result<LanguageTable> {
        let mut table = LanguageTable::builtin();
        for language in &self.languages {
            table.register(Arc::new(PatternLanguage::compile(language)?));
        }
        Ok(table)
    }
}
