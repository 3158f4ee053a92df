//! Languages defined in configuration.
//!
//! ```toml
//! [[languages]]
//! name = "Ruby"
//! extensions = ["rb"]
//! import_patterns = ['''(?m)^\s*require(?:_relative)?\s+['"]([^'"]+)['"]''']
//! dependency_patterns = ['''(?m)^\s*require(?:_relative)?\s+['"](?:[^'"]*/)?{name}['"]''']
//! stdlib = ["json", "set"]
//!
//! [[languages.export_patterns]]
//! pattern = '(?m)^\s*def\s+(?P<name>\w+)'
//! kind = "function"
//! visibility = "no_leading_underscore"
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ExportPattern, Language, NAME_PLACEHOLDER, Visibility};
use crate::core::{ImportCategory, SymbolKind};
use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportPatternConfig {
    pub pattern: String,
    pub kind: SymbolKind,
    #[serde(default)]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternLanguageConfig {
    pub name: String,
    pub extensions: Vec<String>,
    /// Empty means export extraction is unsupported for this language.
    pub export_patterns: Vec<ExportPatternConfig>,
    pub import_patterns: Vec<String>,
    /// Must contain the `{name}` placeholder.
    pub dependency_patterns: Vec<String>,
    pub stdlib: Vec<String>,
}

/// A [`Language`] whose rules are all data.
#[derive(Debug)]
pub struct PatternLanguage {
    name: String,
    extensions: Vec<String>,
    exports: Option<Vec<ExportPattern>>,
    imports: Vec<Regex>,
    templates: Vec<String>,
    stdlib: Vec<String>,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| AnalysisError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl PatternLanguage {
    /// Compiles every pattern up front so a bad config fails at startup
    /// rather than in the middle of a walk.
    pub fn compile(config: &PatternLanguageConfig) -> Result<Self> {
        if config.name.trim().is_empty() {
            return Err(AnalysisError::Config("language name must not be empty".into()));
        }
        if config.extensions.is_empty() {
            return Err(AnalysisError::Config(format!(
                "language `{}` declares no extensions",
                config.name
            )));
        }

        let exports = if config.export_patterns.is_empty() {
            None
        } else {
            let mut patterns = Vec::with_capacity(config.export_patterns.len());
            for p in &config.export_patterns {
                let regex = compile(&p.pattern)?;
                if !regex.capture_names().any(|n| n == Some("name")) {
                    return Err(AnalysisError::Config(format!(
                        "export pattern `{}` has no `name` capture group",
                        p.pattern
                    )));
                }
                patterns.push(ExportPattern {
                    regex,
                    kind: p.kind,
                    visibility: p.visibility.clone(),
                });
            }
            Some(patterns)
        };

        let mut imports = Vec::with_capacity(config.import_patterns.len());
        for p in &config.import_patterns {
            let regex = compile(p)?;
            if regex.captures_len() < 2 {
                return Err(AnalysisError::Config(format!(
                    "import pattern `{p}` has no capture group for the module"
                )));
            }
            imports.push(regex);
        }

        for template in &config.dependency_patterns {
            if !template.contains(NAME_PLACEHOLDER) {
                return Err(AnalysisError::Config(format!(
                    "dependency pattern `{template}` is missing the {NAME_PLACEHOLDER} placeholder"
                )));
            }
            compile(&template.replace(NAME_PLACEHOLDER, "module"))?;
        }

        Ok(Self {
            name: config.name.clone(),
            extensions: config.extensions.iter().map(|e| super::normalize_extension(e)).collect(),
            exports,
            imports,
            templates: config.dependency_patterns.clone(),
            stdlib: config.stdlib.clone(),
        })
    }
}

impl Language for PatternLanguage {
    fn name(&self) -> &str {
        &self.name
    }

    fn extensions(&self) -> Vec<&str> {
        self.extensions.iter().map(String::as_str).collect()
    }

    fn export_patterns(&self) -> Option<&[ExportPattern]> {
        self.exports.as_deref()
    }

    fn import_patterns(&self) -> &[Regex] {
        &self.imports
    }

    fn dependency_templates(&self) -> Vec<&str> {
        self.templates.iter().map(String::as_str).collect()
    }

    fn classify_import(&self, module: &str) -> ImportCategory {
        let root = module
            .split(|c: char| matches!(c, '.' | '/' | ':'))
            .next()
            .unwrap_or(module);
        if self.stdlib.iter().any(|s| s == module || s == root) {
            ImportCategory::Stdlib
        } else if module.starts_with('.') || module.starts_with('/') {
            ImportCategory::Internal
        } else {
            ImportCategory::External
        }
    }
}
