//! Core types shared across fathom modules

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::analysis::risk::{RiskAssessment, RiskLevel};

/// Events emitted while an analysis is running
#[derive(Debug, Clone)]
pub enum AnalysisEvent {
    /// Analysis of the given target has started
    Started(PathBuf),
    /// Number of candidate files found by the project walk
    FilesFound(usize),
    /// A file was confirmed to import the target
    DependentFound(PathBuf),
    /// The scan stopped early because the deadline passed
    DeadlineExceeded,
    /// Analysis finished
    Complete,
}

/// Declaration category of an exported symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Class,
    Constant,
    Variable,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Constant => "constant",
            Self::Variable => "variable",
        }
    }
}

/// A declaration found on a file's public surface (or a private one, flagged
/// through `is_public`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedSymbol {
    pub name: String,
    pub kind: SymbolKind,
    /// 1-based line of the declaration
    pub decl_line: usize,
    pub is_public: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportCategory {
    Stdlib,
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ImportReference {
    pub raw: String,
    pub category: ImportCategory,
}

impl ImportReference {
    pub fn new(raw: impl Into<String>, category: ImportCategory) -> Self {
        Self {
            raw: raw.into(),
            category,
        }
    }
}

/// A file confirmed to import the target, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DependentFile {
    pub relative_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolUsage {
    /// Dependent file, relative to the project root
    pub file: PathBuf,
    /// 1-based line of the occurrence
    pub line: usize,
    pub snippet: String,
}

/// Outcome of a reverse-dependency search.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependentScan {
    pub files: Vec<DependentFile>,
    /// Candidate files that passed the walk filters and were examined
    pub files_scanned: usize,
    /// False when the deadline cut the scan short
    pub complete: bool,
}

/// Result of `map_dependencies`
#[derive(Debug, Clone, Serialize)]
pub struct DependencyMap {
    pub target_file: PathBuf,
    pub language: Option<String>,
    pub imports: Vec<ImportReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported_by: Option<DependentScan>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
}

impl DependencyMap {
    pub fn stdlib(&self) -> impl Iterator<Item = &ImportReference> {
        self.by_category(ImportCategory::Stdlib)
    }

    pub fn internal(&self) -> impl Iterator<Item = &ImportReference> {
        self.by_category(ImportCategory::Internal)
    }

    pub fn external(&self) -> impl Iterator<Item = &ImportReference> {
        self.by_category(ImportCategory::External)
    }

    fn by_category(&self, category: ImportCategory) -> impl Iterator<Item = &ImportReference> {
        self.imports.iter().filter(move |i| i.category == category)
    }

    /// False only when a reverse search ran and hit the deadline.
    pub fn is_complete(&self) -> bool {
        self.imported_by.as_ref().is_none_or(|scan| scan.complete)
    }
}

/// Result of `analyze_impact`
#[derive(Debug, Clone, Serialize)]
pub struct ImpactReport {
    pub target_file: PathBuf,
    pub language: Option<String>,
    pub exports: Vec<ExportedSymbol>,
    pub dependents: Vec<DependentFile>,
    pub usages: BTreeMap<String, Vec<SymbolUsage>>,
    #[serde(flatten)]
    pub risk: RiskAssessment,
    pub files_scanned: usize,
    pub complete: bool,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImpactSummary {
    pub dependent_count: usize,
    pub export_count: usize,
    pub public_export_count: usize,
    pub total_usages: usize,
}

impl ImpactReport {
    pub fn risk_level(&self) -> RiskLevel {
        self.risk.level()
    }

    pub fn risk_reasons(&self) -> &[String] {
        self.risk.reasons()
    }

    pub fn total_usages(&self) -> usize {
        self.usages.values().map(Vec::len).sum()
    }

    pub fn summary(&self) -> ImpactSummary {
        ImpactSummary {
            dependent_count: self.dependents.len(),
            export_count: self.exports.len(),
            public_export_count: self.exports.iter().filter(|s| s.is_public).count(),
            total_usages: self.total_usages(),
        }
    }
}
