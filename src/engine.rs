use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::info;

use crate::analysis::{self, Deadline, ScanContext};
use crate::config::EngineConfig;
use crate::core::{AnalysisEvent, DependencyMap, DependentScan, ImpactReport, ImportCategory};
use crate::error::{AnalysisError, Result};
use crate::lang::LanguageTable;

/// Dependency and impact analysis over one language table.
///
/// The engine holds no per-call state: every operation re-reads the files it
/// needs, so repeated calls on an unchanged tree give identical results.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    table: Arc<LanguageTable>,
    events: Option<Sender<AnalysisEvent>>,
}

impl Engine {
    /// Validates `config` and builds the language table from it.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let table = config.build_table()?;
        Ok(Self::with_table(config, table))
    }

    /// Uses `table` as-is; `config.languages` is ignored.
    pub fn with_table(config: EngineConfig, table: LanguageTable) -> Self {
        Self {
            config,
            table: Arc::new(table),
            events: None,
        }
    }

    /// Streams progress events to `tx` during every call.
    pub fn with_events(mut self, tx: Sender<AnalysisEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn table(&self) -> &LanguageTable {
        &self.table
    }

    fn context(&self) -> ScanContext<'_> {
        ScanContext {
            table: &self.table,
            config: &self.config,
            deadline: Deadline::from_config(&self.config),
            events: self.events.as_ref(),
        }
    }

    /// Imports of `file`, and with `include_reverse` and a root, the files
    /// that import it. Without both, only `file` itself is read.
    pub fn map_dependencies(
        &self,
        file: &Path,
        project_root: Option<&Path>,
        include_reverse: bool,
    ) -> Result<DependencyMap> {
        let ctx = self.context();
        ctx.emit(AnalysisEvent::Started(file.to_path_buf()));

        let source = read_target(file)?;
        let language = self.table.for_path(file);
        let extraction = analysis::extract_imports(&source, language);

        let mut notes: Vec<String> = extraction.note.into_iter().collect();
        let imported_by = match (include_reverse, project_root) {
            (true, Some(root)) => {
                let (target, root) = canonical_pair(file, root)?;
                let scan = analysis::find_dependents(&target, &root, &ctx);
                if !scan.complete {
                    notes.push(partial_note(&scan));
                }
                Some(scan)
            }
            (true, None) => {
                notes.push("Reverse dependencies need a project root; skipped".to_string());
                None
            }
            (false, _) => None,
        };

        let mut map = DependencyMap {
            target_file: file.to_path_buf(),
            language: language.map(|l| l.name().to_string()),
            imports: extraction.items,
            imported_by,
            notes,
            suggestions: Vec::new(),
        };
        map.suggestions = dependency_suggestions(&map);

        info!(
            file = %file.display(),
            imports = map.imports.len(),
            dependents = map.imported_by.as_ref().map(|s| s.files.len()),
            "dependency map complete"
        );
        ctx.emit(AnalysisEvent::Complete);
        Ok(map)
    }

    /// Exports of `file`, the files under `project_root` that import it, how
    /// they use its public symbols, and the resulting risk.
    pub fn analyze_impact(
        &self,
        file: &Path,
        project_root: &Path,
        proposed_changes: Option<&str>,
    ) -> Result<ImpactReport> {
        let ctx = self.context();
        ctx.emit(AnalysisEvent::Started(file.to_path_buf()));

        let source = read_target(file)?;
        let (target, root) = canonical_pair(file, project_root)?;
        let language = self.table.for_path(file);

        let extraction = analysis::extract_exports(&source, language);
        let mut notes: Vec<String> = extraction.note.into_iter().collect();
        let exports = extraction.items;

        let scan = analysis::find_dependents(&target, &root, &ctx);
        if !scan.complete {
            notes.push(partial_note(&scan));
        }
        let usages = analysis::track_usages(&exports, &scan.files, &root, &ctx);

        let public_exports = exports.iter().filter(|s| s.is_public).count();
        let total_usages = usages.values().map(Vec::len).sum();
        let risk = analysis::score_risk(
            scan.files.len(),
            public_exports,
            total_usages,
            proposed_changes,
        );

        let mut report = ImpactReport {
            target_file: file.to_path_buf(),
            language: language.map(|l| l.name().to_string()),
            exports,
            dependents: scan.files,
            usages,
            risk,
            files_scanned: scan.files_scanned,
            complete: scan.complete,
            notes,
            suggestions: Vec::new(),
            warnings: Vec::new(),
        };
        report.suggestions = impact_suggestions(&report);
        if report.risk_level().is_elevated() {
            report.warnings.push(format!(
                "Risk level is {} - consider the impact carefully",
                report.risk_level().as_str().to_uppercase()
            ));
        }

        info!(
            file = %file.display(),
            dependents = report.dependents.len(),
            usages = total_usages,
            risk = %report.risk_level(),
            "impact analysis complete"
        );
        ctx.emit(AnalysisEvent::Complete);
        Ok(report)
    }
}

fn read_target(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).map_err(|err| AnalysisError::read(file, err))
}

/// Canonical target and root, so walked paths compare equal to the target.
fn canonical_pair(file: &Path, root: &Path) -> Result<(PathBuf, PathBuf)> {
    if !root.is_dir() {
        return Err(AnalysisError::ProjectRootNotFound(root.to_path_buf()));
    }
    let root = root
        .canonicalize()
        .map_err(|_| AnalysisError::ProjectRootNotFound(root.to_path_buf()))?;
    let target = file
        .canonicalize()
        .map_err(|err| AnalysisError::read(file, err))?;
    Ok((target, root))
}

fn partial_note(scan: &DependentScan) -> String {
    format!(
        "Deadline exceeded after examining {} files; dependents may be incomplete",
        scan.files_scanned
    )
}

fn dependency_suggestions(map: &DependencyMap) -> Vec<String> {
    let mut suggestions = Vec::new();

    let external = map.external().count();
    if external > 10 {
        suggestions.push(format!(
            "This file has {external} external dependencies - consider if all are needed"
        ));
    }
    if map.imports.iter().any(|i| i.category == ImportCategory::Internal) {
        suggestions.push("Check for circular dependencies in internal imports".to_string());
    }
    if let Some(scan) = &map.imported_by {
        let count = scan.files.len();
        if count > 5 {
            suggestions.push(format!(
                "This file is imported by {count} other files - changes may have wide impact"
            ));
        }
    }
    suggestions
}

fn impact_suggestions(report: &ImpactReport) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !report.dependents.is_empty() {
        let first: Vec<String> = report
            .dependents
            .iter()
            .take(3)
            .map(|d| d.relative_path.display().to_string())
            .collect();
        suggestions.push(format!(
            "Review these files before changing: {}",
            first.join(", ")
        ));
    }

    if report.risk_level().is_elevated() {
        suggestions.push("Consider adding tests for dependent code before making changes".to_string());
        suggestions.push("Make changes incrementally and test after each step".to_string());
    }

    // Stable sort keeps ties in symbol order.
    let mut most_used: Vec<(&String, usize)> = report
        .usages
        .iter()
        .map(|(name, usages)| (name, usages.len()))
        .collect();
    most_used.sort_by(|a, b| b.1.cmp(&a.1));
    for (name, count) in most_used.into_iter().take(3) {
        if count > 2 {
            suggestions.push(format!(
                "'{name}' is used {count} times - changes will have wide effect"
            ));
        }
    }

    suggestions
}
