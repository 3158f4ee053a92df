//! Reverse-dependency search.
//!
//! Candidates go through two filters. The first is a plain substring test
//! for the target's stem, which throws out most of a project without
//! touching the regex engine. The second runs the candidate language's
//! dependency patterns, which only match real import statements of the
//! target module.

use std::path::Path;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, warn};

use super::ScanContext;
use crate::core::{AnalysisEvent, DependentFile, DependentScan};
use crate::fs::{WalkConfig, walk_directory};

/// Files under `root` that import `target`. Both paths should be
/// canonical so the target itself is recognized and left out.
pub fn find_dependents(target: &Path, root: &Path, ctx: &ScanContext<'_>) -> DependentScan {
    let Some(stem) = target.file_stem().and_then(|s| s.to_str()) else {
        debug!(target = %target.display(), "target has no usable file stem");
        return DependentScan {
            complete: true,
            ..Default::default()
        };
    };

    let walk = WalkConfig {
        skip_dirs: &ctx.config.skip_dirs,
        extensions: &ctx.config.search_extensions,
        max_file_size: ctx.config.max_file_size,
        respect_gitignore: ctx.config.respect_gitignore,
        exclude: Some(target),
    };
    let candidates = walk_directory(root, &walk);
    ctx.emit(AnalysisEvent::FilesFound(candidates.len()));

    // Dependency patterns for the target, compiled on first use per language.
    let patterns: Vec<OnceLock<Vec<Regex>>> = ctx
        .table
        .languages()
        .iter()
        .map(|_| OnceLock::new())
        .collect();

    let scanned = AtomicUsize::new(0);
    let timed_out = AtomicBool::new(false);

    let found: Vec<DependentFile> = candidates
        .par_iter()
        .filter_map(|path| {
            if ctx.deadline.expired() {
                timed_out.store(true, Ordering::Relaxed);
                return None;
            }
            scanned.fetch_add(1, Ordering::Relaxed);

            let Some(idx) = ctx.table.index_for_path(path) else {
                debug!(path = %path.display(), "no language rules, skipping");
                return None;
            };

            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "skipping unreadable file");
                    return None;
                }
            };

            if !content.contains(stem) {
                return None;
            }

            let language = ctx.table.languages()[idx].as_ref();
            let confirmed = patterns[idx].get_or_init(|| {
                language.dependency_patterns(stem).unwrap_or_else(|err| {
                    debug!(language = language.name(), error = %err, "dependency pattern failed to compile");
                    Vec::new()
                })
            });
            if !confirmed.iter().any(|re| re.is_match(&content)) {
                return None;
            }

            let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            ctx.emit(AnalysisEvent::DependentFound(relative_path.clone()));
            Some(DependentFile { relative_path })
        })
        .collect();

    let mut files = found;
    files.sort();
    files.dedup();

    let complete = !timed_out.load(Ordering::Relaxed);
    if !complete {
        warn!(
            root = %root.display(),
            scanned = scanned.load(Ordering::Relaxed),
            total = candidates.len(),
            "deadline exceeded, dependent list is partial"
        );
        ctx.emit(AnalysisEvent::DeadlineExceeded);
    }

    DependentScan {
        files,
        files_scanned: scanned.into_inner(),
        complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Deadline;
    use crate::config::EngineConfig;
    use crate::lang::LanguageTable;
    use anyhow::Result;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    fn scan(root: &Path, target: &Path, config: &EngineConfig) -> DependentScan {
        let table = LanguageTable::builtin();
        let ctx = ScanContext::new(&table, config);
        find_dependents(target, root, &ctx)
    }

    fn paths(scan: &DependentScan) -> Vec<PathBuf> {
        scan.files.iter().map(|f| f.relative_path.clone()).collect()
    }

    #[test]
    fn test_import_confirms_mention_does_not() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().canonicalize()?;
        fs::write(root.join("auth.py"), "def login():\n    pass\n")?;
        fs::write(root.join("app.py"), "from auth import login\n\nlogin()\n")?;
        fs::write(root.join("docs.py"), "HELP = \"see the auth module\"\n")?;
        fs::write(root.join("other.py"), "import os\n")?;

        let result = scan(&root, &root.join("auth.py"), &EngineConfig::default());
        assert_eq!(paths(&result), vec![PathBuf::from("app.py")]);
        assert_eq!(result.files_scanned, 3);
        assert!(result.complete);
        Ok(())
    }

    #[test]
    fn test_cross_language_candidates() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().canonicalize()?;
        fs::create_dir_all(root.join("web/src"))?;
        fs::write(root.join("web/src/auth.ts"), "export function login() {}\n")?;
        fs::write(
            root.join("web/src/page.tsx"),
            "import { login } from './auth';\n\nlogin();\n",
        )?;
        fs::write(root.join("web/src/util.js"), "const auth = require('./auth');\n")?;
        fs::write(root.join("web/src/log.js"), "console.log('auth');\n")?;

        let result = scan(&root, &root.join("web/src/auth.ts"), &EngineConfig::default());
        assert_eq!(
            paths(&result),
            vec![PathBuf::from("web/src/page.tsx"), PathBuf::from("web/src/util.js")]
        );
        Ok(())
    }

    #[test]
    fn test_skip_dirs_are_pruned() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().canonicalize()?;
        fs::create_dir_all(root.join("node_modules/pkg"))?;
        fs::write(root.join("auth.js"), "export const login = 1;\n")?;
        fs::write(root.join("node_modules/pkg/index.js"), "import x from '../../auth';\n")?;

        let result = scan(&root, &root.join("auth.js"), &EngineConfig::default());
        assert!(result.files.is_empty());
        assert_eq!(result.files_scanned, 0);
        Ok(())
    }

    #[test]
    fn test_expired_deadline_is_partial() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().canonicalize()?;
        fs::write(root.join("auth.py"), "def login(): pass\n")?;
        fs::write(root.join("app.py"), "import auth\n")?;

        let config = EngineConfig::default();
        let table = LanguageTable::builtin();
        let ctx = ScanContext {
            deadline: Deadline::after(Duration::ZERO),
            ..ScanContext::new(&table, &config)
        };
        let result = find_dependents(&root.join("auth.py"), &root, &ctx);
        assert!(!result.complete);
        assert!(result.files.is_empty());
        assert_eq!(result.files_scanned, 0);
        Ok(())
    }

    #[test]
    fn test_events_are_emitted() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path().canonicalize()?;
        fs::write(root.join("auth.py"), "def login(): pass\n")?;
        fs::write(root.join("app.py"), "import auth\n")?;

        let config = EngineConfig::default();
        let table = LanguageTable::builtin();
        let (tx, rx) = crossbeam_channel::unbounded();
        let ctx = ScanContext {
            events: Some(&tx),
            ..ScanContext::new(&table, &config)
        };
        find_dependents(&root.join("auth.py"), &root, &ctx);
        drop(tx);

        let events: Vec<_> = rx.iter().collect();
        assert!(matches!(events[0], AnalysisEvent::FilesFound(1)));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, AnalysisEvent::DependentFound(p) if p == Path::new("app.py")))
        );
        Ok(())
    }
}
