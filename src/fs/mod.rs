use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filters applied while walking a project tree.
#[derive(Debug, Clone, Default)]
pub struct WalkConfig<'a> {
    /// Directory names pruned wherever they occur
    pub skip_dirs: &'a [String],
    /// Accepted extensions; empty accepts every file
    pub extensions: &'a [String],
    pub max_file_size: Option<u64>,
    pub respect_gitignore: bool,
    /// A file left out of the results (the analysis target)
    pub exclude: Option<&'a Path>,
}

impl WalkConfig<'_> {
    fn accepts_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}

/// Depth-first walk of `root`, sorted by file name at every level. Hidden
/// entries and `skip_dirs` are pruned; unreadable entries are logged and
/// skipped.
pub fn walk_directory(root: &Path, config: &WalkConfig<'_>) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(root);

    builder
        .standard_filters(false)
        .hidden(true)
        .git_ignore(config.respect_gitignore)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    let skip_dirs = config.skip_dirs.to_vec();
    builder.filter_entry(move |entry| {
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        !(is_dir
            && entry.depth() > 0
            && skip_dirs
                .iter()
                .any(|d| entry.file_name().to_str() == Some(d.as_str())))
    });

    let mut files = Vec::new();
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        if config.exclude.is_some_and(|ex| ex == path) || !config.accepts_extension(path) {
            continue;
        }
        if let Some(limit) = config.max_file_size {
            match entry.metadata() {
                Ok(meta) if meta.len() > limit => {
                    debug!(path = %path.display(), size = meta.len(), "skipping oversized file");
                    continue;
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "skipping file without metadata");
                    continue;
                }
            }
        }
        files.push(entry.into_path());
    }

    files
}
