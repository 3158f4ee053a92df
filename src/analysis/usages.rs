use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rayon::prelude::*;
use regex::Regex;
use tracing::debug;

use super::ScanContext;
use crate::core::{DependentFile, ExportedSymbol, SymbolUsage};

/// Occurrences of the public symbols in each dependent, keyed by symbol.
///
/// Matching is per line on word boundaries. Every line of an import
/// statement, continuation lines included, is skipped so bringing a symbol
/// in is not counted as a use of it. At most
/// `usage_limit` lines are recorded per (symbol, file) pair; symbols with no
/// occurrence are absent from the map.
pub fn track_usages(
    exports: &[ExportedSymbol],
    dependents: &[DependentFile],
    root: &Path,
    ctx: &ScanContext<'_>,
) -> BTreeMap<String, Vec<SymbolUsage>> {
    let names: BTreeSet<&str> = exports
        .iter()
        .filter(|s| s.is_public)
        .map(|s| s.name.as_str())
        .collect();

    let matchers: Vec<(&str, Regex)> = names
        .into_iter()
        .filter_map(|name| {
            Regex::new(&format!(r"\b{}\b", regex::escape(name)))
                .map(|re| (name, re))
                .map_err(|err| debug!(symbol = name, error = %err, "cannot build usage pattern"))
                .ok()
        })
        .collect();

    let mut usages: BTreeMap<String, Vec<SymbolUsage>> = BTreeMap::new();
    if matchers.is_empty() {
        return usages;
    }

    let limit = ctx.config.usage_limit;
    let width = ctx.config.snippet_width;

    let per_file: Vec<Vec<(&str, SymbolUsage)>> = dependents
        .par_iter()
        .map(|dependent| {
            let path = root.join(&dependent.relative_path);
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "skipping unreadable dependent");
                    return Vec::new();
                }
            };
            let import_lines = ctx
                .table
                .for_path(&path)
                .map(|l| l.import_lines(&content))
                .unwrap_or_default();

            let mut found = Vec::new();
            for (name, re) in &matchers {
                let hits = content
                    .lines()
                    .enumerate()
                    .filter(|(idx, _)| !import_lines.contains(&(idx + 1)))
                    .filter(|(_, line)| re.is_match(line))
                    .take(limit);
                for (idx, line) in hits {
                    found.push((
                        *name,
                        SymbolUsage {
                            file: dependent.relative_path.clone(),
                            line: idx + 1,
                            snippet: snippet(line, width),
                        },
                    ));
                }
            }
            found
        })
        .collect();

    for (name, usage) in per_file.into_iter().flatten() {
        usages.entry(name.to_string()).or_default().push(usage);
    }
    usages
}

fn snippet(line: &str, width: usize) -> String {
    line.trim().chars().take(width).collect()
}
