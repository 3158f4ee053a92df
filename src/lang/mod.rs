//! Language rule table.
//!
//! Every supported language implements [`Language`]: export patterns,
//! import patterns, stdlib classification and the dependency templates used
//! to confirm that one file imports another. The [`LanguageTable`] maps file
//! extensions to implementations; it is built once per engine and shared
//! read-only across worker threads.
//!
//! Adding a language means adding an implementation and registering it. The
//! walker, the usage tracker and the scorer never look at language details.

pub mod c_family;
pub mod custom;
pub mod ecmascript;
pub mod go;
pub mod java;
pub mod python;
pub mod rust;

use std::collections::{BTreeSet, HashMap};
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::core::{ExportedSymbol, ImportCategory, ImportReference, SymbolKind};

pub use c_family::CFamily;
pub use custom::{PatternLanguage, PatternLanguageConfig};
pub use ecmascript::EcmaScript;
pub use go::Go;
pub use java::Java;
pub use python::Python;
pub use rust::Rust;

/// Placeholder substituted with the escaped module name in dependency templates.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// How a language decides whether a matched declaration is public.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Public unless the name starts with `_`
    NoLeadingUnderscore,
    /// Public when the name starts with an uppercase letter
    Capitalized,
    /// The pattern itself only matches exported declarations
    #[default]
    Exported,
    /// Public when the `vis` capture group contains this keyword
    Modifier(String),
}

impl Visibility {
    fn is_public(&self, name: &str, caps: &Captures<'_>) -> bool {
        match self {
            Self::NoLeadingUnderscore => !name.starts_with('_'),
            Self::Capitalized => name.chars().next().is_some_and(char::is_uppercase),
            Self::Exported => true,
            Self::Modifier(keyword) => caps.name("vis").is_some_and(|m| {
                m.as_str()
                    .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .any(|word| word == keyword)
            }),
        }
    }
}

/// A declaration pattern. The regex must define a `name` capture group and,
/// for [`Visibility::Modifier`], a `vis` group.
#[derive(Debug, Clone)]
pub struct ExportPattern {
    pub regex: Regex,
    pub kind: SymbolKind,
    pub visibility: Visibility,
}

impl ExportPattern {
    pub fn new(
        pattern: &str,
        kind: SymbolKind,
        visibility: Visibility,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            kind,
            visibility,
        })
    }
}

/// Extraction capabilities of one source language.
pub trait Language: Send + Sync {
    /// Display name (e.g. "Python")
    fn name(&self) -> &str;

    /// Lowercase extensions without the leading dot
    fn extensions(&self) -> Vec<&str>;

    /// Declaration patterns, or `None` when export extraction is unsupported.
    fn export_patterns(&self) -> Option<&[ExportPattern]>;

    /// Import patterns; capture group 1 is the imported module.
    fn import_patterns(&self) -> &[Regex];

    /// Regex templates matching an import of the module `{name}`.
    fn dependency_templates(&self) -> Vec<&str>;

    fn classify_import(&self, module: &str) -> ImportCategory;

    fn extract_exports(&self, source: &str) -> Option<Vec<ExportedSymbol>> {
        self.export_patterns()
            .map(|patterns| scan_exports(source, patterns))
    }

    fn extract_imports(&self, source: &str) -> Vec<ImportReference> {
        classify_all(self, scan_imports(source, self.import_patterns()))
    }

    /// Compiles the dependency templates for one module name.
    fn dependency_patterns(&self, module: &str) -> Result<Vec<Regex>, regex::Error> {
        compile_templates(&self.dependency_templates(), module)
    }

    /// Byte ranges of import statements. Languages with multi-line import
    /// forms extend this so continuation lines are covered too.
    fn import_spans(&self, source: &str) -> Vec<Range<usize>> {
        match_spans(source, self.import_patterns())
    }

    /// 1-based lines that belong to an import statement.
    fn import_lines(&self, source: &str) -> BTreeSet<usize> {
        let index = LineIndex::new(source);
        self.import_spans(source)
            .into_iter()
            .flat_map(|span| {
                let first = index.line_of(span.start);
                let last = index.line_of(span.end.saturating_sub(1).max(span.start));
                first..=last
            })
            .collect()
    }
}

/// Byte offsets of line starts, for offset → 1-based line lookups.
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }
}

/// Runs every pattern over the whole source. Results come back in
/// declaration order; ties keep pattern order.
pub fn scan_exports(source: &str, patterns: &[ExportPattern]) -> Vec<ExportedSymbol> {
    let index = LineIndex::new(source);
    let mut symbols = Vec::new();

    for pattern in patterns {
        for caps in pattern.regex.captures_iter(source) {
            let Some(name) = caps.name("name") else {
                continue;
            };
            symbols.push(ExportedSymbol {
                name: name.as_str().to_string(),
                kind: pattern.kind,
                decl_line: index.line_of(name.start()),
                is_public: pattern.visibility.is_public(name.as_str(), &caps),
            });
        }
    }

    symbols.sort_by_key(|s| s.decl_line);
    symbols
}

/// Collects capture group 1 of every import pattern, deduplicated.
pub fn scan_imports(source: &str, patterns: &[Regex]) -> BTreeSet<String> {
    patterns
        .iter()
        .flat_map(|re| re.captures_iter(source))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|module| !module.is_empty())
        .collect()
}

pub(crate) fn match_spans<'a>(
    source: &str,
    patterns: impl IntoIterator<Item = &'a Regex>,
) -> Vec<Range<usize>> {
    patterns
        .into_iter()
        .flat_map(|re| re.find_iter(source))
        .map(|m| m.range())
        .collect()
}

pub(crate) fn classify_all<L: Language + ?Sized>(
    lang: &L,
    modules: BTreeSet<String>,
) -> Vec<ImportReference> {
    modules
        .into_iter()
        .map(|module| {
            let category = lang.classify_import(&module);
            ImportReference::new(module, category)
        })
        .collect()
}

pub fn compile_templates(templates: &[&str], module: &str) -> Result<Vec<Regex>, regex::Error> {
    let escaped = regex::escape(module);
    templates
        .iter()
        .map(|t| Regex::new(&t.replace(NAME_PLACEHOLDER, &escaped)))
        .collect()
}

/// Immutable extension → language mapping.
#[derive(Clone, Default)]
pub struct LanguageTable {
    languages: Vec<Arc<dyn Language>>,
    by_extension: HashMap<String, usize>,
}

impl std::fmt::Debug for LanguageTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.languages.iter().map(|l| l.name()).collect();
        f.debug_struct("LanguageTable")
            .field("languages", &names)
            .field("extensions", &self.by_extension.len())
            .finish()
    }
}

impl LanguageTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Python, JavaScript/TypeScript, Go, Rust, Java and the C family.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.register(Arc::new(Python));
        table.register(Arc::new(EcmaScript));
        table.register(Arc::new(Go));
        table.register(Arc::new(Rust));
        table.register(Arc::new(Java));
        table.register(Arc::new(CFamily));
        table
    }

    /// Registers a language. A later registration takes over any extension
    /// already claimed by an earlier one.
    pub fn register(&mut self, language: Arc<dyn Language>) {
        let idx = self.languages.len();
        for ext in language.extensions() {
            self.by_extension.insert(normalize_extension(ext), idx);
        }
        self.languages.push(language);
    }

    pub fn languages(&self) -> &[Arc<dyn Language>] {
        &self.languages
    }

    pub fn index_for_extension(&self, ext: &str) -> Option<usize> {
        self.by_extension.get(&normalize_extension(ext)).copied()
    }

    pub fn index_for_path(&self, path: &Path) -> Option<usize> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.index_for_extension(ext))
    }

    pub fn for_extension(&self, ext: &str) -> Option<&dyn Language> {
        self.index_for_extension(ext)
            .map(|idx| self.languages[idx].as_ref())
    }

    pub fn for_path(&self, path: &Path) -> Option<&dyn Language> {
        self.index_for_path(path)
            .map(|idx| self.languages[idx].as_ref())
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.by_extension.keys().map(String::as_str)
    }
}

pub(crate) fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}
