//! The analysis stages: extraction, dependent discovery, usage tracking and
//! risk scoring. Each stage is a free function so it can be used on its own;
//! [`crate::Engine`] chains them.

pub mod dependents;
pub mod risk;
pub mod usages;

use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use crate::config::EngineConfig;
use crate::core::{AnalysisEvent, ExportedSymbol, ImportReference};
use crate::lang::{Language, LanguageTable};

pub use dependents::find_dependents;
pub use risk::{RiskAssessment, RiskLevel, score_risk};
pub use usages::track_usages;

/// Point in time after which scans stop picking up new files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn after(budget: Duration) -> Self {
        Self(Some(Instant::now() + budget))
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        config.deadline().map_or_else(Self::none, Self::after)
    }

    pub fn expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }
}

/// Everything a project scan needs besides its inputs.
#[derive(Clone, Copy)]
pub struct ScanContext<'a> {
    pub table: &'a LanguageTable,
    pub config: &'a EngineConfig,
    pub deadline: Deadline,
    pub events: Option<&'a Sender<AnalysisEvent>>,
}

impl<'a> ScanContext<'a> {
    pub fn new(table: &'a LanguageTable, config: &'a EngineConfig) -> Self {
        Self {
            table,
            config,
            deadline: Deadline::from_config(config),
            events: None,
        }
    }

    pub(crate) fn emit(&self, event: AnalysisEvent) {
        if let Some(tx) = self.events {
            let _ = tx.send(event);
        }
    }
}

/// Extraction output plus a note when the language could not be handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<T> {
    pub items: Vec<T>,
    pub note: Option<String>,
}

impl<T> Extraction<T> {
    fn unsupported(note: String) -> Self {
        Self {
            items: Vec::new(),
            note: Some(note),
        }
    }
}

fn unknown_language_note(what: &str) -> String {
    format!("{what} is not supported for this file type (no language rules registered)")
}

/// Declarations in `source`. Unsupported languages yield no symbols and a
/// note rather than an error.
pub fn extract_exports(source: &str, language: Option<&dyn Language>) -> Extraction<ExportedSymbol> {
    let Some(language) = language else {
        return Extraction::unsupported(unknown_language_note("Export extraction"));
    };
    match language.extract_exports(source) {
        Some(items) => Extraction { items, note: None },
        None => Extraction::unsupported(format!(
            "Export extraction is not supported for {}",
            language.name()
        )),
    }
}

pub fn extract_imports(source: &str, language: Option<&dyn Language>) -> Extraction<ImportReference> {
    match language {
        Some(language) => Extraction {
            items: language.extract_imports(source),
            note: None,
        },
        None => Extraction::unsupported(unknown_language_note("Import extraction")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{CFamily, Python};

    #[test]
    fn test_extract_exports_notes() {
        let found = extract_exports("def login():\n    pass\n", Some(&Python));
        assert_eq!(found.items.len(), 1);
        assert!(found.note.is_none());

        let headers = extract_exports("int login(void);\n", Some(&CFamily));
        assert!(headers.items.is_empty());
        assert_eq!(
            headers.note.as_deref(),
            Some("Export extraction is not supported for C/C++")
        );

        let unknown = extract_exports("whatever", None);
        assert!(unknown.items.is_empty());
        assert!(unknown.note.is_some());
    }

    #[test]
    fn test_extract_imports_unknown_language() {
        let unknown = extract_imports("import os", None);
        assert!(unknown.items.is_empty());
        assert!(unknown.note.is_some());
    }

    #[test]
    fn test_deadline() {
        assert!(!Deadline::none().expired());
        assert!(Deadline::after(Duration::ZERO).expired());
        assert!(!Deadline::after(Duration::from_secs(3600)).expired());
    }
}
