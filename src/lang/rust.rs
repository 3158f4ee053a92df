//! Rust language support.

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

use super::{ExportPattern, Language, Visibility, classify_all};
use crate::core::{ImportCategory, ImportReference, SymbolKind};

lazy_static! {
    static ref EXPORTS: Vec<ExportPattern> = vec![
        ExportPattern::new(
            r#"(?m)^[ \t]*(?P<vis>pub(?:\([^)]*\))?[ \t]+)?(?:(?:const|async|unsafe)[ \t]+)*(?:extern[ \t]+"[^"]*"[ \t]+)?fn[ \t]+(?P<name>[A-Za-z_]\w*)"#,
            SymbolKind::Function,
            Visibility::Modifier("pub".into()),
        ).unwrap(),
        ExportPattern::new(
            r"(?m)^[ \t]*(?P<vis>pub(?:\([^)]*\))?[ \t]+)?(?:struct|enum|trait|union|type)[ \t]+(?P<name>[A-Za-z_]\w*)",
            SymbolKind::Class,
            Visibility::Modifier("pub".into()),
        ).unwrap(),
        ExportPattern::new(
            r"(?m)^[ \t]*(?P<vis>pub(?:\([^)]*\))?[ \t]+)?(?:const|static(?:[ \t]+mut)?)[ \t]+(?P<name>[A-Za-z_]\w*)[ \t]*:",
            SymbolKind::Constant,
            Visibility::Modifier("pub".into()),
        ).unwrap(),
    ];

    // use a::{\n    b,\n    c,\n};
    static ref USE_BLOCK: Regex =
        Regex::new(r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?use[ \t]+[^;]*;").unwrap();

    static ref IMPORTS: Vec<Regex> = vec![
        Regex::new(r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?use[ \t]+(?:::)?([\w:]+)").unwrap(),
        Regex::new(r"(?m)^[ \t]*extern[ \t]+crate[ \t]+(\w+)").unwrap(),
    ];
}

const DEPENDENCY_TEMPLATES: &[&str] = &[
    r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?use[ \t]+[^;]*\b{name}\b",
    r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?mod[ \t]+{name}[ \t]*;",
];

const STDLIB: &[&str] = &["std", "core", "alloc", "proc_macro", "test"];
const LOCAL_ROOTS: &[&str] = &["crate", "self", "super"];

/// Rust: `pub` (including restricted `pub(..)`) marks the public surface.
pub struct Rust;

impl Language for Rust {
    fn name(&self) -> &str {
        "Rust"
    }

    fn extensions(&self) -> Vec<&str> {
        vec!["rs"]
    }

    fn export_patterns(&self) -> Option<&[ExportPattern]> {
        Some(EXPORTS.as_slice())
    }

    fn import_patterns(&self) -> &[Regex] {
        &IMPORTS
    }

    fn dependency_templates(&self) -> Vec<&str> {
        DEPENDENCY_TEMPLATES.to_vec()
    }

    fn import_spans(&self, source: &str) -> Vec<Range<usize>> {
        super::match_spans(source, IMPORTS.iter().chain([&*USE_BLOCK]))
    }

    fn classify_import(&self, module: &str) -> ImportCategory {
        let root = module.split("::").next().unwrap_or(module);
        if STDLIB.contains(&root) {
            ImportCategory::Stdlib
        } else if LOCAL_ROOTS.contains(&root) {
            ImportCategory::Internal
        } else {
            ImportCategory::External
        }
    }

    // `use std::{fmt, io}` captures `std::`; drop the dangling separator.
    fn extract_imports(&self, source: &str) -> Vec<ImportReference> {
        let modules = super::scan_imports(source, &IMPORTS)
            .into_iter()
            .map(|m| m.trim_end_matches("::").to_string())
            .filter(|m| !m.is_empty())
            .collect();
        classify_all(self, modules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_rust_exports() {
        let code = r#"use std::collections::HashMap;

pub struct Session {
    id: u64,
}

pub(crate) const MAX: usize = 3;
static COUNTER: AtomicUsize = AtomicUsize::new(0);

pub async fn login() {}
const fn helper() -> u8 { 0 }
"#;
        let exports = Rust.extract_exports(code).unwrap();
        let summary: Vec<_> = exports
            .iter()
            .map(|s| (s.name.as_str(), s.kind, s.decl_line, s.is_public))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Session", SymbolKind::Class, 3, true),
                ("MAX", SymbolKind::Constant, 7, true),
                ("COUNTER", SymbolKind::Constant, 8, false),
                ("login", SymbolKind::Function, 10, true),
                ("helper", SymbolKind::Function, 11, false),
            ]
        );
    }

    #[test]
    fn test_extract_rust_imports() {
        let code = "use crate::utils::foo;\nuse std::{fmt, io};\npub use serde::Serialize;\nuse super::Parent;\n";
        let imports = Rust.extract_imports(code);
        let category = |raw: &str| imports.iter().find(|i| i.raw == raw).map(|i| i.category);

        assert_eq!(imports.len(), 4);
        assert_eq!(category("crate::utils::foo"), Some(ImportCategory::Internal));
        assert_eq!(category("std"), Some(ImportCategory::Stdlib));
        assert_eq!(category("serde::Serialize"), Some(ImportCategory::External));
        assert_eq!(category("super::Parent"), Some(ImportCategory::Internal));
    }

    #[test]
    fn test_dependency_patterns() {
        let patterns = Rust.dependency_patterns("auth").unwrap();
        let matches = |src: &str| patterns.iter().any(|p| p.is_match(src));

        assert!(matches("use crate::auth::login;"));
        assert!(matches("use crate::{auth, db};"));
        assert!(matches("mod auth;"));
        assert!(matches("pub mod auth;"));
        assert!(!matches("use crate::oauth::token;"));
        assert!(!matches("let msg = \"auth failed\";"));
    }
}
