//! Python language support.

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

use super::{ExportPattern, Language, Visibility, classify_all};
use crate::core::{ImportCategory, ImportReference, SymbolKind};

lazy_static! {
    static ref EXPORTS: Vec<ExportPattern> = vec![
        // def name( / async def name(, at any indentation
        ExportPattern::new(
            r"(?m)^[ \t]*(?:async[ \t]+)?def[ \t]+(?P<name>[A-Za-z_]\w*)[ \t]*\(",
            SymbolKind::Function,
            Visibility::NoLeadingUnderscore,
        ).unwrap(),
        ExportPattern::new(
            r"(?m)^[ \t]*class[ \t]+(?P<name>[A-Za-z_]\w*)",
            SymbolKind::Class,
            Visibility::NoLeadingUnderscore,
        ).unwrap(),
        // ALL_CAPS assignments at module level, optionally annotated
        ExportPattern::new(
            r"(?m)^(?P<name>[A-Z][A-Z0-9_]+)[ \t]*(?::[^=\n]*)?=(?:[^=]|$)",
            SymbolKind::Constant,
            Visibility::NoLeadingUnderscore,
        ).unwrap(),
    ];

    static ref IMPORTS: Vec<Regex> = vec![
        Regex::new(r"(?m)^[ \t]*from[ \t]+([\w.]+)[ \t]+import\b").unwrap(),
        // import a, b.c as d
        Regex::new(r"(?m)^[ \t]*import[ \t]+([\w.]+(?:[ \t]+as[ \t]+\w+)?(?:[ \t]*,[ \t]*[\w.]+(?:[ \t]+as[ \t]+\w+)?)*)").unwrap(),
    ];

    // from pkg import (\n    a,\n    b,\n)
    static ref IMPORT_BLOCK: Regex =
        Regex::new(r"(?m)^[ \t]*from[ \t]+[\w.]+[ \t]+import[ \t]*\([^)]*\)").unwrap();
}

const DEPENDENCY_TEMPLATES: &[&str] = &[
    // from pkg.name import x / from .name import x
    r"(?m)^[ \t]*from[ \t]+(?:[\w.]*\.)?{name}[ \t]+import\b",
    // import name / import pkg.name / import np as n, name
    r"(?m)^[ \t]*import[ \t]+(?:[\w.]+(?:[ \t]+as[ \t]+\w+)?[ \t]*,[ \t]*)*(?:[\w.]*\.)?{name}\b",
    // from pkg import name / from . import a, name
    r"(?m)^[ \t]*from[ \t]+[\w.]+[ \t]+import[ \t]+\(?[ \t]*(?:\w+(?:[ \t]+as[ \t]+\w+)?[ \t]*,[ \t]*)*{name}\b",
];

const STDLIB: &[&str] = &[
    "abc", "argparse", "ast", "asyncio", "base64", "bisect", "collections",
    "concurrent", "configparser", "contextlib", "copy", "csv", "ctypes",
    "dataclasses", "datetime", "decimal", "difflib", "email", "enum", "errno",
    "fnmatch", "fractions", "functools", "gc", "getpass", "glob", "gzip",
    "hashlib", "heapq", "hmac", "html", "http", "importlib", "inspect", "io",
    "itertools", "json", "locale", "logging", "math", "mimetypes",
    "multiprocessing", "operator", "os", "pathlib", "pickle", "platform",
    "pprint", "queue", "random", "re", "secrets", "select", "shlex", "shutil",
    "signal", "socket", "sqlite3", "ssl", "statistics", "string", "struct",
    "subprocess", "sys", "tempfile", "textwrap", "threading", "time",
    "traceback", "types", "typing", "unittest", "urllib", "uuid", "warnings",
    "weakref", "xml", "zipfile", "zlib",
];

/// Python: `def`/`class` plus ALL_CAPS constants; `_name` is private.
pub struct Python;

impl Language for Python {
    fn name(&self) -> &str {
        "Python"
    }

    fn extensions(&self) -> Vec<&str> {
        vec!["py", "pyi", "pyw"]
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

    /// Relative and dotless names count as internal.
    fn classify_import(&self, module: &str) -> ImportCategory {
        let base = module.split('.').next().unwrap_or(module);
        if STDLIB.contains(&base) {
            ImportCategory::Stdlib
        } else if module.starts_with('.') || !module.contains('.') {
            ImportCategory::Internal
        } else {
            ImportCategory::External
        }
    }

    fn import_spans(&self, source: &str) -> Vec<Range<usize>> {
        super::match_spans(source, IMPORTS.iter().chain([&*IMPORT_BLOCK]))
    }

    // `import a, b as c` yields one capture for the whole list.
    fn extract_imports(&self, source: &str) -> Vec<ImportReference> {
        let modules = super::scan_imports(source, &IMPORTS)
            .into_iter()
            .flat_map(|list| {
                list.split(',')
                    .filter_map(|m| m.split_whitespace().next().map(str::to_string))
                    .collect::<Vec<_>>()
            })
            .collect();
        classify_all(self, modules)
    }
}
