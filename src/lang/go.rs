//! Go language support.

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

use super::{ExportPattern, Language, LineIndex, Visibility, classify_all};
use crate::core::{ExportedSymbol, ImportCategory, ImportReference, SymbolKind};

lazy_static! {
    static ref EXPORTS: Vec<ExportPattern> = vec![
        // func Name( / func (r *Recv) Name( / func Name[T any](
        ExportPattern::new(
            r"(?m)^func[ \t]+(?:\([^)]*\)[ \t]*)?(?P<name>[A-Za-z_]\w*)[ \t]*[(\[]",
            SymbolKind::Function,
            Visibility::Capitalized,
        ).unwrap(),
        ExportPattern::new(
            r"(?m)^type[ \t]+(?P<name>[A-Za-z_]\w*)[ \t\[]",
            SymbolKind::Class,
            Visibility::Capitalized,
        ).unwrap(),
        ExportPattern::new(
            r"(?m)^const[ \t]+(?P<name>[A-Za-z_]\w*)",
            SymbolKind::Constant,
            Visibility::Capitalized,
        ).unwrap(),
        ExportPattern::new(
            r"(?m)^var[ \t]+(?P<name>[A-Za-z_]\w*)",
            SymbolKind::Variable,
            Visibility::Capitalized,
        ).unwrap(),
    ];

    static ref IMPORTS: Vec<Regex> = vec![
        Regex::new(r#"(?m)^[ \t]*import[ \t]+(?:[\w.]+[ \t]+)?"([^"\n]+)""#).unwrap(),
    ];

    static ref IMPORT_BLOCK: Regex = Regex::new(r"(?m)^[ \t]*import[ \t]*\(([^)]*)\)").unwrap();
    static ref QUOTED: Regex = Regex::new(r#""([^"\n]+)""#).unwrap();

    // const (\n\tA = 1\n) closed by a `)` at column 0, as gofmt writes it
    static ref DECL_BLOCK: Regex =
        Regex::new(r"(?ms)^(?P<kw>const|var|type)[ \t]*\((?P<body>.*?)^\)").unwrap();
    static ref BLOCK_ENTRY: Regex =
        Regex::new(r"^[ \t]*(?P<names>[A-Za-z_]\w*(?:[ \t]*,[ \t]*[A-Za-z_]\w*)*)").unwrap();
}

/// Names declared inside grouped `const (`, `var (` and `type (` blocks.
/// Only lines at nesting depth zero start a declaration, so struct fields and
/// multi-line values are not reported.
fn grouped_declarations(source: &str) -> Vec<ExportedSymbol> {
    let index = LineIndex::new(source);
    let mut symbols = Vec::new();

    for block in DECL_BLOCK.captures_iter(source) {
        let (Some(kw), Some(body)) = (block.name("kw"), block.name("body")) else {
            continue;
        };
        let kind = match kw.as_str() {
            "const" => SymbolKind::Constant,
            "var" => SymbolKind::Variable,
            _ => SymbolKind::Class,
        };

        let mut depth = 0i32;
        let mut offset = body.start();
        for line in body.as_str().split_inclusive('\n') {
            if depth == 0 {
                if let Some(names) = BLOCK_ENTRY.captures(line).and_then(|c| c.name("names")) {
                    let decl_line = index.line_of(offset + names.start());
                    for name in names.as_str().split(',').map(str::trim) {
                        symbols.push(ExportedSymbol {
                            name: name.to_string(),
                            kind,
                            decl_line,
                            is_public: name.chars().next().is_some_and(char::is_uppercase),
                        });
                    }
                }
            }
            depth += line
                .chars()
                .map(|c| match c {
                    '{' | '(' | '[' => 1,
                    '}' | ')' | ']' => -1,
                    _ => 0,
                })
                .sum::<i32>();
            offset += line.len();
        }
    }
    symbols
}

const DEPENDENCY_TEMPLATES: &[&str] = &[
    r#"(?m)^[ \t]*import[ \t]+(?:[\w.]+[ \t]+)?"(?:[^"\n]*/)?{name}""#,
    r#"(?m)^[ \t]*import[ \t]*\([^)]*"(?:[^"\n]*/)?{name}""#,
];

const STDLIB: &[&str] = &[
    "archive", "bufio", "bytes", "cmp", "compress", "container", "context",
    "crypto", "database", "debug", "embed", "encoding", "errors", "expvar",
    "flag", "fmt", "go", "hash", "html", "image", "index", "io", "iter", "log",
    "maps", "math", "mime", "net", "os", "path", "plugin", "reflect", "regexp",
    "runtime", "slices", "sort", "strconv", "strings", "sync", "syscall",
    "testing", "text", "time", "unicode", "unique", "unsafe",
];

/// Go: exported means capitalized.
pub struct Go;

impl Language for Go {
    fn name(&self) -> &str {
        "Go"
    }

    fn extensions(&self) -> Vec<&str> {
        vec!["go"]
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

    fn extract_exports(&self, source: &str) -> Option<Vec<ExportedSymbol>> {
        let mut symbols = super::scan_exports(source, &EXPORTS);
        symbols.extend(grouped_declarations(source));
        symbols.sort_by_key(|s| s.decl_line);
        Some(symbols)
    }

    fn import_spans(&self, source: &str) -> Vec<Range<usize>> {
        super::match_spans(source, IMPORTS.iter().chain([&*IMPORT_BLOCK]))
    }

    fn classify_import(&self, module: &str) -> ImportCategory {
        let root = module.split('/').next().unwrap_or(module);
        if STDLIB.contains(&root) {
            ImportCategory::Stdlib
        } else if module.starts_with('.') {
            ImportCategory::Internal
        } else {
            ImportCategory::External
        }
    }

    fn extract_imports(&self, source: &str) -> Vec<ImportReference> {
        let mut modules = super::scan_imports(source, &IMPORTS);
        for block in IMPORT_BLOCK.captures_iter(source) {
            if let Some(body) = block.get(1) {
                modules.extend(
                    QUOTED
                        .captures_iter(body.as_str())
                        .filter_map(|c| c.get(1))
                        .map(|m| m.as_str().to_string()),
                );
            }
        }
        classify_all(self, modules)
    }
}
