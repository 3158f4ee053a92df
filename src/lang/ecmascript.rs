//! JavaScript and TypeScript support.
//!
//! Only declarations carrying the `export` keyword are reported, so every
//! symbol found here is public.

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

use super::{ExportPattern, Language, LineIndex, Visibility};
use crate::core::{ExportedSymbol, ImportCategory, SymbolKind};

lazy_static! {
    static ref EXPORTS: Vec<ExportPattern> = vec![
        ExportPattern::new(
            r"(?m)^[ \t]*export[ \t]+(?:default[ \t]+)?(?:async[ \t]+)?function\b[ \t]*\*?[ \t]*(?P<name>[A-Za-z_$][\w$]*)",
            SymbolKind::Function,
            Visibility::Exported,
        ).unwrap(),
        ExportPattern::new(
            r"(?m)^[ \t]*export[ \t]+(?:default[ \t]+)?(?:abstract[ \t]+)?class[ \t]+(?P<name>[A-Za-z_$][\w$]*)",
            SymbolKind::Class,
            Visibility::Exported,
        ).unwrap(),
        // TypeScript type-level declarations
        ExportPattern::new(
            r"(?m)^[ \t]*export[ \t]+(?:declare[ \t]+)?(?:interface|type|enum)[ \t]+(?P<name>[A-Za-z_$][\w$]*)",
            SymbolKind::Class,
            Visibility::Exported,
        ).unwrap(),
        ExportPattern::new(
            r"(?m)^[ \t]*export[ \t]+(?:const|let)[ \t]+(?P<name>[A-Za-z_$][\w$]*)",
            SymbolKind::Constant,
            Visibility::Exported,
        ).unwrap(),
        ExportPattern::new(
            r"(?m)^[ \t]*export[ \t]+var[ \t]+(?P<name>[A-Za-z_$][\w$]*)",
            SymbolKind::Variable,
            Visibility::Exported,
        ).unwrap(),
    ];

    // export { a, b as c } and export { x } from './y'
    static ref EXPORT_LIST: Regex =
        Regex::new(r"(?m)^[ \t]*export[ \t]*(?:type[ \t]*)?\{(?P<names>[^}]*)\}").unwrap();

    static ref IDENT: Regex = Regex::new(r"^[A-Za-z_$][\w$]*$").unwrap();

    // import {\n  a,\n  b,\n} from './x'
    static ref IMPORT_BLOCK: Regex = Regex::new(
        r#"(?m)^[ \t]*(?:import|export)[^'"\n;{]*\{[^}]*\}[ \t]*from[ \t]*['"][^'"\n]+['"]"#
    ).unwrap();

    static ref IMPORTS: Vec<Regex> = vec![
        Regex::new(r#"(?m)^[ \t]*(?:import|export|\})[^'"\n]*?\bfrom[ \t]*['"]([^'"\n]+)['"]"#).unwrap(),
        Regex::new(r#"(?m)^[ \t]*import[ \t]*['"]([^'"\n]+)['"]"#).unwrap(),
        Regex::new(r#"\brequire\([ \t]*['"]([^'"\n]+)['"][ \t]*\)"#).unwrap(),
    ];
}

const DEPENDENCY_TEMPLATES: &[&str] = &[
    r#"(?m)^[ \t]*(?:import|export|\})[^'"\n]*?\bfrom[ \t]*['"](?:[^'"\n]*/)?{name}(?:\.[cm]?[jt]sx?)?['"]"#,
    r#"(?m)^[ \t]*import[ \t]*['"](?:[^'"\n]*/)?{name}(?:\.[cm]?[jt]sx?)?['"]"#,
    r#"\brequire\([ \t]*['"](?:[^'"\n]*/)?{name}(?:\.[cm]?[jt]sx?)?['"][ \t]*\)"#,
];

const NODE_BUILTINS: &[&str] = &[
    "assert", "buffer", "child_process", "cluster", "crypto", "dgram", "dns",
    "events", "fs", "http", "http2", "https", "module", "net", "os", "path",
    "perf_hooks", "process", "querystring", "readline", "stream",
    "string_decoder", "timers", "tls", "tty", "url", "util", "v8", "vm",
    "worker_threads", "zlib",
];

pub struct EcmaScript;

impl Language for EcmaScript {
    fn name(&self) -> &str {
        "JavaScript"
    }

    fn extensions(&self) -> Vec<&str> {
        vec!["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"]
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
        super::match_spans(source, IMPORTS.iter().chain([&*IMPORT_BLOCK]))
    }

    fn classify_import(&self, module: &str) -> ImportCategory {
        let bare = module.strip_prefix("node:");
        let root = bare.unwrap_or(module).split('/').next().unwrap_or(module);
        if bare.is_some() || NODE_BUILTINS.contains(&root) {
            ImportCategory::Stdlib
        } else if module.starts_with('.') || module.starts_with('/') {
            ImportCategory::Internal
        } else {
            ImportCategory::External
        }
    }

    fn extract_exports(&self, source: &str) -> Option<Vec<ExportedSymbol>> {
        let mut symbols = super::scan_exports(source, &EXPORTS);
        let index = LineIndex::new(source);

        for caps in EXPORT_LIST.captures_iter(source) {
            let Some(names) = caps.name("names") else {
                continue;
            };
            let line = index.line_of(names.start());
            for entry in names.as_str().split(',') {
                // `local as exported` is visible to importers as `exported`
                let exported = entry.rsplit(" as ").next().unwrap_or(entry).trim();
                if exported == "default" || !IDENT.is_match(exported) {
                    continue;
                }
                symbols.push(ExportedSymbol {
                    name: exported.to_string(),
                    kind: SymbolKind::Variable,
                    decl_line: line,
                    is_public: true,
                });
            }
        }

        symbols.sort_by_key(|s| s.decl_line);
        Some(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_js_exports() {
        let code = r#"import { db } from './db';

export function login(user) {}
export async function refresh() {}
export default class Session {}
export const MAX = 3;
let counter = 0;
export var legacy = 1;
export interface Props {}
function helper() {}
export { helper, counter as count };
"#;
        let exports = EcmaScript.extract_exports(code).unwrap();
        let summary: Vec<_> = exports
            .iter()
            .map(|s| (s.name.as_str(), s.kind, s.decl_line))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("login", SymbolKind::Function, 3),
                ("refresh", SymbolKind::Function, 4),
                ("Session", SymbolKind::Class, 5),
                ("MAX", SymbolKind::Constant, 6),
                ("legacy", SymbolKind::Variable, 8),
                ("Props", SymbolKind::Class, 9),
                ("helper", SymbolKind::Variable, 11),
                ("count", SymbolKind::Variable, 11),
            ]
        );
        assert!(exports.iter().all(|s| s.is_public));
    }

    #[test]
    fn test_unexported_declarations_are_ignored() {
        let code = "function local() {}\nclass Hidden {}\nconst x = 1;\n";
        assert!(EcmaScript.extract_exports(code).unwrap().is_empty());
    }

    #[test]
    fn test_extract_js_imports() {
        let code = r#"import fs from 'fs';
import { join } from "node:path";
import React from 'react';
import {
  login,
  logout,
} from './auth';
import './styles.css';
const lodash = require('lodash');
const cfg = require("../config");
"#;
        let imports = EcmaScript.extract_imports(code);
        let category = |raw: &str| {
            imports
                .iter()
                .find(|i| i.raw == raw)
                .map(|i| i.category)
                .unwrap_or_else(|| panic!("missing import {raw}"))
        };

        assert_eq!(imports.len(), 7);
        assert_eq!(category("fs"), ImportCategory::Stdlib);
        assert_eq!(category("node:path"), ImportCategory::Stdlib);
        assert_eq!(category("react"), ImportCategory::External);
        assert_eq!(category("./auth"), ImportCategory::Internal);
        assert_eq!(category("./styles.css"), ImportCategory::Internal);
        assert_eq!(category("lodash"), ImportCategory::External);
        assert_eq!(category("../config"), ImportCategory::Internal);
    }

    #[test]
    fn test_dependency_patterns() {
        let patterns = EcmaScript.dependency_patterns("auth").unwrap();
        let matches = |src: &str| patterns.iter().any(|p| p.is_match(src));

        assert!(matches("import { login } from './auth';"));
        assert!(matches("import auth from '../lib/auth.js';"));
        assert!(matches("} from \"./auth\";"));
        assert!(matches("export * from './auth';"));
        assert!(matches("const a = require('./auth');"));
        assert!(matches("import './auth';"));

        assert!(!matches("import { x } from './auth-helpers';"));
        assert!(!matches("import { AuthService } from './auth.service';"));
        assert!(matches("import { login } from './auth.mjs';"));
        assert!(!matches("import { x } from './oauth';"));
        assert!(!matches("console.log('auth failed');"));
    }
}
