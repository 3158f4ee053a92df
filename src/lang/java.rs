//! Java language support.

use lazy_static::lazy_static;
use regex::Regex;

use super::{ExportPattern, Language, Visibility};
use crate::core::{ImportCategory, SymbolKind};

// Java declarations need at least one modifier to be told apart from
// statements like `return foo(`, so package-private methods without any
// modifier are not reported.
lazy_static! {
    static ref EXPORTS: Vec<ExportPattern> = vec![
        ExportPattern::new(
            r"(?m)^[ \t]*(?P<vis>(?:(?:public|protected|private|abstract|final|static|sealed|strictfp)[ \t]+)*)(?:class|interface|enum|record|@interface)[ \t]+(?P<name>[A-Za-z_]\w*)",
            SymbolKind::Class,
            Visibility::Modifier("public".into()),
        ).unwrap(),
        ExportPattern::new(
            r"(?m)^[ \t]*(?P<vis>(?:(?:public|protected|private|static|final|abstract|synchronized|native|default)[ \t]+)+)(?:<[^>\n]+>[ \t]+)?[\w.]+(?:<[^\n(]*>)?(?:\[\])*[ \t]+(?P<name>[A-Za-z_]\w*)[ \t]*\(",
            SymbolKind::Function,
            Visibility::Modifier("public".into()),
        ).unwrap(),
        ExportPattern::new(
            r"(?m)^[ \t]*(?P<vis>(?:(?:public|protected|private)[ \t]+)?)static[ \t]+final[ \t]+[\w.<>\[\], ]+?[ \t]+(?P<name>[A-Z][A-Z0-9_]*)[ \t]*=",
            SymbolKind::Constant,
            Visibility::Modifier("public".into()),
        ).unwrap(),
    ];

    static ref IMPORTS: Vec<Regex> = vec![
        Regex::new(r"(?m)^[ \t]*import[ \t]+(?:static[ \t]+)?([\w.]+(?:\.\*)?)[ \t]*;").unwrap(),
    ];
}

const DEPENDENCY_TEMPLATES: &[&str] = &[
    r"(?m)^[ \t]*import[ \t]+(?:static[ \t]+)?(?:\w+\.)*{name}(?:\.[\w*]+)*[ \t]*;",
];

const STDLIB_ROOTS: &[&str] = &["java", "javax", "jdk", "sun"];

pub struct Java;

impl Language for Java {
    fn name(&self) -> &str {
        "Java"
    }

    fn extensions(&self) -> Vec<&str> {
        vec!["java"]
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

    fn classify_import(&self, module: &str) -> ImportCategory {
        let root = module.split('.').next().unwrap_or(module);
        if STDLIB_ROOTS.contains(&root) {
            ImportCategory::Stdlib
        } else {
            ImportCategory::External
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_java_exports() {
        let code = r#"package com.example.auth;

import java.util.List;

public class AuthService {
    public static final int MAX_RETRIES = 3;
    private static final String SECRET = "x";

    public Session login(String user) {
        return createSession(user);
    }

    private static Session createSession(String user) {
        return new Session(user);
    }
}
"#;
        let exports = Java.extract_exports(code).unwrap();
        let summary: Vec<_> = exports
            .iter()
            .map(|s| (s.name.as_str(), s.kind, s.decl_line, s.is_public))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("AuthService", SymbolKind::Class, 5, true),
                ("MAX_RETRIES", SymbolKind::Constant, 6, true),
                ("SECRET", SymbolKind::Constant, 7, false),
                ("login", SymbolKind::Function, 9, true),
                ("createSession", SymbolKind::Function, 13, false),
            ]
        );
    }

    #[test]
    fn test_imports_and_dependency_patterns() {
        let code = "import java.util.List;\nimport com.example.auth.AuthService;\nimport static org.junit.Assert.*;\n";
        let imports = Java.extract_imports(code);
        assert_eq!(imports.len(), 3);
        assert!(
            imports
                .iter()
                .any(|i| i.raw == "java.util.List" && i.category == ImportCategory::Stdlib)
        );

        let patterns = Java.dependency_patterns("AuthService").unwrap();
        assert!(patterns.iter().any(|p| p.is_match(code)));
        assert!(
            !patterns
                .iter()
                .any(|p| p.is_match("String s = \"AuthService\";"))
        );
    }
}
