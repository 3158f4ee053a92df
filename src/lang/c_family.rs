//! C and C++ support. Imports only: header declarations are too irregular
//! for a line scan, so export extraction reports the capability as missing.

use lazy_static::lazy_static;
use regex::Regex;

use super::{ExportPattern, Language};
use crate::core::{ImportCategory, ImportReference};

lazy_static! {
    static ref SYSTEM_INCLUDE: Regex = Regex::new(r"(?m)^[ \t]*#[ \t]*include[ \t]*<([^>\n]+)>").unwrap();
    static ref LOCAL_INCLUDE: Regex = Regex::new(r#"(?m)^[ \t]*#[ \t]*include[ \t]*"([^"\n]+)""#).unwrap();
    static ref IMPORTS: Vec<Regex> = vec![SYSTEM_INCLUDE.clone(), LOCAL_INCLUDE.clone()];
}

const DEPENDENCY_TEMPLATES: &[&str] =
    &[r#"(?m)^[ \t]*#[ \t]*include[ \t]*[<"](?:[^>"\n]*/)?{name}\.\w+[>"]"#];

const STDLIB: &[&str] = &[
    // C
    "assert.h", "ctype.h", "errno.h", "float.h", "limits.h", "locale.h",
    "math.h", "setjmp.h", "signal.h", "stdarg.h", "stdbool.h", "stddef.h",
    "stdint.h", "stdio.h", "stdlib.h", "string.h", "time.h", "wchar.h",
    // C++
    "algorithm", "array", "atomic", "chrono", "cmath", "cstdint", "cstdio",
    "cstdlib", "cstring", "deque", "exception", "filesystem", "fstream",
    "functional", "iomanip", "iostream", "iterator", "list", "map", "memory",
    "mutex", "numeric", "optional", "queue", "set", "sstream", "stack",
    "stdexcept", "string", "string_view", "thread", "tuple", "type_traits",
    "unordered_map", "unordered_set", "utility", "variant", "vector",
];

pub struct CFamily;

impl Language for CFamily {
    fn name(&self) -> &str {
        "C/C++"
    }

    fn extensions(&self) -> Vec<&str> {
        vec!["c", "h", "cc", "cpp", "cxx", "hh", "hpp", "hxx"]
    }

    fn export_patterns(&self) -> Option<&[ExportPattern]> {
        None
    }

    fn import_patterns(&self) -> &[Regex] {
        &IMPORTS
    }

    fn dependency_templates(&self) -> Vec<&str> {
        DEPENDENCY_TEMPLATES.to_vec()
    }

    fn classify_import(&self, module: &str) -> ImportCategory {
        if STDLIB.contains(&module) {
            ImportCategory::Stdlib
        } else {
            ImportCategory::External
        }
    }

    // Quoted includes are project headers unless they name a standard one.
    fn extract_imports(&self, source: &str) -> Vec<ImportReference> {
        let system = super::scan_imports(source, std::slice::from_ref(&*SYSTEM_INCLUDE));
        let mut imports: Vec<ImportReference> = system
            .into_iter()
            .map(|m| {
                let category = self.classify_import(&m);
                ImportReference::new(m, category)
            })
            .collect();

        for header in super::scan_imports(source, std::slice::from_ref(&*LOCAL_INCLUDE)) {
            if imports.iter().any(|i| i.raw == header) {
                continue;
            }
            let category = match self.classify_import(&header) {
                ImportCategory::Stdlib => ImportCategory::Stdlib,
                _ => ImportCategory::Internal,
            };
            imports.push(ImportReference::new(header, category));
        }
        imports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_includes() {
        let code = "#include <stdio.h>\n#include <boost/asio.hpp>\n#include \"auth.h\"\n# include \"util/strings.h\"\n";
        let imports = CFamily.extract_imports(code);
        let category = |raw: &str| imports.iter().find(|i| i.raw == raw).map(|i| i.category);

        assert_eq!(category("stdio.h"), Some(ImportCategory::Stdlib));
        assert_eq!(category("boost/asio.hpp"), Some(ImportCategory::External));
        assert_eq!(category("auth.h"), Some(ImportCategory::Internal));
        assert_eq!(category("util/strings.h"), Some(ImportCategory::Internal));
    }

    #[test]
    fn test_exports_unsupported() {
        assert!(CFamily.extract_exports("int main(void) { return 0; }").is_none());
    }

    #[test]
    fn test_dependency_patterns() {
        let patterns = CFamily.dependency_patterns("auth").unwrap();
        let matches = |src: &str| patterns.iter().any(|p| p.is_match(src));
        assert!(matches("#include \"auth.h\""));
        assert!(matches("#include <lib/auth.hpp>"));
        assert!(!matches("puts(\"auth.h missing\");"));
    }
}
