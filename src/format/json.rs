//! JSON output format

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use super::Formatter;
use crate::core::{DependencyMap, ImpactReport, ImpactSummary, ImportReference};

pub struct JsonFormatter {
    pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    fn emit<T: Serialize>(&self, output: &mut dyn Write, value: &T) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *output, value)?;
        } else {
            serde_json::to_writer(&mut *output, value)?;
        }
        writeln!(output)?;
        Ok(())
    }
}

/// Imports grouped the way readers scan them.
#[derive(Serialize)]
struct GroupedImports<'a> {
    stdlib: Vec<&'a str>,
    internal: Vec<&'a str>,
    external: Vec<&'a str>,
}

#[derive(Serialize)]
struct DependencyDocument<'a> {
    #[serde(flatten)]
    map: &'a DependencyMap,
    grouped: GroupedImports<'a>,
}

#[derive(Serialize)]
struct ImpactDocument<'a> {
    #[serde(flatten)]
    report: &'a ImpactReport,
    summary: ImpactSummary,
}

fn raw<'a>(refs: impl Iterator<Item = &'a ImportReference>) -> Vec<&'a str> {
    refs.map(|r| r.raw.as_str()).collect()
}

impl Formatter for JsonFormatter {
    fn write_dependency_map(&mut self, output: &mut dyn Write, map: &DependencyMap) -> Result<()> {
        let doc = DependencyDocument {
            map,
            grouped: GroupedImports {
                stdlib: raw(map.stdlib()),
                internal: raw(map.internal()),
                external: raw(map.external()),
            },
        };
        self.emit(output, &doc)
    }

    fn write_impact_report(
        &mut self,
        output: &mut dyn Write,
        report: &ImpactReport,
    ) -> Result<()> {
        let doc = ImpactDocument {
            report,
            summary: report.summary(),
        };
        self.emit(output, &doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;

    #[test]
    fn test_json_impact_report() {
        let mut output = Vec::new();
        JsonFormatter::new()
            .write_impact_report(&mut output, &fixtures::impact_report())
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["risk_level"], "medium");
        assert_eq!(value["risk_score"], 1);
        assert_eq!(value["risk_reasons"][0], "1 file depends on this");
        assert_eq!(value["exports"][1]["kind"], "class");
        assert_eq!(value["usages"]["login"][0]["line"], 7);
        assert_eq!(value["summary"]["public_export_count"], 2);
    }

    #[test]
    fn test_json_dependency_map() {
        let mut output = Vec::new();
        JsonFormatter::compact()
            .write_dependency_map(&mut output, &fixtures::dependency_map())
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["grouped"]["external"][0], "requests.adapters");
        assert_eq!(value["imports"][0]["category"], "stdlib");
        assert_eq!(value["imported_by"]["files"][0]["relative_path"], "src/app.py");
    }
}
