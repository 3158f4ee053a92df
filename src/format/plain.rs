//! Plain text output format

use anyhow::Result;
use std::io::Write;

use super::Formatter;
use crate::core::{DependencyMap, ImpactReport, ImportCategory};

pub struct PlainFormatter;

fn write_list(output: &mut dyn Write, title: &str, items: &[String]) -> Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(output, "{}:", title)?;
    for item in items {
        writeln!(output, "  - {}", item)?;
    }
    Ok(())
}

impl Formatter for PlainFormatter {
    fn write_dependency_map(&mut self, output: &mut dyn Write, map: &DependencyMap) -> Result<()> {
        writeln!(output, "=== DEPENDENCIES: {} ===", map.target_file.display())?;
        if let Some(lang) = &map.language {
            writeln!(output, "Language: {}", lang)?;
        }

        for (title, category) in [
            ("Standard library", ImportCategory::Stdlib),
            ("Internal", ImportCategory::Internal),
            ("External", ImportCategory::External),
        ] {
            let names: Vec<&str> = map
                .imports
                .iter()
                .filter(|i| i.category == category)
                .map(|i| i.raw.as_str())
                .collect();
            if !names.is_empty() {
                writeln!(output, "{} ({}): {}", title, names.len(), names.join(", "))?;
            }
        }

        if let Some(scan) = &map.imported_by {
            writeln!(
                output,
                "Imported by {} file(s) ({} scanned):",
                scan.files.len(),
                scan.files_scanned
            )?;
            for file in &scan.files {
                writeln!(output, "  {}", file.relative_path.display())?;
            }
        }

        write_list(output, "Notes", &map.notes)?;
        write_list(output, "Suggestions", &map.suggestions)?;
        Ok(())
    }

    fn write_impact_report(
        &mut self,
        output: &mut dyn Write,
        report: &ImpactReport,
    ) -> Result<()> {
        writeln!(output, "=== IMPACT: {} ===", report.target_file.display())?;
        writeln!(
            output,
            "Risk: {} (score {})",
            report.risk_level().as_str().to_uppercase(),
            report.risk.score()
        )?;
        for reason in report.risk_reasons() {
            writeln!(output, "  * {}", reason)?;
        }
        writeln!(output)?;

        let summary = report.summary();
        writeln!(
            output,
            "Exports: {} ({} public)",
            summary.export_count, summary.public_export_count
        )?;
        for symbol in &report.exports {
            let marker = if symbol.is_public { "" } else { " (private)" };
            writeln!(
                output,
                "  {} {} [line {}]{}",
                symbol.kind.as_str(),
                symbol.name,
                symbol.decl_line,
                marker
            )?;
        }

        writeln!(
            output,
            "Dependents: {} ({} files scanned{})",
            summary.dependent_count,
            report.files_scanned,
            if report.complete { "" } else { ", partial" }
        )?;
        for dep in &report.dependents {
            writeln!(output, "  {}", dep.relative_path.display())?;
        }

        if !report.usages.is_empty() {
            writeln!(output, "Usages: {}", summary.total_usages)?;
            for (name, usages) in &report.usages {
                writeln!(output, "  {}:", name)?;
                for usage in usages {
                    writeln!(
                        output,
                        "    {}:{}  {}",
                        usage.file.display(),
                        usage.line,
                        usage.snippet
                    )?;
                }
            }
        }

        write_list(output, "Notes", &report.notes)?;
        write_list(output, "Warnings", &report.warnings)?;
        write_list(output, "Suggestions", &report.suggestions)?;
        Ok(())
    }
}
