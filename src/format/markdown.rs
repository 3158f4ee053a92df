//! Markdown output format

use anyhow::Result;
use std::io::Write;

use super::Formatter;
use crate::core::{DependencyMap, ImpactReport, ImportReference};

pub struct MarkdownFormatter;

fn write_section(output: &mut dyn Write, title: &str, items: &[String]) -> Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(output, "## {}", title)?;
    writeln!(output)?;
    for item in items {
        writeln!(output, "- {}", item)?;
    }
    writeln!(output)?;
    Ok(())
}

fn write_imports<'a>(
    output: &mut dyn Write,
    title: &str,
    imports: impl Iterator<Item = &'a ImportReference>,
) -> Result<()> {
    let names: Vec<String> = imports.map(|i| format!("`{}`", i.raw)).collect();
    if !names.is_empty() {
        writeln!(output, "- **{}**: {}", title, names.join(", "))?;
    }
    Ok(())
}

impl Formatter for MarkdownFormatter {
    fn write_dependency_map(&mut self, output: &mut dyn Write, map: &DependencyMap) -> Result<()> {
        writeln!(output, "# Dependencies of `{}`", map.target_file.display())?;
        writeln!(output)?;

        writeln!(output, "## Imports")?;
        writeln!(output)?;
        if map.imports.is_empty() {
            writeln!(output, "_None found._")?;
        }
        write_imports(output, "Standard library", map.stdlib())?;
        write_imports(output, "Internal", map.internal())?;
        write_imports(output, "External", map.external())?;
        writeln!(output)?;

        if let Some(scan) = &map.imported_by {
            writeln!(output, "## Imported by")?;
            writeln!(output)?;
            for file in &scan.files {
                writeln!(output, "- `{}`", file.relative_path.display())?;
            }
            writeln!(
                output,
                "\n_{} files scanned{}._",
                scan.files_scanned,
                if scan.complete { "" } else { ", search stopped early" }
            )?;
            writeln!(output)?;
        }

        write_section(output, "Notes", &map.notes)?;
        write_section(output, "Suggestions", &map.suggestions)?;
        Ok(())
    }

    fn write_impact_report(
        &mut self,
        output: &mut dyn Write,
        report: &ImpactReport,
    ) -> Result<()> {
        writeln!(output, "# Impact of changing `{}`", report.target_file.display())?;
        writeln!(output)?;
        writeln!(
            output,
            "> **Risk: {}** (score {})",
            report.risk_level().as_str().to_uppercase(),
            report.risk.score()
        )?;
        for reason in report.risk_reasons() {
            writeln!(output, "> - {}", reason)?;
        }
        writeln!(output)?;

        if !report.exports.is_empty() {
            writeln!(output, "## Exports")?;
            writeln!(output)?;
            writeln!(output, "| Symbol | Kind | Line | Public |")?;
            writeln!(output, "|--------|------|------|--------|")?;
            for s in &report.exports {
                writeln!(
                    output,
                    "| `{}` | {} | {} | {} |",
                    s.name,
                    s.kind.as_str(),
                    s.decl_line,
                    if s.is_public { "yes" } else { "no" }
                )?;
            }
            writeln!(output)?;
        }

        writeln!(output, "## Dependents ({})", report.dependents.len())?;
        writeln!(output)?;
        for dep in &report.dependents {
            writeln!(output, "- `{}`", dep.relative_path.display())?;
        }
        writeln!(output)?;

        if !report.usages.is_empty() {
            writeln!(output, "## Usages")?;
            writeln!(output)?;
            for (name, usages) in &report.usages {
                writeln!(output, "### `{}`", name)?;
                writeln!(output)?;
                for u in usages {
                    writeln!(output, "- `{}:{}` `{}`", u.file.display(), u.line, u.snippet)?;
                }
                writeln!(output)?;
            }
        }

        write_section(output, "Notes", &report.notes)?;
        write_section(output, "Warnings", &report.warnings)?;
        write_section(output, "Suggestions", &report.suggestions)?;
        Ok(())
    }
}
