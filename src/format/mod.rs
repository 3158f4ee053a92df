//! Output format modules for fathom reports

pub mod json;
pub mod markdown;
pub mod plain;

use anyhow::Result;
use std::io::Write;

use crate::config::OutputFormat;
use crate::core::{DependencyMap, ImpactReport};

pub trait Formatter {
    fn write_dependency_map(&mut self, output: &mut dyn Write, map: &DependencyMap) -> Result<()>;

    fn write_impact_report(&mut self, output: &mut dyn Write, report: &ImpactReport)
    -> Result<()>;
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Plain => Box::new(plain::PlainFormatter),
        OutputFormat::Json => Box::new(json::JsonFormatter::new()),
        OutputFormat::Markdown => Box::new(markdown::MarkdownFormatter),
    }
}
