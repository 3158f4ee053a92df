use crate::config::{EngineConfig, OutputFormat};
use crate::core::{AnalysisEvent, DependencyMap, ImpactReport};
use crate::engine::Engine;
use crate::format::create_formatter;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

/// One CLI invocation.
#[derive(Debug, Clone)]
pub enum Request {
    Dependencies {
        file: PathBuf,
        root: Option<PathBuf>,
        reverse: bool,
    },
    Impact {
        file: PathBuf,
        root: PathBuf,
        change: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Dependencies(DependencyMap),
    Impact(ImpactReport),
}

/// Runs `request` on `engine` in the calling thread.
pub fn run_request(engine: &Engine, request: &Request) -> crate::error::Result<Outcome> {
    match request {
        Request::Dependencies {
            file,
            root,
            reverse,
        } => engine
            .map_dependencies(file, root.as_deref(), *reverse)
            .map(Outcome::Dependencies),
        Request::Impact { file, root, change } => engine
            .analyze_impact(file, root, change.as_deref())
            .map(Outcome::Impact),
    }
}

pub fn render(outcome: &Outcome, format: OutputFormat, output: &mut dyn Write) -> Result<()> {
    let mut formatter = create_formatter(format);
    match outcome {
        Outcome::Dependencies(map) => formatter.write_dependency_map(output, map),
        Outcome::Impact(report) => formatter.write_impact_report(output, report),
    }
}

/// Main entry point in CLI mode.
///
/// The analysis runs on a background thread while this thread consumes its
/// progress events, printing them to stderr when `verbose` is set. The
/// finished report is rendered to stdout.
pub fn run(config: EngineConfig, request: Request, verbose: bool) -> Result<()> {
    let format = config.output_format;
    let (tx, rx) = crossbeam_channel::unbounded();
    let engine = Engine::new(config)
        .context("Failed to initialize analysis engine")?
        .with_events(tx);

    let worker_request = request.clone();
    let handle = std::thread::spawn(move || run_request(&engine, &worker_request));

    for event in rx {
        if !verbose {
            continue;
        }
        match event {
            AnalysisEvent::Started(path) => eprintln!("Analyzing {}...", path.display()),
            AnalysisEvent::FilesFound(n) => eprintln!("Found {} candidate files.", n),
            AnalysisEvent::DependentFound(path) => eprintln!("Dependent: {}", path.display()),
            AnalysisEvent::DeadlineExceeded => {
                eprintln!("Deadline exceeded, results are partial.")
            }
            AnalysisEvent::Complete => eprintln!("Analysis complete."),
        }
    }

    let outcome = handle
        .join()
        .map_err(|_| anyhow::anyhow!("analysis thread panicked"))?
        .with_context(|| match &request {
            Request::Dependencies { file, .. } => {
                format!("Dependency mapping failed for {}", file.display())
            }
            Request::Impact { file, .. } => {
                format!("Impact analysis failed for {}", file.display())
            }
        })?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(&outcome, format, &mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_request_and_render() -> Result<()> {
        let dir = TempDir::new()?;
        let root = dir.path();
        fs::write(root.join("auth.py"), "def login():\n    pass\n")?;
        fs::write(root.join("app.py"), "from auth import login\nlogin()\n")?;

        let engine = Engine::new(EngineConfig::default())?;
        let request = Request::Impact {
            file: root.join("auth.py"),
            root: root.to_path_buf(),
            change: None,
        };
        let outcome = run_request(&engine, &request)?;

        let mut buf = Vec::new();
        render(&outcome, OutputFormat::Json, &mut buf)?;
        let value: serde_json::Value = serde_json::from_slice(&buf)?;
        assert_eq!(value["risk_level"], "medium");
        assert_eq!(value["dependents"][0]["relative_path"], "app.py");
        Ok(())
    }

    #[test]
    fn test_run_request_propagates_not_found() -> Result<()> {
        let dir = TempDir::new()?;
        let engine = Engine::new(EngineConfig::default())?;
        let request = Request::Dependencies {
            file: dir.path().join("missing.rs"),
            root: None,
            reverse: false,
        };
        assert!(matches!(
            run_request(&engine, &request),
            Err(crate::error::AnalysisError::NotFound(_))
        ));
        Ok(())
    }
}
