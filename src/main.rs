use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use fathom::{EngineConfig, OutputFormat, Request, run};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Plain,
    Json,
    #[value(alias = "md")]
    Markdown,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Plain => OutputFormat::Plain,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Markdown => OutputFormat::Markdown,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Dependency mapping and change impact analysis", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    format: Option<CliOutputFormat>,

    /// Config file (default: ./fathom.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Stop scanning after this many milliseconds
    #[arg(long, global = true)]
    deadline_ms: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a file's imports, and optionally the files that import it
    Deps {
        file: PathBuf,

        /// Project root to search for reverse dependencies
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Also find files importing FILE (requires --root)
        #[arg(long)]
        reverse: bool,
    },
    /// Estimate the blast radius of changing a file
    Impact {
        file: PathBuf,

        /// Project root to search for dependents
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Description of the planned change, e.g. "rename login"
        #[arg(long)]
        change: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("FATHOM_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // 1. Load from file or discover
    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::discover()?,
    };

    // 2. Override with CLI args
    if let Some(f) = args.format {
        config.output_format = f.into();
    }
    if let Some(ms) = args.deadline_ms {
        config.deadline_ms = Some(ms);
    }

    let request = match args.command {
        Command::Deps {
            file,
            root,
            reverse,
        } => Request::Dependencies {
            file,
            root,
            reverse,
        },
        Command::Impact { file, root, change } => Request::Impact { file, root, change },
    };

    run(config, request, args.verbose)
}
