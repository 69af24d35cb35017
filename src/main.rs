mod batch;
mod config;
mod metrics;
mod report;
mod samtools;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Bulk calculate mean depth and proportion of mapped reads for BAM files
/// using samtools, writing a tab-separated summary.
#[derive(Parser, Debug)]
#[command(name = "bamsummary", version, about)]
pub struct Cli {
    /// Input file containing a list of BAM files, one per line
    #[arg(short, long, required_unless_present = "dry_run")]
    input: Option<PathBuf>,

    /// Output filename
    #[arg(short, long, required_unless_present = "dry_run")]
    output: Option<PathBuf>,

    /// Number of threads for samtools (default: from config, else 2)
    #[arg(short, long)]
    threads: Option<u32>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// samtools executable (overrides config)
    #[arg(long, value_name = "PATH")]
    samtools: Option<String>,

    /// Print resolved settings and exit without running samtools
    #[arg(long)]
    dry_run: bool,

    /// Extra logging (each samtools invocation)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);
    tracing::debug!(?cli, "parsed CLI arguments");

    let (config_path, explicit) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(config::DEFAULT_CONFIG_FILE), false),
    };
    let mut config = match config::load_config(&config_path, explicit) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(threads) = cli.threads {
        config.run.threads = threads;
    }
    if let Some(command) = &cli.samtools {
        config.tool.command = command.clone();
    }

    if cli.dry_run {
        println!("bamsummary v{}", env!("CARGO_PKG_VERSION"));
        println!("Config file: {}", config_path.display());
        println!("Tool: {}", config.tool.command);
        println!("Depth args: {}", config.tool.depth_args.join(" "));
        println!("Flagstat args: {}", config.tool.flagstat_args.join(" "));
        println!("Threads: {}", config.run.threads);
        if let Some(input) = &cli.input {
            println!("Input: {}", input.display());
        }
        if let Some(output) = &cli.output {
            println!("Output: {}", output.display());
        }
        println!("Dry run mode: config validated, not running.");
        return ExitCode::SUCCESS;
    }

    // clap enforces both when not in dry-run mode
    let (Some(input), Some(output)) = (&cli.input, &cli.output) else {
        tracing::error!("--input and --output are required");
        return ExitCode::FAILURE;
    };

    tracing::info!("bamsummary starting");
    let threads = config.run.threads;
    let runner = samtools::Samtools::new(config.tool);
    match batch::process_bam_files(&runner, input, output, threads) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
