//! litmus CLI - find runnable examples hidden in source code comments
//!
//! Walks a project, extracts every example written in a comment, and shows
//! the code and expected transcript it found. Examples are never executed.

use clap::{CommandFactory, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use config::LitmusConfig;
use output::{OutputConfig, OutputFormat};

/// Find runnable examples inside source code comments.
#[derive(Parser)]
#[command(name = "litmus")]
#[command(author, version)]
#[command(about = "Find runnable examples inside source code comments")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  litmus scan                  Scan the current directory
  litmus scan src README.md    Scan a directory and a single file
  litmus scan -d python        Only look for Python examples
  litmus dialects              Show the prompts litmus recognizes")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Borderless tables and single-line JSON
    #[arg(long, global = true)]
    compact: bool,

    /// Never truncate long cells
    #[arg(long, global = true)]
    no_truncate: bool,

    /// Show detailed version information
    #[arg(long = "version-verbose")]
    version_verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find examples in files and directories
    #[command(visible_alias = "s")]
    Scan {
        /// Files or directories to scan
        #[arg(default_value = ".")]
        paths: Vec<String>,

        /// Only look for these dialects (repeatable)
        #[arg(short, long = "dialect")]
        dialect: Vec<String>,

        /// Number of worker threads (default: all CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// List the active dialects
    Dialects {
        /// Only show these dialects (repeatable)
        #[arg(short, long = "dialect")]
        dialect: Vec<String>,
    },

    /// List host languages and their comment syntax
    Languages,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Print verbose version information
fn print_verbose_version() {
    use colored::Colorize;

    let cli_version = env!("CARGO_PKG_VERSION");
    let platform = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    println!("litmus {}", cli_version);
    println!("  {:<14} {}", "litmus-cli:".cyan(), cli_version);
    println!("  {:<14} {}", "litmus-core:".cyan(), litmus_core::version());
    println!("  {:<14} {}", "Platform:".cyan(), platform);
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.version_verbose {
        print_verbose_version();
        return Ok(ExitCode::SUCCESS);
    }

    setup_logging(cli.verbose, cli.quiet);

    let config = LitmusConfig::load(std::path::Path::new("."));

    // CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    let mut output = OutputConfig::auto_detect(format, config.use_color());
    if cli.compact {
        output = output.compact();
    }
    if cli.no_truncate {
        output = output.without_truncation();
    }
    colored::control::set_override(output.use_colors());

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        println!();
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Scan {
            paths,
            dialect,
            jobs,
        } => commands::scan::run(&paths, &dialect, jobs, &config, output),
        Commands::Dialects { dialect } => {
            commands::dialects::run(&dialect, &config, output).map(|()| ExitCode::SUCCESS)
        }
        Commands::Languages => commands::languages::run(output).map(|()| ExitCode::SUCCESS),
    }
}
