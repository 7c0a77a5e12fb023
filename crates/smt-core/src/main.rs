//! SMT Triage - placement-log halt/replenishment analysis
//!
//! The command-line entry point, handling:
//! - Log-file analysis and event classification
//! - Configuration validation
//! - Output format selection

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use smt_common::error::format_error_human;
use smt_common::{Error, OutputFormat};
use smt_config::{AnalysisConfig, ConfigSource, FailurePredicate, UnresolvedPolicy};
use smt_core::analyze::Analyzer;
use smt_core::exit_codes::ExitCode;
use smt_core::logging;
use smt_core::render::render_report;
use smt_core::report::SummaryTables;
use std::io::IsTerminal;
use std::path::PathBuf;

/// SMT Triage - classify placement failure runs as halts or replenishments
#[derive(Parser)]
#[command(name = "smt-triage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to the config file (JSON with codes/policy/schema sections)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze placement logs and classify failure episodes
    Analyze(AnalyzeArgs),

    /// Validate configuration and print the effective settings
    Check,

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Placement log files (CSV, Latin-1 encoded)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Restrict reported events and summaries to one product label
    #[arg(long)]
    product: Option<String>,

    /// Override the configured failure predicate
    #[arg(long, value_enum)]
    predicate: Option<FailurePredicate>,

    /// Override the configured unresolved-episode policy
    #[arg(long, value_enum)]
    unresolved: Option<UnresolvedPolicy>,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.global.verbose, cli.global.quiet);

    let use_color = !cli.global.no_color && std::io::stderr().is_terminal();
    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", format_error_human(&err, use_color));
            ExitCode::from(&err)
        }
    };
    std::process::exit(code.as_i32());
}

fn run(cli: &Cli) -> Result<ExitCode, Error> {
    match &cli.command {
        Commands::Analyze(args) => cmd_analyze(&cli.global, args),
        Commands::Check => cmd_check(&cli.global),
        Commands::Version => {
            println!("smt-triage {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::Success)
        }
    }
}

fn cmd_analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> Result<ExitCode, Error> {
    let (mut config, _source) = AnalysisConfig::load(global.config.as_deref())?;
    if let Some(predicate) = args.predicate {
        config.policy.failure_predicate = predicate;
    }
    if let Some(unresolved) = args.unresolved {
        config.policy.unresolved = unresolved;
    }

    let analyzer = Analyzer::new(config);
    let mut report = analyzer.run(&args.files)?;
    if let Some(product) = &args.product {
        report = report.filtered_by_product(product);
    }

    let tables = SummaryTables::from_halts(&report.halts);
    println!("{}", render_report(&report, &tables, global.format)?);
    Ok(ExitCode::Success)
}

/// Effective-configuration payload for `check`.
#[derive(Serialize)]
struct CheckPayload {
    schema_version: &'static str,
    source: ConfigSource,
    config: AnalysisConfig,
}

fn cmd_check(global: &GlobalOpts) -> Result<ExitCode, Error> {
    let (config, source) = AnalysisConfig::load(global.config.as_deref())?;
    config.validate()?;

    match global.format {
        OutputFormat::Json => {
            let payload = CheckPayload {
                schema_version: smt_config::CONFIG_SCHEMA_VERSION,
                source,
                config,
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Table | OutputFormat::Summary => {
            println!(
                "configuration ok: {} failure codes, predicate {}, unresolved {} (source: {})",
                config.codes.len(),
                config.policy.failure_predicate,
                config.policy.unresolved,
                source
            );
        }
    }
    Ok(ExitCode::Success)
}
