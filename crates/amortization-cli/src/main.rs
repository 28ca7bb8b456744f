mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::amortization::PlanArgs;
use commands::interactive::InteractiveArgs;
use commands::rate_lookup::UsuryRateArgs;

/// Fixed-rate loan amortization plans
#[derive(Parser)]
#[command(
    name = "amort",
    version,
    about = "Fixed-rate loan amortization plans",
    long_about = "Computes the level monthly payment of a fixed-rate loan and its full \
                  amortization schedule with decimal precision. Prints a summary and \
                  the schedule, exports it to Excel or CSV, and can look up the \
                  published usury rate as a reference."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute an amortization plan from flags, a JSON file or stdin
    Plan(PlanArgs),
    /// Ask for the loan terms interactively, then offer to save the plan
    Interactive(InteractiveArgs),
    /// Look up the published usury rate (reference only)
    UsuryRate(UsuryRateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Plan(args) => commands::amortization::run_plan(args),
        Commands::UsuryRate(args) => commands::rate_lookup::run_usury_rate(args),
        Commands::Interactive(args) => {
            if let Err(e) = commands::interactive::run_interactive(args) {
                eprintln!("{}: {}", "error".red().bold(), e);
                process::exit(1);
            }
            process::exit(0);
        }
        Commands::Version => {
            println!("amort {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            if commands::amortization::has_failed_export(&value) {
                eprintln!("{}: schedule export failed", "error".red().bold());
                process::exit(2);
            }
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to initialise logging: {}", e);
    }
}
