mod commands;
mod infra;
mod obs;

use clap::{Parser, Subcommand};
use commands::Command;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rill")]
#[command(about = "Rill CLI", version, arg_required_else_help = true)]
#[command(
    after_help = "Examples:\n  rill prepare --config configs/sample.toml\n  rill prepare --config configs/sample.toml --fill interpolate\n  rill fit --config configs/sample.toml --lag 3\n  rill validate --config configs/sample.toml\n"
)]
struct Cli {
    /// Log level when RILL_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    /// Log format: text or json.
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
    /// Expose Prometheus metrics on host:port.
    #[arg(long, global = true)]
    metrics_addr: Option<String>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Merge and impute the gauge and weather streams into a combined table.
    Prepare {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Override the configured fill strategy: omit | locf | interpolate.
        #[arg(long)]
        fill: Option<String>,
    },
    /// Window a combined table, run the forecaster, and report test RMSE.
    Fit {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Number of lag observations per training row.
        #[arg(long)]
        lag: Option<usize>,
        /// Number of steps to forecast.
        #[arg(long)]
        lead: Option<usize>,
    },
    /// Load both streams and print their data-quality reports.
    Validate {
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = obs::init_tracing(&cli.log_level, &cli.log_format) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = obs::init_metrics(cli.metrics_addr.as_deref()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let command = match cli.command {
        CliCommand::Prepare { config, out, fill } => Command::Prepare { config, out, fill },
        CliCommand::Fit {
            config,
            out,
            lag,
            lead,
        } => Command::Fit {
            config,
            out,
            lag,
            lead,
        },
        CliCommand::Validate { config } => Command::Validate { config },
    };

    if let Err(err) = commands::run(command) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
