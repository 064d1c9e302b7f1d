use clap::{Parser, Subcommand};
use rill_ingest::{default_location, fetch_history, parse_date};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rill-ingest")]
#[command(about = "Historical weather observation fetcher for Rill.", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch historical observations one month per request.
    Fetch {
        #[arg(long, env = "RILL_WEATHER_API_KEY")]
        key: String,
        #[arg(long, default_value_t = default_location().to_string())]
        location: String,
        /// Start date (YYYY-mm-dd).
        #[arg(long)]
        start: String,
        /// End date (YYYY-mm-dd). Defaults to the start date.
        #[arg(long)]
        end: Option<String>,
        #[arg(long, default_value = "e")]
        units: String,
        #[arg(long, default_value = "data/phl.historical.weather")]
        out_dir: PathBuf,
        #[arg(long, default_value_t = 350)]
        sleep_ms: u64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch {
            key,
            location,
            start,
            end,
            units,
            out_dir,
            sleep_ms,
        } => {
            let start = parse_date(&start)?;
            let end = match end {
                Some(value) => parse_date(&value)?,
                None => start,
            };
            fetch_history(
                &key, &location, &units, start, end, &out_dir, sleep_ms, None,
            )
            .await
        }
    }
}
