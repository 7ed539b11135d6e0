use anyhow::Result;
use clap::{Parser, Subcommand};
use revetl::{init_tracing_once, Credentials, ReviewETL, DEFAULT_BASE_URL, DEFAULT_VENUE};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_CSV: &str = "conference_reviews.csv";
const DEFAULT_JSON: &str = "reviews.json";

#[derive(Parser)]
#[command(name = "revetl", version)]
#[command(about = "Download conference peer reviews to CSV and batch them into text documents")]
struct Cli {
    #[arg(long, global = true, help = "Disable progress bars")]
    no_progress: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch every review of a venue and write them to CSV.
    /// Credentials come from OPENREVIEW_USERNAME / OPENREVIEW_PASSWORD (or .env).
    Fetch {
        #[arg(long, env = "OPENREVIEW_VENUE", default_value = DEFAULT_VENUE, help = "Venue id")]
        venue: String,

        #[arg(short, long, default_value = DEFAULT_CSV, help = "Output CSV file")]
        output: PathBuf,

        #[arg(long, env = "OPENREVIEW_BASEURL", default_value = DEFAULT_BASE_URL, help = "API base URL")]
        base_url: String,
    },
    /// Read a reviews CSV and write batched documents as a JSON array.
    Batch {
        #[arg(short, long, default_value = DEFAULT_CSV, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, default_value = DEFAULT_JSON, help = "Output JSON file")]
        output: PathBuf,

        #[arg(short = 'n', long, default_value_t = 100,
              value_parser = clap::value_parser!(u64).range(1..),
              help = "Reviews per document")]
        batch_size: u64,

        #[arg(long, help = "Pretty-print the JSON output")]
        pretty: bool,
    },
}

fn run(cli: Cli) -> Result<()> {
    let etl = ReviewETL::new().progress(!cli.no_progress);
    match cli.command {
        Command::Fetch { venue, output, base_url } => {
            let creds = Credentials::from_env()?;
            etl.venue(venue).base_url(base_url).download_reviews(&creds, &output)?;
        }
        Command::Batch { input, output, batch_size, pretty } => {
            etl.reviews_per_doc(batch_size as usize)
                .pretty_json(pretty)
                .batch_csv_to_json(&input, &output)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // Pick up credentials from a local .env before clap reads env defaults.
    let _ = dotenvy::dotenv();
    init_tracing_once();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
