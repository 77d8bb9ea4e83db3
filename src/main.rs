use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use log::info;

use nadac_report::loader::DEFAULT_CHUNK_SIZE;
use nadac_report::report::DEFAULT_TOP_N;
use nadac_report::source::DEFAULT_URL;
use nadac_report::{run, Config, DatasetSource, LoadOptions};

/// Report the largest NADAC per unit price increases and decreases for a year.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// URL of the NADAC comparison CSV
    #[arg(long, default_value = DEFAULT_URL, conflicts_with = "file")]
    url: String,

    /// Read a local CSV with the same layout instead of downloading
    #[arg(long)]
    file: Option<PathBuf>,

    /// Effective-date year to report on
    #[arg(long, default_value_t = 2022, conflicts_with = "all_years")]
    year: i32,

    /// Rank every row regardless of effective date
    #[arg(long)]
    all_years: bool,

    /// Bytes read from the stream at a time
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = parse_chunk_size)]
    chunk_size: usize,

    /// Entries listed per section
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Seconds allowed for connecting to the URL
    #[arg(long, default_value_t = 60)]
    connect_timeout_secs: u64,
}

fn parse_chunk_size(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("chunk size must be greater than zero".to_string()),
        Ok(size) => Ok(size),
        Err(e) => Err(e.to_string()),
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let source = match args.file {
            Some(path) => DatasetSource::File(path),
            None => DatasetSource::Url(args.url),
        };
        Config {
            source,
            load: LoadOptions {
                target_year: if args.all_years { None } else { Some(args.year) },
                chunk_size: args.chunk_size,
            },
            top_n: args.top,
            connect_timeout: Duration::from_secs(args.connect_timeout_secs),
        }
    }
}

fn main() {
    let args = Args::parse();
    // Initialize logger (respect RUST_LOG env var if set)
    env_logger::init();

    let config = Config::from(args);
    info!("starting NADAC report for {}", config.source.describe());

    let stdout = io::stdout();
    if let Err(e) = run(&config, &mut stdout.lock()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
