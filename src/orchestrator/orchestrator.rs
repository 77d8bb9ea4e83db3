use std::io::{Read, Write};
use std::time::Duration;

use log::{info, warn};

use crate::error::NadacError;
use crate::loader::{load, LoadOptions};
use crate::report::{build_report, RankedReport};
use crate::source::DatasetSource;

#[derive(Debug, Clone)]
pub struct Config {
    pub source: DatasetSource,
    pub load: LoadOptions,
    pub top_n: usize,
    pub connect_timeout: Duration,
}

/// Load the whole stream, then rank it. Nothing is returned unless every row parsed.
pub fn generate_report<R: Read>(
    source: R,
    options: &LoadOptions,
    top_n: usize,
) -> Result<RankedReport, NadacError> {
    let index = load(source, options)?;
    if index.is_empty() {
        warn!("no rows matched; report sections will be empty");
    }
    Ok(build_report(&index, top_n))
}

pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<(), NadacError> {
    info!(
        "reading {} (year: {}, chunk size: {} bytes)",
        config.source.describe(),
        config
            .load
            .target_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "all".to_string()),
        config.load.chunk_size
    );

    let stream = config.source.open(config.connect_timeout)?;
    let report = generate_report(stream, &config.load, config.top_n)?;
    report.write_to(out, config.top_n, config.load.target_year)?;

    Ok(())
}
