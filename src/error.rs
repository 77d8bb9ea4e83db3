use std::io;

use thiserror::Error;

/// Anything that can stop a report from being produced.
#[derive(Debug, Error)]
pub enum NadacError {
    #[error("source unavailable ({origin}): {source}")]
    SourceUnavailable {
        origin: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("malformed record on line {line}: {reason}\n  {raw}")]
    MalformedRecord { line: u64, raw: String, reason: String },
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}

impl NadacError {
    pub fn unavailable(
        origin: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        NadacError::SourceUnavailable {
            origin: origin.into(),
            source: source.into(),
        }
    }
}
