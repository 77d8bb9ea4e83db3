use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::Read;

use csv::{ErrorKind, QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use log::{debug, info};
use rust_decimal::Decimal;

use crate::error::NadacError;
use crate::prices::{EXPECTED_COLUMNS, HEADER_MARKER, PriceChangeRecord};

pub const DEFAULT_CHUNK_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Only rows whose effective date falls in this year are kept. `None` keeps every row.
    pub target_year: Option<i32>,
    /// Size of the block read from the underlying stream at a time.
    pub chunk_size: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            target_year: Some(2022),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub delta: Decimal,
    /// Position at which the description was first seen.
    pub order: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: u64,
    pub headers_skipped: u64,
    pub outside_year: u64,
    pub duplicates: u64,
}

/// Description -> delta of the last qualifying row seen for it.
#[derive(Debug, Default)]
pub struct PriceChangeIndex {
    entries: HashMap<String, IndexEntry>,
    pub stats: LoadStats,
}

impl PriceChangeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins, but the description keeps its first-seen position.
    pub fn insert(&mut self, description: String, delta: Decimal) {
        let next = self.entries.len();
        match self.entries.entry(description) {
            Entry::Occupied(mut slot) => {
                slot.get_mut().delta = delta;
                self.stats.duplicates += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(IndexEntry { delta, order: next });
            }
        }
    }

    pub fn get(&self, description: &str) -> Option<Decimal> {
        self.entries.get(description).map(|entry| entry.delta)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-encounter order.
    pub fn entries(&self) -> Vec<(&str, IndexEntry)> {
        let mut all: Vec<(&str, IndexEntry)> = self
            .entries
            .iter()
            .map(|(description, entry)| (description.as_str(), *entry))
            .collect();
        all.sort_by_key(|(_, entry)| entry.order);
        all
    }
}

/// Stream the CSV from `source` and fold every qualifying row into a `PriceChangeIndex`.
///
/// The reader pulls `chunk_size` bytes at a time and parses records as they complete,
/// so memory stays bounded by the largest row plus the index itself. The first
/// malformed row aborts the load.
pub fn load<R: Read>(source: R, options: &LoadOptions) -> Result<PriceChangeIndex, NadacError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .buffer_capacity(options.chunk_size.max(1))
        .from_reader(source);

    let mut index = PriceChangeIndex::new();
    let mut record = StringRecord::new();

    loop {
        match rdr.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => return Err(read_error(e)),
        }
        index.stats.rows_read += 1;

        if record.get(0) == Some(HEADER_MARKER) {
            debug!("skipping header row at line {}", line_of(&record));
            index.stats.headers_skipped += 1;
            continue;
        }

        let row = parse_row(&record)?;

        if let Some(year) = options.target_year {
            if row.effective_year() != year {
                index.stats.outside_year += 1;
                continue;
            }
        }

        let delta = row.unit_price_delta();
        index.insert(row.description, delta);
    }

    info!(
        "loaded {} unique descriptions ({} rows read, {} outside target year, {} duplicates collapsed)",
        index.len(),
        index.stats.rows_read,
        index.stats.outside_year,
        index.stats.duplicates
    );

    Ok(index)
}

fn parse_row(record: &StringRecord) -> Result<PriceChangeRecord, NadacError> {
    if record.len() != EXPECTED_COLUMNS {
        return Err(malformed(
            record,
            format!("expected {} columns, found {}", EXPECTED_COLUMNS, record.len()),
        ));
    }
    record
        .deserialize(None)
        .map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::Deserialize { err, .. } => err.to_string(),
                _ => e.to_string(),
            };
            malformed(record, reason)
        })
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or(0)
}

fn malformed(record: &StringRecord, reason: String) -> NadacError {
    NadacError::MalformedRecord {
        line: line_of(record),
        raw: raw_line(record),
        reason,
    }
}

/// Re-encode `record` with the same quoting rules it was read with.
fn raw_line(record: &StringRecord) -> String {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .flexible(true)
        .from_writer(Vec::new());
    if wtr.write_record(record).is_err() {
        return record.iter().collect::<Vec<_>>().join(",");
    }
    match wtr.into_inner() {
        Ok(bytes) => String::from_utf8_lossy(&bytes)
            .trim_end_matches(['\r', '\n'])
            .to_string(),
        Err(_) => record.iter().collect::<Vec<_>>().join(","),
    }
}

fn read_error(err: csv::Error) -> NadacError {
    let line = err.position().map(|pos| pos.line()).unwrap_or(0);
    match err.into_kind() {
        ErrorKind::Io(io_err) => NadacError::unavailable("input stream", io_err),
        ErrorKind::Utf8 { err, .. } => NadacError::MalformedRecord {
            line,
            raw: String::from("<invalid UTF-8>"),
            reason: err.to_string(),
        },
        other => NadacError::MalformedRecord {
            line,
            raw: String::new(),
            reason: format!("{:?}", other),
        },
    }
}
