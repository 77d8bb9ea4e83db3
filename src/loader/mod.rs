pub mod loader;

pub use loader::{load, IndexEntry, LoadOptions, LoadStats, PriceChangeIndex, DEFAULT_CHUNK_SIZE};
