pub mod price_change;

pub use price_change::{PriceChangeRecord, EXPECTED_COLUMNS, HEADER_MARKER};
