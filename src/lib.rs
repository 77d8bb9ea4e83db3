pub mod error;
pub mod prices;
pub mod loader;
pub mod report;
pub mod source;
pub mod orchestrator;

pub use error::NadacError;
pub use orchestrator::{generate_report, run, Config};
pub use loader::{load, LoadOptions, PriceChangeIndex};
pub use report::{build_report, format_dollar_amount, RankedReport};
pub use source::DatasetSource;
pub use prices::PriceChangeRecord;
