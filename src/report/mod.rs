pub mod report;

pub use report::{build_report, format_dollar_amount, RankedReport, DEFAULT_TOP_N};
