use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// First field of the header row.
pub const HEADER_MARKER: &str = "NDC Description";

/// NDC Description, NDC, Old NADAC Per Unit, New NADAC Per Unit, Classification for Rate Setting,
/// Percent Change, Primary Reason, Start Date, End Date, Effective Date
pub const EXPECTED_COLUMNS: usize = 10;

const DATE_FORMAT: &str = "%m/%d/%Y";

/// One row of the NADAC comparison file, deserialized by column position.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceChangeRecord {
    pub description: String,
    pub ndc: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub old_unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub new_unit_price: Decimal,
    pub classification: String,
    pub percent_change: String,
    pub primary_reason: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(deserialize_with = "deserialize_us_date")]
    pub effective_date: NaiveDate,
}

impl PriceChangeRecord {
    pub fn unit_price_delta(&self) -> Decimal {
        self.new_unit_price - self.old_unit_price
    }

    pub fn effective_year(&self) -> i32 {
        self.effective_date.year()
    }
}

fn deserialize_us_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| {
        serde::de::Error::custom(format!("invalid date '{}' (expected MM/DD/YYYY): {}", raw, e))
    })
}
