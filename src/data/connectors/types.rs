use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Price columns read from market data files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceColumn {
    Open,
    High,
    Low,
    Close,
}

impl PriceColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
        }
    }

    /// Columns the analysis cannot run without. Open is read when present.
    pub fn required() -> Vec<Self> {
        vec![Self::High, Self::Low, Self::Close]
    }

    /// Common alternative column names
    pub fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Open => vec!["open", "Open", "OPEN", "o"],
            Self::High => vec!["high", "High", "HIGH", "h"],
            Self::Low => vec!["low", "Low", "LOW", "l"],
            Self::Close => vec!["close", "Close", "CLOSE", "c"],
        }
    }
}

pub const DATE_ALIASES: [&str; 6] = ["date", "Date", "datetime", "DateTime", "time", "timestamp"];

/// Summary of a loaded price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub file_path: String,
    pub num_rows: usize,
    pub skipped_rows: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub price_range: (f64, f64), // (min low, max high)
}
