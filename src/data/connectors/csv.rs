use super::{
    types::{DatasetMetadata, PriceColumn, DATE_ALIASES},
    validator::DataValidator,
};
use crate::engines::analysis::IntervalAnalyzer;
use crate::error::{Result, TradeIntervalError};
use crate::types::PriceBar;
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| TradeIntervalError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load, convert and validate a price series
    pub fn load_bars<P: AsRef<Path>>(path: P, min_rows: usize) -> Result<(Vec<PriceBar>, DatasetMetadata)> {
        let df = Self::load(&path)?;
        let (bars, skipped_rows) = Self::frame_to_bars(&df)?;

        DataValidator::validate_minimum_rows(&bars, min_rows)?;
        DataValidator::validate_bars(&bars)?;

        let metadata = Self::create_metadata(&path, &bars, skipped_rows);
        log::info!(
            "Loaded {} bars from {} ({} rows skipped)",
            metadata.num_rows,
            metadata.file_path,
            skipped_rows
        );
        Ok((bars, metadata))
    }

    /// Convert a frame into ordered bars. Rows with a null high, low or close are
    /// skipped; the number skipped is returned alongside.
    pub fn frame_to_bars(df: &DataFrame) -> Result<(Vec<PriceBar>, usize)> {
        let column_map = DataValidator::resolve_columns(df)?;
        let column = |c: PriceColumn| -> Result<Option<Column>> {
            column_map
                .get(&c)
                .map(|name| Ok(df.column(name)?.cast(&DataType::Float64)?))
                .transpose()
        };

        let (Some(high), Some(low), Some(close)) = (
            column(PriceColumn::High)?,
            column(PriceColumn::Low)?,
            column(PriceColumn::Close)?,
        ) else {
            return Err(TradeIntervalError::DataLoading(
                "Missing high, low or close column".to_string(),
            ));
        };
        let open = column(PriceColumn::Open)?;
        let dates = Self::date_column(df)?;

        let high = high.f64()?;
        let low = low.f64()?;
        let close = close.f64()?;
        let open = open.as_ref().map(|c| c.f64()).transpose()?;

        let mut bars = Vec::with_capacity(df.height());
        let mut skipped = 0;
        for i in 0..df.height() {
            let (Some(h), Some(l), Some(c)) = (high.get(i), low.get(i), close.get(i)) else {
                skipped += 1;
                continue;
            };
            let mut bar = PriceBar::new(bars.len(), h, l, c);
            if let Some(o) = open.and_then(|o| o.get(i)) {
                bar = bar.with_open(o);
            }
            if let Some(date) = dates.as_ref().and_then(|d| d.get(i).copied().flatten()) {
                bar = bar.with_date(date);
            }
            bars.push(bar);
        }

        if skipped > 0 {
            log::warn!("Skipped {} rows with null prices", skipped);
        }
        Ok((bars, skipped))
    }

    fn date_column(df: &DataFrame) -> Result<Option<Vec<Option<NaiveDate>>>> {
        let columns = df.get_column_names();
        let Some(name) = DATE_ALIASES
            .iter()
            .find(|alias| columns.iter().any(|col| col.as_str() == **alias))
        else {
            return Ok(None);
        };

        let as_text = df.column(name)?.cast(&DataType::String)?;
        let parsed = as_text
            .str()?
            .into_iter()
            .map(|value| value.and_then(Self::parse_date))
            .collect();
        Ok(Some(parsed))
    }

    /// Accepts `YYYY-MM-DD` optionally followed by a time part
    fn parse_date(value: &str) -> Option<NaiveDate> {
        let day = value.get(..10).unwrap_or(value);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    pub fn create_metadata<P: AsRef<Path>>(path: P, bars: &[PriceBar], skipped_rows: usize) -> DatasetMetadata {
        let date_range = match (
            bars.first().and_then(|b| b.date),
            bars.last().and_then(|b| b.date),
        ) {
            (Some(first), Some(last)) => Some((first, last)),
            _ => None,
        };

        DatasetMetadata {
            file_path: path.as_ref().to_string_lossy().to_string(),
            num_rows: bars.len(),
            skipped_rows,
            date_range,
            price_range: IntervalAnalyzer::price_range(bars).unwrap_or((0.0, 0.0)),
        }
    }
}
