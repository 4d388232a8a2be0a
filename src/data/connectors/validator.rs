use super::types::PriceColumn;
use crate::error::{Result, TradeIntervalError};
use crate::types::PriceBar;
use polars::prelude::*;
use std::collections::HashMap;

pub struct DataValidator;

impl DataValidator {
    /// Resolve the actual column name for every price column present.
    /// Missing high/low/close or non-numeric price columns are errors.
    pub fn resolve_columns(df: &DataFrame) -> Result<HashMap<PriceColumn, String>> {
        let mut column_map = HashMap::new();

        for column in [PriceColumn::Open, PriceColumn::High, PriceColumn::Low, PriceColumn::Close] {
            if let Some(name) = Self::find_column(df, &column) {
                column_map.insert(column, name.to_string());
            } else if PriceColumn::required().contains(&column) {
                return Err(TradeIntervalError::DataLoading(format!(
                    "Missing required column: {} (tried aliases: {:?})",
                    column.as_str(),
                    column.aliases()
                )));
            }
        }

        for (column, actual_name) in &column_map {
            let dtype = df.column(actual_name)?.dtype().clone();
            if !matches!(
                dtype,
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::UInt64
                    | DataType::UInt32
            ) {
                return Err(TradeIntervalError::DataLoading(format!(
                    "Column '{}' ({}) must be numeric, found {:?}",
                    actual_name,
                    column.as_str(),
                    dtype
                )));
            }
        }

        Ok(column_map)
    }

    fn find_column(df: &DataFrame, column: &PriceColumn) -> Option<&'static str> {
        let columns = df.get_column_names();
        column
            .aliases()
            .into_iter()
            .find(|alias| columns.iter().any(|col| col.as_str() == *alias))
    }

    /// High must not be below low on any bar
    pub fn validate_bars(bars: &[PriceBar]) -> Result<()> {
        for (i, bar) in bars.iter().enumerate() {
            if bar.high < bar.low {
                return Err(TradeIntervalError::DataLoading(format!(
                    "Invalid data at row {}: high ({}) < low ({})",
                    i, bar.high, bar.low
                )));
            }
        }
        Ok(())
    }

    pub fn validate_minimum_rows(bars: &[PriceBar], min_rows: usize) -> Result<()> {
        if bars.len() < min_rows {
            return Err(TradeIntervalError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                bars.len(),
                min_rows
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_resolve_aliases_without_open() {
        let df = df! {
            "HIGH" => &[101.0, 103.0],
            "low" => &[99.0, 100.0],
            "Close" => &[100.5, 102.0],
        }
        .unwrap();

        let map = DataValidator::resolve_columns(&df).unwrap();
        assert_eq!(map.get(&PriceColumn::High).map(String::as_str), Some("HIGH"));
        assert_eq!(map.get(&PriceColumn::Close).map(String::as_str), Some("Close"));
        assert!(!map.contains_key(&PriceColumn::Open));
    }

    #[test]
    fn test_missing_close_is_error() {
        let df = df! {
            "high" => &[101.0, 103.0],
            "low" => &[99.0, 100.0],
        }
        .unwrap();

        assert!(DataValidator::resolve_columns(&df).is_err());
    }

    #[test]
    fn test_non_numeric_column_is_error() {
        let df = df! {
            "high" => &["a", "b"],
            "low" => &[99.0, 100.0],
            "close" => &[100.5, 102.0],
        }
        .unwrap();

        assert!(DataValidator::resolve_columns(&df).is_err());
    }

    #[test]
    fn test_validate_bars() {
        let good = vec![PriceBar::new(0, 101.0, 99.0, 100.0)];
        assert!(DataValidator::validate_bars(&good).is_ok());

        let bad = vec![PriceBar::new(0, 98.0, 99.0, 100.0)];
        assert!(DataValidator::validate_bars(&bad).is_err());
        assert!(DataValidator::validate_minimum_rows(&good, 2).is_err());
    }
}
