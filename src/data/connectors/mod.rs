mod csv;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use types::{DatasetMetadata, PriceColumn, DATE_ALIASES};
pub use validator::DataValidator;
