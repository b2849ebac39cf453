//! CSV Data Loader Module
//! Parses the downloaded time series with Polars and validates it into a `CasesTable`.

use crate::data::table::{CasesTable, RegionSeries};
use chrono::NaiveDate;
use log::info;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

pub const COUNTY_COLUMN: &str = "Admin2";
pub const STATE_COLUMN: &str = "Province_State";
pub const COUNTRY_COLUMN: &str = "Country_Region";

/// Header format of the date columns, e.g. `1/22/20`.
const DATE_HEADER_FORMAT: &str = "%m/%d/%y";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Required column '{0}' not found")]
    MissingColumn(String),
    #[error("Expected date columns from index {first_date_column}, but the CSV has {found} columns")]
    NoDateColumns {
        first_date_column: usize,
        found: usize,
    },
    #[error("Column '{label}' is not a date header")]
    InvalidDateHeader {
        label: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Missing or non-numeric value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },
}

/// Loads the CSSE time series into typed records.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file from disk.
    pub fn load_csv(path: &Path, first_date_column: usize) -> Result<CasesTable, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        let table = Self::from_dataframe(&df, first_date_column)?;
        info!(
            "Loaded {} rows x {} dates ({:?} to {:?}) from {:?}",
            table.row_count(),
            table.date_count(),
            table.dates().first(),
            table.dates().last(),
            path
        );
        Ok(table)
    }

    /// Parse CSV text held in memory.
    pub fn parse_csv(bytes: Vec<u8>, first_date_column: usize) -> Result<CasesTable, LoaderError> {
        let df = CsvReader::new(Cursor::new(bytes)).finish()?;
        Self::from_dataframe(&df, first_date_column)
    }

    /// Validate a DataFrame against the expected schema and convert it.
    ///
    /// Every column from `first_date_column` onward must carry a date header and
    /// a numeric, non-null value in every row.
    pub fn from_dataframe(
        df: &DataFrame,
        first_date_column: usize,
    ) -> Result<CasesTable, LoaderError> {
        let counties = Self::text_column(df, COUNTY_COLUMN)?;
        let states = Self::text_column(df, STATE_COLUMN)?;
        let countries = Self::text_column(df, COUNTRY_COLUMN)?;

        let columns = df.get_columns();
        if columns.len() <= first_date_column {
            return Err(LoaderError::NoDateColumns {
                first_date_column,
                found: columns.len(),
            });
        }

        let mut date_labels = Vec::with_capacity(columns.len() - first_date_column);
        let mut dates = Vec::with_capacity(columns.len() - first_date_column);
        let mut values = Vec::with_capacity(columns.len() - first_date_column);

        for column in &columns[first_date_column..] {
            let label = column.name().to_string();
            let date = NaiveDate::parse_from_str(&label, DATE_HEADER_FORMAT).map_err(|source| {
                LoaderError::InvalidDateHeader {
                    label: label.clone(),
                    source,
                }
            })?;

            let as_f64 = column.cast(&DataType::Float64)?;
            values.push(as_f64.f64()?.clone());
            date_labels.push(label);
            dates.push(date);
        }

        let mut rows = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let mut cumulative = Vec::with_capacity(values.len());
            for (ca, label) in values.iter().zip(&date_labels) {
                let value = ca.get(row).ok_or_else(|| LoaderError::MissingValue {
                    column: label.clone(),
                    row,
                })?;
                cumulative.push(value);
            }

            rows.push(RegionSeries {
                county: counties.get(row).map(str::to_string),
                state: states.get(row).unwrap_or_default().to_string(),
                country: countries.get(row).unwrap_or_default().to_string(),
                cumulative,
            });
        }

        Ok(CasesTable::new(date_labels, dates, rows))
    }

    fn text_column(df: &DataFrame, name: &str) -> Result<StringChunked, LoaderError> {
        let column = df
            .column(name)
            .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
        let as_text = column.cast(&DataType::String)?;
        Ok(as_text.str()?.clone())
    }
}
