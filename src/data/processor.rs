//! Data Processor Module
//! Selects the rows of a location, sums them and turns cumulative counts into daily deltas.

use crate::data::table::{CasesTable, RegionSeries};
use log::info;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("Location name not recognized: '{0}'")]
    UnknownLocation(String),
    #[error("No rows match location '{0}'")]
    NoMatchingRows(String),
}

/// A named geographic selection over the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A single county row, matched on `Admin2`.
    County { label: String, county: String },
    /// Every row of a state, matched on `Province_State`.
    State { label: String, state: String },
    /// Every row of a country, matched on `Country_Region`.
    Country { label: String, country: String },
}

impl Location {
    /// Resolve one of the supported location names.
    pub fn from_name(name: &str) -> Result<Self, ProcessorError> {
        match name {
            "Boulder County" => Ok(Location::County {
                label: name.to_string(),
                county: "Boulder".to_string(),
            }),
            "Colorado" => Ok(Location::State {
                label: name.to_string(),
                state: "Colorado".to_string(),
            }),
            "USA" => Ok(Location::Country {
                label: name.to_string(),
                country: "US".to_string(),
            }),
            other => Err(ProcessorError::UnknownLocation(other.to_string())),
        }
    }

    /// Resolve every name, failing on the first unrecognized one.
    pub fn resolve_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Self>, ProcessorError> {
        names.iter().map(|name| Self::from_name(name.as_ref())).collect()
    }

    pub fn label(&self) -> &str {
        match self {
            Location::County { label, .. }
            | Location::State { label, .. }
            | Location::Country { label, .. } => label,
        }
    }

    fn matches(&self, row: &RegionSeries) -> bool {
        match self {
            Location::County { county, .. } => row.county.as_deref() == Some(county.as_str()),
            Location::State { state, .. } => &row.state == state,
            Location::Country { country, .. } => &row.country == country,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregation and differencing over a `CasesTable`.
pub struct DataProcessor;

impl DataProcessor {
    /// Cumulative counts for `location`.
    ///
    /// Counties use the first matching row as is; states and countries sum
    /// every matching row elementwise.
    pub fn aggregate(table: &CasesTable, location: &Location) -> Result<Vec<f64>, ProcessorError> {
        info!("Aggregating {}...", location);

        let mut matching = table.rows().iter().filter(|row| location.matches(row));

        let first = matching
            .next()
            .ok_or_else(|| ProcessorError::NoMatchingRows(location.label().to_string()))?;

        let mut total = first.cumulative.clone();
        if let Location::County { .. } = location {
            return Ok(total);
        }

        for row in matching {
            for (acc, value) in total.iter_mut().zip(&row.cumulative) {
                *acc += value;
            }
        }

        Ok(total)
    }

    /// Day-over-day differences. Decreases (data corrections) are kept as negative values.
    pub fn daily_deltas(cumulative: &[f64]) -> Vec<f64> {
        cumulative.windows(2).map(|w| w[1] - w[0]).collect()
    }
}
