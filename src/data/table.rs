//! Cases Table
//! Typed, immutable view over the cumulative case time series.

use chrono::NaiveDate;

/// One geographic unit and its cumulative confirmed-case counts.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSeries {
    /// `Admin2`; absent for rows that are not counties (cruise ships, territories).
    pub county: Option<String>,
    pub state: String,
    pub country: String,
    /// One value per date column, oldest first.
    pub cumulative: Vec<f64>,
}

/// All regions over a shared, ascending run of dates.
#[derive(Debug, Clone, PartialEq)]
pub struct CasesTable {
    date_labels: Vec<String>,
    dates: Vec<NaiveDate>,
    rows: Vec<RegionSeries>,
}

impl CasesTable {
    /// Assemble a table. Every row must carry exactly one value per date.
    pub(crate) fn new(
        date_labels: Vec<String>,
        dates: Vec<NaiveDate>,
        rows: Vec<RegionSeries>,
    ) -> Self {
        debug_assert_eq!(date_labels.len(), dates.len());
        debug_assert!(rows.iter().all(|r| r.cumulative.len() == dates.len()));
        Self {
            date_labels,
            dates,
            rows,
        }
    }

    pub fn rows(&self) -> &[RegionSeries] {
        &self.rows
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Header text of the most recent date column.
    pub fn last_date_label(&self) -> Option<&str> {
        self.date_labels.last().map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn date_count(&self) -> usize {
        self.dates.len()
    }
}
