//! Run Settings
//! Fixed parameters for a single run: data source, locations, smoothing and figure layout.

use std::path::PathBuf;

/// Confirmed US cases, one row per county-level region.
pub const CONFIRMED_US_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_confirmed_US.csv";

/// Column index of the first date column in the CSSE US time series.
pub const FIRST_DATE_COLUMN: usize = 11;

/// Smoothing windows drawn on every panel, in days.
pub const DEFAULT_LAGS: [usize; 2] = [3, 7];

/// Settings for one download-and-render pass.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub data_url: String,
    pub csv_path: PathBuf,
    pub output_path: PathBuf,
    /// Panels from top to bottom.
    pub locations: Vec<String>,
    pub lags: Vec<usize>,
    pub first_date_column: usize,
    /// Figure size in pixels (8x8 inches at 250 dpi).
    pub figure_size: (u32, u32),
    /// Visible window in days relative to the latest date.
    pub x_range: (f64, f64),
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            data_url: CONFIRMED_US_URL.to_string(),
            csv_path: PathBuf::from("./covid_data.csv"),
            output_path: PathBuf::from("Covid cases.png"),
            locations: vec![
                "USA".to_string(),
                "Colorado".to_string(),
                "Boulder County".to_string(),
            ],
            lags: DEFAULT_LAGS.to_vec(),
            first_date_column: FIRST_DATE_COLUMN,
            figure_size: (2000, 2000),
            x_range: (-300.0, 1.0),
        }
    }
}
