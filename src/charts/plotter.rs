//! Chart Data Module
//! Prepares the per-location series drawn in each panel.

use crate::data::{CasesTable, DataProcessor, Location, ProcessorError};
use crate::stats::{backward_moving_average, SmoothingError};
use plotters::style::RGBColor;
use thiserror::Error;

/// Matplotlib's default color cycle, `C0`..`C9`.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
    RGBColor(214, 39, 40),   // Red
    RGBColor(148, 103, 189), // Purple
    RGBColor(140, 86, 75),   // Brown
    RGBColor(227, 119, 194), // Pink
    RGBColor(127, 127, 127), // Gray
    RGBColor(188, 189, 34),  // Olive
    RGBColor(23, 190, 207),  // Cyan
];

#[derive(Error, Debug)]
pub enum ChartDataError {
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error("Cannot smooth {location} with a {lag} day window")]
    Smoothing {
        location: String,
        lag: usize,
        #[source]
        source: SmoothingError,
    },
}

/// One moving-average line.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedLine {
    pub lag: usize,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl SmoothedLine {
    pub fn label(&self) -> String {
        format!("Smoothed ({} day)", self.lag)
    }
}

/// Everything drawn in one location panel.
///
/// X values are days relative to the latest delta, so the most recent day is
/// at 0 and earlier days are negative.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationChartData {
    pub title: String,
    pub days: Vec<f64>,
    pub daily: Vec<f64>,
    pub smoothed: Vec<SmoothedLine>,
}

impl LocationChartData {
    pub fn build(
        table: &CasesTable,
        location: &Location,
        lags: &[usize],
    ) -> Result<Self, ChartDataError> {
        let cumulative = DataProcessor::aggregate(table, location)?;
        let daily = DataProcessor::daily_deltas(&cumulative);

        let index: Vec<f64> = (0..daily.len()).map(|i| i as f64).collect();
        let days = shift_to_latest(&index);

        let smoothed = lags
            .iter()
            .map(|&lag| {
                let (xs, ys) = backward_moving_average(&index, &daily, lag).map_err(|source| {
                    ChartDataError::Smoothing {
                        location: location.label().to_string(),
                        lag,
                        source,
                    }
                })?;
                Ok(SmoothedLine {
                    lag,
                    xs: shift_to_latest(&xs),
                    ys,
                })
            })
            .collect::<Result<Vec<_>, ChartDataError>>()?;

        Ok(Self {
            title: format!("{} cases", location.label()),
            days,
            daily,
            smoothed,
        })
    }

    /// Min and max of every value with `x >= x_min`, always spanning 0.
    pub fn visible_value_range(&self, x_min: f64) -> (f64, f64) {
        let bars = self
            .days
            .iter()
            .zip(&self.daily)
            .filter(|(x, _)| **x >= x_min)
            .map(|(_, y)| *y);
        let lines = self.smoothed.iter().flat_map(|line| {
            line.xs
                .iter()
                .zip(&line.ys)
                .filter(|(x, _)| **x >= x_min)
                .map(|(_, y)| *y)
        });

        bars.chain(lines)
            .fold((0.0_f64, 0.0_f64), |(lo, hi), y| (lo.min(y), hi.max(y)))
    }

    /// Legend color of the lag at `index`; index 0 is the daily bars.
    pub fn line_color(index: usize) -> RGBColor {
        PALETTE[(index + 1) % PALETTE.len()]
    }
}

fn shift_to_latest(xs: &[f64]) -> Vec<f64> {
    let latest = xs.last().copied().unwrap_or(0.0);
    xs.iter().map(|x| x - latest).collect()
}
