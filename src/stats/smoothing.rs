//! Smoothing Module
//! Right-aligned moving average computed from prefix sums.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SmoothingError {
    #[error("Smoothing lag must be at least 1")]
    ZeroLag,
    #[error("Smoothing lag {lag} exceeds series length {len}")]
    WindowTooLarge { lag: usize, len: usize },
    #[error("x has {x_len} points but y has {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },
}

/// Backward-looking moving average of `y` over windows of `lag` points.
///
/// Each output value averages the current point and the `lag - 1` points
/// before it, and is paired with the x of the window's right edge. For `N`
/// input points the result has `N - lag + 1` points.
pub fn backward_moving_average(
    x: &[f64],
    y: &[f64],
    lag: usize,
) -> Result<(Vec<f64>, Vec<f64>), SmoothingError> {
    if x.len() != y.len() {
        return Err(SmoothingError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if lag == 0 {
        return Err(SmoothingError::ZeroLag);
    }
    if lag > y.len() {
        return Err(SmoothingError::WindowTooLarge { lag, len: y.len() });
    }

    let cum_sum: Vec<f64> = y
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect();

    let width = lag as f64;
    let mut y_out = Vec::with_capacity(y.len() - lag + 1);
    // First window has no C[-1] to subtract.
    y_out.push(cum_sum[lag - 1] / width);
    y_out.extend((lag..y.len()).map(|i| (cum_sum[i] - cum_sum[i - lag]) / width));

    Ok((x[lag - 1..].to_vec(), y_out))
}
