//! Stats module - smoothing of daily series

mod smoothing;

pub use smoothing::{backward_moving_average, SmoothingError};
