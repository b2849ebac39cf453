//! Charts module - Chart data and rendering

mod plotter;
mod renderer;

pub use renderer::CasesChartRenderer;
