//! Data module - download, CSV loading and aggregation

mod fetcher;
mod loader;
mod processor;
mod table;

pub use fetcher::DataFetcher;
pub use loader::DataLoader;
pub use processor::{DataProcessor, Location, ProcessorError};
pub use table::CasesTable;
