//! Covid Trends - daily case charts for a few US locations
//!
//! Downloads the CSSE confirmed-case time series, smooths the daily deltas
//! and renders one stacked panel per location to a PNG.

mod charts;
mod data;
mod settings;
mod stats;

use anyhow::Context;
use charts::CasesChartRenderer;
use data::{DataFetcher, DataLoader, Location};
use log::warn;
use settings::RunSettings;

fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = RunSettings::default();
    run(&settings)?;

    if let Err(e) = open::that(&settings.output_path) {
        warn!("Could not open {:?}: {}", settings.output_path, e);
    }

    Ok(())
}

/// Download, load and render. Location names are checked before any network access.
fn run(settings: &RunSettings) -> anyhow::Result<()> {
    Location::resolve_all(&settings.locations).context("resolving locations")?;

    DataFetcher::download_to(&settings.data_url, &settings.csv_path)
        .with_context(|| format!("downloading {}", settings.data_url))?;

    let table = DataLoader::load_csv(&settings.csv_path, settings.first_date_column)
        .with_context(|| format!("loading {:?}", settings.csv_path))?;

    CasesChartRenderer::render_figure(&table, settings).context("rendering case charts")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ProcessorError;
    use std::io::ErrorKind;
    use std::net::TcpListener;

    #[test]
    fn unknown_location_stops_before_download() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let settings = RunSettings {
            data_url: format!("http://{}/covid_data.csv", listener.local_addr().unwrap()),
            csv_path: dir.path().join("covid_data.csv"),
            output_path: dir.path().join("out.png"),
            locations: vec!["USA".to_string(), "Mars".to_string()],
            ..RunSettings::default()
        };

        let err = run(&settings).unwrap_err();

        assert_eq!(
            err.downcast_ref::<ProcessorError>(),
            Some(&ProcessorError::UnknownLocation("Mars".to_string()))
        );
        assert_eq!(
            listener.accept().map(|_| ()).unwrap_err().kind(),
            ErrorKind::WouldBlock
        );
        assert!(!settings.csv_path.exists());
        assert!(!settings.output_path.exists());
    }
}
