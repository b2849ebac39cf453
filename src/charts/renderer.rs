//! Static Chart Renderer
//! Draws the stacked case panels into a PNG with plotters.
//!
//! Layout, top to bottom, one panel per location:
//! - filled step area of new cases per day
//! - one line per smoothing window
//! - legend in the upper-left corner, faint grid
//!
//! Only the bottom panel carries the x-axis description.

use crate::charts::plotter::{ChartDataError, LocationChartData, PALETTE};
use crate::data::{CasesTable, Location, ProcessorError};
use crate::settings::RunSettings;
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const CAPTION_FONT_SIZE: f64 = 44.0;
const LABEL_FONT_SIZE: f64 = 28.0;
const LINE_WIDTH: u32 = 4;
const BAR_ALPHA: f64 = 0.4;
const GRID_ALPHA: f64 = 0.15;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Location(#[from] ProcessorError),
    #[error(transparent)]
    ChartData(#[from] ChartDataError),
    #[error("Drawing failed: {0}")]
    Drawing(String),
}

/// Room below the plot for x tick labels; zero for panels above the bottom one.
fn x_label_area_size(x_desc: Option<&str>) -> u32 {
    if x_desc.is_some() {
        80
    } else {
        0
    }
}

fn blank_label(_: &f64) -> String {
    String::new()
}

fn drawing_error<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}

/// Renders the case panels to an image file.
pub struct CasesChartRenderer;

impl CasesChartRenderer {
    /// Resolve every configured location and build its panel data.
    ///
    /// All locations are validated before anything is drawn.
    pub fn prepare(
        table: &CasesTable,
        settings: &RunSettings,
    ) -> Result<Vec<LocationChartData>, RenderError> {
        let locations = Location::resolve_all(&settings.locations)?;

        locations
            .iter()
            .map(|location| {
                info!("Plotting {}...", location);
                LocationChartData::build(table, location, &settings.lags).map_err(RenderError::from)
            })
            .collect()
    }

    /// Render one panel per configured location and write the PNG to
    /// `settings.output_path`, replacing any existing file.
    pub fn render_figure(table: &CasesTable, settings: &RunSettings) -> Result<(), RenderError> {
        let panels = Self::prepare(table, settings)?;
        let x_desc = format!(
            "days relative to {}",
            table.last_date_label().unwrap_or("latest date")
        );

        Self::render_panels(&panels, &settings.output_path, settings, &x_desc)?;
        info!("Saved figure to {:?}", settings.output_path);
        Ok(())
    }

    fn render_panels(
        panels: &[LocationChartData],
        path: &Path,
        settings: &RunSettings,
        x_desc: &str,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, settings.figure_size).into_drawing_area();
        Self::draw_panels(&root, panels, settings.x_range, x_desc)?;
        root.present().map_err(drawing_error)?;
        Ok(())
    }

    /// Stack the panels vertically in `root`. Only the bottom panel gets x tick labels.
    pub fn draw_panels<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        panels: &[LocationChartData],
        x_range: (f64, f64),
        x_desc: &str,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(drawing_error)?;

        let areas = root.split_evenly((panels.len().max(1), 1));
        let last = panels.len().saturating_sub(1);

        for (i, (area, data)) in areas.iter().zip(panels).enumerate() {
            let desc = if i == last { Some(x_desc) } else { None };
            Self::draw_panel(area, data, x_range, desc)?;
        }

        Ok(())
    }

    /// Draw a single location panel into `area`.
    ///
    /// `x_desc` marks the bottom panel; the others share its x axis and draw
    /// no tick labels of their own.
    pub fn draw_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        data: &LocationChartData,
        x_range: (f64, f64),
        x_desc: Option<&str>,
    ) -> Result<(), RenderError> {
        let (x_min, x_max) = x_range;
        let (y_lo, y_hi) = data.visible_value_range(x_min);
        let pad = ((y_hi - y_lo) * 0.05).max(1.0);

        let mut chart = ChartBuilder::on(area)
            .caption(&data.title, ("sans-serif", CAPTION_FONT_SIZE))
            .margin(20)
            .x_label_area_size(x_label_area_size(x_desc))
            .y_label_area_size(120)
            .build_cartesian_2d(x_min..x_max, (y_lo - pad)..(y_hi + pad))
            .map_err(drawing_error)?;

        let mut mesh = chart.configure_mesh();
        mesh.y_desc("Cases")
            .label_style(("sans-serif", LABEL_FONT_SIZE))
            .bold_line_style(BLACK.mix(GRID_ALPHA).stroke_width(1))
            .light_line_style(TRANSPARENT.stroke_width(0));
        match x_desc {
            Some(desc) => {
                mesh.x_desc(desc);
            }
            None => {
                mesh.x_label_formatter(&blank_label).disable_x_axis();
            }
        }
        mesh.draw().map_err(drawing_error)?;

        // Step "pre": each day's value spans the interval ending at that day.
        let bar_color = PALETTE[0].mix(BAR_ALPHA);
        let steps = data
            .days
            .iter()
            .zip(&data.daily)
            .filter(|(x, _)| **x >= x_min)
            .flat_map(|(&x, &y)| [(x - 1.0, y), (x, y)]);

        chart
            .draw_series(AreaSeries::new(steps, 0.0, bar_color.filled()))
            .map_err(drawing_error)?
            .label("Cases per day")
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 8), (x + 30, y + 8)], bar_color.filled())
            });

        for (i, line) in data.smoothed.iter().enumerate() {
            let color = LocationChartData::line_color(i);
            let points = line
                .xs
                .iter()
                .zip(&line.ys)
                .filter(|(x, _)| **x >= x_min)
                .map(|(&x, &y)| (x, y));

            chart
                .draw_series(LineSeries::new(points, color.stroke_width(LINE_WIDTH)))
                .map_err(drawing_error)?
                .label(line.label())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(LINE_WIDTH))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(("sans-serif", LABEL_FONT_SIZE))
            .background_style(WHITE.mix(0.8).filled())
            .border_style(BLACK.mix(0.3).stroke_width(1))
            .draw()
            .map_err(drawing_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    fn small_table() -> CasesTable {
        let csv = "UID,iso2,iso3,code3,FIPS,Admin2,Province_State,Country_Region,Lat,Long_,Combined_Key,\
                   1/1/21,1/2/21,1/3/21,1/4/21,1/5/21,1/6/21,1/7/21,1/8/21\n\
                   1,US,USA,840,8013,Boulder,Colorado,US,40.0,-105.3,a,0,2,3,7,9,9,14,20\n";
        DataLoader::parse_csv(csv.as_bytes().to_vec(), 11).unwrap()
    }

    #[test]
    fn only_bottom_panel_reserves_tick_label_room() {
        assert_eq!(x_label_area_size(None), 0);
        assert!(x_label_area_size(Some("days relative to 1/8/21")) > 0);
    }

    #[test]
    fn draws_stacked_panels_into_buffer() {
        let table = small_table();
        let settings = RunSettings {
            x_range: (-10.0, 1.0),
            ..RunSettings::default()
        };
        let panels = CasesChartRenderer::prepare(&table, &settings).unwrap();

        let (width, height) = (600u32, 900u32);
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            CasesChartRenderer::draw_panels(&root, &panels, settings.x_range, "days relative to 1/8/21")
                .unwrap();
            root.present().unwrap();
        }

        // Background filled white, then bars, lines and text drawn over it.
        let pixels: Vec<&[u8]> = buffer.chunks(3).collect();
        assert!(pixels.iter().any(|p| *p == [255, 255, 255]));
        assert!(pixels.iter().any(|p| *p != [255, 255, 255]));
        for color in [LocationChartData::line_color(0), LocationChartData::line_color(1)] {
            let rgb = [color.0, color.1, color.2];
            assert!(pixels.iter().any(|p| *p == rgb), "no pixel of {rgb:?}");
        }
    }

    #[test]
    fn prepare_builds_one_panel_per_location_in_order() {
        let table = small_table();
        let settings = RunSettings::default();

        let panels = CasesChartRenderer::prepare(&table, &settings).unwrap();

        let titles: Vec<&str> = panels.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["USA cases", "Colorado cases", "Boulder County cases"]
        );
        assert!(panels.iter().all(|p| p.smoothed.len() == 2));
    }

    #[test]
    fn unknown_location_fails_before_drawing() {
        let table = small_table();
        let dir = tempfile::tempdir().unwrap();
        let settings = RunSettings {
            locations: vec!["Colorado".to_string(), "Mars".to_string()],
            output_path: dir.path().join("out.png"),
            ..RunSettings::default()
        };

        let err = CasesChartRenderer::render_figure(&table, &settings).unwrap_err();

        assert!(matches!(
            err,
            RenderError::Location(ProcessorError::UnknownLocation(ref name)) if name == "Mars"
        ));
        assert!(!settings.output_path.exists());
    }
}
