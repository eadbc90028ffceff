use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{ChartData, ChartType, RenderedChart};

/// Upper bound on how many x-axis labels are drawn
pub const MAX_X_LABELS: usize = 10;

const BAR_GROUP_PADDING: f64 = 0.1;
const BAR_WIDTH: f64 = 0.2;

const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(255, 127, 14),
];

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("Failed to create chart directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("Failed to write chart file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

/// Where rendered charts go and how big they are
#[derive(Debug, Clone)]
pub struct ChartOutput {
    pub dir: PathBuf,
    /// Public URL prefix that maps onto `dir`
    pub url_prefix: String,
    pub width: u32,
    pub height: u32,
    /// Number of chart files kept on disk; 0 keeps everything
    pub retention: usize,
}

/// Stride between drawn labels so that roughly `MAX_X_LABELS` remain
pub fn label_stride(count: usize) -> usize {
    (count / MAX_X_LABELS).max(1)
}

/// Down-sampled x-axis labels as (point index, label) pairs
pub fn axis_labels(labels: &[String]) -> Vec<(usize, String)> {
    let stride = label_stride(labels.len());
    labels
        .iter()
        .enumerate()
        .step_by(stride)
        .map(|(i, label)| (i, label.clone()))
        .collect()
}

/// Y range over every plotted value with 10% padding
fn value_range(data: &ChartData) -> (f64, f64) {
    let values = data.series().into_iter().flat_map(|(_, values)| values.iter().copied());
    let (min_price, max_price) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    let price_range = (max_price - min_price).max(1e-8); // Avoid a zero-height axis
    let padding = price_range * 0.1;
    ((min_price - padding).max(0.0), max_price + padding)
}

/// Draw the chart into an SVG document
pub fn render_svg(
    chart_type: ChartType,
    symbol: &str,
    data: &ChartData,
    width: u32,
    height: u32,
) -> Result<String, ChartError> {
    if data.is_empty() {
        return Err(ChartError::Draw("no data points to plot".to_string()));
    }

    let mut svg = String::new();

    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ChartError::Draw(format!("failed to fill canvas: {}", e)))?;

        let count = data.len();
        let (y_min, y_max) = value_range(data);
        let axis = axis_labels(&data.labels);

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("{} Stock Data", symbol), ("sans-serif", 30).into_font())
            .margin(15)
            .x_label_area_size(90)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..count as f64, y_min..y_max)
            .map_err(|e| ChartError::Draw(format!("failed to build chart: {}", e)))?;

        // Date labels are drawn by hand below so only the down-sampled set shows
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .y_desc("Price")
            .draw()
            .map_err(|e| ChartError::Draw(format!("failed to draw mesh: {}", e)))?;

        let label_style = TextStyle::from(("sans-serif", 12).into_font())
            .transform(FontTransform::Rotate90);
        for (index, label) in &axis {
            // Points sit in the middle of their unit-wide slot
            let (x, y) = chart.backend_coord(&(*index as f64 + 0.5, y_min));
            root.draw(&Text::new(label.clone(), (x, y + 8), label_style.clone()))
                .map_err(|e| ChartError::Draw(format!("failed to draw label {}: {}", label, e)))?;
        }

        for (idx, (name, values)) in data.series().into_iter().enumerate() {
            let color = SERIES_COLORS[idx];

            match chart_type {
                ChartType::Bar => {
                    let offset = BAR_GROUP_PADDING + idx as f64 * BAR_WIDTH;
                    chart
                        .draw_series(values.iter().enumerate().map(|(i, v)| {
                            let left = i as f64 + offset;
                            Rectangle::new([(left, *v), (left + BAR_WIDTH, y_min)], color.filled())
                        }))
                        .map_err(|e| ChartError::Draw(format!("failed to draw {} bars: {}", name, e)))?
                        .label(name)
                        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
                }
                ChartType::Line => {
                    chart
                        .draw_series(LineSeries::new(
                            values.iter().enumerate().map(|(i, v)| (i as f64 + 0.5, *v)),
                            color.stroke_width(2),
                        ))
                        .map_err(|e| ChartError::Draw(format!("failed to draw {} line: {}", name, e)))?
                        .label(name)
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

                    chart
                        .draw_series(
                            values
                                .iter()
                                .enumerate()
                                .map(|(i, v)| Circle::new((i as f64 + 0.5, *v), 3, color.filled())),
                        )
                        .map_err(|e| ChartError::Draw(format!("failed to draw {} points: {}", name, e)))?;
                }
            }
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(|e| ChartError::Draw(format!("failed to draw legend: {}", e)))?;

        root.present()
            .map_err(|e| ChartError::Draw(format!("failed to render chart: {}", e)))?;
    }

    Ok(svg)
}

/// Render the chart to a fresh file under `output.dir`
pub fn render(
    chart_type: ChartType,
    symbol: &str,
    data: &ChartData,
    output: &ChartOutput,
) -> Result<RenderedChart, ChartError> {
    let svg = render_svg(chart_type, symbol, data, output.width, output.height)?;

    fs::create_dir_all(&output.dir).map_err(|source| ChartError::CreateDir {
        path: output.dir.clone(),
        source,
    })?;

    let file_name = format!("{}.svg", Uuid::new_v4());
    let path = output.dir.join(&file_name);
    fs::write(&path, svg).map_err(|source| ChartError::Write {
        path: path.clone(),
        source,
    })?;

    debug!("Rendered {} chart for {} ({} points)", chart_type.as_str(), symbol, data.len());

    if output.retention > 0 {
        match prune_charts(&output.dir, output.retention, &path) {
            Ok(0) => {}
            Ok(removed) => debug!("Pruned {} old chart files", removed),
            Err(e) => warn!("Failed to prune chart directory: {}", e),
        }
    }

    Ok(RenderedChart {
        path,
        url: format!("{}/{}", output.url_prefix.trim_end_matches('/'), file_name),
    })
}

/// Delete all but the `keep` most recently modified SVG files in `dir`.
/// `current` always counts as one of the kept files, whatever its mtime.
/// Returns how many files were removed.
pub fn prune_charts(dir: &Path, keep: usize, current: &Path) -> io::Result<usize> {
    let mut charts = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("svg") || path == current {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        charts.push((modified, path));
    }

    let keep_others = keep.saturating_sub(1);
    if charts.len() <= keep_others {
        return Ok(0);
    }

    // Newest first
    charts.sort_by(|a, b| b.0.cmp(&a.0));

    let mut removed = 0;
    for (_, path) in charts.into_iter().skip(keep_others) {
        fs::remove_file(&path)?;
        removed += 1;
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn sample_data(n: usize) -> ChartData {
        let mut data = ChartData::default();
        for i in 0..n {
            let base = 100.0 + i as f64;
            data.labels.push(format!("2024-01-{:02}", i + 1));
            data.open.push(base);
            data.high.push(base + 2.0);
            data.low.push(base - 2.0);
            data.close.push(base + 1.0);
        }
        data
    }

    fn output_in(dir: &Path, retention: usize) -> ChartOutput {
        ChartOutput {
            dir: dir.join("charts"),
            url_prefix: "/static/charts".to_string(),
            width: 800,
            height: 500,
            retention,
        }
    }

    #[test]
    fn test_label_stride() {
        assert_eq!(label_stride(0), 1);
        assert_eq!(label_stride(5), 1);
        assert_eq!(label_stride(10), 1);
        assert_eq!(label_stride(23), 2);
        assert_eq!(label_stride(100), 10);
    }

    #[test]
    fn test_axis_labels_downsample() {
        let data = sample_data(23);
        let axis = axis_labels(&data.labels);
        assert_eq!(axis.len(), 12);
        assert_eq!(axis[0], (0, "2024-01-01".to_string()));
        assert_eq!(axis[11].0, 22);

        let data = sample_data(5);
        assert_eq!(axis_labels(&data.labels).len(), 5);
    }

    #[test]
    fn test_value_range_pads_extremes() {
        let data = sample_data(3);
        let (lo, hi) = value_range(&data);
        assert!(lo < 98.0);
        assert!(hi > 104.0);
    }

    #[test]
    fn test_render_svg_line_and_bar() {
        let data = sample_data(12);

        let line = render_svg(ChartType::Line, "AAPL", &data, 800, 500).unwrap();
        assert!(line.contains("<svg"));
        assert!(line.contains("AAPL Stock Data"));
        assert!(line.contains("Close"));
        assert!(line.contains("2024-01-01"));

        let bar = render_svg(ChartType::Bar, "AAPL", &data, 800, 500).unwrap();
        assert!(bar.contains("<rect"));
        assert!(bar.contains("Open"));
    }

    #[test]
    fn test_render_svg_rejects_empty_data() {
        let result = render_svg(ChartType::Line, "AAPL", &ChartData::default(), 800, 500);
        assert!(matches!(result, Err(ChartError::Draw(_))));
    }

    #[test]
    fn test_render_writes_unique_files() {
        let tmp = tempfile::tempdir().unwrap();
        let output = output_in(tmp.path(), 0);
        let data = sample_data(4);

        let first = render(ChartType::Line, "MSFT", &data, &output).unwrap();
        let second = render(ChartType::Bar, "MSFT", &data, &output).unwrap();

        assert_ne!(first.path, second.path);
        assert!(first.path.exists());
        assert!(second.path.exists());
        assert!(first.url.starts_with("/static/charts/"));
        assert!(first.url.ends_with(".svg"));
    }

    #[test]
    fn test_prune_keeps_newest() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let now = SystemTime::now();

        for i in 0..4u64 {
            let path = dir.join(format!("chart{}.svg", i));
            fs::write(&path, "<svg/>").unwrap();
            let file = fs::File::options().write(true).open(&path).unwrap();
            file.set_modified(now - Duration::from_secs(100 - i * 10)).unwrap();
        }
        fs::write(dir.join("notes.txt"), "keep me").unwrap();

        let removed = prune_charts(dir, 2, &dir.join("chart3.svg")).unwrap();
        assert_eq!(removed, 2);
        assert!(!dir.join("chart0.svg").exists());
        assert!(!dir.join("chart1.svg").exists());
        assert!(dir.join("chart2.svg").exists());
        assert!(dir.join("chart3.svg").exists());
        assert!(dir.join("notes.txt").exists());
    }

    #[test]
    fn test_prune_never_removes_current_chart() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let stamp = SystemTime::now() - Duration::from_secs(60);

        // Same mtime everywhere, so ordering alone cannot pick the new file
        for i in 0..5u64 {
            let path = dir.join(format!("chart{}.svg", i));
            fs::write(&path, "<svg/>").unwrap();
            let file = fs::File::options().write(true).open(&path).unwrap();
            file.set_modified(stamp).unwrap();
        }

        let current = dir.join("chart2.svg");
        let removed = prune_charts(dir, 1, &current).unwrap();
        assert_eq!(removed, 4);
        assert!(current.exists());

        let left = fs::read_dir(dir).unwrap().count();
        assert_eq!(left, 1);
    }

    #[test]
    fn test_render_keeps_new_chart_with_retention_one() {
        let tmp = tempfile::tempdir().unwrap();
        let output = output_in(tmp.path(), 1);
        let data = sample_data(3);

        for _ in 0..3 {
            let chart = render(ChartType::Line, "IBM", &data, &output).unwrap();
            assert!(chart.path.exists());
        }
        assert_eq!(fs::read_dir(&output.dir).unwrap().count(), 1);
    }
}
