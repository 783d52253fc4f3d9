use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::chart::{Chart, Marker, SeriesColor};
use crate::config::ChartStyle;
use crate::error::{ReportError, Result};

/// Writes one chart to one file.
///
/// Implementations must be shareable across threads: artifacts are rendered
/// in parallel, each into its own file.
pub trait ChartRenderer: Sync {
    fn render(&self, chart: &Chart, path: &Path) -> Result<()>;
}

/// PNG renderer built on plotters' bitmap backend.
#[derive(Clone, Debug, Default)]
pub struct PlottersRenderer {
    style: ChartStyle,
}

type DrawResult = std::result::Result<(), Box<dyn Error>>;

// Without a font backend plotters can measure text but not rasterize it, so
// captions, axes and legends are only drawn with the `ttf` feature.
const DRAW_TEXT: bool = cfg!(feature = "ttf");

impl PlottersRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    fn color(&self, color: SeriesColor) -> RGBColor {
        match color {
            SeriesColor::Palette(idx) => self.style.series_color(idx),
            SeriesColor::Sorted => self.style.sorted_color,
            SeriesColor::Unsorted => self.style.unsorted_color,
        }
    }

    fn draw(&self, chart: &Chart, path: &Path) -> DrawResult {
        let style = &self.style;
        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE)?;

        // Log charts are drawn on a linear axis over log10 values.
        let log_y = chart.log_y;
        let project = |y: f64| if log_y { y.log10() } else { y };

        let (x_lo, x_hi) = padded_range(chart.x_values());
        let (y_lo, y_hi) = padded_range(chart.y_values().map(project));

        let mut builder = ChartBuilder::on(&root);
        builder.margin(20);
        if DRAW_TEXT {
            builder
                .caption(&chart.title, ("sans-serif", style.title_font_size))
                .x_label_area_size(60)
                .y_label_area_size(100);
        }
        let mut ctx = builder.build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

        if DRAW_TEXT {
            let x_fmt = |x: &f64| format_tick(*x);
            let y_fmt = |y: &f64| format_tick(if log_y { 10f64.powf(*y) } else { *y });
            ctx.configure_mesh()
                .x_desc(chart.x_label.as_str())
                .y_desc(chart.y_label.as_str())
                .x_label_formatter(&x_fmt)
                .y_label_formatter(&y_fmt)
                .label_style(("sans-serif", style.label_font_size))
                .axis_desc_style(("sans-serif", style.label_font_size))
                .draw()?;
        }

        for series in &chart.series {
            let color = self.color(series.color);
            let line = color.stroke_width(style.line_width);
            let points: Vec<(f64, f64)> = series
                .points
                .iter()
                .map(|&(x, y)| (x, project(y)))
                .collect();

            ctx.draw_series(LineSeries::new(points.clone(), line))?
                .label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));

            let size = style.marker_size;
            match series.marker {
                Marker::Circle => {
                    ctx.draw_series(points.iter().map(|&p| Circle::new(p, size, color.filled())))?;
                }
                Marker::Cross => {
                    ctx.draw_series(
                        points
                            .iter()
                            .map(|&p| Cross::new(p, size, color.stroke_width(style.line_width))),
                    )?;
                }
            }
        }

        if let Some(reference) = &chart.reference {
            let y = project(reference.y);
            let line = style.reference_color.stroke_width(1);
            ctx.draw_series(LineSeries::new(vec![(x_lo, y), (x_hi, y)], line))?
                .label(reference.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));
        }

        if DRAW_TEXT && (!chart.series.is_empty() || chart.reference.is_some()) {
            ctx.configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font(("sans-serif", style.label_font_size))
                .draw()?;
        }

        root.present()?;
        Ok(())
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, chart: &Chart, path: &Path) -> Result<()> {
        self.draw(chart, path).map_err(|e| ReportError::Render {
            artifact: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Axis range covering `values` with a 5% margin; never empty.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span < f64::EPSILON * hi.abs().max(1.0) {
        return (lo - 1.0, hi + 1.0);
    }
    (lo - span * 0.05, hi + span * 0.05)
}

fn format_tick(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}k", v / 1e3)
    } else if abs >= 10.0 || abs == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}
