use std::path::PathBuf;

use plotters::prelude::*;

use super::{ChartModel, RenderedChart, Rgb, Segment, TempClass};
use crate::ForecastError;

const POINT_RADIUS: i32 = 3;
const LINE_WIDTH: u32 = 2;
/// Hint for how many x-axis labels to ask for (samples / this). Plotters
/// picks the actual spacing.
const HOURS_PER_LABEL: usize = 12;
/// Curve tension between points; 0 draws straight lines.
const TENSION: f64 = 0.4;
/// Sub-steps per smoothed segment.
const CURVE_STEPS: usize = 8;

/// Draws a [`ChartModel`] as an SVG line chart.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self { width: 1200, height: 500 }
    }
}

impl SvgRenderer {
    /// Render into memory. `path` is where the chart will live once it is
    /// placed in a [`super::ChartSlot`].
    pub fn render(
        &self,
        model: &ChartModel,
        path: Option<PathBuf>,
    ) -> Result<RenderedChart, ForecastError> {
        let mut svg = String::new();
        self.draw(model, &mut svg).map_err(|e| ForecastError::Render(e.to_string()))?;

        tracing::debug!(points = model.len(), bytes = svg.len(), "chart rendered");
        Ok(RenderedChart::new(svg, path, model.len()))
    }

    fn draw(
        &self,
        model: &ChartModel,
        out: &mut String,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let root = SVGBackend::with_string(out, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let x_max = model.len().saturating_sub(1).max(1) as f64;
        let (lo, hi) = model.range().unwrap_or((0.0, 1.0));
        let pad = if (hi - lo).abs() > 1e-6 { (hi - lo) * 0.1 } else { 1.0 };

        let mut chart = ChartBuilder::on(&root)
            .caption(&model.title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(56)
            .build_cartesian_2d(0f64..x_max, (lo - pad)..(hi + pad))?;

        let label_at = |x: &f64| {
            let idx = x.round();
            if (x - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            model.points.get(idx as usize).map(|p| p.label.clone()).unwrap_or_default()
        };

        chart
            .configure_mesh()
            .x_labels((model.len() / HOURS_PER_LABEL).max(2))
            .x_label_formatter(&label_at)
            .y_desc(model.series_label.as_str())
            .light_line_style(BLACK.mix(0.08))
            .draw()?;

        chart.draw_series(model.segments().map(|seg| {
            PathElement::new(
                smooth_segment(model, seg, TENSION, CURVE_STEPS),
                to_color(seg.class).stroke_width(LINE_WIDTH),
            )
        }))?;

        chart
            .draw_series(model.points.iter().enumerate().map(|(i, p)| {
                Circle::new((i as f64, p.temperature), POINT_RADIUS, to_color(p.class).filled())
            }))?
            .label(model.series_label.as_str())
            .legend(|(x, y)| {
                PathElement::new(
                    vec![(x, y), (x + 20, y)],
                    to_color(TempClass::Neutral).stroke_width(LINE_WIDTH),
                )
            });

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.3))
            .draw()?;

        root.present()?;
        Ok(())
    }
}

/// Points along a cardinal-spline curve from `seg.from` to `seg.to`.
///
/// Control points follow the neighbours on either side; at the ends of the
/// series the end point stands in for its missing neighbour.
fn smooth_segment(model: &ChartModel, seg: Segment, tension: f64, steps: usize) -> Vec<(f64, f64)> {
    let last = model.points.len().saturating_sub(1);
    let at = |i: usize| (i as f64, model.points[i].temperature);

    let p0 = at(seg.from.saturating_sub(1));
    let p1 = at(seg.from);
    let p2 = at(seg.to);
    let p3 = at((seg.to + 1).min(last));

    let k = tension / 2.0;
    let c1 = (p1.0 + k * (p2.0 - p0.0), p1.1 + k * (p2.1 - p0.1));
    let c2 = (p2.0 - k * (p3.0 - p1.0), p2.1 - k * (p3.1 - p1.1));

    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let u = 1.0 - t;
            let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
            (
                a * p1.0 + b * c1.0 + c * c2.0 + d * p2.0,
                a * p1.1 + b * c1.1 + c * c2.1 + d * p2.1,
            )
        })
        .collect()
}

fn to_color(class: TempClass) -> RGBColor {
    let Rgb(r, g, b) = class.color();
    RGBColor(r, g, b)
}
