//! Plotters-powered grading chart, written as SVG.
//!
//! The chart mirrors what a lab report shows:
//! - log-scaled sieve opening on x, cumulative passing (%) on y
//! - major and minor grid lines
//! - the smoothed curve as a line and measured sieves as dots
//! - a legend and a title carrying the mass loss

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::AppError;

/// Pixel size of the rendered chart.
pub const CHART_SIZE: (u32, u32) = (900, 650);

/// Everything the chart needs; all bounds are derived from the series.
pub struct GradingChart<'a> {
    pub series_name: &'a str,
    pub mass_loss_percent: f64,
    /// Smoothed `(diameter_mm, passing_percent)`.
    pub curve: &'a [(f64, f64)],
    /// Measured `(diameter_mm, passing_percent)`, pan excluded.
    pub points: &'a [(f64, f64)],
}

impl GradingChart<'_> {
    pub fn title(&self) -> String {
        format!(
            "Grading curve ({}) | mass loss = {:.3}%",
            self.series_name, self.mass_loss_percent
        )
    }

    fn x_bounds(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &(d, _) in self.curve.iter().chain(self.points.iter()) {
            if d > 0.0 && d.is_finite() {
                lo = lo.min(d);
                hi = hi.max(d);
            }
        }
        (lo.is_finite() && hi > lo).then_some((lo / 1.1, hi * 1.1))
    }

    fn y_bounds(&self) -> (f64, f64) {
        let mut lo: f64 = 0.0;
        let mut hi: f64 = 100.0;
        for &(_, y) in self.curve.iter().chain(self.points.iter()) {
            if y.is_finite() {
                lo = lo.min(y);
                hi = hi.max(y);
            }
        }
        let pad = (hi - lo) * 0.03;
        (lo - pad, hi + pad)
    }
}

/// Render the chart to an SVG file.
pub fn write_svg(path: &Path, chart: &GradingChart<'_>) -> Result<(), AppError> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    draw(&root, chart).map_err(|e| AppError::new(2, format!("Failed to draw chart '{}': {e}", path.display())))?;
    log::info!("Wrote chart to {}", path.display());
    Ok(())
}

/// Render the chart to an in-memory SVG document.
pub fn render_svg_string(chart: &GradingChart<'_>) -> Result<String, AppError> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, CHART_SIZE).into_drawing_area();
        draw(&root, chart).map_err(|e| AppError::new(2, format!("Failed to draw chart: {e}")))?;
    }
    Ok(buf)
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &GradingChart<'_>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (x0, x1) = chart.x_bounds().unwrap_or((0.01, 100.0));
    let (y0, y1) = chart.y_bounds();

    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(root)
        .caption(chart.title(), ("sans-serif", 20))
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Left, 55)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d((x0..x1).log_scale(), y0..y1)?;

    ctx.configure_mesh()
        .x_desc("Sieve opening (mm) [log]")
        .y_desc("Cumulative passing (%)")
        .x_label_formatter(&|v| format!("{v}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .bold_line_style(BLACK.mix(0.25))
        .light_line_style(BLACK.mix(0.08))
        .draw()?;

    let curve_color = BLUE;
    let point_color = RED;

    ctx.draw_series(LineSeries::new(chart.curve.iter().copied(), curve_color.stroke_width(2)))?
        .label("Smoothed curve")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], curve_color.stroke_width(2)));

    ctx.draw_series(
        chart
            .points
            .iter()
            .map(move |&(x, y)| Circle::new((x, y), 4, point_color.filled())),
    )?
    .label("Measurements")
    .legend(move |(x, y)| Circle::new((x + 10, y), 4, point_color.filled()));

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_carries_title_and_legend() {
        let curve: Vec<(f64, f64)> = (0..50)
            .map(|i| {
                let d = 0.06 * (5.0f64 / 0.06).powf(i as f64 / 49.0);
                (d, 100.0 * (d.log10() + 1.25) / 1.95)
            })
            .collect();
        let points = [(0.06, 2.0), (0.5, 60.0), (5.0, 100.0)];
        let chart = GradingChart {
            series_name: "Fine soils",
            mass_loss_percent: 0.3604,
            curve: &curve,
            points: &points,
        };

        assert_eq!(chart.title(), "Grading curve (Fine soils) | mass loss = 0.360%");
        let svg = render_svg_string(&chart).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("mass loss = 0.360%"));
        assert!(svg.contains("Smoothed curve"));
        assert!(svg.contains("Measurements"));
    }

    #[test]
    fn bounds_cover_percent_scale_and_overshoot() {
        let curve = [(0.1, -4.0), (1.0, 104.0)];
        let chart = GradingChart {
            series_name: "x",
            mass_loss_percent: 0.0,
            curve: &curve,
            points: &[],
        };
        let (lo, hi) = chart.y_bounds();
        assert!(lo < -4.0 && hi > 104.0);
        let (x0, x1) = chart.x_bounds().unwrap();
        assert!(x0 < 0.1 && x1 > 1.0);
    }
}
