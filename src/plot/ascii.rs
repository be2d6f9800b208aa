//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The diameter axis is logarithmic, like a printed grading chart.
//!
//! Plot elements:
//! - measured points: `o`
//! - smoothed curve: `-` line

/// Fallback diameter range (mm) when the inputs do not define one.
const FALLBACK_D_RANGE: (f64, f64) = (0.01, 100.0);

/// Render measured `(diameter, passing)` points over a smoothed curve.
pub fn render_ascii_plot(points: &[(f64, f64)], curve: &[(f64, f64)], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (d_min, d_max) = diameter_range(points, curve).unwrap_or(FALLBACK_D_RANGE);
    let (y_min, y_max) = passing_range(points, curve);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so points can overlay).
    draw_curve(&mut grid, curve, d_min, d_max, y_min, y_max);

    for &(d, y) in points {
        if !(d > 0.0 && d.is_finite() && y.is_finite()) {
            continue;
        }
        let x = map_x(d, d_min, d_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: diameter=[{d_min:.3}, {d_max:.3}] mm (log) | passing=[{y_min:.2}, {y_max:.2}]%\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn diameter_range(points: &[(f64, f64)], curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_d = f64::INFINITY;
    let mut max_d = f64::NEG_INFINITY;
    for &(d, _) in points.iter().chain(curve.iter()) {
        if d > 0.0 && d.is_finite() {
            min_d = min_d.min(d);
            max_d = max_d.max(d);
        }
    }
    if min_d.is_finite() && max_d.is_finite() && max_d > min_d {
        Some((min_d, max_d))
    } else {
        None
    }
}

/// Passing range always covers `[0, 100]`, widened for any overshoot.
fn passing_range(points: &[(f64, f64)], curve: &[(f64, f64)]) -> (f64, f64) {
    let mut min_y: f64 = 0.0;
    let mut max_y: f64 = 100.0;
    for &(_, y) in points.iter().chain(curve.iter()) {
        if y.is_finite() {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    (min_y, max_y)
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(d: f64, d_min: f64, d_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((d.log10() - d_min.log10()) / (d_max.log10() - d_min.log10())).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], d_min: f64, d_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(d, y) in curve {
        if !(d > 0.0 && d.is_finite() && y.is_finite()) {
            continue;
        }
        let x = map_x(d, d_min, d_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let points = [(1.0, 0.0), (10.0, 100.0)];
        let curve = [(1.0, 0.0), (10.0, 100.0)];

        let txt = render_ascii_plot(&points, &curve, 10, 5);
        let expected = concat!(
            "Plot: diameter=[1.000, 10.000] mm (log) | passing=[-5.00, 105.00]%\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn log_axis_puts_decade_midpoint_in_the_middle() {
        assert_eq!(map_x(10f64.sqrt(), 1.0, 10.0, 11), 5);
    }

    #[test]
    fn overshoot_widens_the_passing_range() {
        let curve = [(0.1, -12.0), (1.0, 50.0), (10.0, 110.0)];
        let txt = render_ascii_plot(&[], &curve, 20, 6);
        assert!(txt.starts_with("Plot: diameter=[0.100, 10.000] mm (log) | passing=[-18.10, 116.10]%"));
    }
}
