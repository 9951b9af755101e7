//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The x axis is the 10-year yield's date labels by position, so weekly and
//! daily series share one axis. Plot elements:
//! - estimated 30-year rate: `=` line
//! - 10-year yield: `-` line
//! - actual 30-year rate: `o` points (overlaid last)

use crate::snapshot::History;

/// Render the dated history as a fixed-size grid.
pub fn render_ascii_plot(history: &History, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let estimated = indexed(&history.estimated_30y);
    let treasury = indexed(&history.treasury_10y);
    let actual: Vec<(f64, f64)> = history
        .actual_30y
        .as_ref()
        .map(|a| {
            a.values()
                .into_iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
                .collect()
        })
        .unwrap_or_default();

    let x_max = (history.dates.len().max(2) - 1) as f64;
    let (y_min, y_max) = y_range(&[&estimated, &treasury, &actual]).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so points can overlay.
    draw_curve(&mut grid, &estimated, x_max, y_min, y_max, '=');
    draw_curve(&mut grid, &treasury, x_max, y_min, y_max, '-');
    for &(x, y) in &actual {
        let col = map_x(x, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    match (history.dates.first(), history.dates.last()) {
        (Some(first), Some(last)) => out.push_str(&format!(
            "Plot: {first}..{last} ({} points) | y=[{y_min:.2}, {y_max:.2}]%\n",
            history.dates.len()
        )),
        _ => out.push_str("Plot: no data\n"),
    }

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str("Legend: - 10Y Treasury  = est. 30Y  o actual 30Y\n");

    out
}

fn indexed(values: &[f64]) -> Vec<(f64, f64)> {
    values.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect()
}

fn y_range(series: &[&[(f64, f64)]]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &(_, y) in series.iter().flat_map(|s| s.iter()) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_max: f64, width: usize) -> usize {
    let u = (x / x_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], points: &[(f64, f64)], x_max: f64, y_min: f64, y_max: f64, ch: char) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points {
        let col = map_x(x, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, ch),
            None => grid[row][col] = ch,
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish). Never overwrites a drawn cell.
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
        let (r, c) = (y0 as usize, x0 as usize);
        if y0 >= 0 && x0 >= 0 && r < grid.len() && c < grid[0].len() && grid[r][c] == ' ' {
            grid[r][c] = ch;
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
