//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Coordinates always go through an [`AxisScale`]: points are projected with
//! `forward`, masked points are dropped, and the visible range is clamped with
//! `limit_range` before ticks are placed.
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted curve: `-` line
//! - y ticks: labelled in a left gutter
//! - x ticks: labelled under the axis

use crate::domain::{FitFile, FitResult, ModelKind, ResponseKind, SampleSeries};
use crate::models::evaluate;
use crate::scale::{AxisScale, LogScale, ProbabilityScale, project};

/// Grid dimensions are clamped to these bounds.
pub const MIN_WIDTH: usize = 10;
pub const MAX_WIDTH: usize = 400;
pub const MIN_HEIGHT: usize = 5;
pub const MAX_HEIGHT: usize = 200;

/// Render observed points and a curve through the given axis scales.
pub fn render_ascii_plot(
    observed: &[(f64, f64)],
    curve: &[(f64, f64)],
    x_scale: &dyn AxisScale,
    y_scale: &dyn AxisScale,
    width: usize,
    height: usize,
) -> String {
    let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
    let height = height.clamp(MIN_HEIGHT, MAX_HEIGHT);

    let all: Vec<(f64, f64)> = observed.iter().chain(curve).copied().collect();
    let x_data = data_range(&all, x_scale, y_scale, |p| p.0).unwrap_or((0.1, 10.0));
    let y_data = data_range(&all, x_scale, y_scale, |p| p.1).unwrap_or((1.0, 99.0));

    let (x_lo, x_hi) = x_scale.limit_range(x_data.0, x_data.1);
    let (y_lo, y_hi) = y_scale.limit_range(y_data.0, y_data.1);
    let (cx_min, cx_max) = axis_span(x_scale, x_lo, x_hi);
    let (cy_min, cy_max) = axis_span(y_scale, y_lo, y_hi);
    let (cx_min, cx_max) = pad_range(cx_min, cx_max, 0.02);
    let (cy_min, cy_max) = pad_range(cy_min, cy_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so points can overlay).
    let curve_coords = project(x_scale, y_scale, curve);
    draw_curve(&mut grid, &curve_coords, (cx_min, cx_max), (cy_min, cy_max));

    for (cx, cy) in project(x_scale, y_scale, observed) {
        let x = map_x(cx, cx_min, cx_max, width);
        let y = map_y(cy, cy_min, cy_max, height);
        grid[y][x] = 'o';
    }

    // Left gutter: one label per tick row, first tick wins.
    let mut row_labels: Vec<Option<String>> = vec![None; height];
    for t in y_scale.ticks(y_lo, y_hi) {
        if let Some(c) = y_scale.forward(t) {
            let row = map_y(c, cy_min, cy_max, height);
            if row_labels[row].is_none() {
                row_labels[row] = Some(y_scale.format_tick(t));
            }
        }
    }
    let gutter = row_labels.iter().flatten().map(|l| l.len()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x={} [{}, {}] | y={} [{}, {}]\n",
        x_scale.name(),
        fmt_bound(x_lo),
        fmt_bound(x_hi),
        y_scale.name(),
        fmt_bound(y_lo),
        fmt_bound(y_hi),
    ));

    for (row, label) in grid.into_iter().zip(row_labels) {
        let line = format!(
            "{:>gutter$} |{}",
            label.unwrap_or_default(),
            row.into_iter().collect::<String>()
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&format!("{:>gutter$} +{}\n", "", "-".repeat(width)));
    out.push_str(x_tick_line(x_scale, x_lo, x_hi, (cx_min, cx_max), width, gutter + 2).trim_end());
    out.push('\n');

    out
}

/// Plot a fitted series on the axes that straighten its model.
///
/// - GGS: log size vs log cumulative passing
/// - Rosin-Rammler: log size vs probability-scaled cumulative retained
pub fn render_fit_plot(
    series: &SampleSeries,
    fit: &FitResult,
    probability: &ProbabilityScale,
    width: usize,
    height: usize,
) -> String {
    let response = fit.model.response();
    let observed: Vec<(f64, f64)> = series
        .sizes()
        .iter()
        .copied()
        .zip(series.response(response))
        .collect();

    let stats = series.stats();
    let sizes = log_samples(
        stats.size_min,
        stats.size_max,
        width.clamp(MIN_WIDTH, MAX_WIDTH).saturating_mul(2),
    );
    let ys = evaluate(fit.model, &sizes, &fit.parameters);
    let curve: Vec<(f64, f64)> = sizes.into_iter().zip(ys).collect();

    render_model_view(fit.model, &observed, &curve, probability, width, height)
}

/// Plot a saved fit file, overlaying its observations when present.
pub fn render_fit_file_plot(
    file: &FitFile,
    probability: &ProbabilityScale,
    width: usize,
    height: usize,
) -> String {
    let curve: Vec<(f64, f64)> = file.grid.sizes.iter().copied().zip(file.grid.y.iter().copied()).collect();
    let observed: Vec<(f64, f64)> = file
        .observed
        .as_ref()
        .map(|g| g.sizes.iter().copied().zip(g.y.iter().copied()).collect())
        .unwrap_or_default();

    let model = match file.response {
        ResponseKind::Passing => ModelKind::Ggs,
        ResponseKind::Retained => ModelKind::RosinRammler,
    };
    render_model_view(model, &observed, &curve, probability, width, height)
}

fn render_model_view(
    model: ModelKind,
    observed: &[(f64, f64)],
    curve: &[(f64, f64)],
    probability: &ProbabilityScale,
    width: usize,
    height: usize,
) -> String {
    match model {
        ModelKind::Ggs => render_ascii_plot(observed, curve, &LogScale, &LogScale, width, height),
        ModelKind::RosinRammler => render_ascii_plot(observed, curve, &LogScale, probability, width, height),
    }
}

/// Min/max of one coordinate over points that survive both scales.
fn data_range(
    points: &[(f64, f64)],
    x_scale: &dyn AxisScale,
    y_scale: &dyn AxisScale,
    pick: impl Fn(&(f64, f64)) -> f64,
) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for p in points {
        if x_scale.forward(p.0).is_none() || y_scale.forward(p.1).is_none() {
            continue;
        }
        let v = pick(p);
        lo = lo.min(v);
        hi = hi.max(v);
    }
    (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
}

/// Axis-coordinate span of a data range, ordered low to high.
///
/// The probability transform is decreasing, so the ends can swap.
fn axis_span(scale: &dyn AxisScale, lo: f64, hi: f64) -> (f64, f64) {
    match (scale.forward(lo), scale.forward(hi)) {
        (Some(a), Some(b)) if a <= b => (a, b),
        (Some(a), Some(b)) => (b, a),
        _ => (0.0, 1.0),
    }
}

fn x_tick_line(
    scale: &dyn AxisScale,
    lo: f64,
    hi: f64,
    span: (f64, f64),
    width: usize,
    indent: usize,
) -> String {
    let mut line = vec![' '; indent + width + 8];
    let mut next_free = 0;
    for t in scale.ticks(lo, hi) {
        let Some(c) = scale.forward(t) else { continue };
        let label = scale.format_tick(t);
        let start = indent + map_x(c, span.0, span.1, width);
        if start < next_free || start + label.len() > line.len() {
            continue;
        }
        for (i, ch) in label.chars().enumerate() {
            line[start + i] = ch;
        }
        next_free = start + label.len() + 1;
    }
    line.into_iter().collect()
}

fn log_samples(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let n = n.max(2);
    let (l0, l1) = (lo.ln(), hi.ln());
    (0..n)
        .map(|i| (l0 + (l1 - l0) * i as f64 / (n as f64 - 1.0)).exp())
        .collect()
}

fn fmt_bound(v: f64) -> String {
    format!("{v:.3}")
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(c: f64, c_min: f64, c_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((c - c_min) / (c_max - c_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(c: f64, c_min: f64, c_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((c - c_min) / (c_max - c_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_span: (f64, f64), y_span: (f64, f64)) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(cx, cy) in curve {
        let x = map_x(cx, x_span.0, x_span.1, width);
        let y = map_y(cy, y_span.0, y_span.1, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, '-');
        } else {
            grid[y][x] = '-';
        }
        prev = Some((x, y));
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
