//! ASCII plotting for terminal output.
//!
//! Fixed-size character grids, deterministic output (golden tests).
//!
//! Plot elements:
//! - scatter: `.` repaid (`loan_status = 0`), `x` defaulted, `#` both in one cell
//! - bars: `█` repeated in proportion to the largest value

use crate::analytics::ScatterPoint;

const REPAID: char = '.';
const DEFAULTED: char = 'x';
const MIXED: char = '#';

/// Scatter plot of `points`, one character per cell.
pub fn render_scatter(
    points: &[ScatterPoint],
    width: usize,
    height: usize,
    x_label: &str,
    y_label: &str,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some(((x_min, x_max), (y_min, y_max))) = ranges(points) else {
        return format!("Plot: {x_label} vs {y_label} | no data\n");
    };
    let (x_min, x_max) = pad_range(x_min, x_max, 0.02);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for p in points {
        let x = map_x(p.x, x_min, x_max, width);
        let y = map_y(p.y, y_min, y_max, height);
        let mark = if p.label == 1 { DEFAULTED } else { REPAID };
        grid[y][x] = match grid[y][x] {
            ' ' => mark,
            existing if existing == mark => mark,
            _ => MIXED,
        };
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {x_label}=[{x_min:.2}, {x_max:.2}] | {y_label}=[{y_min:.2}, {y_max:.2}] | {REPAID} repaid  {DEFAULTED} default  {MIXED} both\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

/// Horizontal bar for `value` scaled against `max` over `width` cells.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if !(value.is_finite() && max.is_finite()) || max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / max).clamp(0.0, 1.0) * width as f64).round() as usize;
    // Non-zero values always show at least one cell.
    "█".repeat(cells.max(1))
}

fn ranges(points: &[ScatterPoint]) -> Option<((f64, f64), (f64, f64))> {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        x = (x.0.min(p.x), x.1.max(p.x));
        y = (y.0.min(p.y), y.1.max(p.y));
    }
    let finite = x.0.is_finite() && x.1.is_finite() && y.0.is_finite() && y.1.is_finite();
    finite.then_some((x, y))
}

/// Widen by `frac` of the span; a zero span gets a unit window.
fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    if span < 1e-12 {
        return (min - 0.5, max + 0.5);
    }
    let pad = span * frac;
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top (largest y).
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_golden_snapshot_small() {
        let points = [
            ScatterPoint { x: 0.0, y: 0.0, label: 0 },
            ScatterPoint { x: 10.0, y: 10.0, label: 1 },
            ScatterPoint { x: 10.0, y: 10.0, label: 0 },
        ];
        let txt = render_scatter(&points, 10, 5, "x", "y");
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Plot: x=[-0.20, 10.20] | y=[-0.50, 10.50]"));
        assert_eq!(lines[1], "         #");
        assert_eq!(lines[2], "");
        assert_eq!(lines[5], ".");
    }

    #[test]
    fn scatter_without_points_says_so() {
        assert!(render_scatter(&[], 20, 10, "a", "b").contains("no data"));
    }

    #[test]
    fn bars_scale_to_max() {
        assert_eq!(bar(10.0, 10.0, 5).chars().count(), 5);
        assert_eq!(bar(5.0, 10.0, 4).chars().count(), 2);
        assert_eq!(bar(0.01, 10.0, 4).chars().count(), 1);
        assert_eq!(bar(0.0, 10.0, 4), "");
    }
}
