//! Plotters-powered chart widget for the dashboard pages.
//!
//! Plotters output is drawn into the Ratatui buffer with
//! `plotters-ratatui-backend`. All series and bounds are prepared by the
//! caller; `render()` only draws.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::analytics::BoxSummary;

/// One vertical bar spanning `[x0, x1]` from zero to `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x0: f64,
    pub x1: f64,
    pub height: f64,
}

/// What to draw.
pub enum ChartSeries<'a> {
    /// Histogram bins or per-category counts.
    Bars(&'a [Bar]),
    /// Points split by loan status.
    Scatter {
        repaid: &'a [(f64, f64)],
        defaulted: &'a [(f64, f64)],
    },
    /// One box per category, centred on its index.
    Boxes(&'a [BoxSummary]),
}

pub struct RiskPlottersChart<'a> {
    pub series: ChartSeries<'a>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Names for index-positioned x values. Empty for a numeric x axis.
    pub categories: &'a [String],
    pub fmt_y: fn(f64) -> String,
}

const BOX_HALF_WIDTH: f64 = 0.3;

impl<'a> Widget for RiskPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| x_tick(self.categories, *v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let bar_color = RGBColor(0, 255, 255); // cyan
            let repaid_color = RGBColor(0, 255, 0); // green
            let default_color = RGBColor(255, 0, 0); // red
            let box_color = RGBColor(255, 215, 0); // gold

            match &self.series {
                ChartSeries::Bars(bars) => {
                    let style = bar_color.stroke_width(1);
                    chart.draw_series(bars.iter().map(|b| {
                        PathElement::new(
                            vec![(b.x0, 0.0), (b.x0, b.height), (b.x1, b.height), (b.x1, 0.0)],
                            style,
                        )
                    }))?;
                }
                ChartSeries::Scatter { repaid, defaulted } => {
                    // `Pixel` rather than `Circle`: the backend scales circle
                    // radii in canvas units, which blows them up.
                    chart.draw_series(repaid.iter().map(|&(x, y)| Pixel::new((x, y), repaid_color)))?;
                    chart.draw_series(
                        defaulted
                            .iter()
                            .map(|&(x, y)| Pixel::new((x, y), default_color)),
                    )?;
                }
                ChartSeries::Boxes(boxes) => {
                    let style = box_color.stroke_width(1);
                    chart.draw_series(
                        boxes
                            .iter()
                            .enumerate()
                            .flat_map(|(i, s)| box_paths(i as f64, s))
                            .map(|points| PathElement::new(points, style)),
                    )?;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Outline of one box plot: whiskers, the q1..q3 box and the median.
fn box_paths(x: f64, s: &BoxSummary) -> Vec<Vec<(f64, f64)>> {
    let (l, r) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
    vec![
        vec![(x, s.min), (x, s.q1)],
        vec![(x, s.q3), (x, s.max)],
        vec![(l, s.q1), (r, s.q1), (r, s.q3), (l, s.q3), (l, s.q1)],
        vec![(l, s.median), (r, s.median)],
    ]
}

/// Tick label for `v`: the category name at integer positions, or a number.
pub fn x_tick(categories: &[String], v: f64) -> String {
    if categories.is_empty() {
        return compact_number(v);
    }
    let idx = v.round();
    if (v - idx).abs() > 0.01 || idx < 0.0 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

/// `12.5k` / `1.2M` style numbers for narrow axes.
pub fn compact_number(v: f64) -> String {
    let a = v.abs();
    if a >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if a >= 1e4 {
        format!("{:.0}k", v / 1e3)
    } else if a >= 100.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}
