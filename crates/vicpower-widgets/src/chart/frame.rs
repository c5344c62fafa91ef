#![forbid(unsafe_code)]

//! SVG plot frame: viewBox, margins, axes, and path strings.

use std::fmt::Write as _;

use vicpower_core::geometry::Rect;
use vicpower_data::results::YearMonth;

use crate::chart::scale::{LinearScale, MonthAxis};
use crate::markup::{Markup, num};

/// Light grid and axis stroke.
pub const GRID_STROKE: &str = "#e5e7eb";
/// Tick label fill.
pub const TICK_FILL: &str = "#4b5563";

/// Space around the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Fixed-size SVG canvas with an inner plot rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    width: f64,
    height: f64,
    margins: Margins,
}

impl ChartFrame {
    /// Default viewBox width; the SVG scales to its container.
    pub const WIDTH: f64 = 720.0;

    pub fn new(width: f64, height: f64, margins: Margins) -> Self {
        Self {
            width,
            height,
            margins,
        }
    }

    /// The area inside the margins.
    pub fn plot(&self) -> Rect {
        Rect::new(
            self.margins.left,
            self.margins.top,
            (self.width - self.margins.left - self.margins.right).max(0.0),
            (self.height - self.margins.top - self.margins.bottom).max(0.0),
        )
    }

    /// Month axis across the plot.
    pub fn month_axis(&self, first: YearMonth, last: YearMonth) -> MonthAxis {
        let plot = self.plot();
        MonthAxis::new(first, last, plot.x, plot.right())
    }

    /// Vertical scale over `domain`, bottom to top.
    pub fn y_scale(&self, domain: (f64, f64)) -> LinearScale {
        let plot = self.plot();
        LinearScale::new(domain, (plot.bottom(), plot.y))
    }

    /// `<svg>` start tag.
    pub fn open(&self, out: &mut Markup, class: &str, label: &str) {
        let view_box = format!("0 0 {} {}", num(self.width), num(self.height));
        out.open(
            "svg",
            &[
                ("class", class),
                ("viewBox", view_box.as_str()),
                ("role", "img"),
                ("aria-label", label),
                ("xmlns", "http://www.w3.org/2000/svg"),
            ],
        );
    }

    /// `</svg>`
    pub fn close(&self, out: &mut Markup) {
        out.close("svg");
    }

    /// Horizontal grid lines at each tick plus left-hand tick labels.
    pub fn y_axis(
        &self,
        out: &mut Markup,
        scale: &LinearScale,
        ticks: &[f64],
        label_of: impl Fn(f64) -> Option<String>,
    ) {
        let plot = self.plot();
        out.open("g", &[("class", "axis axis--y")]);
        for &t in ticks {
            let y = num(scale.apply(t));
            out.void(
                "line",
                &[
                    ("x1", num(plot.x).as_str()),
                    ("x2", num(plot.right()).as_str()),
                    ("y1", y.as_str()),
                    ("y2", y.as_str()),
                    ("stroke", GRID_STROKE),
                    ("stroke-dasharray", "3 3"),
                ],
            );
            if let Some(label) = label_of(t) {
                out.element(
                    "text",
                    &[
                        ("x", num(plot.x - 6.0).as_str()),
                        ("y", num(scale.apply(t) + 3.0).as_str()),
                        ("text-anchor", "end"),
                        ("font-size", "10"),
                        ("fill", TICK_FILL),
                    ],
                    &label,
                );
            }
        }
        out.close("g");
    }

    /// Baseline with one year label per tick.
    pub fn x_axis_years(&self, out: &mut Markup, axis: &MonthAxis, ticks: &[YearMonth]) {
        let plot = self.plot();
        let base = num(plot.bottom());
        out.open("g", &[("class", "axis axis--x")]);
        out.void(
            "line",
            &[
                ("x1", num(plot.x).as_str()),
                ("x2", num(plot.right()).as_str()),
                ("y1", base.as_str()),
                ("y2", base.as_str()),
                ("stroke", GRID_STROKE),
            ],
        );
        for tick in ticks {
            out.element(
                "text",
                &[
                    ("x", num(axis.x(*tick)).as_str()),
                    ("y", num(plot.bottom() + 14.0).as_str()),
                    ("text-anchor", "middle"),
                    ("font-size", "10"),
                    ("fill", TICK_FILL),
                ],
                &tick.year.to_string(),
            );
        }
        out.close("g");
    }

    /// Axis title.
    pub fn axis_title(&self, out: &mut Markup, text: &str, vertical: bool) {
        let plot = self.plot();
        if vertical {
            let x = num(12.0);
            let y = num(plot.y + plot.height / 2.0);
            let transform = format!("rotate(-90 {x} {y})");
            out.element(
                "text",
                &[
                    ("class", "axis-title"),
                    ("x", x.as_str()),
                    ("y", y.as_str()),
                    ("transform", transform.as_str()),
                    ("text-anchor", "middle"),
                    ("font-size", "10"),
                ],
                text,
            );
        } else {
            out.element(
                "text",
                &[
                    ("class", "axis-title"),
                    ("x", num(plot.x + plot.width / 2.0).as_str()),
                    ("y", num(self.height - 2.0).as_str()),
                    ("text-anchor", "middle"),
                    ("font-size", "10"),
                ],
                text,
            );
        }
    }

    /// Shaded span between two months.
    pub fn shade(
        &self,
        out: &mut Markup,
        axis: &MonthAxis,
        from: YearMonth,
        to: YearMonth,
        fill: &str,
        opacity: f64,
    ) {
        let plot = self.plot();
        let (x0, x1) = (axis.x(from), axis.x(to));
        out.void(
            "rect",
            &[
                ("class", "chart-shade"),
                ("x", num(x0.min(x1)).as_str()),
                ("y", num(plot.y).as_str()),
                ("width", num((x1 - x0).abs()).as_str()),
                ("height", num(plot.height).as_str()),
                ("fill", fill),
                ("fill-opacity", num(opacity).as_str()),
            ],
        );
    }

    /// Vertical marker at `month`.
    pub fn marker(
        &self,
        out: &mut Markup,
        axis: &MonthAxis,
        month: YearMonth,
        stroke: &str,
        dash: Option<&str>,
    ) {
        let plot = self.plot();
        let x = num(axis.x(month));
        let (y1, y2) = (num(plot.y), num(plot.bottom()));
        let mut attrs: Vec<(&str, &str)> = vec![
            ("class", "chart-marker"),
            ("x1", x.as_str()),
            ("x2", x.as_str()),
            ("y1", y1.as_str()),
            ("y2", y2.as_str()),
            ("stroke", stroke),
        ];
        if let Some(dash) = dash {
            attrs.push(("stroke-dasharray", dash));
        }
        out.void("line", &attrs);
    }
}

/// `M x y L x y ...` through the points; empty for no points.
pub fn line_path(points: &[(f64, f64)]) -> String {
    let mut d = String::with_capacity(points.len() * 16);
    for (i, (x, y)) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{cmd}{} {}", num(*x), num(*y));
    }
    d
}

/// Closed outline between an upper and a lower edge sharing x positions.
pub fn band_path(upper: &[(f64, f64)], lower: &[(f64, f64)]) -> String {
    if upper.is_empty() || lower.is_empty() {
        return String::new();
    }
    let mut d = line_path(upper);
    for (x, y) in lower.iter().rev() {
        let _ = write!(d, "L{} {}", num(*x), num(*y));
    }
    d.push('Z');
    d
}

/// Area from a line down to `baseline`.
pub fn area_path(points: &[(f64, f64)], baseline: f64) -> String {
    let floor: Vec<(f64, f64)> = points.iter().map(|(x, _)| (*x, baseline)).collect();
    band_path(points, &floor)
}
