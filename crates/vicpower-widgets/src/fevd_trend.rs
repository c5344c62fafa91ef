#![forbid(unsafe_code)]

//! Small multiples of FEVD shares over time, one panel per driver.

use vicpower_core::section::SectionId;
use vicpower_data::results::{Driver, FevdTrendPoint, YearMonth};

use crate::chart::{ChartFrame, LinearScale, Margins, line_path, year_ticks};
use crate::context::RenderContext;
use crate::format::{fixed, percent};
use crate::markup::{Markup, num};
use crate::replay::ReplayFigure;
use crate::rolling_beta::PHASES;
use crate::{Widget, palette, placeholder};

pub const PLACEHOLDER: &str =
    "Add `public/data/fevd_trend.json` with monthly FEVD shares to see the trend over time.";

const PANEL_HEIGHT: f64 = 140.0;
const MARGINS: Margins = Margins::new(8.0, 16.0, 20.0, 40.0);

/// Trend strip.
#[derive(Debug, Clone, Copy)]
pub struct FevdTrendStrip<'a> {
    data: &'a [FevdTrendPoint],
    section: Option<&'a SectionId>,
}

impl<'a> FevdTrendStrip<'a> {
    pub fn new(data: &'a [FevdTrendPoint]) -> Self {
        Self {
            data,
            section: None,
        }
    }

    /// Replay when `section` activates.
    #[must_use]
    pub fn bound_to(mut self, section: &'a SectionId) -> Self {
        self.section = Some(section);
        self
    }

    /// `Range: lo–hi%` for one driver, or `None` without finite values.
    pub fn range_label(&self, driver: Driver) -> Option<String> {
        let (lo, hi) = LinearScale::extent(self.data.iter().map(|p| p.shares.get(driver)))?;
        Some(format!(
            "Range: {}–{}%",
            fixed(lo * 100.0, 1)?,
            fixed(hi * 100.0, 1)?
        ))
    }

    fn render_panel(
        &self,
        driver: Driver,
        points: &[(YearMonth, &FevdTrendPoint)],
        out: &mut Markup,
    ) {
        let (Some(first), Some(last)) = (
            points.iter().map(|(m, _)| *m).min(),
            points.iter().map(|(m, _)| *m).max(),
        ) else {
            return;
        };
        let color = palette::driver(driver);
        out.open("div", &[("class", "trend-panel"), ("data-driver", driver.key())]);
        out.open("div", &[("class", "trend-panel__head")]);
        let swatch = format!("background-color: {color}");
        out.element("span", &[("class", "legend-swatch"), ("style", swatch.as_str())], "");
        out.element("span", &[("class", "trend-panel__label")], driver.label());
        if let Some(range) = self.range_label(driver) {
            out.element("span", &[("class", "trend-panel__range")], &range);
        }
        out.close("div");

        let frame = ChartFrame::new(ChartFrame::WIDTH, PANEL_HEIGHT, MARGINS);
        let axis = frame.month_axis(first, last);
        let y = frame.y_scale((0.0, 1.0));
        frame.open(out, "chart-svg", driver.label());
        for phase in &PHASES {
            let Some(start) = YearMonth::parse(phase.start) else {
                continue;
            };
            let end = phase.end.and_then(YearMonth::parse).unwrap_or(last);
            if start > last || end < first {
                continue;
            }
            frame.shade(out, &axis, start.max(first), end.min(last), palette::PHASE_SHADE, 0.25);
        }
        frame.y_axis(out, &y, &[0.0, 0.5, 1.0], |t| percent(t, 0));
        frame.x_axis_years(
            out,
            &axis,
            &year_ticks(points.iter().map(|(_, p)| p.period.as_str())),
        );
        let line: Vec<(f64, f64)> = points
            .iter()
            .filter(|(_, p)| p.shares.get(driver).is_finite())
            .map(|(m, p)| (axis.x(*m), y.apply(p.shares.get(driver))))
            .collect();
        let d = line_path(&line);
        out.void(
            "path",
            &[
                ("class", "trend-line"),
                ("d", d.as_str()),
                ("fill", "none"),
                ("stroke", color),
                ("stroke-width", "2"),
            ],
        );
        let last_value = points
            .last()
            .and_then(|(m, p)| percent(p.shares.get(driver), 1).map(|v| (*m, *p, v)));
        if let Some((m, p, value)) = last_value {
            out.open(
                "circle",
                &[
                    ("class", "trend-last"),
                    ("cx", num(axis.x(m)).as_str()),
                    ("cy", num(y.apply(p.shares.get(driver))).as_str()),
                    ("r", "3"),
                    ("fill", color),
                ],
            );
            out.element("title", &[], &format!("{}: {value}", m.short_label()));
            out.close("circle");
        }
        frame.close(out);
        out.close("div");
    }
}

impl Widget for FevdTrendStrip<'_> {
    fn render(&self, ctx: &RenderContext<'_>, out: &mut Markup) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("chart", kind = "fevd_trend", points = self.data.len()).entered();

        let mut points: Vec<(YearMonth, &FevdTrendPoint)> = self
            .data
            .iter()
            .filter_map(|p| YearMonth::parse(&p.period).map(|m| (m, p)))
            .collect();
        if points.is_empty() {
            placeholder(out, PLACEHOLDER);
            return;
        }
        points.sort_by_key(|(m, _)| *m);

        let figure = ReplayFigure::new("fevd-trend", self.section);
        figure.open(ctx, out);
        out.open("ul", &[("class", "chart-legend")]);
        for driver in Driver::TREND_ORDER {
            let style = format!("background-color: {}", palette::driver(driver));
            out.open("li", &[]);
            out.element("span", &[("class", "legend-swatch"), ("style", style.as_str())], "");
            out.text(driver.label());
            out.close("li");
        }
        out.close("ul");
        for driver in Driver::TREND_ORDER {
            self.render_panel(driver, &points, out);
        }
        figure.close(out);
        out.newline();
    }

    fn is_essential(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_to_string;
    use vicpower_data::results::DriverShares;

    fn point(period: &str, gas: f64, own: f64) -> FevdTrendPoint {
        FevdTrendPoint {
            period: period.to_string(),
            shares: DriverShares {
                gas,
                renewables: 0.1,
                imports: 0.05,
                demand: 0.05,
                own,
            },
        }
    }

    #[test]
    fn empty_series_shows_placeholder() {
        let html = render_to_string(&FevdTrendStrip::new(&[]), &RenderContext::new());
        assert!(html.contains("fevd_trend.json"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn one_panel_per_driver_in_trend_order() {
        let data = vec![point("2019-01", 0.12, 0.68), point("2024-01", 0.02, 0.78)];
        let html = render_to_string(&FevdTrendStrip::new(&data), &RenderContext::new());
        assert_eq!(html.matches("class=\"trend-panel\"").count(), 5);
        let own = html.find("data-driver=\"Own\"").unwrap();
        let gas = html.find("data-driver=\"Gas\"").unwrap();
        assert!(own < gas);
    }

    #[test]
    fn range_label_spans_min_and_max() {
        let data = vec![point("2019-01", 0.12, 0.68), point("2024-01", 0.02, 0.78)];
        let strip = FevdTrendStrip::new(&data);
        assert_eq!(strip.range_label(Driver::Gas).as_deref(), Some("Range: 2.0–12.0%"));
        assert_eq!(FevdTrendStrip::new(&[]).range_label(Driver::Gas), None);
    }
}
