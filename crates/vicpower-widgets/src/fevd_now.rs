#![forbid(unsafe_code)]

//! Headline variance decomposition: stacked bars, legend, and table.
//!
//! Either ordering may be missing. Bars are drawn for the orderings that
//! exist; the table shows `—` in the missing column and in the delta.

use vicpower_core::section::SectionId;
use vicpower_data::results::{Driver, FevdFullRow};

use crate::chart::{ChartFrame, Margins};
use crate::context::RenderContext;
use crate::format::{DASH, inline_segment_label, percent, percent_or_dash, percentage_points};
use crate::markup::{Markup, num};
use crate::replay::ReplayFigure;
use crate::{Widget, palette, placeholder};

pub const PLACEHOLDER: &str = "No FEVD data found.";

const HEIGHT: f64 = 230.0;
const MARGINS: Margins = Margins::new(28.0, 32.0, 8.0, 16.0);
const BAR_HEIGHT: f64 = 32.0;
const BAR_GAP: f64 = 24.0;

/// One table row: a driver and its share under each ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FevdTableRow {
    pub driver: Driver,
    pub demand_first: Option<f64>,
    pub ren_first: Option<f64>,
}

impl FevdTableRow {
    /// Renewables-first minus demand-first, when both exist.
    pub fn delta(&self) -> Option<f64> {
        Some(self.ren_first? - self.demand_first?)
    }

    /// Whether the demand-first cell is the row maximum.
    pub fn demand_first_is_max(&self) -> bool {
        is_max(self.demand_first, self.ren_first)
    }

    /// Whether the renewables-first cell is the row maximum.
    pub fn ren_first_is_max(&self) -> bool {
        is_max(self.ren_first, self.demand_first)
    }
}

fn is_max(value: Option<f64>, other: Option<f64>) -> bool {
    match (value, other) {
        (Some(v), Some(o)) => v >= o,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Bars and table for the two orderings.
#[derive(Debug, Clone, Copy)]
pub struct FevdNowChart<'a> {
    demand_first: Option<&'a FevdFullRow>,
    ren_first: Option<&'a FevdFullRow>,
    section: Option<&'a SectionId>,
}

impl<'a> FevdNowChart<'a> {
    pub fn new(demand_first: Option<&'a FevdFullRow>, ren_first: Option<&'a FevdFullRow>) -> Self {
        Self {
            demand_first,
            ren_first,
            section: None,
        }
    }

    /// Replay when `section` activates.
    #[must_use]
    pub fn bound_to(mut self, section: &'a SectionId) -> Self {
        self.section = Some(section);
        self
    }

    /// Table rows in driver order.
    pub fn rows(&self) -> Vec<FevdTableRow> {
        Driver::ALL
            .into_iter()
            .map(|driver| FevdTableRow {
                driver,
                demand_first: self.demand_first.map(|r| r.shares.get(driver)),
                ren_first: self.ren_first.map(|r| r.shares.get(driver)),
            })
            .collect()
    }

    fn orderings(&self) -> Vec<(&'static str, &'a FevdFullRow)> {
        [("Demand first", self.demand_first), ("Renewables first", self.ren_first)]
            .into_iter()
            .filter_map(|(label, row)| row.map(|r| (label, r)))
            .collect()
    }

    fn render_bars(&self, out: &mut Markup) {
        let frame = ChartFrame::new(ChartFrame::WIDTH, HEIGHT, MARGINS);
        let plot = frame.plot();
        frame.open(out, "chart-svg", "Share of price variance by driver");
        for (i, (label, row)) in self.orderings().into_iter().enumerate() {
            let top = plot.y + i as f64 * (BAR_HEIGHT + BAR_GAP);
            let total = row.shares.total().max(1.0);
            out.element(
                "text",
                &[
                    ("class", "bar-row-label"),
                    ("x", num(plot.x).as_str()),
                    ("y", num(top - 6.0).as_str()),
                    ("font-size", "11"),
                ],
                label,
            );
            let mut x = plot.x;
            for driver in Driver::ALL {
                let value = row.shares.get(driver);
                if !value.is_finite() || value <= 0.0 {
                    continue;
                }
                let width = value / total * plot.width;
                out.open(
                    "rect",
                    &[
                        ("class", "bar-segment"),
                        ("data-driver", driver.key()),
                        ("x", num(x).as_str()),
                        ("y", num(top).as_str()),
                        ("width", num(width).as_str()),
                        ("height", num(BAR_HEIGHT).as_str()),
                        ("fill", palette::driver(driver)),
                    ],
                );
                if let Some(share) = percent(value, 1) {
                    out.element("title", &[], &format!("{label} · {driver}: {share}"));
                }
                out.close("rect");
                let text = inline_segment_label(value, width);
                if !text.is_empty() {
                    out.element(
                        "text",
                        &[
                            ("class", "bar-segment-label"),
                            ("x", num(x + width / 2.0).as_str()),
                            ("y", num(top + BAR_HEIGHT / 2.0 + 4.0).as_str()),
                            ("text-anchor", "middle"),
                            ("font-size", "11"),
                            ("fill", "#ffffff"),
                        ],
                        &text,
                    );
                }
                x += width;
            }
        }
        frame.close(out);
    }

    fn render_legend(out: &mut Markup) {
        out.open("ul", &[("class", "chart-legend")]);
        for driver in Driver::ALL {
            let style = format!("background-color: {}", palette::driver(driver));
            out.open("li", &[]);
            out.element("span", &[("class", "legend-swatch"), ("style", style.as_str())], "");
            out.text(driver.label());
            out.close("li");
        }
        out.close("ul");
    }

    fn render_table(&self, out: &mut Markup) {
        out.open("table", &[("class", "fevd-table")]);
        out.open("thead", &[]).open("tr", &[]);
        for heading in ["Driver", "Demand first", "Renewables first", "Δ (pp)"] {
            out.element("th", &[], heading);
        }
        out.close("tr").close("thead");
        out.open("tbody", &[]);
        for row in self.rows() {
            out.open("tr", &[]);
            out.element("td", &[], row.driver.label());
            share_cell(out, row.demand_first, row.demand_first_is_max());
            share_cell(out, row.ren_first, row.ren_first_is_max());
            let delta = row
                .delta()
                .and_then(percentage_points)
                .unwrap_or_else(|| DASH.to_string());
            out.element("td", &[("class", "num")], &delta);
            out.close("tr");
        }
        out.close("tbody").close("table");
    }
}

fn share_cell(out: &mut Markup, value: Option<f64>, is_max: bool) {
    let text = percent_or_dash(value, 1);
    if is_max {
        out.open("td", &[("class", "num is-max")]);
        out.element("strong", &[], &text);
        out.close("td");
    } else {
        out.element("td", &[("class", "num")], &text);
    }
}

impl Widget for FevdNowChart<'_> {
    fn render(&self, ctx: &RenderContext<'_>, out: &mut Markup) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("chart", kind = "fevd_now").entered();

        if self.demand_first.is_none() && self.ren_first.is_none() {
            placeholder(out, PLACEHOLDER);
            return;
        }
        let figure = ReplayFigure::new("fevd-now", self.section);
        figure.open(ctx, out);
        self.render_bars(out);
        Self::render_legend(out);
        self.render_table(out);
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

    fn row(gas: f64, renewables: f64, imports: f64, demand: f64, own: f64) -> FevdFullRow {
        FevdFullRow {
            horizon: 24.0,
            shares: DriverShares {
                gas,
                renewables,
                imports,
                demand,
                own,
            },
        }
    }

    #[test]
    fn missing_ordering_shows_dashes() {
        let d = row(0.02, 0.15, 0.05, 0.03, 0.75);
        let chart = FevdNowChart::new(Some(&d), None);
        let gas = chart.rows()[0];
        assert_eq!(gas.driver, Driver::Gas);
        assert_eq!(percent_or_dash(gas.demand_first, 1), "2.0%");
        assert_eq!(percent_or_dash(gas.ren_first, 1), DASH);
        assert_eq!(gas.delta(), None);
        assert!(gas.demand_first_is_max());
        assert!(!gas.ren_first_is_max());
    }

    #[test]
    fn delta_and_bold_max() {
        let d = row(0.02, 0.15, 0.05, 0.03, 0.75);
        let r = row(0.03, 0.14, 0.05, 0.03, 0.75);
        let rows = FevdNowChart::new(Some(&d), Some(&r)).rows();
        let gas = rows[0];
        assert_eq!(gas.delta().and_then(percentage_points).as_deref(), Some("1.0 pp"));
        assert!(gas.ren_first_is_max());
        assert!(!gas.demand_first_is_max());
        // ties bold both cells
        let imports = rows[2];
        assert!(imports.demand_first_is_max() && imports.ren_first_is_max());
    }

    #[test]
    fn table_renders_gas_share() {
        let d = row(0.02, 0.15, 0.05, 0.03, 0.75);
        let html = render_to_string(&FevdNowChart::new(Some(&d), None), &RenderContext::new());
        assert!(html.contains("<td>Gas</td><td class=\"num is-max\"><strong>2.0%</strong></td><td class=\"num\">—</td><td class=\"num\">—</td>"));
        assert!(html.contains("<th>Δ (pp)</th>"));
        assert!(html.contains(">Other / own price<"));
    }

    #[test]
    fn small_segments_have_no_inline_label() {
        let d = row(0.02, 0.15, 0.05, 0.03, 0.75);
        let html = render_to_string(&FevdNowChart::new(Some(&d), None), &RenderContext::new());
        // only Renewables (15%) and Own (75%) are wide and large enough
        assert_eq!(html.matches("class=\"bar-segment-label\"").count(), 2);
        assert!(html.contains(">75%</text>"));
        assert!(html.contains(">15.0%</text>"));
        assert_eq!(html.matches("class=\"bar-segment\"").count(), 5);
    }

    #[test]
    fn both_missing_shows_placeholder() {
        let html = render_to_string(&FevdNowChart::new(None, None), &RenderContext::new());
        assert!(html.contains(PLACEHOLDER));
        assert!(!html.contains("<svg"));
    }
}
