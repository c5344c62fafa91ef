#![forbid(unsafe_code)]

//! Renewable share of generation as an area chart.

use vicpower_core::section::SectionId;
use vicpower_data::results::{RenSharePoint, YearMonth};

use crate::chart::{ChartFrame, Margins, area_path, line_path, year_ticks};
use crate::context::RenderContext;
use crate::format::percent;
use crate::markup::{Markup, num};
use crate::replay::ReplayFigure;
use crate::{Widget, palette, placeholder};

pub const PLACEHOLDER: &str = "No renewables share data found.";

const HEIGHT: f64 = 360.0;
const MARGINS: Margins = Margins::new(12.0, 18.0, 36.0, 48.0);

/// Monthly renewable share, 0–100%.
#[derive(Debug, Clone, Copy)]
pub struct RenShareChart<'a> {
    data: &'a [RenSharePoint],
    section: Option<&'a SectionId>,
}

impl<'a> RenShareChart<'a> {
    pub fn new(data: &'a [RenSharePoint]) -> Self {
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
}

impl Widget for RenShareChart<'_> {
    fn render(&self, ctx: &RenderContext<'_>, out: &mut Markup) {
        if self.data.is_empty() {
            placeholder(out, PLACEHOLDER);
            return;
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("chart", kind = "ren_share", points = self.data.len()).entered();

        let mut points: Vec<(YearMonth, f64)> = self
            .data
            .iter()
            .filter(|p| p.ren_share.is_finite())
            .filter_map(|p| YearMonth::parse(&p.date).map(|m| (m, p.ren_share)))
            .collect();
        points.sort_by_key(|(m, _)| *m);
        let (Some((first, _)), Some((last, _))) = (points.first(), points.last()) else {
            placeholder(out, PLACEHOLDER);
            return;
        };

        let frame = ChartFrame::new(ChartFrame::WIDTH, HEIGHT, MARGINS);
        let axis = frame.month_axis(*first, *last);
        let y = frame.y_scale((0.0, 1.0));
        let xy: Vec<(f64, f64)> = points
            .iter()
            .map(|(m, v)| (axis.x(*m), y.apply(*v)))
            .collect();

        let figure = ReplayFigure::new("ren-share", self.section);
        figure.open(ctx, out);
        frame.open(out, "chart-svg", "Renewables share of generation");
        frame.y_axis(out, &y, &y.ticks(4), |t| percent(t, 0));
        frame.x_axis_years(out, &axis, &year_ticks(self.data.iter().map(|p| p.date.as_str())));
        let area = area_path(&xy, y.apply(0.0));
        out.void(
            "path",
            &[
                ("class", "ren-area"),
                ("d", area.as_str()),
                ("fill", palette::RENEWABLES),
                ("fill-opacity", "0.2"),
                ("stroke", "none"),
            ],
        );
        let line = line_path(&xy);
        out.void(
            "path",
            &[
                ("class", "ren-line"),
                ("d", line.as_str()),
                ("fill", "none"),
                ("stroke", palette::RENEWABLES),
                ("stroke-width", "1.5"),
            ],
        );
        out.open("g", &[("class", "ren-points")]);
        for ((m, v), (x, py)) in points.iter().zip(&xy) {
            let Some(share) = percent(*v, 1) else {
                continue;
            };
            out.open(
                "circle",
                &[
                    ("cx", num(*x).as_str()),
                    ("cy", num(*py).as_str()),
                    ("r", "2"),
                    ("fill", palette::RENEWABLES),
                    ("fill-opacity", "0"),
                ],
            );
            let tip = format!("{}\nRenewables share of generation: {share}", m.short_label());
            out.element("title", &[], &tip);
            out.close("circle");
        }
        out.close("g");
        frame.axis_title(out, "Year", false);
        frame.axis_title(out, "Renewables share (%)", true);
        frame.close(out);
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

    fn point(date: &str, ren_share: f64) -> RenSharePoint {
        RenSharePoint {
            date: date.to_string(),
            ren_share,
        }
    }

    #[test]
    fn empty_series_renders_only_placeholder() {
        let html = render_to_string(&RenShareChart::new(&[]), &RenderContext::new());
        assert_eq!(html, "<p class=\"chart-placeholder\">No renewables share data found.</p>");
    }

    #[test]
    fn unusable_rows_fall_back_to_placeholder() {
        let data = vec![point("bad", 0.3), point("2020-01", f64::NAN)];
        let html = render_to_string(&RenShareChart::new(&data), &RenderContext::new());
        assert!(html.contains(PLACEHOLDER));
    }

    #[test]
    fn tooltips_show_share() {
        let data = vec![point("2015-01", 0.21), point("2025-06", 0.55)];
        let section = SectionId::new("ren-share");
        let ctx = RenderContext::new().with_replay_key("ren-share", 1);
        let html = render_to_string(&RenShareChart::new(&data).bound_to(&section), &ctx);
        assert!(html.contains("Jun 2025\nRenewables share of generation: 55.0%"));
        assert!(html.contains("data-animate=\"true\""));
        assert!(html.contains(">Renewables share (%)</text>"));
    }
}
