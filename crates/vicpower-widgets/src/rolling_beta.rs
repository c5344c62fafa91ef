#![forbid(unsafe_code)]

//! Rolling gas pass-through chart and its phase summaries.

use vicpower_core::section::SectionId;
use vicpower_data::results::{RollingBetaPoint, YearMonth};

use crate::chart::{ChartFrame, LinearScale, Margins, band_path, line_path, year_ticks};
use crate::context::RenderContext;
use crate::format::{fixed, percent, percent_or_dash};
use crate::markup::{Markup, num};
use crate::replay::ReplayFigure;
use crate::{Widget, palette, placeholder};

pub const PLACEHOLDER: &str = "No rolling beta data found.";
pub const TITLE: &str = "How much do gas prices move electricity prices?";

const HEIGHT: f64 = 260.0;
const MARGINS: Margins = Margins::new(12.0, 18.0, 36.0, 48.0);

/// A regime of the market, for shading and averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub id: &'static str,
    pub label: &'static str,
    /// First month, `YYYY-MM`.
    pub start: &'static str,
    /// Last month; open-ended when `None`.
    pub end: Option<&'static str>,
    pub color: &'static str,
}

impl Phase {
    /// Whether `month` falls in this phase.
    pub fn contains(&self, month: YearMonth) -> bool {
        let after_start = YearMonth::parse(self.start).is_some_and(|s| month >= s);
        let before_end = self
            .end
            .and_then(YearMonth::parse)
            .is_none_or(|e| month <= e);
        after_start && before_end
    }
}

pub const PHASES: [Phase; 3] = [
    Phase {
        id: "p1",
        label: "Phase 1 · Gas-anchored",
        start: "2015-01",
        end: Some("2019-12"),
        color: "#0ea5e9",
    },
    Phase {
        id: "p2",
        label: "Phase 2 · Crisis/transition",
        start: "2020-01",
        end: Some("2022-12"),
        color: "#f59e0b",
    },
    Phase {
        id: "p3",
        label: "Phase 3 · Weather/RE-led",
        start: "2023-01",
        end: None,
        color: "#16a34a",
    },
];

/// Months where a new phase begins.
const PHASE_BREAKS: [&str; 2] = ["2020-01", "2023-01"];

/// Average pass-through within one phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSummary {
    pub phase: Phase,
    /// Mean beta; `None` when no window falls in the phase.
    pub average: Option<f64>,
    pub count: usize,
}

impl PhaseSummary {
    /// Summaries for every phase, in phase order.
    pub fn compute(data: &[RollingBetaPoint]) -> Vec<PhaseSummary> {
        PHASES
            .iter()
            .map(|phase| {
                let betas: Vec<f64> = data
                    .iter()
                    .filter(|p| YearMonth::parse(&p.date).is_some_and(|m| phase.contains(m)))
                    .map(|p| p.beta)
                    .filter(|b| b.is_finite())
                    .collect();
                let average = (!betas.is_empty())
                    .then(|| betas.iter().sum::<f64>() / betas.len() as f64);
                PhaseSummary {
                    phase: *phase,
                    average,
                    count: betas.len(),
                }
            })
            .collect()
    }

    /// Bar width in percent relative to the largest phase average.
    pub fn bar_width(&self, max_abs: f64) -> f64 {
        match self.average {
            Some(avg) if max_abs > 0.0 => (avg.abs() / max_abs * 100.0).max(10.0),
            _ => 0.0,
        }
    }
}

/// The three phase averages, as used by the narrative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseAverages {
    pub phase1: Option<f64>,
    pub phase2: Option<f64>,
    pub phase3: Option<f64>,
}

impl PhaseAverages {
    pub fn from_data(data: &[RollingBetaPoint]) -> Self {
        Self::from_summaries(&PhaseSummary::compute(data))
    }

    pub fn from_summaries(summaries: &[PhaseSummary]) -> Self {
        let get = |i: usize| summaries.get(i).and_then(|s| s.average);
        Self {
            phase1: get(0),
            phase2: get(1),
            phase3: get(2),
        }
    }
}

/// Rolling beta line with its 95% band.
#[derive(Debug, Clone, Copy)]
pub struct RollingBetaChart<'a> {
    data: &'a [RollingBetaPoint],
    section: Option<&'a SectionId>,
}

impl<'a> RollingBetaChart<'a> {
    pub fn new(data: &'a [RollingBetaPoint]) -> Self {
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

    fn render_caption(&self, averages: &PhaseAverages, out: &mut Markup) {
        out.open("div", &[("class", "chart-caption")]);
        out.element(
            "span",
            &[],
            "Earlier in the decade, changes in gas prices had a clearer effect on electricity prices than they do now.",
        );
        let summary = format!(
            "2015–19 (gas-anchored): {} · 2023–25 (weather/renewables-led): {}",
            percent_or_dash(averages.phase1, 1),
            percent_or_dash(averages.phase3, 1),
        );
        out.element("span", &[("class", "chart-caption__summary")], &summary);
        out.element(
            "span",
            &[("class", "chart-caption__note")],
            "These pass-through numbers report the percent change in wholesale power price per 1% move in gas price (beta × 100), so the line can be read as an elasticity-like response.",
        );
        out.element(
            "span",
            &[("class", "chart-caption__note")],
            "When the coefficient turns negative—as it often does after 2023—it means renewables, weather or network conditions are pushing prices down even as gas stays high, which is why the red dots flag opposite movements.",
        );
        out.element(
            "span",
            &[],
            "Shaded bands match the three phases in the narrative so you can see the break points directly on the chart.",
        );
        out.close("div");
    }

    fn render_svg(&self, out: &mut Markup) {
        let points: Vec<(YearMonth, &RollingBetaPoint)> = self
            .data
            .iter()
            .filter_map(|p| YearMonth::parse(&p.date).map(|m| (m, p)))
            .filter(|(_, p)| p.beta.is_finite() && p.lower.is_finite() && p.upper.is_finite())
            .collect();
        let (Some(first), Some(last)) = (
            points.iter().map(|(m, _)| *m).min(),
            points.iter().map(|(m, _)| *m).max(),
        ) else {
            return;
        };

        let frame = ChartFrame::new(ChartFrame::WIDTH, HEIGHT, MARGINS);
        let axis = frame.month_axis(first, last);
        let (lo, hi) = LinearScale::extent(
            points
                .iter()
                .flat_map(|(_, p)| [p.lower * 100.0, p.upper * 100.0])
                .chain([0.0]),
        )
        .unwrap_or((0.0, 1.0));
        let y = frame.y_scale((lo, hi));

        frame.open(out, "chart-svg", TITLE);
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
        frame.y_axis(out, &y, &y.ticks(4), |t| fixed(t, 0).map(|s| format!("{s}%")));
        frame.x_axis_years(
            out,
            &axis,
            &year_ticks(points.iter().map(|(_, p)| p.date.as_str())),
        );

        let upper: Vec<(f64, f64)> = points
            .iter()
            .map(|(m, p)| (axis.x(*m), y.apply(p.upper * 100.0)))
            .collect();
        let lower: Vec<(f64, f64)> = points
            .iter()
            .map(|(m, p)| (axis.x(*m), y.apply(p.lower * 100.0)))
            .collect();
        let band = band_path(&upper, &lower);
        out.void(
            "path",
            &[
                ("class", "beta-band"),
                ("d", band.as_str()),
                ("fill", palette::BAND),
                ("fill-opacity", "0.2"),
                ("stroke", "none"),
            ],
        );

        let zero = num(y.apply(0.0));
        let plot = frame.plot();
        out.void(
            "line",
            &[
                ("class", "zero-line"),
                ("x1", num(plot.x).as_str()),
                ("x2", num(plot.right()).as_str()),
                ("y1", zero.as_str()),
                ("y2", zero.as_str()),
                ("stroke", palette::REFERENCE_LINE),
                ("stroke-dasharray", "4 4"),
            ],
        );
        for brk in PHASE_BREAKS.iter().filter_map(|b| YearMonth::parse(b)) {
            if axis.contains(brk) {
                frame.marker(out, &axis, brk, palette::REFERENCE_LINE, Some("4 4"));
            }
        }

        let line: Vec<(f64, f64)> = points
            .iter()
            .map(|(m, p)| (axis.x(*m), y.apply(p.beta * 100.0)))
            .collect();
        let d = line_path(&line);
        out.void(
            "path",
            &[
                ("class", "beta-line"),
                ("d", d.as_str()),
                ("fill", "none"),
                ("stroke", palette::INK),
                ("stroke-width", "2.2"),
            ],
        );

        for (m, p) in &points {
            let color = if p.beta < 0.0 { palette::NEGATIVE } else { palette::INK };
            let fill = if p.is_significant() { color } else { "#ffffff" };
            out.open(
                "circle",
                &[
                    ("class", "beta-dot"),
                    ("cx", num(axis.x(*m)).as_str()),
                    ("cy", num(y.apply(p.beta * 100.0)).as_str()),
                    ("r", "3"),
                    ("fill", fill),
                    ("stroke", color),
                    ("stroke-width", "1.2"),
                ],
            );
            if let Some(tip) = tooltip(*m, p) {
                out.element("title", &[], &tip);
            }
            out.close("circle");
        }
        frame.axis_title(out, "Year", false);
        frame.axis_title(out, "Pass-through (%)", true);
        frame.close(out);
    }

    fn render_legend(out: &mut Markup) {
        out.open("ul", &[("class", "chart-legend")]);
        for (swatch, text) in [
            ("legend-swatch legend-swatch--band", "Shaded band: uncertainty range (95%)"),
            ("legend-swatch legend-swatch--hollow", "Hollow dots: gas effect is unclear"),
            ("legend-swatch legend-swatch--solid", "Solid dots: gas clearly moves prices"),
            (
                "legend-swatch legend-swatch--negative",
                "Red markers: periods when gas and power move in opposite directions",
            ),
        ] {
            out.open("li", &[]);
            out.element("span", &[("class", swatch)], "");
            out.text(text);
            out.close("li");
        }
        out.close("ul");
    }

    fn render_phase_cards(summaries: &[PhaseSummary], out: &mut Markup) {
        let max_abs = summaries
            .iter()
            .filter_map(|s| s.average.map(f64::abs))
            .fold(0.0, f64::max);
        out.open("div", &[("class", "phase-cards")]);
        for summary in summaries {
            out.open(
                "div",
                &[("class", "phase-card"), ("data-phase", summary.phase.id)],
            );
            out.open("div", &[("class", "phase-card__head")]);
            out.element("span", &[("class", "phase-card__label")], summary.phase.label);
            out.element(
                "span",
                &[("class", "phase-card__value")],
                &percent_or_dash(summary.average, 1),
            );
            out.close("div");
            let style = format!(
                "width: {}%; background-color: {}",
                num(summary.bar_width(max_abs)),
                summary.phase.color
            );
            out.open("div", &[("class", "phase-card__track")]);
            out.element("div", &[("class", "phase-card__bar"), ("style", style.as_str())], "");
            out.close("div");
            out.element(
                "div",
                &[("class", "phase-card__count")],
                &format!("{} monthly windows", summary.count),
            );
            out.close("div");
        }
        out.close("div");
    }
}

fn tooltip(month: YearMonth, p: &RollingBetaPoint) -> Option<String> {
    let beta = percent(p.beta, 1)?;
    let lower = percent(p.lower, 1)?;
    let upper = percent(p.upper, 1)?;
    Some(format!(
        "{}\nGas → price pass-through: {beta}\n95% band: {lower} to {upper}",
        month.short_label()
    ))
}

impl Widget for RollingBetaChart<'_> {
    fn render(&self, ctx: &RenderContext<'_>, out: &mut Markup) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("chart", kind = "rolling_beta", points = self.data.len()).entered();

        if self.data.is_empty() {
            placeholder(out, PLACEHOLDER);
            return;
        }
        let summaries = PhaseSummary::compute(self.data);
        let averages = PhaseAverages::from_summaries(&summaries);

        let figure = ReplayFigure::new("rolling-beta", self.section);
        figure.open(ctx, out);
        out.element("div", &[("class", "chart-title")], TITLE);
        self.render_caption(&averages, out);
        self.render_svg(out);
        Self::render_legend(out);
        Self::render_phase_cards(&summaries, out);
        figure.close(out);
        out.newline();
    }

    fn is_essential(&self) -> bool {
        true
    }
}
