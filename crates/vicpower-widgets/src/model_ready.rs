#![forbid(unsafe_code)]

//! Model input panels: gas price, electricity price, renewable share.

use vicpower_core::section::SectionId;
use vicpower_data::results::{ModelReadyPoint, YearMonth};

use crate::chart::{ChartFrame, LinearScale, Margins, line_path, year_ticks};
use crate::context::RenderContext;
use crate::format::{dollars, fixed, percent};
use crate::markup::{Markup, num};
use crate::replay::ReplayFigure;
use crate::{Widget, palette, placeholder};

pub const PLACEHOLDER: &str = "No price or renewables data found.";

/// Month of the invasion marker.
pub const INVASION_MONTH: &str = "2022-02";
pub const INVASION_LABEL: &str = "24 Feb 2022: Russia invades Ukraine";

const HEIGHT: f64 = 320.0;
const MARGINS: Margins = Margins::new(10.0, 18.0, 36.0, 56.0);

/// One column of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSeries {
    Gas,
    Price,
    RenShare,
}

impl ModelSeries {
    pub const ALL: [ModelSeries; 3] = [ModelSeries::Gas, ModelSeries::Price, ModelSeries::RenShare];

    /// JSON field name.
    pub const fn key(self) -> &'static str {
        match self {
            ModelSeries::Gas => "gas",
            ModelSeries::Price => "price",
            ModelSeries::RenShare => "ren_share",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ModelSeries::Gas => "Gas price (AUD/GJ)",
            ModelSeries::Price => "Electricity price (AUD/MWh, VWA)",
            ModelSeries::RenShare => "Renewables share",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            ModelSeries::Gas => palette::GAS,
            ModelSeries::Price => palette::IMPORTS,
            ModelSeries::RenShare => palette::RENEWABLES,
        }
    }

    /// Parse a field name.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    /// Value of this series in one row.
    pub fn value(self, row: &ModelReadyPoint) -> f64 {
        match self {
            ModelSeries::Gas => row.gas,
            ModelSeries::Price => row.price,
            ModelSeries::RenShare => row.ren_share,
        }
    }

    /// Tooltip value text.
    pub fn format(self, v: f64) -> Option<String> {
        match self {
            ModelSeries::Gas => dollars(v, 2),
            ModelSeries::Price => dollars(v, 0),
            ModelSeries::RenShare => percent(v, 1),
        }
    }

    fn is_share(self) -> bool {
        matches!(self, ModelSeries::RenShare)
    }
}

/// One chart per selected series.
#[derive(Debug, Clone)]
pub struct ModelReadyCharts<'a> {
    data: &'a [ModelReadyPoint],
    include: Option<Vec<ModelSeries>>,
    section: Option<&'a SectionId>,
}

impl<'a> ModelReadyCharts<'a> {
    pub fn new(data: &'a [ModelReadyPoint]) -> Self {
        Self {
            data,
            include: None,
            section: None,
        }
    }

    /// Only draw `series`, in canonical order.
    #[must_use]
    pub fn include(mut self, series: impl IntoIterator<Item = ModelSeries>) -> Self {
        self.include = Some(series.into_iter().collect());
        self
    }

    /// Replay when `section` activates.
    #[must_use]
    pub fn bound_to(mut self, section: &'a SectionId) -> Self {
        self.section = Some(section);
        self
    }

    /// Series that will be drawn.
    pub fn series(&self) -> Vec<ModelSeries> {
        ModelSeries::ALL
            .into_iter()
            .filter(|s| self.include.as_ref().is_none_or(|inc| inc.contains(s)))
            .collect()
    }

    fn render_panel(&self, series: ModelSeries, out: &mut Markup) {
        let points: Vec<(YearMonth, f64)> = {
            let mut pts: Vec<(YearMonth, f64)> = self
                .data
                .iter()
                .filter_map(|row| {
                    let v = series.value(row);
                    let m = YearMonth::parse(&row.date)?;
                    v.is_finite().then_some((m, v))
                })
                .collect();
            pts.sort_by_key(|(m, _)| *m);
            pts
        };
        let (Some((first, _)), Some((last, _))) = (points.first(), points.last()) else {
            return;
        };

        let frame = ChartFrame::new(ChartFrame::WIDTH, HEIGHT, MARGINS);
        let axis = frame.month_axis(*first, *last);
        let top = if series.is_share() {
            1.0
        } else {
            LinearScale::zero_based_max(points.iter().map(|(_, v)| *v))
        };
        let y = frame.y_scale((0.0, top));

        out.open("div", &[("class", "model-panel"), ("data-series", series.key())]);
        out.element("div", &[("class", "model-panel__title")], series.label());
        frame.open(out, "chart-svg", series.label());
        frame.y_axis(out, &y, &y.ticks(4), |t| match series {
            ModelSeries::RenShare => percent(t, 0),
            _ => fixed(t, 0),
        });
        frame.x_axis_years(out, &axis, &year_ticks(self.data.iter().map(|r| r.date.as_str())));

        let invasion = YearMonth::parse(INVASION_MONTH)
            .filter(|m| !series.is_share() && axis.contains(*m));
        if let Some(invasion) = invasion {
            frame.marker(out, &axis, invasion, palette::ALERT, Some("4 4"));
            let x = axis.x(invasion);
            let plot = frame.plot();
            let approx_width = INVASION_LABEL.chars().count() as f64 * 6.5;
            out.void(
                "rect",
                &[
                    ("class", "event-label-bg"),
                    ("x", num(x - approx_width / 2.0 - 4.0).as_str()),
                    ("y", num(plot.y + 2.0).as_str()),
                    ("width", num(approx_width + 8.0).as_str()),
                    ("height", "18"),
                    ("rx", "4"),
                    ("fill", "#ffffff"),
                    ("stroke", palette::ALERT),
                    ("stroke-width", "0.6"),
                ],
            );
            out.element(
                "text",
                &[
                    ("class", "event-label"),
                    ("x", num(x).as_str()),
                    ("y", num(plot.y + 15.0).as_str()),
                    ("text-anchor", "middle"),
                    ("font-size", "11"),
                    ("fill", palette::ALERT),
                ],
                INVASION_LABEL,
            );
        }

        let xy: Vec<(f64, f64)> = points.iter().map(|(m, v)| (axis.x(*m), y.apply(*v))).collect();
        let d = line_path(&xy);
        out.void(
            "path",
            &[
                ("class", "model-line"),
                ("d", d.as_str()),
                ("fill", "none"),
                ("stroke", series.color()),
                ("stroke-width", "1.5"),
            ],
        );
        out.open("g", &[("class", "model-points")]);
        for ((m, v), (x, py)) in points.iter().zip(&xy) {
            let Some(text) = series.format(*v) else {
                continue;
            };
            out.open(
                "circle",
                &[
                    ("cx", num(*x).as_str()),
                    ("cy", num(*py).as_str()),
                    ("r", "2"),
                    ("fill", series.color()),
                    ("fill-opacity", "0"),
                ],
            );
            let tip = format!("{}\n{}: {text}", m.short_label(), series.label());
            out.element("title", &[], &tip);
            out.close("circle");
        }
        out.close("g");
        frame.close(out);
        out.close("div");
    }
}

impl Widget for ModelReadyCharts<'_> {
    fn render(&self, ctx: &RenderContext<'_>, out: &mut Markup) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("chart", kind = "model_ready", rows = self.data.len()).entered();

        if self.data.is_empty() {
            placeholder(out, PLACEHOLDER);
            return;
        }
        let figure = ReplayFigure::new("model-ready", self.section);
        figure.open(ctx, out);
        for series in self.series() {
            self.render_panel(series, out);
        }
        figure.close(out);
        out.newline();
    }

    fn is_essential(&self) -> bool {
        true
    }
}
