#![forbid(unsafe_code)]

//! Static HTML and inline SVG components for the vicpower story.
//!
//! Every component implements [`Widget`] and writes markup into a
//! [`Markup`] buffer. Components are pure functions of their inputs and the
//! [`RenderContext`]; none of them read files or hold subscriptions.

pub mod bill_sensitivity;
pub mod breadcrumbs;
pub mod chart;
pub mod context;
pub mod detail_toggle;
pub mod disclaimer;
pub mod fevd_now;
pub mod fevd_trend;
pub mod format;
pub mod markup;
pub mod model_ready;
pub mod narrative;
pub mod palette;
pub mod ren_share;
pub mod replay;
pub mod rolling_beta;
pub mod scroll_cue;
pub mod section_frame;
pub mod timeline;

pub use bill_sensitivity::{BillSensitivityTable, SCENARIOS, Scenario, ScenarioRow};
pub use breadcrumbs::{BreadcrumbEntry, Breadcrumbs};
pub use context::RenderContext;
pub use detail_toggle::DetailToggle;
pub use disclaimer::MobileDisclaimer;
pub use fevd_now::{FevdNowChart, FevdTableRow};
pub use fevd_trend::FevdTrendStrip;
pub use markup::Markup;
pub use model_ready::{ModelReadyCharts, ModelSeries};
pub use narrative::Narrative;
pub use ren_share::RenShareChart;
pub use replay::ReplayFigure;
pub use rolling_beta::{PHASES, Phase, PhaseAverages, PhaseSummary, RollingBetaChart};
pub use scroll_cue::ScrollCue;
pub use section_frame::SectionFrame;
pub use timeline::{Timeline, TimelineEvent};

/// A renderable component.
///
/// Widgets append their markup to `out`. A widget with nothing to show
/// writes nothing, or a placeholder where the page expects a chart.
pub trait Widget {
    /// Append this widget's markup.
    fn render(&self, ctx: &RenderContext<'_>, out: &mut Markup);

    /// Whether this widget carries primary content.
    ///
    /// Decorative widgets (scroll cue, breadcrumbs) are not essential.
    fn is_essential(&self) -> bool {
        false
    }
}

impl<W: Widget + ?Sized> Widget for &W {
    fn render(&self, ctx: &RenderContext<'_>, out: &mut Markup) {
        (**self).render(ctx, out);
    }

    fn is_essential(&self) -> bool {
        (**self).is_essential()
    }
}

/// Pre-built markup, inserted as is.
#[derive(Debug, Clone, Copy)]
pub struct Raw<'a>(pub &'a str);

impl Widget for Raw<'_> {
    fn render(&self, _ctx: &RenderContext<'_>, out: &mut Markup) {
        out.raw(self.0);
    }

    fn is_essential(&self) -> bool {
        true
    }
}

/// Render a widget into a fresh buffer.
pub fn render_to_string(widget: &dyn Widget, ctx: &RenderContext<'_>) -> String {
    let mut out = Markup::new();
    widget.render(ctx, &mut out);
    out.into_string()
}

/// One-line "no data" message shown in place of a chart.
pub(crate) fn placeholder(out: &mut Markup, text: &str) {
    #[cfg(feature = "tracing")]
    tracing::debug!(placeholder = text, "chart rendered without data");
    out.element("p", &[("class", "chart-placeholder")], text);
}
