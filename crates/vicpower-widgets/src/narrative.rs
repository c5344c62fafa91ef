#![forbid(unsafe_code)]

//! Section narratives in compact and detailed variants.

use vicpower_runtime::detail_mode::DetailMode;

use crate::context::RenderContext;
use crate::format::percent_or_dash;
use crate::markup::Markup;
use crate::rolling_beta::PhaseAverages;
use crate::Widget;

/// Which narrative to show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Narrative {
    /// Gas pass-through across the three phases.
    PassThrough(PhaseAverages),
    /// Growth of renewable generation.
    RenShare,
    /// Current variance decomposition.
    FevdNow,
    /// Variance decomposition over time.
    FevdTrend,
}

impl Narrative {
    fn key(&self) -> &'static str {
        match self {
            Narrative::PassThrough(_) => "pass-through",
            Narrative::RenShare => "ren-share",
            Narrative::FevdNow => "fevd-now",
            Narrative::FevdTrend => "fevd-trend",
        }
    }

    /// Markup body for `mode`.
    pub fn body(&self, mode: DetailMode) -> Markup {
        let mut out = Markup::new();
        match (self, mode) {
            (Narrative::PassThrough(_), DetailMode::Compact) => {
                out.element(
                    "p",
                    &[],
                    "Earlier in the decade, changes in gas prices moved wholesale power prices much more than they do now; by 2023–25 the typical pass-through is close to zero.",
                );
            }
            (Narrative::PassThrough(avg), DetailMode::Detailed) => {
                let text = format!(
                    "Earlier in the decade, changes in gas prices had a clearer effect on electricity prices than they do now. \
                     Phase averages suggest a gas-anchored regime in 2015–19 (around {}) and a much weaker gas link in 2023–25 (around {}), \
                     with a noisy crisis/transition period in between ({}).",
                    percent_or_dash(avg.phase1, 1),
                    percent_or_dash(avg.phase3, 1),
                    percent_or_dash(avg.phase2, 1),
                );
                out.element("p", &[], &text);
                out.element(
                    "p",
                    &[],
                    "These pass-through numbers report the percent change in wholesale power price per 1% move in gas price (beta × 100), \
                     so the line can be read as an elasticity-like response. When the coefficient turns negative—as it often does after 2023—it \
                     means renewables, weather or network conditions are pushing prices down even as gas stays high. Shaded bands match the \
                     three phases in the narrative so you can see the break points directly on the chart.",
                );
            }
            (Narrative::RenShare, DetailMode::Compact) => {
                out.element("p", &[], REN_SHARE_INTRO);
                out.open("ul", &[]);
                out.element(
                    "li",
                    &[],
                    "Victoria now gets a much larger share of its power from wind and solar than it did a decade ago.",
                );
                out.element(
                    "li",
                    &[],
                    "The shift suggests dependence on coal is likely to have decreased.",
                );
                out.close("ul");
            }
            (Narrative::RenShare, DetailMode::Detailed) => {
                out.element("p", &[], REN_SHARE_INTRO);
                out.element(
                    "p",
                    &[],
                    "From 2015 to 2025, renewables' share of generation rises from roughly one-fifth to well over one-half. \
                     That structural change is one reason prices now respond more to weather and renewable availability than to gas alone.",
                );
            }
            (Narrative::FevdNow, DetailMode::Compact) => {
                out.element(
                    "p",
                    &[],
                    "The stacked bars summarise how much each driver contributes to price ups and downs over a two-year horizon, \
                     with other/own price dynamics dominating and renewables next.",
                );
            }
            (Narrative::FevdNow, DetailMode::Detailed) => {
                out.element(
                    "p",
                    &[],
                    "The bars and numbers show how much each driver contributes to price ups and downs over that two-year horizon. \
                     The two rows use slightly different technical ordering choices in the VAR, but they tell the same big-picture \
                     story about what actually moves prices.",
                );
            }
            (Narrative::FevdTrend, DetailMode::Compact) => {
                out.element(
                    "p",
                    &[],
                    "Each panel uses the same 0–100% scale so you can compare drivers over time at a glance.",
                );
            }
            (Narrative::FevdTrend, DetailMode::Detailed) => {
                out.open("p", &[]);
                out.text(
                    "Each panel uses the same 0–100% scale so you can see at a glance how much each driver usually moves. \
                     Across the decade, ",
                );
                out.element("span", &[("class", "nowrap")], "other / own price");
                out.text(
                    " dominates, renewables gradually rise, and gas stays relatively small in the most recent years.",
                );
                out.close("p");
            }
        }
        out
    }
}

const REN_SHARE_INTRO: &str =
    "The charts below show monthly series since 2015, including the share of generation from renewables.";

impl Widget for Narrative {
    /// # Panics
    ///
    /// Panics when the context has no detail-mode provider.
    fn render(&self, ctx: &RenderContext<'_>, out: &mut Markup) {
        let mode = ctx.detail_mode();
        let class = format!("narrative narrative--{}", mode.as_str());
        out.open(
            "div",
            &[("class", class.as_str()), ("data-narrative", self.key())],
        );
        out.append(&self.body(mode));
        out.close("div").newline();
    }

    fn is_essential(&self) -> bool {
        true
    }
}
