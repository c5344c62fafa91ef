#![forbid(unsafe_code)]

//! Illustrative bill sensitivities: FEVD share times an assumed shock.

use vicpower_data::results::{Driver, FevdFullRow};

use crate::context::RenderContext;
use crate::format::{DASH, fixed, percent};
use crate::markup::Markup;
use crate::Widget;

pub const TITLE: &str = "How different shocks could affect bills (illustrative only)";

/// An assumed shock to one driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub driver: Driver,
    pub label: &'static str,
    pub shock_label: &'static str,
    /// Fractional change, `0.1` for +10%.
    pub magnitude: f64,
}

pub const SCENARIOS: [Scenario; 4] = [
    Scenario {
        driver: Driver::Renewables,
        label: "Weak wind/solar output",
        shock_label: "-20%",
        magnitude: -0.2,
    },
    Scenario {
        driver: Driver::Imports,
        label: "Interconnector constraint",
        shock_label: "-30%",
        magnitude: -0.3,
    },
    Scenario {
        driver: Driver::Demand,
        label: "Heatwave demand jump",
        shock_label: "+10%",
        magnitude: 0.1,
    },
    Scenario {
        driver: Driver::Gas,
        label: "Global gas price spike",
        shock_label: "+50%",
        magnitude: 0.5,
    },
];

/// A computed table row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioRow {
    pub scenario: Scenario,
    /// Mean share across the available orderings; zero when none.
    pub share: f64,
}

impl ScenarioRow {
    /// `|share × magnitude × 100|`, in percent.
    pub fn approx_change(&self) -> f64 {
        (self.share * self.scenario.magnitude * 100.0).abs()
    }

    /// Share column text.
    pub fn share_text(&self) -> String {
        percent(self.share, 1).unwrap_or_else(|| DASH.to_string())
    }

    /// Approximate change column text; `—` for a zero share.
    pub fn approx_text(&self) -> String {
        if self.share == 0.0 {
            return DASH.to_string();
        }
        fixed(self.approx_change(), 2)
            .map(|s| format!("{s}%"))
            .unwrap_or_else(|| DASH.to_string())
    }
}

/// Scenario table.
#[derive(Debug, Clone, Copy)]
pub struct BillSensitivityTable<'a> {
    demand_first: Option<&'a FevdFullRow>,
    ren_first: Option<&'a FevdFullRow>,
}

impl<'a> BillSensitivityTable<'a> {
    pub fn new(demand_first: Option<&'a FevdFullRow>, ren_first: Option<&'a FevdFullRow>) -> Self {
        Self {
            demand_first,
            ren_first,
        }
    }

    /// Mean share for `driver` over the orderings present.
    pub fn share(&self, driver: Driver) -> f64 {
        let values: Vec<f64> = [self.demand_first, self.ren_first]
            .into_iter()
            .flatten()
            .map(|row| row.shares.get(driver))
            .filter(|v| v.is_finite())
            .collect();
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    /// Rows in scenario order.
    pub fn rows(&self) -> Vec<ScenarioRow> {
        SCENARIOS
            .iter()
            .map(|scenario| ScenarioRow {
                scenario: *scenario,
                share: self.share(scenario.driver),
            })
            .collect()
    }
}

impl Widget for BillSensitivityTable<'_> {
    fn render(&self, _ctx: &RenderContext<'_>, out: &mut Markup) {
        if self.demand_first.is_none() && self.ren_first.is_none() {
            return;
        }
        out.open("div", &[("class", "bill-sensitivity")]);
        out.element("div", &[("class", "chart-title")], TITLE);
        out.open("table", &[("class", "bill-table")]);
        out.open("thead", &[]).open("tr", &[]);
        out.element("th", &[], "Scenario");
        out.element("th", &[], "Shock");
        out.element("th", &[("class", "num")], "FEVD share");
        out.element(
            "th",
            &[("class", "num")],
            "Approximate change in average monthly wholesale price (illustrative only)",
        );
        out.close("tr").close("thead");
        out.open("tbody", &[]);
        for row in self.rows() {
            out.open("tr", &[("data-driver", row.scenario.driver.key())]);
            out.element("td", &[], row.scenario.label);
            out.element("td", &[], row.scenario.shock_label);
            out.element("td", &[("class", "num")], &row.share_text());
            out.element("td", &[("class", "num")], &row.approx_text());
            out.close("tr");
        }
        out.close("tbody").close("table");
        out.element(
            "p",
            &[("class", "footnote")],
            "These are back-of-the-envelope, illustrative sensitivities that scale the modelled shares by the assumed shock size. \
             They show relative exposure, not exact bill changes or elasticities.",
        );
        out.element(
            "p",
            &[("class", "footnote")],
            "Each row reports the approximate magnitude of the average monthly wholesale price move that follows from the scenario’s \
             shock (share × shock magnitude × 100). The direction is implied by whether the shock raises or restricts the driver, \
             and the calculations ignore higher-order dynamics and feedbacks.",
        );
        out.close("div").newline();
    }
}
