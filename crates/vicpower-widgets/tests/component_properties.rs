//! End-to-end checks of the components against activation broadcasts and
//! sample data.

use std::time::Duration;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use vicpower_core::section::SectionId;
use vicpower_data::results::{DriverShares, FevdFullRow};
use vicpower_runtime::consumer::{Attached, ChartReplay};
use vicpower_runtime::{Instant, SectionTracker, TrackerConfig};
use vicpower_widgets::format::inline_segment_label;
use vicpower_widgets::{
    BillSensitivityTable, BreadcrumbEntry, Breadcrumbs, FevdNowChart, RenShareChart,
    RenderContext, Widget, render_to_string,
};

fn demand_first() -> FevdFullRow {
    FevdFullRow {
        horizon: 24.0,
        shares: DriverShares {
            gas: 0.02,
            renewables: 0.15,
            imports: 0.05,
            demand: 0.03,
            own: 0.75,
        },
    }
}

#[test]
fn broadcast_of_alias_lights_one_breadcrumb() {
    let tracker = SectionTracker::new(TrackerConfig::default());
    let crumbs = Attached::attach(
        tracker.bus(),
        Breadcrumbs::new(vec![
            BreadcrumbEntry::new("hero", "Intro"),
            BreadcrumbEntry::new("phases", "Three phases").with_aliases(["pass-through", "fevd-now"]),
            BreadcrumbEntry::new("bills", "Bills"),
        ]),
    );
    tracker.activate(&SectionId::new("fevd-now"), Instant::now());

    assert_eq!(crumbs.get().active().map(SectionId::as_str), Some("phases"));
    let html = crumbs.with(|c| render_to_string(c, &RenderContext::new()));
    assert_eq!(html.matches("aria-current=\"true\"").count(), 1);
    assert!(html.contains("href=\"#phases\" aria-label=\"Three phases\" aria-current=\"true\""));
}

#[test]
fn fevd_gas_row_and_bill_row_with_one_ordering() {
    let d = demand_first();
    let ctx = RenderContext::new();

    let chart = FevdNowChart::new(Some(&d), None);
    let gas = chart.rows()[0];
    assert_eq!(
        vicpower_widgets::format::percent_or_dash(gas.demand_first, 1),
        "2.0%"
    );
    assert!(render_to_string(&chart, &ctx).contains("<strong>2.0%</strong>"));

    let bills = BillSensitivityTable::new(Some(&d), None);
    let spike = bills
        .rows()
        .into_iter()
        .find(|r| r.scenario.label == "Global gas price spike")
        .expect("gas scenario present");
    assert_eq!(spike.scenario.shock_label, "+50%");
    assert_eq!(spike.approx_text(), "1.00%");
    assert!(render_to_string(&bills, &ctx).contains("<td class=\"num\">1.00%</td>"));
}

#[test]
fn empty_renewables_series_renders_placeholder_only() {
    let chart = RenShareChart::new(&[]);
    let html = render_to_string(&chart, &RenderContext::new());
    assert_eq!(
        html,
        "<p class=\"chart-placeholder\">No renewables share data found.</p>"
    );
    assert!(chart.is_essential());
}

#[test]
fn small_segment_label_is_suppressed() {
    assert_eq!(inline_segment_label(0.05, 20.0), "");
}

#[test]
fn chart_replay_key_reaches_markup() {
    let tracker = SectionTracker::new(TrackerConfig::default().with_settle_delay(Duration::from_millis(650)));
    let replay = Attached::attach(tracker.bus(), ChartReplay::new("fevd-now"));
    let now = Instant::now();
    tracker.activate(&SectionId::new("fevd-now"), now);
    tracker.activate(&SectionId::new("bills"), now);
    tracker.activate(&SectionId::new("fevd-now"), now);

    let key = replay.get().key();
    assert_eq!(key, 2);
    let d = demand_first();
    let section = SectionId::new("fevd-now");
    let ctx = RenderContext::new().with_replay_key(section.clone(), key);
    let html = render_to_string(&FevdNowChart::new(Some(&d), None).bound_to(&section), &ctx);
    assert!(html.contains("data-replay-key=\"2\" data-animate=\"true\""));
}

proptest! {
    #[test]
    fn labels_never_appear_on_small_or_narrow_segments(
        fraction in 0.0f64..1.0,
        width in 0.0f64..400.0,
    ) {
        let label = inline_segment_label(fraction, width);
        if fraction * 100.0 < 8.0 || width < 32.0 {
            prop_assert_eq!(label, "");
        } else {
            prop_assert!(label.ends_with('%'));
            let decimals = if fraction * 100.0 >= 20.0 { 0 } else { 1 };
            prop_assert_eq!(label.contains('.'), decimals == 1);
        }
    }
}
