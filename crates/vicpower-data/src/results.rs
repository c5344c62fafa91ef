#![forbid(unsafe_code)]

//! Result types produced by the analytics pipeline.
//!
//! Field names follow the JSON files verbatim; driver columns are
//! capitalized there (`Gas`, `Renewables`, ...) and renamed here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One shock source in the variance decompositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Driver {
    /// Wallumbilla gas price.
    Gas,
    /// Renewable generation share.
    Renewables,
    /// Net interconnector imports.
    Imports,
    /// Operational demand.
    Demand,
    /// Own-price shocks and everything else.
    Own,
}

impl Driver {
    /// Column order used by the FEVD tables and stacked bars.
    pub const ALL: [Driver; 5] = [
        Driver::Gas,
        Driver::Renewables,
        Driver::Imports,
        Driver::Demand,
        Driver::Own,
    ];

    /// Panel order used by the trend strip.
    pub const TREND_ORDER: [Driver; 5] = [
        Driver::Own,
        Driver::Renewables,
        Driver::Demand,
        Driver::Imports,
        Driver::Gas,
    ];

    /// JSON column name.
    pub const fn key(self) -> &'static str {
        match self {
            Driver::Gas => "Gas",
            Driver::Renewables => "Renewables",
            Driver::Imports => "Imports",
            Driver::Demand => "Demand",
            Driver::Own => "Own",
        }
    }

    /// Reader-facing label.
    pub const fn label(self) -> &'static str {
        match self {
            Driver::Own => "Other / own price",
            other => other.key(),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Variance shares for the five drivers. Should sum to roughly one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DriverShares {
    #[serde(rename = "Gas")]
    pub gas: f64,
    #[serde(rename = "Renewables")]
    pub renewables: f64,
    #[serde(rename = "Imports")]
    pub imports: f64,
    #[serde(rename = "Demand")]
    pub demand: f64,
    #[serde(rename = "Own")]
    pub own: f64,
}

impl DriverShares {
    /// Share for one driver.
    pub const fn get(&self, driver: Driver) -> f64 {
        match driver {
            Driver::Gas => self.gas,
            Driver::Renewables => self.renewables,
            Driver::Imports => self.imports,
            Driver::Demand => self.demand,
            Driver::Own => self.own,
        }
    }

    /// Sum of all shares.
    pub fn total(&self) -> f64 {
        Driver::ALL.iter().map(|d| self.get(*d)).sum()
    }

    /// The driver with the largest share. Ties resolve to the earlier column.
    pub fn dominant(&self) -> Driver {
        Driver::ALL
            .into_iter()
            .fold(Driver::Gas, |best, d| if self.get(d) > self.get(best) { d } else { best })
    }
}

/// Rolling gas pass-through estimate for one window end month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingBetaPoint {
    /// Window end, `YYYY-MM`.
    pub date: String,
    /// Gas elasticity.
    pub beta: f64,
    /// Lower 95% bound.
    pub lower: f64,
    /// Upper 95% bound.
    pub upper: f64,
    /// Mean renewable share over the window, when exported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_ren_share: Option<f64>,
}

impl RollingBetaPoint {
    /// Whether the 95% band excludes zero.
    pub fn is_significant(&self) -> bool {
        self.lower > 0.0 || self.upper < 0.0
    }
}

/// FEVD shares at one forecast horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FevdFullRow {
    /// Forecast horizon in months, typically 24.
    pub horizon: f64,
    #[serde(flatten)]
    pub shares: DriverShares,
}

/// FEVD shares estimated over a window ending at `period`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FevdTrendPoint {
    /// Window end, `YYYY-MM`.
    pub period: String,
    #[serde(flatten)]
    pub shares: DriverShares,
}

/// Monthly renewable generation share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenSharePoint {
    /// `YYYY-MM`.
    pub date: String,
    /// Share in `[0, 1]`.
    pub ren_share: f64,
}

/// One row of the model input panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReadyPoint {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Volume-weighted electricity price, AUD/MWh.
    pub price: f64,
    /// Volume-weighted gas price, AUD/GJ.
    pub gas: f64,
    /// Renewable share in `[0, 1]`.
    pub ren_share: f64,
}

/// Annotation drawn over a time-series chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartEvent {
    /// A shaded span between two months.
    Range {
        x1: String,
        x2: String,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        #[serde(
            default,
            rename = "fillOpacity",
            skip_serializing_if = "Option::is_none"
        )]
        fill_opacity: Option<f64>,
    },
    /// A vertical marker at one month.
    Point {
        x: String,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        #[serde(
            default,
            rename = "strokeDasharray",
            skip_serializing_if = "Option::is_none"
        )]
        stroke_dasharray: Option<String>,
    },
}

/// A calendar month parsed from `YYYY-MM` or `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based.
    pub month: u32,
}

const MONTH_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl YearMonth {
    /// Build a month, rejecting out-of-range values.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Parse the leading `YYYY-MM` of a date string.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().splitn(3, '-');
        let year = parts.next()?.parse().ok()?;
        let month = parts.next()?.parse().ok()?;
        Self::new(year, month)
    }

    /// Months since year zero; consecutive months differ by one.
    pub fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// `Mon YYYY`, as in tooltips.
    pub fn short_label(self) -> String {
        format!("{} {}", MONTH_SHORT[(self.month - 1) as usize], self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fevd_row_uses_capitalized_columns() {
        let row: FevdFullRow = serde_json::from_str(
            r#"{"horizon":24,"Gas":0.02,"Renewables":0.15,"Imports":0.05,"Demand":0.03,"Own":0.75}"#,
        )
        .unwrap();
        assert_eq!(row.horizon, 24.0);
        assert_eq!(row.shares.get(Driver::Gas), 0.02);
        assert_eq!(row.shares.dominant(), Driver::Own);
        assert!((row.shares.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rolling_beta_optional_window_share() {
        let p: RollingBetaPoint =
            serde_json::from_str(r#"{"date":"2019-06","beta":0.4,"lower":0.1,"upper":0.7}"#)
                .unwrap();
        assert_eq!(p.window_ren_share, None);
        assert!(p.is_significant());

        let p: RollingBetaPoint = serde_json::from_str(
            r#"{"date":"2024-06","beta":-0.1,"lower":-0.3,"upper":0.2,"window_ren_share":0.4}"#,
        )
        .unwrap();
        assert_eq!(p.window_ren_share, Some(0.4));
        assert!(!p.is_significant());
    }

    #[test]
    fn chart_events_are_tagged() {
        let events: Vec<ChartEvent> = serde_json::from_str(
            r##"[
                {"kind":"range","x1":"2020-01","x2":"2022-12","label":"Crisis","fillOpacity":0.1},
                {"kind":"point","x":"2022-02","label":"Invasion","strokeDasharray":"4 4"}
            ]"##,
        )
        .unwrap();
        assert!(matches!(
            &events[0],
            ChartEvent::Range { fill_opacity: Some(o), fill: None, .. } if *o == 0.1
        ));
        assert!(matches!(
            &events[1],
            ChartEvent::Point { stroke_dasharray: Some(d), .. } if d == "4 4"
        ));
    }

    #[test]
    fn year_month_parsing() {
        assert_eq!(YearMonth::parse("2022-02"), YearMonth::new(2022, 2));
        assert_eq!(YearMonth::parse("2022-02-15"), YearMonth::new(2022, 2));
        assert_eq!(YearMonth::parse("2022-13"), None);
        assert_eq!(YearMonth::parse("garbage"), None);
        let ym = YearMonth::new(2023, 1).unwrap();
        assert_eq!(ym.to_string(), "2023-01");
        assert_eq!(ym.short_label(), "Jan 2023");
        assert_eq!(
            ym.ordinal() - YearMonth::new(2022, 12).unwrap().ordinal(),
            1
        );
    }

    #[test]
    fn driver_labels() {
        assert_eq!(Driver::Own.label(), "Other / own price");
        assert_eq!(Driver::Gas.to_string(), "Gas");
        assert_eq!(Driver::TREND_ORDER[0], Driver::Own);
    }
}
