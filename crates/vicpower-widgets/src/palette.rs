#![forbid(unsafe_code)]

//! Colors shared across charts.

use vicpower_data::results::Driver;

pub const GAS: &str = "#d97706";
pub const RENEWABLES: &str = "#16a34a";
pub const IMPORTS: &str = "#2563eb";
pub const DEMAND: &str = "#7c3aed";
pub const OWN: &str = "#6b7280";

/// Phase shading behind time series.
pub const PHASE_SHADE: &str = "#e5e7eb";
/// Zero baseline and phase boundaries.
pub const REFERENCE_LINE: &str = "#9ca3af";
/// Default ink.
pub const INK: &str = "#111827";
/// Opposite-direction pass-through.
pub const NEGATIVE: &str = "#b91c1c";
/// Confidence band fill.
pub const BAND: &str = "#60a5fa";
/// Event markers.
pub const ALERT: &str = "#ef4444";

/// Series color for a driver.
pub const fn driver(driver: Driver) -> &'static str {
    match driver {
        Driver::Gas => GAS,
        Driver::Renewables => RENEWABLES,
        Driver::Imports => IMPORTS,
        Driver::Demand => DEMAND,
        Driver::Own => OWN,
    }
}
