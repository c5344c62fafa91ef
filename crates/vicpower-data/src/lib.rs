#![forbid(unsafe_code)]

//! Data: pipeline result types and the loaders that read them.

pub mod loader;
pub mod results;

pub use loader::{
    DataDir, DataError, Dataset, FEVD_DEMAND_FIRST_FILE, FEVD_REN_FIRST_FILE, FEVD_TREND_FILE,
    MODEL_READY_FILE, REN_SHARE_FILE, ROLLING_BETA_FILE,
};
pub use results::{
    ChartEvent, Driver, DriverShares, FevdFullRow, FevdTrendPoint, ModelReadyPoint, RenSharePoint,
    RollingBetaPoint, YearMonth,
};
