#![forbid(unsafe_code)]

//! Chart building blocks shared by the data components.

pub mod frame;
pub mod scale;

pub use frame::{ChartFrame, Margins, area_path, band_path, line_path};
pub use scale::{LinearScale, MonthAxis, year_ticks};
