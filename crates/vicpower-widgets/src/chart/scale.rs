#![forbid(unsafe_code)]

//! Value-to-pixel mappings.

use vicpower_data::results::YearMonth;

/// Linear map from a value domain to a pixel range.
///
/// A degenerate domain is widened by one on each side, so a flat series
/// still draws in the middle of the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl LinearScale {
    /// Map `[d0, d1]` onto `[r0, r1]`. For a y axis pass `r0` as the bottom.
    pub fn new((d0, d1): (f64, f64), (r0, r1): (f64, f64)) -> Self {
        let (mut d0, mut d1) = (d0, d1);
        if !d0.is_finite() || !d1.is_finite() {
            d0 = 0.0;
            d1 = 1.0;
        }
        if (d1 - d0).abs() < f64::EPSILON {
            d0 -= 1.0;
            d1 += 1.0;
        }
        Self { d0, d1, r0, r1 }
    }

    /// Domain `[0, max]` where `max` covers every value, or `[0, 1]` if none.
    pub fn zero_based_max(values: impl IntoIterator<Item = f64>) -> f64 {
        let max = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        if max.is_finite() && max > 0.0 { max } else { 1.0 }
    }

    /// `(min, max)` over finite values, or `None` when there are none.
    pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// The domain.
    pub fn domain(&self) -> (f64, f64) {
        (self.d0, self.d1)
    }

    /// Pixel position of `v`.
    pub fn apply(&self, v: f64) -> f64 {
        let t = (v - self.d0) / (self.d1 - self.d0);
        let t = if t.is_nan() { 0.0 } else { t };
        self.r0 + t * (self.r1 - self.r0)
    }

    /// `count + 1` evenly spaced values across the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let count = count.max(1);
        let step = (self.d1 - self.d0) / count as f64;
        (0..=count).map(|i| self.d0 + step * i as f64).collect()
    }
}

/// Horizontal axis over calendar months.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthAxis {
    first: i64,
    last: i64,
    x0: f64,
    x1: f64,
}

impl MonthAxis {
    /// Axis spanning `first..=last` onto `[x0, x1]`.
    pub fn new(first: YearMonth, last: YearMonth, x0: f64, x1: f64) -> Self {
        let (a, b) = (first.ordinal(), last.ordinal());
        Self {
            first: a.min(b),
            last: a.max(b),
            x0,
            x1,
        }
    }

    /// Axis covering every parseable month in `dates`.
    pub fn covering<'a>(dates: impl IntoIterator<Item = &'a str>, x0: f64, x1: f64) -> Option<Self> {
        let months: Vec<YearMonth> = dates.into_iter().filter_map(YearMonth::parse).collect();
        let first = months.iter().min()?;
        let last = months.iter().max()?;
        Some(Self::new(*first, *last, x0, x1))
    }

    /// Pixel position of `month`, clamped to the axis.
    pub fn x(&self, month: YearMonth) -> f64 {
        if self.first == self.last {
            return (self.x0 + self.x1) / 2.0;
        }
        let o = month.ordinal().clamp(self.first, self.last);
        let t = (o - self.first) as f64 / (self.last - self.first) as f64;
        self.x0 + t * (self.x1 - self.x0)
    }

    /// Whether `month` falls inside the axis.
    pub fn contains(&self, month: YearMonth) -> bool {
        (self.first..=self.last).contains(&month.ordinal())
    }

    /// Left and right pixel bounds.
    pub fn span(&self) -> (f64, f64) {
        (self.x0, self.x1)
    }
}

/// First available month of each year, in order of appearance.
pub fn year_ticks<'a>(dates: impl IntoIterator<Item = &'a str>) -> Vec<YearMonth> {
    let mut ticks: Vec<YearMonth> = Vec::new();
    for month in dates.into_iter().filter_map(YearMonth::parse) {
        if !ticks.iter().any(|t| t.year == month.year) {
            ticks.push(month);
        }
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    #[test]
    fn linear_scale_maps_and_inverts_y() {
        let s = LinearScale::new((0.0, 1.0), (200.0, 0.0));
        assert_eq!(s.apply(0.0), 200.0);
        assert_eq!(s.apply(1.0), 0.0);
        assert_eq!(s.apply(0.5), 100.0);
    }

    #[test]
    fn degenerate_domain_is_widened() {
        let s = LinearScale::new((3.0, 3.0), (0.0, 100.0));
        assert_eq!(s.domain(), (2.0, 4.0));
        assert_eq!(s.apply(3.0), 50.0);
        let s = LinearScale::new((f64::NAN, 1.0), (0.0, 10.0));
        assert_eq!(s.domain(), (0.0, 1.0));
    }

    #[test]
    fn extent_and_max_skip_non_finite() {
        assert_eq!(LinearScale::extent([1.0, f64::NAN, -2.0]), Some((-2.0, 1.0)));
        assert_eq!(LinearScale::extent(std::iter::empty()), None);
        assert_eq!(LinearScale::zero_based_max([4.0, f64::INFINITY]), 4.0);
        assert_eq!(LinearScale::zero_based_max(std::iter::empty()), 1.0);
    }

    #[test]
    fn month_axis_positions() {
        let axis = MonthAxis::new(ym(2015, 1), ym(2015, 11), 0.0, 100.0);
        assert_eq!(axis.x(ym(2015, 1)), 0.0);
        assert_eq!(axis.x(ym(2015, 6)), 50.0);
        assert_eq!(axis.x(ym(2030, 1)), 100.0);
        assert!(!axis.contains(ym(2014, 12)));

        let single = MonthAxis::new(ym(2020, 1), ym(2020, 1), 0.0, 10.0);
        assert_eq!(single.x(ym(2020, 1)), 5.0);
    }

    #[test]
    fn ticks_take_first_month_per_year() {
        let ticks = year_ticks(["2015-03", "2015-04", "2016-01", "bad", "2016-02", "2017-07"]);
        assert_eq!(ticks, vec![ym(2015, 3), ym(2016, 1), ym(2017, 7)]);
    }
}
