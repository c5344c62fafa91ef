#![forbid(unsafe_code)]

//! Number formatting for labels, tooltips, and tables.
//!
//! Every formatter returns `None` for non-finite input so that a bad value
//! renders nothing instead of `NaN`.

/// Placeholder for a missing value.
pub const DASH: &str = "—";

/// Inline bar labels are dropped below this percentage.
pub const MIN_LABEL_PERCENT: f64 = 8.0;
/// Inline bar labels are dropped below this segment width, in pixels.
pub const MIN_LABEL_WIDTH: f64 = 32.0;
/// At or above this percentage inline labels drop their decimal.
pub const WHOLE_PERCENT_FROM: f64 = 20.0;

/// `Some(v)` when `v` is finite.
pub fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Fixed-point with `decimals` places, never `-0`.
pub fn fixed(v: f64, decimals: usize) -> Option<String> {
    let v = finite(v)?;
    let s = format!("{:.*}", decimals, v + 0.0);
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        return Some(s[1..].to_string());
    }
    Some(s)
}

/// A fraction as a percentage: `0.021` with one decimal is `2.1%`.
pub fn percent(fraction: f64, decimals: usize) -> Option<String> {
    fixed(fraction * 100.0, decimals).map(|s| format!("{s}%"))
}

/// Like [`percent`], with [`DASH`] for missing or non-finite values.
pub fn percent_or_dash(fraction: Option<f64>, decimals: usize) -> String {
    fraction
        .and_then(|f| percent(f, decimals))
        .unwrap_or_else(|| DASH.to_string())
}

/// A currency amount: `$12.34`.
pub fn dollars(v: f64, decimals: usize) -> Option<String> {
    fixed(v, decimals).map(|s| format!("${s}"))
}

/// A difference of two fractions in percentage points: `1.2 pp`.
pub fn percentage_points(delta: f64) -> Option<String> {
    fixed(delta * 100.0, 1).map(|s| format!("{s} pp"))
}

/// Label drawn inside a stacked-bar segment.
///
/// `fraction` is the segment's share of the axis and `width` its drawn width
/// in pixels. Small or narrow segments get an empty label.
pub fn inline_segment_label(fraction: f64, width: f64) -> String {
    let pct = fraction * 100.0;
    if !pct.is_finite() || !width.is_finite() {
        return String::new();
    }
    if pct < MIN_LABEL_PERCENT || width < MIN_LABEL_WIDTH {
        return String::new();
    }
    let decimals = if pct >= WHOLE_PERCENT_FROM { 0 } else { 1 };
    fixed(pct, decimals)
        .map(|s| format!("{s}%"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_formats_to_none() {
        assert_eq!(percent(f64::NAN, 1), None);
        assert_eq!(dollars(f64::INFINITY, 2), None);
        assert_eq!(percentage_points(f64::NEG_INFINITY), None);
        assert_eq!(percent_or_dash(Some(f64::NAN), 1), DASH);
        assert_eq!(percent_or_dash(None, 1), DASH);
    }

    #[test]
    fn percent_and_money() {
        assert_eq!(percent(0.02, 1).as_deref(), Some("2.0%"));
        assert_eq!(percent(0.1234, 2).as_deref(), Some("12.34%"));
        assert_eq!(dollars(9.5, 2).as_deref(), Some("$9.50"));
        assert_eq!(dollars(118.4, 0).as_deref(), Some("$118"));
        assert_eq!(percentage_points(0.012).as_deref(), Some("1.2 pp"));
    }

    #[test]
    fn negative_zero_is_normalized() {
        assert_eq!(fixed(-0.0001, 1).as_deref(), Some("0.0"));
        assert_eq!(percent(-0.0, 1).as_deref(), Some("0.0%"));
        assert_eq!(fixed(-0.26, 1).as_deref(), Some("-0.3"));
    }

    #[test]
    fn segment_labels() {
        assert_eq!(inline_segment_label(0.05, 20.0), "");
        assert_eq!(inline_segment_label(0.05, 200.0), "");
        assert_eq!(inline_segment_label(0.5, 20.0), "");
        assert_eq!(inline_segment_label(0.15, 80.0), "15.0%");
        assert_eq!(inline_segment_label(0.75, 300.0), "75%");
        assert_eq!(inline_segment_label(0.1, 32.0), "10.0%");
        assert_eq!(inline_segment_label(f64::NAN, 100.0), "");
    }
}
