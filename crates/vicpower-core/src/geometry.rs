#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixel space.
//!
//! Page coordinates grow downwards: `y = 0` is the top of the document and a
//! viewport is simply a [`Rect`] positioned at the current scroll offset.

use std::fmt;
use std::str::FromStr;

/// An axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area in square pixels. Negative extents count as zero.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Compute the overlapping region with another rectangle.
    ///
    /// Edge-adjacent rectangles overlap in a zero-area rectangle, which still
    /// counts as an intersection (the platform observer reports it the same
    /// way). Returns `None` only when the rectangles are disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < x || bottom < y {
            return None;
        }
        Some(Rect::new(x, y, right - x, bottom - y))
    }

    /// Grow (positive margin) or shrink (negative margin) the rectangle.
    ///
    /// Percentages resolve against this rectangle's own height (top/bottom)
    /// and width (left/right), matching how a root margin is applied to the
    /// viewport.
    pub fn expand(&self, margin: &RootMargin) -> Rect {
        let top = margin.top.resolve(self.height);
        let right = margin.right.resolve(self.width);
        let bottom = margin.bottom.resolve(self.height);
        let left = margin.left.resolve(self.width);

        Rect {
            x: self.x - left,
            y: self.y - top,
            width: (self.width + left + right).max(0.0),
            height: (self.height + top + bottom).max(0.0),
        }
    }

    /// Translate vertically.
    #[inline]
    pub fn offset_y(&self, dy: f64) -> Rect {
        Rect {
            y: self.y + dy,
            ..*self
        }
    }
}

/// A CSS length used by root margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Absolute pixels.
    Px(f64),
    /// Percentage of the reference extent (`-10.0` means `-10%`).
    Percent(f64),
}

impl Length {
    /// Resolve to pixels against the given reference extent.
    #[inline]
    pub fn resolve(self, reference: f64) -> f64 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => reference * pct / 100.0,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(px) => write!(f, "{px}px"),
            Length::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

impl FromStr for Length {
    type Err = ParseMarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, make): (&str, fn(f64) -> Length) = if let Some(n) = s.strip_suffix('%') {
            (n, Length::Percent)
        } else if let Some(n) = s.strip_suffix("px") {
            (n, Length::Px)
        } else if s == "0" {
            ("0", Length::Px)
        } else {
            return Err(ParseMarginError::MissingUnit(s.to_string()));
        };

        let value: f64 = number
            .parse()
            .map_err(|_| ParseMarginError::InvalidNumber(s.to_string()))?;
        if !value.is_finite() {
            return Err(ParseMarginError::InvalidNumber(s.to_string()));
        }
        Ok(make(value))
    }
}

/// Error returned when a root margin string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMarginError {
    /// No lengths, or more than four.
    Arity(usize),
    /// A length without `px` or `%`.
    MissingUnit(String),
    /// The numeric part did not parse as a finite number.
    InvalidNumber(String),
}

impl fmt::Display for ParseMarginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMarginError::Arity(n) => write!(f, "expected 1 to 4 lengths, got {n}"),
            ParseMarginError::MissingUnit(s) => write!(f, "length {s:?} needs a px or % unit"),
            ParseMarginError::InvalidNumber(s) => write!(f, "length {s:?} is not a finite number"),
        }
    }
}

impl std::error::Error for ParseMarginError {}

/// Margin applied to the viewport before intersection is computed.
///
/// Uses the CSS shorthand order: top, right, bottom, left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    /// Create a margin from explicit edges.
    pub const fn new(top: Length, right: Length, bottom: Length, left: Length) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Shrink the viewport vertically by the same percentage at both ends.
    pub const fn vertical_inset_percent(pct: f64) -> Self {
        Self::new(
            Length::Percent(-pct),
            Length::Px(0.0),
            Length::Percent(-pct),
            Length::Px(0.0),
        )
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl FromStr for RootMargin {
    type Err = ParseMarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Length>, _>>()?;

        match parts.as_slice() {
            [all] => Ok(Self::new(*all, *all, *all, *all)),
            [v, h] => Ok(Self::new(*v, *h, *v, *h)),
            [t, h, b] => Ok(Self::new(*t, *h, *b, *h)),
            [t, r, b, l] => Ok(Self::new(*t, *r, *b, *l)),
            other => Err(ParseMarginError::Arity(other.len())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_overlap() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));
    }

    #[test]
    fn intersection_disjoint_is_none() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 20.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn intersection_edge_adjacent_is_empty_but_present() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 10.0, 10.0, 10.0);
        let hit = a.intersection(&b).expect("adjacent rects touch");
        assert!(hit.is_empty());
    }

    #[test]
    fn expand_with_negative_percent_shrinks_vertically() {
        let viewport = Rect::new(0.0, 1000.0, 1200.0, 800.0);
        let shrunk = viewport.expand(&RootMargin::vertical_inset_percent(10.0));
        assert_eq!(shrunk, Rect::new(0.0, 1080.0, 1200.0, 640.0));
    }

    #[test]
    fn expand_never_produces_negative_extent() {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        let gone = viewport.expand(&RootMargin::vertical_inset_percent(80.0));
        assert_eq!(gone.height, 0.0);
    }

    #[test]
    fn parse_four_value_margin() {
        let m: RootMargin = "-10% 0px -10% 0px".parse().unwrap();
        assert_eq!(m, RootMargin::vertical_inset_percent(10.0));
    }

    #[test]
    fn parse_shorthand_forms() {
        let one: RootMargin = "5px".parse().unwrap();
        assert_eq!(one.left, Length::Px(5.0));
        let two: RootMargin = "-10% 0".parse().unwrap();
        assert_eq!(two.bottom, Length::Percent(-10.0));
        assert_eq!(two.right, Length::Px(0.0));
        let three: RootMargin = "1px 2px 3px".parse().unwrap();
        assert_eq!(three.left, Length::Px(2.0));
        assert_eq!(three.bottom, Length::Px(3.0));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!("".parse::<RootMargin>(), Err(ParseMarginError::Arity(0)));
        assert!(matches!(
            "10".parse::<RootMargin>(),
            Err(ParseMarginError::MissingUnit(_))
        ));
        assert!(matches!(
            "abc%".parse::<RootMargin>(),
            Err(ParseMarginError::InvalidNumber(_))
        ));
        assert_eq!(
            "1px 1px 1px 1px 1px".parse::<RootMargin>(),
            Err(ParseMarginError::Arity(5))
        );
    }

    #[test]
    fn margin_display_round_trips() {
        let m = RootMargin::vertical_inset_percent(10.0);
        let parsed: RootMargin = m.to_string().parse().unwrap();
        assert_eq!(parsed, m);
    }
}
