#![forbid(unsafe_code)]

//! Viewport intersection observation for a single section.
//!
//! An [`IntersectionObserver`] watches one target region. Each time the page
//! scrolls, the owner feeds it the target's bounds and the viewport; the
//! observer reports a [`VisibilityObservation`] only when the visible ratio
//! moves into a different threshold bucket.
//!
//! # Invariants
//!
//! 1. `intersection_ratio` is always within `[0, 1]`.
//! 2. The first observation after construction always fires.
//! 3. Repeated observations inside the same bucket never fire.
//! 4. A disconnected observer never fires again.
//!
//! The viewport is first expanded by the configured [`RootMargin`]; with the
//! default `-10% 0px -10% 0px` a section must reach the central 80% band of
//! the screen to count as visible, not merely peek in at the edge.

use crate::geometry::{Rect, RootMargin};

/// Configuration shared by every section observer on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverConfig {
    /// Ratios whose crossing produces an observation. Kept sorted.
    pub thresholds: Vec<f64>,
    /// Margin applied to the viewport before intersecting.
    pub root_margin: RootMargin,
    /// Minimum ratio at which a section may claim activation.
    pub activation_ratio: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            thresholds: vec![0.35, 0.5, 0.65],
            root_margin: RootMargin::vertical_inset_percent(10.0),
            activation_ratio: 0.35,
        }
    }
}

impl ObserverConfig {
    /// Replace the thresholds. Non-finite values are dropped and the rest are
    /// clamped to `[0, 1]`, sorted, and de-duplicated. An empty list behaves
    /// like `[0.0]`.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: impl IntoIterator<Item = f64>) -> Self {
        let mut list: Vec<f64> = thresholds
            .into_iter()
            .filter(|t| t.is_finite())
            .map(|t| t.clamp(0.0, 1.0))
            .collect();
        list.sort_by(f64::total_cmp);
        list.dedup();
        if list.is_empty() {
            list.push(0.0);
        }
        self.thresholds = list;
        self
    }

    /// Replace the root margin.
    #[must_use]
    pub fn with_root_margin(mut self, margin: RootMargin) -> Self {
        self.root_margin = margin;
        self
    }

    /// Replace the activation ratio.
    #[must_use]
    pub fn with_activation_ratio(mut self, ratio: f64) -> Self {
        self.activation_ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }
}

/// One report from an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityObservation {
    /// Fraction of the target inside the (margin-adjusted) viewport.
    pub intersection_ratio: f64,
    /// Whether the target touches the viewport at all.
    pub is_intersecting: bool,
}

impl VisibilityObservation {
    /// An observation of a target entirely off screen.
    pub const HIDDEN: Self = Self {
        intersection_ratio: 0.0,
        is_intersecting: false,
    };

    /// Whether this observation is strong enough to claim activation.
    #[inline]
    pub fn qualifies(&self, activation_ratio: f64) -> bool {
        self.is_intersecting && self.intersection_ratio >= activation_ratio
    }
}

/// Measures one section against the viewport and reports threshold crossings.
#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    config: ObserverConfig,
    last_bucket: Option<usize>,
    connected: bool,
    reports: u64,
}

impl IntersectionObserver {
    /// Create a connected observer.
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            last_bucket: None,
            connected: true,
            reports: 0,
        }
    }

    /// The observer's configuration.
    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    /// Compute the current visibility without changing observer state.
    pub fn measure(&self, target: Rect, viewport: Rect) -> VisibilityObservation {
        let root = viewport.expand(&self.config.root_margin);
        let Some(hit) = target.intersection(&root) else {
            return VisibilityObservation::HIDDEN;
        };

        let target_area = target.area();
        let ratio = if target_area > 0.0 {
            hit.area() / target_area
        } else {
            1.0
        };

        VisibilityObservation {
            intersection_ratio: if ratio.is_finite() {
                ratio.clamp(0.0, 1.0)
            } else {
                0.0
            },
            is_intersecting: true,
        }
    }

    /// Feed the latest geometry. Returns an observation only on a crossing.
    pub fn observe(&mut self, target: Rect, viewport: Rect) -> Option<VisibilityObservation> {
        if !self.connected {
            return None;
        }

        let observation = self.measure(target, viewport);
        let bucket = self.bucket(&observation);
        if self.last_bucket == Some(bucket) {
            return None;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            ratio = observation.intersection_ratio,
            intersecting = observation.is_intersecting,
            from = ?self.last_bucket,
            to = bucket,
            "intersection threshold crossed"
        );

        self.last_bucket = Some(bucket);
        self.reports += 1;
        Some(observation)
    }

    /// Stop observing. Idempotent.
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.last_bucket = None;
    }

    /// Whether the observer still reports.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Number of observations reported so far.
    pub fn report_count(&self) -> u64 {
        self.reports
    }

    /// Bucket 0 means "not intersecting"; bucket `n + 1` means the ratio has
    /// reached `n` thresholds.
    fn bucket(&self, observation: &VisibilityObservation) -> usize {
        if !observation.is_intersecting {
            return 0;
        }
        1 + self
            .config
            .thresholds
            .iter()
            .filter(|&&t| observation.intersection_ratio >= t)
            .count()
    }
}
