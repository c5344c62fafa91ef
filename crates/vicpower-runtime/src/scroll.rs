#![forbid(unsafe_code)]

//! Deterministic scroll driver.
//!
//! [`ScrollSession`] lays sections out vertically, then replays a scroll
//! position through every section's observer in document order, the same way
//! the browser would deliver intersection callbacks within one frame.

use vicpower_core::geometry::Rect;
use vicpower_core::section::{RevealState, SectionId};
use web_time::Instant;

use crate::tracker::{MountedSection, SectionSpec, SectionTracker};

/// One mounted section and where it sits in the document.
#[derive(Debug)]
pub struct LaidOutSection {
    /// The live section.
    pub section: MountedSection,
    /// Its bounds in document coordinates.
    pub bounds: Rect,
}

/// A page of sections and a viewport that scrolls over them.
#[derive(Debug)]
pub struct ScrollSession {
    tracker: SectionTracker,
    sections: Vec<LaidOutSection>,
    viewport: Rect,
}

impl ScrollSession {
    /// A session with the viewport at the top of the document.
    pub fn new(tracker: SectionTracker, viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            tracker,
            sections: Vec::new(),
            viewport: Rect::new(0.0, 0.0, viewport_width.max(0.0), viewport_height.max(0.0)),
        }
    }

    /// The tracker behind this session.
    pub fn tracker(&self) -> &SectionTracker {
        &self.tracker
    }

    /// The current viewport rectangle.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Mount a section at `bounds` and deliver its initial observation.
    pub fn mount(&mut self, spec: SectionSpec, bounds: Rect, now: Instant) -> SectionId {
        let mut section = self.tracker.mount(spec, now);
        section.report(bounds, self.viewport, now);
        let id = section.id().clone();
        self.sections.push(LaidOutSection { section, bounds });
        id
    }

    /// Unmount a section. Returns false if it was not mounted.
    pub fn unmount(&mut self, id: &SectionId) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.section.id() != id);
        before != self.sections.len()
    }

    /// Move the viewport to `scroll_y` and run every observer. Returns the
    /// number of observations that fired.
    pub fn scroll_to(&mut self, scroll_y: f64, now: Instant) -> usize {
        let max = (self.document_height() - self.viewport.height).max(0.0);
        let y = if scroll_y.is_finite() {
            scroll_y.clamp(0.0, max)
        } else {
            0.0
        };
        self.viewport = self.viewport.offset_y(y - self.viewport.y);

        let viewport = self.viewport;
        let fired = self
            .sections
            .iter_mut()
            .filter_map(|s| s.section.report(s.bounds, viewport, now))
            .count();
        tracing::trace!(scroll_y = y, fired, "scroll frame processed");
        fired
    }

    /// Advance every settle timer.
    pub fn tick(&self, now: Instant) -> usize {
        self.sections
            .iter()
            .filter(|s| s.section.tick(now))
            .count()
    }

    /// Bottom edge of the lowest section.
    pub fn document_height(&self) -> f64 {
        self.sections
            .iter()
            .map(|s| s.bounds.bottom())
            .fold(0.0, f64::max)
    }

    /// Id and state of every section, in document order.
    pub fn states(&self) -> Vec<(SectionId, RevealState)> {
        self.sections
            .iter()
            .map(|s| (s.section.id().clone(), s.section.state()))
            .collect()
    }

    /// Ids currently in the `active` state.
    pub fn active_ids(&self) -> Vec<SectionId> {
        self.sections
            .iter()
            .filter(|s| s.section.state() == RevealState::Active)
            .map(|s| s.section.id().clone())
            .collect()
    }

    /// Look up a mounted section.
    pub fn section(&self, id: &SectionId) -> Option<&MountedSection> {
        self.sections
            .iter()
            .find(|s| s.section.id() == id)
            .map(|s| &s.section)
    }

    /// All sections in document order.
    pub fn sections(&self) -> &[LaidOutSection] {
        &self.sections
    }
}
