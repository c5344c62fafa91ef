#![forbid(unsafe_code)]

//! Section mounting and activation arbitration.
//!
//! A [`SectionTracker`] is the composition root for one page: it owns the
//! [`ActiveSectionRegistry`] and the activation [`Broadcast`] channel and
//! hands out [`MountedSection`]s. Each mounted section owns its observer and a
//! subscription to the channel; dropping it releases both.
//!
//! # Invariants
//!
//! 1. A broadcast is published only when the registry's check-and-set wins,
//!    so each genuine activation yields exactly one broadcast.
//! 2. Mounting a section while nothing is active claims activation for it.
//! 3. At most one mounted section is `active` at any time.
//! 4. Unmounting the current holder releases it from the registry.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use vicpower_core::geometry::Rect;
use vicpower_core::observer::{IntersectionObserver, ObserverConfig, VisibilityObservation};
use vicpower_core::section::{RevealState, SectionId, SectionIdGenerator};
use web_time::Instant;

use crate::broadcast::{Broadcast, Delivery, Subscription};
use crate::registry::ActiveSectionRegistry;
use crate::reveal::{DEFAULT_SETTLE_DELAY, RevealSection, SectionActivated};

/// Tunables shared by every section on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Intersection observer settings.
    pub observer: ObserverConfig,
    /// Delay for the `exiting -> idle` decay.
    pub settle_delay: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            observer: ObserverConfig::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl TrackerConfig {
    /// Replace the observer config.
    #[must_use]
    pub fn with_observer(mut self, observer: ObserverConfig) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the settle delay.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

/// What to mount.
#[derive(Debug, Clone, Default)]
pub struct SectionSpec {
    /// Caller-supplied id; generated when absent or blank.
    pub id: Option<SectionId>,
}

impl SectionSpec {
    /// A section with a fixed id.
    pub fn with_id(id: impl Into<SectionId>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    /// A section whose id will be generated.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Owns the registry and broadcast channel for one page.
#[derive(Debug)]
pub struct SectionTracker {
    registry: Rc<ActiveSectionRegistry>,
    bus: Broadcast<SectionActivated>,
    config: TrackerConfig,
    ids: RefCell<SectionIdGenerator>,
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl SectionTracker {
    /// Create a tracker with a fresh registry and channel.
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_registry(Rc::new(ActiveSectionRegistry::create()), config)
    }

    /// Create a tracker over an existing registry.
    pub fn with_registry(registry: Rc<ActiveSectionRegistry>, config: TrackerConfig) -> Self {
        Self {
            registry,
            bus: Broadcast::new(),
            config,
            ids: RefCell::new(SectionIdGenerator::new()),
        }
    }

    /// The registry.
    pub fn registry(&self) -> &ActiveSectionRegistry {
        &self.registry
    }

    /// The activation channel. Consumers subscribe here.
    pub fn bus(&self) -> &Broadcast<SectionActivated> {
        &self.bus
    }

    /// The shared configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Try to make `id` active, publishing on success.
    pub fn activate(&self, id: &SectionId, now: Instant) -> Option<Delivery> {
        announce(&self.registry, &self.bus, id, now)
    }

    /// Mount a section: subscribe it, connect its observer, then bootstrap
    /// activation if nothing is active yet.
    pub fn mount(&self, spec: SectionSpec, now: Instant) -> MountedSection {
        let id = self.ids.borrow_mut().resolve(spec.id);
        let state = Rc::new(RefCell::new(RevealSection::new(
            id.clone(),
            self.config.settle_delay,
        )));

        let weak: Weak<RefCell<RevealSection>> = Rc::downgrade(&state);
        let subscription = self.bus.subscribe(move |event: &SectionActivated| {
            if let Some(state) = weak.upgrade() {
                match state.try_borrow_mut() {
                    Ok(mut state) => {
                        state.handle_broadcast(event);
                    }
                    Err(_) => tracing::warn!(
                        section = event.id.as_str(),
                        "section state busy during broadcast; event dropped"
                    ),
                }
            }
        });

        let mounted = MountedSection {
            id: id.clone(),
            state,
            observer: IntersectionObserver::new(self.config.observer.clone()),
            registry: Rc::clone(&self.registry),
            bus: self.bus.clone(),
            _subscription: subscription,
        };
        tracing::debug!(section = id.as_str(), "section mounted");

        if !self.registry.has_active() {
            tracing::debug!(section = id.as_str(), "bootstrapping first active section");
            announce(&self.registry, &self.bus, &id, now);
        }
        mounted
    }
}

fn announce(
    registry: &ActiveSectionRegistry,
    bus: &Broadcast<SectionActivated>,
    id: &SectionId,
    now: Instant,
) -> Option<Delivery> {
    if !registry.try_activate(id) {
        return None;
    }
    Some(bus.publish(&SectionActivated {
        id: id.clone(),
        at: now,
    }))
}

/// A live section. Dropping it disconnects the observer, unsubscribes, and
/// releases the registry if this section holds it.
#[derive(Debug)]
pub struct MountedSection {
    id: SectionId,
    state: Rc<RefCell<RevealSection>>,
    observer: IntersectionObserver,
    registry: Rc<ActiveSectionRegistry>,
    bus: Broadcast<SectionActivated>,
    _subscription: Subscription,
}

impl MountedSection {
    /// The section's stable id.
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    /// Current reveal state.
    pub fn state(&self) -> RevealState {
        self.state.borrow().state()
    }

    /// Activation counter, for chart replay keys.
    pub fn activation_count(&self) -> u64 {
        self.state.borrow().activation_count()
    }

    /// A copy of the full state machine.
    pub fn snapshot(&self) -> RevealSection {
        self.state.borrow().clone()
    }

    /// Feed new geometry. On a threshold crossing that qualifies, consults the
    /// registry and publishes if this section won. Returns the observation when
    /// one fired.
    pub fn report(
        &mut self,
        target: Rect,
        viewport: Rect,
        now: Instant,
    ) -> Option<VisibilityObservation> {
        let observation = self.observer.observe(target, viewport)?;
        if observation.qualifies(self.observer.config().activation_ratio) {
            announce(&self.registry, &self.bus, &self.id, now);
        }
        Some(observation)
    }

    /// Advance the settle timer.
    pub fn tick(&self, now: Instant) -> bool {
        self.state.borrow_mut().tick(now)
    }
}

impl Drop for MountedSection {
    fn drop(&mut self) {
        self.observer.disconnect();
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.cancel_settle();
        }
        self.registry.release(&self.id);
        tracing::debug!(section = self.id.as_str(), "section unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT_H: f64 = 1000.0;

    fn viewport_at(y: f64) -> Rect {
        Rect::new(0.0, y, 1200.0, VIEWPORT_H)
    }

    fn band(index: usize) -> Rect {
        Rect::new(0.0, index as f64 * 1000.0, 1200.0, 1000.0)
    }

    #[test]
    fn first_mount_bootstraps() {
        let tracker = SectionTracker::default();
        let t0 = Instant::now();
        let hero = tracker.mount(SectionSpec::with_id("hero"), t0);
        assert_eq!(hero.state(), RevealState::Active);
        assert_eq!(tracker.registry().current(), Some(SectionId::new("hero")));
        assert_eq!(tracker.bus().published_count(), 1);
    }

    #[test]
    fn later_mounts_do_not_bootstrap() {
        let tracker = SectionTracker::default();
        let t0 = Instant::now();
        let _hero = tracker.mount(SectionSpec::with_id("hero"), t0);
        let bills = tracker.mount(SectionSpec::with_id("bills"), t0);
        assert_eq!(bills.state(), RevealState::Idle);
        assert_eq!(tracker.bus().published_count(), 1);
    }

    #[test]
    fn anonymous_sections_get_generated_ids() {
        let tracker = SectionTracker::default();
        let t0 = Instant::now();
        let a = tracker.mount(SectionSpec::anonymous(), t0);
        let b = tracker.mount(SectionSpec::anonymous(), t0);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn scrolling_hands_activation_over() {
        let tracker = SectionTracker::default();
        let t0 = Instant::now();
        let mut hero = tracker.mount(SectionSpec::with_id("hero"), t0);
        let mut bills = tracker.mount(SectionSpec::with_id("bills"), t0);

        hero.report(band(0), viewport_at(1000.0), t0);
        bills.report(band(1), viewport_at(1000.0), t0);

        assert_eq!(bills.state(), RevealState::Active);
        assert_eq!(hero.state(), RevealState::Exiting);

        assert!(hero.tick(t0 + DEFAULT_SETTLE_DELAY));
        assert_eq!(hero.state(), RevealState::Idle);
    }

    #[test]
    fn activate_twice_publishes_once() {
        let tracker = SectionTracker::default();
        let t0 = Instant::now();
        let id = SectionId::new("timeline");
        assert!(tracker.activate(&id, t0).is_some());
        assert!(tracker.activate(&id, t0).is_none());
        assert_eq!(tracker.bus().published_count(), 1);
    }

    #[test]
    fn drop_releases_subscription() {
        let tracker = SectionTracker::default();
        let t0 = Instant::now();
        let hero = tracker.mount(SectionSpec::with_id("hero"), t0);
        assert_eq!(tracker.bus().subscriber_count(), 1);
        drop(hero);
        assert_eq!(tracker.bus().subscriber_count(), 0);
        assert!(!tracker.registry().has_active());
    }

    #[test]
    fn dropping_an_idle_section_keeps_the_holder() {
        let tracker = SectionTracker::default();
        let t0 = Instant::now();
        let _hero = tracker.mount(SectionSpec::with_id("hero"), t0);
        let bills = tracker.mount(SectionSpec::with_id("bills"), t0);
        drop(bills);
        assert_eq!(tracker.registry().current(), Some(SectionId::new("hero")));
    }

    #[test]
    fn remounted_holder_becomes_active_again() {
        let tracker = SectionTracker::default();
        let t0 = Instant::now();
        let hero = tracker.mount(SectionSpec::with_id("hero"), t0);
        let _bills = tracker.mount(SectionSpec::with_id("bills"), t0);
        drop(hero);

        let hero = tracker.mount(SectionSpec::with_id("hero"), t0);
        assert_eq!(hero.state(), RevealState::Active);
        assert_eq!(tracker.registry().current(), Some(SectionId::new("hero")));
        assert_eq!(tracker.bus().published_count(), 2);
    }

    #[test]
    fn custom_settle_delay() {
        let config = TrackerConfig::default().with_settle_delay(Duration::from_millis(10));
        let tracker = SectionTracker::new(config);
        let t0 = Instant::now();
        let hero = tracker.mount(SectionSpec::with_id("hero"), t0);
        let _bills = tracker.mount(SectionSpec::with_id("bills"), t0);
        tracker.activate(&"bills".into(), t0);
        assert!(hero.tick(t0 + Duration::from_millis(10)));
    }
}
