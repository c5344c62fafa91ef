#![forbid(unsafe_code)]

//! Passive activation consumers.
//!
//! Breadcrumbs, the scroll cue, and chart replay triggers all react to the
//! same [`SectionActivated`] broadcasts. Each implements
//! [`ActivationConsumer`] and is attached to the channel with
//! [`Attached::attach`], which owns the consumer and its subscription
//! together so teardown always unsubscribes. Consumers attached after a
//! section is already active use [`Attached::attach_synced`] to pick up the
//! current holder first.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use vicpower_core::section::SectionId;

use crate::broadcast::{Broadcast, Subscription};
use crate::registry::ActiveSectionRegistry;
use crate::reveal::SectionActivated;

/// Something that re-renders when a section becomes active.
pub trait ActivationConsumer {
    /// Called synchronously for every activation broadcast.
    fn on_activate(&mut self, id: &SectionId);

    /// Called once on attach with the registry's current holder.
    ///
    /// This is not a broadcast; consumers that count broadcasts override it.
    fn on_sync(&mut self, current: &SectionId) {
        self.on_activate(current);
    }
}

/// A consumer bound to a broadcast channel.
#[derive(Debug)]
pub struct Attached<C> {
    consumer: Rc<RefCell<C>>,
    _subscription: Subscription,
}

impl<C: ActivationConsumer + 'static> Attached<C> {
    /// Subscribe `consumer` to `bus`.
    pub fn attach(bus: &Broadcast<SectionActivated>, consumer: C) -> Self {
        let consumer = Rc::new(RefCell::new(consumer));
        let weak = Rc::downgrade(&consumer);
        let subscription = bus.subscribe(move |event: &SectionActivated| {
            let Some(consumer) = weak.upgrade() else {
                return;
            };
            match consumer.try_borrow_mut() {
                Ok(mut consumer) => consumer.on_activate(&event.id),
                Err(_) => tracing::warn!(
                    section = event.id.as_str(),
                    "consumer busy during broadcast; event dropped"
                ),
            }
        });
        Self {
            consumer,
            _subscription: subscription,
        }
    }

    /// Bring `consumer` up to date with `registry`, then subscribe it.
    pub fn attach_synced(
        bus: &Broadcast<SectionActivated>,
        registry: &ActiveSectionRegistry,
        mut consumer: C,
    ) -> Self {
        if let Some(current) = registry.current() {
            consumer.on_sync(&current);
        }
        Self::attach(bus, consumer)
    }

    /// Borrow the consumer.
    pub fn get(&self) -> Ref<'_, C> {
        self.consumer.borrow()
    }

    /// Run `f` against the consumer.
    pub fn with<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.consumer.borrow())
    }
}

/// Shows the scroll cue only while the hero section is active.
#[derive(Debug, Clone)]
pub struct ScrollCueVisibility {
    hero: SectionId,
    visible: bool,
}

impl ScrollCueVisibility {
    /// Track visibility relative to `hero`. Starts visible, since the hero is
    /// the section the page opens on.
    pub fn new(hero: impl Into<SectionId>) -> Self {
        Self {
            hero: hero.into(),
            visible: true,
        }
    }

    /// Whether the cue is currently shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl ActivationConsumer for ScrollCueVisibility {
    fn on_activate(&mut self, id: &SectionId) {
        self.visible = *id == self.hero;
    }
}

/// Replay trigger for one chart.
///
/// The key increments only when the chart's own section is broadcast, so
/// re-renders without a new broadcast never replay the animation.
#[derive(Debug, Clone)]
pub struct ChartReplay {
    section: SectionId,
    key: u64,
}

impl ChartReplay {
    /// A trigger for charts inside `section`.
    pub fn new(section: impl Into<SectionId>) -> Self {
        Self {
            section: section.into(),
            key: 0,
        }
    }

    /// The section this trigger watches.
    pub fn section(&self) -> &SectionId {
        &self.section
    }

    /// Current replay key. Zero until the section first activates.
    pub fn key(&self) -> u64 {
        self.key
    }
}

impl ActivationConsumer for ChartReplay {
    fn on_activate(&mut self, id: &SectionId) {
        if *id == self.section {
            self.key += 1;
        }
    }

    fn on_sync(&mut self, _current: &SectionId) {}
}

/// Records the last broadcast id, for diagnostics and traces.
#[derive(Debug, Clone, Default)]
pub struct LastActivated {
    last: Option<SectionId>,
    seen: u64,
}

impl LastActivated {
    /// The most recent id, if any.
    pub fn last(&self) -> Option<&SectionId> {
        self.last.as_ref()
    }

    /// Number of broadcasts seen.
    pub fn seen(&self) -> u64 {
        self.seen
    }
}

impl ActivationConsumer for LastActivated {
    fn on_activate(&mut self, id: &SectionId) {
        self.last = Some(id.clone());
        self.seen += 1;
    }

    fn on_sync(&mut self, current: &SectionId) {
        self.last = Some(current.clone());
    }
}
