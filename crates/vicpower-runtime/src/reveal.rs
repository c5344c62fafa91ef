#![forbid(unsafe_code)]

//! Per-section reveal state machine.
//!
//! ```text
//!            own id broadcast                 other id broadcast
//!   idle ───────────────────▶ active ─────────────────────────▶ exiting
//!    ▲                          ▲                                  │
//!    │                          └──────── own id broadcast ────────┤
//!    └──────────────── settle delay elapsed (tick) ────────────────┘
//! ```
//!
//! Transitions are driven only by [`SectionActivated`] events and by
//! [`RevealSection::tick`], which performs the timed `exiting -> idle`
//! decay. Re-activation clears any pending settle deadline, so a stale timer
//! can never push an active section back to idle.

use std::time::Duration;

use vicpower_core::section::{RevealState, SectionId};
use web_time::Instant;

/// Default delay before an exiting section settles to idle.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(650);

/// Broadcast payload: "section `id` became active at `at`".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionActivated {
    /// The newly active section.
    pub id: SectionId,
    /// When the activation was published.
    pub at: Instant,
}

/// Local visual state of one section.
#[derive(Debug, Clone)]
pub struct RevealSection {
    id: SectionId,
    state: RevealState,
    settle_delay: Duration,
    settle_deadline: Option<Instant>,
    activations: u64,
}

impl RevealSection {
    /// A section in the `idle` state.
    pub fn new(id: SectionId, settle_delay: Duration) -> Self {
        Self {
            id,
            state: RevealState::Idle,
            settle_delay,
            settle_deadline: None,
            activations: 0,
        }
    }

    /// The section's identity.
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    /// Current state.
    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Bumped once per activation; chart replays key on this.
    pub fn activation_count(&self) -> u64 {
        self.activations
    }

    /// When the pending `exiting -> idle` transition fires, if any.
    pub fn settle_deadline(&self) -> Option<Instant> {
        self.settle_deadline
    }

    /// Apply a broadcast. Returns the new state when it changed.
    pub fn handle_broadcast(&mut self, event: &SectionActivated) -> Option<RevealState> {
        if event.id == self.id {
            self.settle_deadline = None;
            self.activations += 1;
            return self.transition(RevealState::Active);
        }

        if self.state == RevealState::Active {
            self.settle_deadline = Some(event.at + self.settle_delay);
            return self.transition(RevealState::Exiting);
        }

        None
    }

    /// Fire the settle timer if it has elapsed. Returns true on transition.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.settle_deadline {
            Some(deadline) if self.state == RevealState::Exiting && now >= deadline => {
                self.settle_deadline = None;
                self.transition(RevealState::Idle).is_some()
            }
            _ => false,
        }
    }

    /// Drop any pending settle timer without changing state.
    pub fn cancel_settle(&mut self) {
        self.settle_deadline = None;
    }

    fn transition(&mut self, next: RevealState) -> Option<RevealState> {
        if self.state == next {
            return None;
        }
        tracing::trace!(
            section = self.id.as_str(),
            from = %self.state,
            to = %next,
            "reveal state changed"
        );
        self.state = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, at: Instant) -> SectionActivated {
        SectionActivated { id: id.into(), at }
    }

    #[test]
    fn own_broadcast_activates() {
        let t0 = Instant::now();
        let mut section = RevealSection::new("hero".into(), DEFAULT_SETTLE_DELAY);
        assert_eq!(section.state(), RevealState::Idle);
        assert_eq!(
            section.handle_broadcast(&event("hero", t0)),
            Some(RevealState::Active)
        );
        assert_eq!(section.activation_count(), 1);
    }

    #[test]
    fn foreign_broadcast_while_idle_is_ignored() {
        let t0 = Instant::now();
        let mut section = RevealSection::new("hero".into(), DEFAULT_SETTLE_DELAY);
        assert_eq!(section.handle_broadcast(&event("bills", t0)), None);
        assert_eq!(section.settle_deadline(), None);
    }

    #[test]
    fn exit_then_settle() {
        let t0 = Instant::now();
        let mut section = RevealSection::new("hero".into(), DEFAULT_SETTLE_DELAY);
        section.handle_broadcast(&event("hero", t0));
        section.handle_broadcast(&event("bills", t0));
        assert_eq!(section.state(), RevealState::Exiting);

        assert!(!section.tick(t0 + Duration::from_millis(649)));
        assert_eq!(section.state(), RevealState::Exiting);
        assert!(section.tick(t0 + Duration::from_millis(650)));
        assert_eq!(section.state(), RevealState::Idle);
    }

    #[test]
    fn reactivation_cancels_stale_timer() {
        let t0 = Instant::now();
        let mut section = RevealSection::new("hero".into(), DEFAULT_SETTLE_DELAY);
        section.handle_broadcast(&event("hero", t0));
        section.handle_broadcast(&event("bills", t0));
        section.handle_broadcast(&event("hero", t0 + Duration::from_millis(100)));

        assert!(!section.tick(t0 + Duration::from_secs(5)));
        assert_eq!(section.state(), RevealState::Active);
        assert_eq!(section.activation_count(), 2);
    }

    #[test]
    fn second_foreign_broadcast_keeps_first_deadline() {
        let t0 = Instant::now();
        let mut section = RevealSection::new("hero".into(), DEFAULT_SETTLE_DELAY);
        section.handle_broadcast(&event("hero", t0));
        section.handle_broadcast(&event("bills", t0));
        let deadline = section.settle_deadline();
        section.handle_broadcast(&event("timeline", t0 + Duration::from_millis(300)));
        assert_eq!(section.settle_deadline(), deadline);
    }

    #[test]
    fn cancel_settle_freezes_exiting() {
        let t0 = Instant::now();
        let mut section = RevealSection::new("hero".into(), DEFAULT_SETTLE_DELAY);
        section.handle_broadcast(&event("hero", t0));
        section.handle_broadcast(&event("bills", t0));
        section.cancel_settle();
        assert!(!section.tick(t0 + Duration::from_secs(1)));
        assert_eq!(section.state(), RevealState::Exiting);
    }
}
