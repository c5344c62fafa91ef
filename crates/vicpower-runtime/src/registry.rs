#![forbid(unsafe_code)]

//! The single source of truth for which section is active.
//!
//! The registry is an explicitly constructed object, created by the page's
//! composition root and shared by reference with every section it mounts.
//! Independent registries never observe each other, so tests can build as
//! many as they need.
//!
//! All access happens on one thread; `try_activate` runs to completion before
//! any other observer callback can run, which is what makes its
//! check-and-set effectively atomic.

use std::cell::{Cell, RefCell};

use vicpower_core::section::SectionId;

/// Records the identity of the most recently adopted section.
#[derive(Debug, Default)]
pub struct ActiveSectionRegistry {
    current: RefCell<Option<SectionId>>,
    adoptions: Cell<u64>,
}

impl ActiveSectionRegistry {
    /// Create a registry with no active section.
    #[must_use]
    pub fn create() -> Self {
        Self::default()
    }

    /// The current holder, if any.
    pub fn current(&self) -> Option<SectionId> {
        self.current.borrow().clone()
    }

    /// Whether any section has been adopted yet.
    pub fn has_active(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Whether `id` is the current holder.
    pub fn is_current(&self, id: &SectionId) -> bool {
        self.current.borrow().as_ref() == Some(id)
    }

    /// Adopt `id` as current iff it differs from the current holder.
    ///
    /// Returns `true` when the caller won activation and should publish.
    /// Blank ids never activate.
    pub fn try_activate(&self, id: &SectionId) -> bool {
        if id.is_blank() {
            return false;
        }

        let mut current = self.current.borrow_mut();
        if current.as_ref() == Some(id) {
            return false;
        }

        tracing::debug!(
            from = current.as_ref().map(SectionId::as_str),
            to = id.as_str(),
            "active section adopted"
        );
        *current = Some(id.clone());
        self.adoptions.set(self.adoptions.get() + 1);
        true
    }

    /// Clear the holder if it is `id`. Returns `true` when something was
    /// cleared.
    ///
    /// Called when a section unmounts, so a later mount with the same id can
    /// bootstrap again.
    pub fn release(&self, id: &SectionId) -> bool {
        let mut current = self.current.borrow_mut();
        if current.as_ref() != Some(id) {
            return false;
        }
        tracing::debug!(section = id.as_str(), "active section released");
        *current = None;
        true
    }

    /// Total number of successful activations.
    pub fn adoption_count(&self) -> u64 {
        self.adoptions.get()
    }
}
