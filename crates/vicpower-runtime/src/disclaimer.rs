#![forbid(unsafe_code)]

//! Small-screen viewing disclaimer.
//!
//! The disclaimer opens on viewports no wider than
//! [`SMALL_SCREEN_MAX_WIDTH`] unless the visitor dismissed it before.
//! Dismissal is remembered in the [`ClientStore`] under
//! [`DISCLAIMER_STORAGE_KEY`].

use crate::state_persistence::{ClientStore, StorageResult};

/// Storage key for the dismissal flag.
pub const DISCLAIMER_STORAGE_KEY: &str = "vic-power-mobile-disclaimer-dismissed";

/// Widest viewport, in CSS pixels, treated as a small screen.
pub const SMALL_SCREEN_MAX_WIDTH: f64 = 768.0;

/// Whether the mobile disclaimer should be shown.
#[derive(Debug)]
pub struct DisclaimerGate<'a> {
    store: &'a ClientStore,
    viewport_width: f64,
    dismissed: bool,
}

impl<'a> DisclaimerGate<'a> {
    /// Read the dismissal flag and remember the viewport width.
    pub fn evaluate(store: &'a ClientStore, viewport_width: f64) -> Self {
        let dismissed = store
            .get_item(DISCLAIMER_STORAGE_KEY)
            .is_some_and(|v| v == "true");
        Self {
            store,
            viewport_width,
            dismissed,
        }
    }

    /// Whether the viewport counts as a small screen.
    pub fn is_small_screen(&self) -> bool {
        self.viewport_width.is_finite() && self.viewport_width <= SMALL_SCREEN_MAX_WIDTH
    }

    /// Whether the disclaimer is open.
    pub fn is_open(&self) -> bool {
        self.is_small_screen() && !self.dismissed
    }

    /// Update the viewport width, as on a resize.
    pub fn resize(&mut self, viewport_width: f64) {
        self.viewport_width = viewport_width;
    }

    /// Close the disclaimer and persist the choice.
    pub fn dismiss(&mut self) -> StorageResult<()> {
        self.dismissed = true;
        self.store.set_item(DISCLAIMER_STORAGE_KEY, "true");
        self.store.flush()?;
        tracing::info!("mobile disclaimer dismissed");
        Ok(())
    }
}
