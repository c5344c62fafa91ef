#![forbid(unsafe_code)]

//! Compact/detailed narrative toggle.
//!
//! The mode is held by a [`DetailModeProvider`] that the composition root
//! creates and threads through rendering. Reading the mode without a provider
//! is a wiring bug and panics.

use std::cell::Cell;
use std::fmt;
use std::str::FromStr;

use crate::broadcast::{Broadcast, Subscription};

/// Which narrative variant to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DetailMode {
    /// Short text.
    #[default]
    Compact,
    /// Long text with methodology notes.
    Detailed,
}

impl DetailMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            DetailMode::Compact => DetailMode::Detailed,
            DetailMode::Detailed => DetailMode::Compact,
        }
    }

    /// Lower-case name, as used in markup attributes.
    pub const fn as_str(self) -> &'static str {
        match self {
            DetailMode::Compact => "compact",
            DetailMode::Detailed => "detailed",
        }
    }

    /// Button label.
    pub const fn label(self) -> &'static str {
        match self {
            DetailMode::Compact => "Compact",
            DetailMode::Detailed => "Detailed",
        }
    }
}

impl fmt::Display for DetailMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDetailModeError(pub String);

impl fmt::Display for ParseDetailModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown detail mode {:?} (expected compact or detailed)", self.0)
    }
}

impl std::error::Error for ParseDetailModeError {}

impl FromStr for DetailMode {
    type Err = ParseDetailModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(DetailMode::Compact),
            "detailed" => Ok(DetailMode::Detailed),
            _ => Err(ParseDetailModeError(s.to_string())),
        }
    }
}

/// Scoped holder of the current [`DetailMode`].
#[derive(Debug)]
pub struct DetailModeProvider {
    mode: Cell<DetailMode>,
    changes: Broadcast<DetailMode>,
}

impl Default for DetailModeProvider {
    fn default() -> Self {
        Self::new(DetailMode::default())
    }
}

impl DetailModeProvider {
    /// A provider starting in `initial`.
    pub fn new(initial: DetailMode) -> Self {
        Self {
            mode: Cell::new(initial),
            changes: Broadcast::new(),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> DetailMode {
        self.mode.get()
    }

    /// Set the mode, notifying subscribers if it changed.
    pub fn set_mode(&self, mode: DetailMode) -> bool {
        if self.mode.replace(mode) == mode {
            return false;
        }
        tracing::debug!(mode = %mode, "detail mode changed");
        self.changes.publish(&mode);
        true
    }

    /// Flip the mode and return the new value.
    pub fn toggle(&self) -> DetailMode {
        let next = self.mode().toggled();
        self.set_mode(next);
        next
    }

    /// Listen for mode changes.
    #[must_use = "dropping the Subscription immediately unsubscribes the listener"]
    pub fn subscribe(&self, listener: impl Fn(&DetailMode) + 'static) -> Subscription {
        self.changes.subscribe(listener)
    }
}

/// Read the mode from an optional provider.
///
/// # Panics
///
/// Panics when `provider` is `None`: the caller was composed outside a
/// provider.
#[track_caller]
pub fn use_detail_mode(provider: Option<&DetailModeProvider>) -> DetailMode {
    match provider {
        Some(provider) => provider.mode(),
        None => panic!("detail mode read outside of a DetailModeProvider"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn defaults_to_compact() {
        assert_eq!(DetailModeProvider::default().mode(), DetailMode::Compact);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("Detailed".parse::<DetailMode>(), Ok(DetailMode::Detailed));
        assert_eq!(" compact ".parse::<DetailMode>(), Ok(DetailMode::Compact));
        assert!("verbose".parse::<DetailMode>().is_err());
        assert_eq!(DetailMode::Detailed.to_string(), "detailed");
    }

    #[test]
    fn toggle_notifies_subscribers() {
        let provider = DetailModeProvider::default();
        let seen = Rc::new(Cell::new(None));
        let s = Rc::clone(&seen);
        let _sub = provider.subscribe(move |m| s.set(Some(*m)));

        assert_eq!(provider.toggle(), DetailMode::Detailed);
        assert_eq!(seen.get(), Some(DetailMode::Detailed));
    }

    #[test]
    fn setting_same_mode_is_silent() {
        let provider = DetailModeProvider::new(DetailMode::Detailed);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = provider.subscribe(move |_| h.set(h.get() + 1));
        assert!(!provider.set_mode(DetailMode::Detailed));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn reading_with_provider() {
        let provider = DetailModeProvider::new(DetailMode::Detailed);
        assert_eq!(use_detail_mode(Some(&provider)), DetailMode::Detailed);
    }

    #[test]
    #[should_panic(expected = "outside of a DetailModeProvider")]
    fn reading_without_provider_panics() {
        use_detail_mode(None);
    }
}
