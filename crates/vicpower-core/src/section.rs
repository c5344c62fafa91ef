#![forbid(unsafe_code)]

//! Section identity and visual state.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Stable identity of one content section.
///
/// Cheap to clone; the string is shared. An empty id is representable but is
/// never allowed to become the active section.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(Arc<str>);

impl SectionId {
    /// Create an id from any string.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// The id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty (or whitespace only).
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionId({:?})", &*self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SectionId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl Borrow<str> for SectionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SectionId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for SectionId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Hands out ids for sections mounted without a caller-supplied id.
///
/// Each call yields a fresh id; callers keep the id they were given for the
/// section's whole lifetime, so a re-render never regenerates it.
#[derive(Debug, Default)]
pub struct SectionIdGenerator {
    next: u64,
}

impl SectionIdGenerator {
    /// Create a generator starting at `section-0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the caller's id when present, otherwise generate one.
    pub fn resolve(&mut self, supplied: Option<SectionId>) -> SectionId {
        match supplied {
            Some(id) if !id.is_blank() => id,
            _ => self.generate(),
        }
    }

    /// Generate the next id.
    pub fn generate(&mut self) -> SectionId {
        let id = SectionId::new(format!("section-{}", self.next));
        self.next += 1;
        id
    }
}

/// Visual state of a section wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum RevealState {
    /// Not in focus.
    #[default]
    Idle,
    /// The one section currently in focus.
    Active,
    /// Lost focus recently; settles to [`RevealState::Idle`] after a delay.
    Exiting,
}

impl RevealState {
    /// CSS class name for this state.
    pub const fn as_class(self) -> &'static str {
        match self {
            RevealState::Idle => "idle",
            RevealState::Active => "active",
            RevealState::Exiting => "exiting",
        }
    }
}

impl fmt::Display for RevealState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_class())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_compare_with_str() {
        let id = SectionId::new("hero");
        assert_eq!(id, "hero");
        assert_eq!(id.as_str(), "hero");
        assert_eq!(format!("{id}"), "hero");
    }

    #[test]
    fn blank_ids() {
        assert!(SectionId::new("").is_blank());
        assert!(SectionId::new("  ").is_blank());
        assert!(!SectionId::new("a").is_blank());
    }

    #[test]
    fn generator_prefers_supplied_id() {
        let mut generator = SectionIdGenerator::new();
        assert_eq!(generator.resolve(Some("bills".into())), "bills");
        assert_eq!(generator.resolve(None), "section-0");
        assert_eq!(generator.resolve(Some("".into())), "section-1");
        assert_eq!(generator.generate(), "section-2");
    }

    #[test]
    fn state_classes() {
        assert_eq!(RevealState::default(), RevealState::Idle);
        assert_eq!(RevealState::Active.as_class(), "active");
        assert_eq!(RevealState::Exiting.to_string(), "exiting");
    }
}
