#![forbid(unsafe_code)]

//! Core: page geometry, section identity, and viewport intersection.
//!
//! Nothing in this crate knows about broadcasting or rendering. It answers
//! two questions: "which section is this?" and "how much of it is on screen?".

pub mod geometry;
pub mod observer;
pub mod section;

pub use geometry::{Length, ParseMarginError, Rect, RootMargin};
pub use observer::{IntersectionObserver, ObserverConfig, VisibilityObservation};
pub use section::{RevealState, SectionId, SectionIdGenerator};
