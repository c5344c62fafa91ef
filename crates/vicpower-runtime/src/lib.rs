#![forbid(unsafe_code)]

//! Runtime: the active-section protocol and the client state around it.
//!
//! - [`broadcast`]: synchronous pub/sub with RAII subscriptions.
//! - [`registry`]: which section is active, with check-and-set adoption.
//! - [`reveal`]: per-section `idle -> active -> exiting -> idle` machine.
//! - [`tracker`]: mounts sections and wires the pieces together.
//! - [`scroll`]: deterministic scroll driver over a laid-out page.
//! - [`consumer`]: breadcrumb, scroll cue, and chart replay subscribers.
//! - [`detail_mode`]: compact/detailed narrative toggle.
//! - [`state_persistence`] and [`disclaimer`]: persisted client flags.

pub mod broadcast;
pub mod consumer;
pub mod detail_mode;
pub mod disclaimer;
pub mod registry;
pub mod reveal;
pub mod scroll;
pub mod state_persistence;
pub mod tracker;

pub use broadcast::{Broadcast, Delivery, ListenerFailure, ListenerId, Subscription};
pub use consumer::{ActivationConsumer, Attached, ChartReplay, LastActivated, ScrollCueVisibility};
pub use detail_mode::{DetailMode, DetailModeProvider, ParseDetailModeError, use_detail_mode};
pub use disclaimer::{DISCLAIMER_STORAGE_KEY, DisclaimerGate, SMALL_SCREEN_MAX_WIDTH};
pub use registry::ActiveSectionRegistry;
pub use reveal::{DEFAULT_SETTLE_DELAY, RevealSection, SectionActivated};
pub use scroll::{LaidOutSection, ScrollSession};
#[cfg(feature = "state-persistence")]
pub use state_persistence::FileStorage;
pub use state_persistence::{ClientStore, MemoryStorage, StorageBackend, StorageError, StorageResult};
pub use tracker::{MountedSection, SectionSpec, SectionTracker, TrackerConfig};

pub use web_time::Instant;
