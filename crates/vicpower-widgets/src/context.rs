#![forbid(unsafe_code)]

//! Per-render inputs shared by every widget.

use std::collections::HashMap;

use vicpower_core::section::SectionId;
use vicpower_runtime::detail_mode::{DetailMode, DetailModeProvider, use_detail_mode};

/// What a widget may read while rendering.
///
/// The detail-mode provider is optional so that compositions can be checked:
/// a narrative rendered without one panics, the same as reading the mode
/// outside its provider.
#[derive(Debug, Default)]
pub struct RenderContext<'a> {
    detail: Option<&'a DetailModeProvider>,
    replay: HashMap<SectionId, u64>,
}

impl<'a> RenderContext<'a> {
    /// A context with no provider and no replay keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the detail-mode provider.
    #[must_use]
    pub fn with_detail(mut self, provider: &'a DetailModeProvider) -> Self {
        self.detail = Some(provider);
        self
    }

    /// Record the replay key of the charts bound to `section`.
    #[must_use]
    pub fn with_replay_key(mut self, section: impl Into<SectionId>, key: u64) -> Self {
        self.replay.insert(section.into(), key);
        self
    }

    /// The provider, if any.
    pub fn detail_provider(&self) -> Option<&'a DetailModeProvider> {
        self.detail
    }

    /// Current detail mode.
    ///
    /// # Panics
    ///
    /// Panics when no provider is attached.
    #[track_caller]
    pub fn detail_mode(&self) -> DetailMode {
        use_detail_mode(self.detail)
    }

    /// Replay key for `section`; zero when its section never activated.
    pub fn replay_key(&self, section: &SectionId) -> u64 {
        self.replay.get(section).copied().unwrap_or(0)
    }
}
