#![forbid(unsafe_code)]

//! "Scroll to explore" hint under the hero.

use vicpower_runtime::consumer::ScrollCueVisibility;

use crate::context::RenderContext;
use crate::markup::Markup;
use crate::Widget;

pub const SCROLL_CUE_TEXT: &str = "Scroll to explore ↓";

/// The hint, shown or hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollCue {
    visible: bool,
}

impl ScrollCue {
    pub const fn new(visible: bool) -> Self {
        Self { visible }
    }

    /// Mirror a visibility consumer.
    pub fn from_visibility(visibility: &ScrollCueVisibility) -> Self {
        Self::new(visibility.is_visible())
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Widget for ScrollCue {
    fn render(&self, _ctx: &RenderContext<'_>, out: &mut Markup) {
        let class = if self.visible {
            "scroll-cue scroll-cue--visible"
        } else {
            "scroll-cue scroll-cue--hidden"
        };
        out.element(
            "div",
            &[("class", class), ("aria-hidden", "true")],
            SCROLL_CUE_TEXT,
        );
        out.newline();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_to_string;
    use vicpower_runtime::consumer::ActivationConsumer;
    use vicpower_core::section::SectionId;

    #[test]
    fn follows_hero_visibility() {
        let mut visibility = ScrollCueVisibility::new("hero");
        let ctx = RenderContext::new();
        let html = render_to_string(&ScrollCue::from_visibility(&visibility), &ctx);
        assert_eq!(
            html,
            "<div class=\"scroll-cue scroll-cue--visible\" aria-hidden=\"true\">Scroll to explore ↓</div>\n"
        );

        visibility.on_activate(&SectionId::new("old-story"));
        let html = render_to_string(&ScrollCue::from_visibility(&visibility), &ctx);
        assert!(html.contains("scroll-cue--hidden"));
    }
}
