#![forbid(unsafe_code)]

//! Compact/detailed switch.

use vicpower_runtime::detail_mode::DetailMode;

use crate::context::RenderContext;
use crate::markup::Markup;
use crate::Widget;

/// Toggle showing the current detail mode.
///
/// Reads the mode from the context, so it must render inside a provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailToggle;

impl Widget for DetailToggle {
    fn render(&self, ctx: &RenderContext<'_>, out: &mut Markup) {
        let mode = ctx.detail_mode();
        let other = mode.toggled();
        let button_label = format!("Switch to {} view", other.as_str());
        let pressed = if mode == DetailMode::Detailed {
            "true"
        } else {
            "false"
        };
        out.open(
            "div",
            &[
                ("class", "detail-toggle"),
                ("role", "group"),
                ("aria-label", "Toggle detail level"),
            ],
        );
        out.element("span", &[("class", "detail-toggle__mode")], mode.label());
        out.open(
            "button",
            &[
                ("type", "button"),
                ("class", "detail-toggle__button"),
                ("aria-label", button_label.as_str()),
                ("aria-pressed", pressed),
                ("data-mode", mode.as_str()),
            ],
        );
        out.open("span", &[("class", "detail-toggle__track")]);
        out.element("span", &[("class", "detail-toggle__thumb")], "");
        out.close("span").close("button").close("div").newline();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_to_string;
    use vicpower_runtime::detail_mode::DetailModeProvider;

    #[test]
    fn labels_follow_mode() {
        let provider = DetailModeProvider::default();
        let ctx = RenderContext::new().with_detail(&provider);
        let html = render_to_string(&DetailToggle, &ctx);
        assert!(html.contains("<span class=\"detail-toggle__mode\">Compact</span>"));
        assert!(html.contains("aria-label=\"Switch to detailed view\""));
        assert!(html.contains("aria-pressed=\"false\""));

        provider.set_mode(DetailMode::Detailed);
        let html = render_to_string(&DetailToggle, &ctx);
        assert!(html.contains(">Detailed<"));
        assert!(html.contains("aria-label=\"Switch to compact view\""));
        assert!(html.contains("aria-pressed=\"true\""));
    }

    #[test]
    #[should_panic(expected = "outside of a DetailModeProvider")]
    fn toggle_outside_provider_panics() {
        let _ = render_to_string(&DetailToggle, &RenderContext::new());
    }
}
