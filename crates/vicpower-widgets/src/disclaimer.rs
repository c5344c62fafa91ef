#![forbid(unsafe_code)]

//! "Best viewed on desktop" dialog for small screens.

use vicpower_runtime::disclaimer::DisclaimerGate;

use crate::context::RenderContext;
use crate::markup::Markup;
use crate::Widget;

pub const TITLE: &str = "Best viewed on desktop";
pub const BODY: [&str; 2] = [
    "This site has been designed for desktop screens. On phones and small tablets some layouts, charts or interactions may not work as expected.",
    "You can keep browsing on this device, but for the best experience please visit on a laptop or desktop computer.",
];
pub const CONTINUE_LABEL: &str = "Continue on this device";

/// The dialog; renders nothing while closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobileDisclaimer {
    open: bool,
}

impl MobileDisclaimer {
    pub const fn new(open: bool) -> Self {
        Self { open }
    }

    /// Open exactly when the gate says so.
    pub fn from_gate(gate: &DisclaimerGate<'_>) -> Self {
        Self::new(gate.is_open())
    }

    pub const fn is_open(&self) -> bool {
        self.open
    }
}

impl Widget for MobileDisclaimer {
    fn render(&self, _ctx: &RenderContext<'_>, out: &mut Markup) {
        if !self.open {
            return;
        }
        out.open(
            "div",
            &[
                ("class", "mobile-disclaimer"),
                ("role", "dialog"),
                ("aria-modal", "true"),
                ("aria-label", "Mobile experience notice"),
            ],
        );
        out.element("div", &[("class", "mobile-disclaimer__backdrop")], "");
        out.open("div", &[("class", "mobile-disclaimer__dialog")]);
        out.element("h2", &[("class", "mobile-disclaimer__title")], TITLE);
        for paragraph in BODY {
            out.element("p", &[("class", "mobile-disclaimer__body")], paragraph);
        }
        out.element(
            "button",
            &[("type", "button"), ("class", "mobile-disclaimer__continue")],
            CONTINUE_LABEL,
        );
        out.close("div").close("div").newline();
    }

    fn is_essential(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_to_string;
    use vicpower_runtime::disclaimer::DISCLAIMER_STORAGE_KEY;
    use vicpower_runtime::state_persistence::ClientStore;

    #[test]
    fn closed_renders_nothing() {
        let html = render_to_string(&MobileDisclaimer::new(false), &RenderContext::new());
        assert!(html.is_empty());
    }

    #[test]
    fn small_screen_without_flag_opens() {
        let store = ClientStore::in_memory();
        let gate = DisclaimerGate::evaluate(&store, 390.0);
        let html = render_to_string(&MobileDisclaimer::from_gate(&gate), &RenderContext::new());
        assert!(html.contains("role=\"dialog\""));
        assert!(html.contains(TITLE));
        assert!(html.contains(CONTINUE_LABEL));
    }

    #[test]
    fn dismissed_flag_keeps_it_closed() {
        let store = ClientStore::in_memory();
        store.set_item(DISCLAIMER_STORAGE_KEY, "true");
        let gate = DisclaimerGate::evaluate(&store, 390.0);
        assert!(!MobileDisclaimer::from_gate(&gate).is_open());
    }
}
