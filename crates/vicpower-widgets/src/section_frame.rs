#![forbid(unsafe_code)]

//! The `<section>` wrapper whose class follows its reveal state.

use vicpower_core::section::{RevealState, SectionId};

use crate::context::RenderContext;
use crate::markup::Markup;
use crate::Widget;

/// A story section and its content.
pub struct SectionFrame<'a> {
    id: &'a SectionId,
    state: RevealState,
    class: Option<&'a str>,
    children: Vec<&'a dyn Widget>,
}

impl<'a> SectionFrame<'a> {
    pub fn new(id: &'a SectionId, state: RevealState) -> Self {
        Self {
            id,
            state,
            class: None,
            children: Vec::new(),
        }
    }

    /// Extra classes appended after the state class.
    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class).filter(|c| !c.trim().is_empty());
        self
    }

    /// Append a child widget.
    #[must_use]
    pub fn child(mut self, widget: &'a dyn Widget) -> Self {
        self.children.push(widget);
        self
    }

    /// The class attribute value.
    pub fn class_attr(&self) -> String {
        match self.class {
            Some(extra) => format!("section {} {}", self.state.as_class(), extra.trim()),
            None => format!("section {}", self.state.as_class()),
        }
    }
}

impl Widget for SectionFrame<'_> {
    fn render(&self, ctx: &RenderContext<'_>, out: &mut Markup) {
        let class = self.class_attr();
        out.open(
            "section",
            &[("id", self.id.as_str()), ("class", class.as_str())],
        );
        out.open("div", &[("class", "section-inner")]);
        for child in &self.children {
            child.render(ctx, out);
        }
        out.close("div").close("section").newline();
    }

    fn is_essential(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Raw;

    #[test]
    fn frame_class_tracks_state() {
        let id = SectionId::new("bills");
        let body = Raw("<p>x</p>");
        let frame = SectionFrame::new(&id, RevealState::Exiting)
            .class("mt-12")
            .child(&body);
        let mut out = Markup::new();
        frame.render(&RenderContext::new(), &mut out);
        assert_eq!(
            out.as_str(),
            "<section id=\"bills\" class=\"section exiting mt-12\">\
             <div class=\"section-inner\"><p>x</p></div></section>\n"
        );
    }

    #[test]
    fn blank_extra_class_is_ignored() {
        let id = SectionId::new("hero");
        let frame = SectionFrame::new(&id, RevealState::Idle).class("  ");
        assert_eq!(frame.class_attr(), "section idle");
    }
}
