#![forbid(unsafe_code)]

//! Chart containers that replay their entrance when their section activates.
//!
//! The key written to `data-replay-key` comes from a
//! [`ChartReplay`](vicpower_runtime::consumer::ChartReplay) consumer via the
//! [`RenderContext`]. A changed key remounts the chart client side; a key of
//! zero means the section has not activated yet and nothing animates.

use vicpower_core::section::SectionId;

use crate::context::RenderContext;
use crate::markup::Markup;

/// `<figure>` wrapper bound to an optional section.
#[derive(Debug, Clone, Copy)]
pub struct ReplayFigure<'a> {
    class: &'a str,
    section: Option<&'a SectionId>,
}

impl<'a> ReplayFigure<'a> {
    pub fn new(class: &'a str, section: Option<&'a SectionId>) -> Self {
        Self { class, section }
    }

    /// Start tag.
    pub fn open(&self, ctx: &RenderContext<'_>, out: &mut Markup) {
        let class = format!("chart {}", self.class);
        match self.section {
            Some(section) => {
                let key = ctx.replay_key(section);
                let key_text = key.to_string();
                out.open(
                    "figure",
                    &[
                        ("class", class.as_str()),
                        ("data-section", section.as_str()),
                        ("data-replay-key", key_text.as_str()),
                        ("data-animate", if key > 0 { "true" } else { "false" }),
                    ],
                );
            }
            None => {
                out.open("figure", &[("class", class.as_str())]);
            }
        }
    }

    /// End tag.
    pub fn close(&self, out: &mut Markup) {
        out.close("figure");
    }
}
