#![forbid(unsafe_code)]

//! Card strip of market events.

use crate::context::RenderContext;
use crate::markup::Markup;
use crate::Widget;

/// One card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEvent {
    pub id: String,
    pub year: String,
    pub label: String,
    pub description: String,
}

impl TimelineEvent {
    pub fn new(
        id: impl Into<String>,
        year: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            year: year.into(),
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Timeline panel.
#[derive(Debug, Clone, Copy)]
pub struct Timeline<'a> {
    events: &'a [TimelineEvent],
}

impl<'a> Timeline<'a> {
    pub fn new(events: &'a [TimelineEvent]) -> Self {
        Self { events }
    }
}

impl Widget for Timeline<'_> {
    fn render(&self, _ctx: &RenderContext<'_>, out: &mut Markup) {
        out.open("div", &[("class", "timeline")]);
        out.open("div", &[("class", "timeline__header")]);
        out.open("div", &[]);
        out.element(
            "p",
            &[("class", "timeline__kicker")],
            "Victoria power market timeline",
        );
        out.element(
            "p",
            &[("class", "timeline__lede")],
            "Four shocks that reshape how prices are set.",
        );
        out.close("div");
        out.element("p", &[("class", "timeline__span")], "2017–2025");
        out.close("div");

        out.open("div", &[("class", "timeline__track")]);
        out.element("div", &[("class", "timeline-progress")], "");
        out.close("div");

        out.open("div", &[("class", "timeline__cards")]);
        for event in self.events {
            out.open(
                "div",
                &[("class", "timeline-card"), ("data-event", event.id.as_str())],
            );
            out.open("div", &[("class", "timeline-card__head")]);
            out.element("span", &[("class", "timeline-card__year")], &event.year);
            out.element("span", &[("class", "timeline-card__label")], &event.label);
            out.close("div");
            out.element("p", &[("class", "timeline-card__text")], &event.description);
            out.close("div");
        }
        out.close("div").close("div").newline();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_to_string;

    #[test]
    fn one_card_per_event() {
        let events = vec![
            TimelineEvent::new("hazelwood", "2017", "Hazelwood closes", "Coal exits."),
            TimelineEvent::new("ukraine", "2022", "Gas shock", "Prices & caps."),
        ];
        let html = render_to_string(&Timeline::new(&events), &RenderContext::new());
        assert_eq!(html.matches("class=\"timeline-card\"").count(), 2);
        assert!(html.contains("Prices &amp; caps."));
        assert!(html.contains("Victoria power market timeline"));
    }
}
