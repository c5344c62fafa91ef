#![forbid(unsafe_code)]

//! Composition root for the story page.
//!
//! [`StoryPage`] owns one [`ScrollSession`] with every story section mounted
//! in order, plus the consumers listening on its activation channel:
//! breadcrumbs, the scroll cue, and one replay trigger per chart section.
//! Rendering reads their current state; nothing here mutates it.

use std::cell::RefCell;
use std::rc::Rc;

use vicpower_core::geometry::Rect;
use vicpower_core::section::{RevealState, SectionId};
use vicpower_data::Dataset;
use vicpower_runtime::{
    Attached, ChartReplay, DetailModeProvider, Instant, ScrollCueVisibility, ScrollSession,
    SectionActivated, SectionSpec, SectionTracker, Subscription, TrackerConfig,
};
use vicpower_widgets::{
    BillSensitivityTable, Breadcrumbs, DetailToggle, FevdNowChart, FevdTrendStrip, Markup,
    MobileDisclaimer, ModelReadyCharts, Narrative, PhaseAverages, Raw, RenShareChart,
    RenderContext, RollingBetaChart, ScrollCue, SectionFrame, Timeline, TimelineEvent, Widget,
};

use crate::story::{self, SectionKind, StorySection};

/// Window size used for layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The mounted story and its activation consumers.
#[derive(Debug)]
pub struct StoryPage {
    session: ScrollSession,
    breadcrumbs: Attached<Breadcrumbs>,
    scroll_cue: Attached<ScrollCueVisibility>,
    replays: Vec<Attached<ChartReplay>>,
    activations: Rc<RefCell<Vec<SectionId>>>,
    _recorder: Subscription,
}

impl StoryPage {
    /// Lay the sections out top to bottom and mount them with the viewport at
    /// the top of the page. Consumers attach first so they see the bootstrap
    /// activation.
    pub fn mount(viewport: Viewport, now: Instant) -> Self {
        let tracker = SectionTracker::new(TrackerConfig::default());
        let mut session = ScrollSession::new(tracker, viewport.width, viewport.height);
        let bus = session.tracker().bus().clone();
        let registry = session.tracker().registry();

        let breadcrumbs = Attached::attach_synced(&bus, registry, story::breadcrumbs());
        let scroll_cue =
            Attached::attach_synced(&bus, registry, ScrollCueVisibility::new(story::HERO));
        let replays = story::SECTIONS
            .iter()
            .filter(|s| s.kind.has_chart())
            .map(|s| Attached::attach_synced(&bus, registry, ChartReplay::new(s.id)))
            .collect();
        let activations: Rc<RefCell<Vec<SectionId>>> = Rc::default();
        let sink = Rc::clone(&activations);
        let recorder = bus.subscribe(move |event: &SectionActivated| {
            sink.borrow_mut().push(event.id.clone());
        });

        let mut top = 0.0;
        for section in &story::SECTIONS {
            let height = section.height * viewport.height;
            session.mount(
                SectionSpec::with_id(section.id),
                Rect::new(0.0, top, viewport.width, height),
                now,
            );
            top += height;
        }
        tracing::debug!(
            sections = story::SECTIONS.len(),
            document_height = top,
            "story mounted"
        );

        Self {
            session,
            breadcrumbs,
            scroll_cue,
            replays,
            activations,
            _recorder: recorder,
        }
    }

    /// Scroll to `scroll_y` and advance settle timers to `now`.
    pub fn scroll_to(&mut self, scroll_y: f64, now: Instant) {
        self.session.scroll_to(scroll_y, now);
        self.session.tick(now);
    }

    /// Broadcast ids since the last call, oldest first.
    pub fn take_activations(&self) -> Vec<SectionId> {
        std::mem::take(&mut *self.activations.borrow_mut())
    }

    pub fn session(&self) -> &ScrollSession {
        &self.session
    }

    /// Current scroll offset.
    pub fn scroll_y(&self) -> f64 {
        self.session.viewport().y
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll(&self) -> f64 {
        (self.session.document_height() - self.session.viewport().height).max(0.0)
    }

    /// The highlighted breadcrumb.
    pub fn highlighted(&self) -> Option<SectionId> {
        self.breadcrumbs.get().active().cloned()
    }

    pub fn scroll_cue_visible(&self) -> bool {
        self.scroll_cue.get().is_visible()
    }

    /// Replay key of the chart section `id`; zero for sections without one.
    pub fn replay_key(&self, id: &str) -> u64 {
        self.replays
            .iter()
            .find_map(|r| r.with(|r| (r.section().as_str() == id).then(|| r.key())))
            .unwrap_or(0)
    }

    /// Reveal state of a story section.
    pub fn state_of(&self, id: &str) -> RevealState {
        self.session
            .section(&SectionId::new(id))
            .map_or(RevealState::Idle, |s| s.state())
    }

    /// Context carrying the detail provider and every replay key.
    pub fn render_context<'a>(&self, detail: &'a DetailModeProvider) -> RenderContext<'a> {
        self.replays
            .iter()
            .fold(RenderContext::new().with_detail(detail), |ctx, replay| {
                let (section, key) = replay.with(|r| (r.section().clone(), r.key()));
                ctx.with_replay_key(section, key)
            })
    }

    /// The complete HTML document for the current state.
    pub fn render_document(
        &self,
        data: &Dataset,
        detail: &DetailModeProvider,
        disclaimer: MobileDisclaimer,
    ) -> String {
        let ctx = self.render_context(detail);
        let mut out = Markup::with_capacity(64 * 1024);

        out.raw("<!DOCTYPE html>\n");
        out.open("html", &[("lang", "en")]).newline();
        out.open("head", &[]).newline();
        out.void("meta", &[("charset", "utf-8")]).newline();
        out.void(
            "meta",
            &[
                ("name", "viewport"),
                ("content", "width=device-width, initial-scale=1"),
            ],
        )
        .newline();
        out.element("title", &[], story::TITLE).newline();
        out.void(
            "meta",
            &[("name", "description"), ("content", story::DESCRIPTION)],
        )
        .newline();
        out.void("link", &[("rel", "stylesheet"), ("href", "styles.css")])
            .newline();
        out.close("head").newline();
        out.open("body", &[("class", "font-sans bg-white text-black")])
            .newline();

        DetailToggle.render(&ctx, &mut out);
        self.breadcrumbs.with(|crumbs| crumbs.render(&ctx, &mut out));
        ScrollCue::from_visibility(&self.scroll_cue.get()).render(&ctx, &mut out);
        disclaimer.render(&ctx, &mut out);

        let timeline = story::timeline_events();
        out.open("main", &[]).newline();
        for section in &story::SECTIONS {
            let id = SectionId::new(section.id);
            let widgets = section_widgets(section, &id, data, &timeline);
            let frame = widgets.iter().fold(
                SectionFrame::new(&id, self.state_of(section.id)).class(section.class),
                |frame, widget| frame.child(&**widget),
            );
            frame.render(&ctx, &mut out);
        }
        out.close("main").newline();
        out.close("body").newline();
        out.close("html").newline();
        out.into_string()
    }
}

fn section_widgets<'a>(
    section: &StorySection,
    id: &'a SectionId,
    data: &'a Dataset,
    timeline: &'a [TimelineEvent],
) -> Vec<Box<dyn Widget + 'a>> {
    let mut widgets: Vec<Box<dyn Widget + 'a>> = Vec::new();
    if !section.prose.is_empty() {
        widgets.push(Box::new(Raw(section.prose)));
    }
    match section.kind {
        SectionKind::Hero | SectionKind::Prose => {}
        SectionKind::RollingBeta => {
            widgets.push(Box::new(
                RollingBetaChart::new(&data.rolling_beta).bound_to(id),
            ));
            widgets.push(Box::new(Narrative::PassThrough(PhaseAverages::from_data(
                &data.rolling_beta,
            ))));
        }
        SectionKind::FevdNow => {
            widgets.push(Box::new(
                FevdNowChart::new(data.fevd_demand_first.as_ref(), data.fevd_ren_first.as_ref())
                    .bound_to(id),
            ));
            widgets.push(Box::new(Narrative::FevdNow));
        }
        SectionKind::FevdTrend => {
            widgets.push(Box::new(FevdTrendStrip::new(&data.fevd_trend).bound_to(id)));
            widgets.push(Box::new(Narrative::FevdTrend));
        }
        SectionKind::RenShare => {
            widgets.push(Box::new(Narrative::RenShare));
            widgets.push(Box::new(RenShareChart::new(&data.ren_share).bound_to(id)));
            widgets.push(Box::new(ModelReadyCharts::new(&data.model_ready).bound_to(id)));
        }
        SectionKind::Timeline => widgets.push(Box::new(Timeline::new(timeline))),
        SectionKind::Bills => widgets.push(Box::new(BillSensitivityTable::new(
            data.fevd_demand_first.as_ref(),
            data.fevd_ren_first.as_ref(),
        ))),
    }
    widgets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vicpower_runtime::DetailMode;

    const DESKTOP: Viewport = Viewport::new(1440.0, 900.0);

    #[test]
    fn mounting_activates_the_hero() {
        let page = StoryPage::mount(DESKTOP, Instant::now());
        assert_eq!(page.take_activations(), vec![SectionId::new(story::HERO)]);
        assert!(page.take_activations().is_empty());
        assert_eq!(page.state_of(story::HERO), RevealState::Active);
        assert_eq!(page.highlighted().as_ref().map(SectionId::as_str), Some(story::HERO));
        assert!(page.scroll_cue_visible());
        assert_eq!(page.replay_key(story::FEVD_NOW), 0);
    }

    #[test]
    fn scrolling_to_a_chart_bumps_its_replay_key() {
        let t0 = Instant::now();
        let mut page = StoryPage::mount(DESKTOP, t0);
        let top = story::SECTIONS
            .iter()
            .take_while(|s| s.id != story::FEVD_NOW)
            .map(|s| s.height * DESKTOP.height)
            .sum::<f64>();
        page.scroll_to(top, t0 + Duration::from_millis(100));

        assert_eq!(page.state_of(story::FEVD_NOW), RevealState::Active);
        assert_eq!(page.replay_key(story::FEVD_NOW), 1);
        assert_eq!(page.highlighted().as_ref().map(SectionId::as_str), Some(story::PHASES));
        assert!(!page.scroll_cue_visible());
    }

    #[test]
    fn document_reflects_initial_state() {
        let page = StoryPage::mount(DESKTOP, Instant::now());
        let detail = DetailModeProvider::new(DetailMode::Detailed);
        let html = page.render_document(&Dataset::default(), &detail, MobileDisclaimer::new(false));

        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.contains("<section id=\"hero\" class=\"section active section--hero\">"));
        assert!(html.contains("<section id=\"policy\" class=\"section idle mt-12 mb-16\">"));
        assert!(html.contains("scroll-cue--visible"));
        assert!(html.contains("narrative--detailed"));
        assert!(!html.contains("role=\"dialog\""));
        assert_eq!(html.matches("<section ").count(), story::SECTIONS.len());
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn missing_data_degrades_to_placeholders() {
        let page = StoryPage::mount(DESKTOP, Instant::now());
        let detail = DetailModeProvider::default();
        let html = page.render_document(&Dataset::default(), &detail, MobileDisclaimer::new(false));
        assert!(html.contains(vicpower_widgets::rolling_beta::PLACEHOLDER));
        assert!(html.contains(vicpower_widgets::fevd_now::PLACEHOLDER));
        assert!(html.contains(vicpower_widgets::ren_share::PLACEHOLDER));
        assert!(!html.contains(vicpower_widgets::bill_sensitivity::TITLE));
    }
}
