#![forbid(unsafe_code)]

//! Fixed side navigation that highlights the active section.
//!
//! An entry may stand for several sections through aliases, so that a
//! chapter with sub-sections keeps one breadcrumb lit while the reader
//! moves through it.

use vicpower_core::section::SectionId;
use vicpower_runtime::consumer::ActivationConsumer;

use crate::context::RenderContext;
use crate::markup::Markup;
use crate::Widget;

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbEntry {
    pub id: SectionId,
    pub label: String,
    pub aliases: Vec<SectionId>,
}

impl BreadcrumbEntry {
    pub fn new(id: impl Into<SectionId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            aliases: Vec::new(),
        }
    }

    /// Additional section ids this entry answers to.
    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SectionId>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Whether `id` is this entry or one of its aliases.
    pub fn matches(&self, id: &SectionId) -> bool {
        self.id == *id || self.aliases.iter().any(|alias| alias == id)
    }
}

/// Breadcrumb list plus the highlighted entry.
#[derive(Debug, Clone)]
pub struct Breadcrumbs {
    entries: Vec<BreadcrumbEntry>,
    active: Option<SectionId>,
}

impl Breadcrumbs {
    /// Entries in display order. The first entry starts highlighted.
    pub fn new(entries: Vec<BreadcrumbEntry>) -> Self {
        let active = entries.first().map(|entry| entry.id.clone());
        Self { entries, active }
    }

    pub fn entries(&self) -> &[BreadcrumbEntry] {
        &self.entries
    }

    /// Id of the highlighted entry.
    pub fn active(&self) -> Option<&SectionId> {
        self.active.as_ref()
    }

    /// First entry answering to `id`.
    pub fn resolve(&self, id: &SectionId) -> Option<&BreadcrumbEntry> {
        self.entries.iter().find(|entry| entry.matches(id))
    }
}

impl ActivationConsumer for Breadcrumbs {
    fn on_activate(&mut self, id: &SectionId) {
        // Sections without a breadcrumb leave the highlight where it was.
        if let Some(entry) = self.resolve(id) {
            self.active = Some(entry.id.clone());
        }
    }
}

impl Widget for Breadcrumbs {
    fn render(&self, _ctx: &RenderContext<'_>, out: &mut Markup) {
        if self.entries.is_empty() {
            return;
        }
        out.open(
            "nav",
            &[("class", "breadcrumbs"), ("aria-label", "Page breadcrumbs")],
        );
        for entry in &self.entries {
            let is_active = self.active.as_ref() == Some(&entry.id);
            let href = format!("#{}", entry.id);
            let class = if is_active {
                "breadcrumb breadcrumb--active"
            } else {
                "breadcrumb"
            };
            let mut attrs: Vec<(&str, &str)> = vec![
                ("class", class),
                ("href", href.as_str()),
                ("aria-label", entry.label.as_str()),
            ];
            if is_active {
                attrs.push(("aria-current", "true"));
            }
            out.open("a", &attrs);
            out.element("span", &[("class", "breadcrumb__dot")], "");
            out.element("span", &[("class", "breadcrumb__label")], &entry.label);
            out.close("a");
        }
        out.close("nav").newline();
    }
}
