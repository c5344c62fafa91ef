#![forbid(unsafe_code)]

//! The story: section order, prose, breadcrumbs and market events.
//!
//! Everything here is static. [`crate::page`] decides which data-driven
//! widgets go inside each section.

use vicpower_widgets::{BreadcrumbEntry, Breadcrumbs, TimelineEvent};

pub const TITLE: &str = "Victoria Power & Gas Story";
pub const DESCRIPTION: &str = "How Victoria's wholesale electricity prices moved from gas-driven to \
weather and renewables-driven, using 2015–2025 data.";

pub const HERO: &str = "hero";
pub const OLD_STORY: &str = "old-story";
pub const WHAT_WE_DID: &str = "what-we-did";
pub const PHASES: &str = "phases";
pub const PASS_THROUGH: &str = "pass-through";
pub const FEVD_NOW: &str = "fevd-now";
pub const FEVD_TREND: &str = "fevd-trend";
pub const REN_SHARE: &str = "ren-share";
pub const TIMELINE: &str = "timeline";
pub const BILLS: &str = "bills";
pub const POLICY: &str = "policy";

/// What a section holds besides its prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Title block and paper link.
    Hero,
    /// Prose only.
    Prose,
    RollingBeta,
    FevdNow,
    FevdTrend,
    RenShare,
    Timeline,
    Bills,
}

impl SectionKind {
    /// Whether the section carries a chart that replays on activation.
    pub const fn has_chart(self) -> bool {
        matches!(
            self,
            SectionKind::RollingBeta
                | SectionKind::FevdNow
                | SectionKind::FevdTrend
                | SectionKind::RenShare
        )
    }
}

/// One section of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorySection {
    pub id: &'static str,
    pub kind: SectionKind,
    /// Extra classes for the section frame.
    pub class: &'static str,
    /// Laid-out height in viewport heights.
    pub height: f64,
    /// Prose rendered before the section's widgets.
    pub prose: &'static str,
}

/// The page, top to bottom.
pub static SECTIONS: [StorySection; 11] = [
    StorySection {
        id: HERO,
        kind: SectionKind::Hero,
        class: "section--hero",
        height: 1.0,
        prose: HERO_HTML,
    },
    StorySection {
        id: OLD_STORY,
        kind: SectionKind::Prose,
        class: "mt-16",
        height: 1.2,
        prose: OLD_STORY_HTML,
    },
    StorySection {
        id: WHAT_WE_DID,
        kind: SectionKind::Prose,
        class: "mt-12",
        height: 1.4,
        prose: WHAT_WE_DID_HTML,
    },
    StorySection {
        id: PHASES,
        kind: SectionKind::Prose,
        class: "mt-12",
        height: 1.8,
        prose: PHASES_HTML,
    },
    StorySection {
        id: PASS_THROUGH,
        kind: SectionKind::RollingBeta,
        class: "mt-12 section--chart",
        height: 1.6,
        prose: "",
    },
    StorySection {
        id: FEVD_NOW,
        kind: SectionKind::FevdNow,
        class: "mt-12 section--chart",
        height: 1.6,
        prose: FEVD_NOW_HTML,
    },
    StorySection {
        id: FEVD_TREND,
        kind: SectionKind::FevdTrend,
        class: "mt-12 section--chart",
        height: 1.8,
        prose: FEVD_TREND_HTML,
    },
    StorySection {
        id: REN_SHARE,
        kind: SectionKind::RenShare,
        class: "mt-12 section--chart",
        height: 1.8,
        prose: REN_SHARE_HTML,
    },
    StorySection {
        id: TIMELINE,
        kind: SectionKind::Timeline,
        class: "mt-12",
        height: 1.2,
        prose: "",
    },
    StorySection {
        id: BILLS,
        kind: SectionKind::Bills,
        class: "mt-12",
        height: 1.6,
        prose: BILLS_HTML,
    },
    StorySection {
        id: POLICY,
        kind: SectionKind::Prose,
        class: "mt-12 mb-16",
        height: 1.2,
        prose: POLICY_HTML,
    },
];

/// Look up a section by id.
pub fn section(id: &str) -> Option<&'static StorySection> {
    SECTIONS.iter().find(|s| s.id == id)
}

/// The breadcrumb rail. Chart sections highlight their chapter.
pub fn breadcrumbs() -> Breadcrumbs {
    Breadcrumbs::new(vec![
        BreadcrumbEntry::new(HERO, "Introduction"),
        BreadcrumbEntry::new(OLD_STORY, "The old story"),
        BreadcrumbEntry::new(WHAT_WE_DID, "What we did"),
        BreadcrumbEntry::new(PHASES, "Three phases")
            .with_aliases([PASS_THROUGH, FEVD_NOW, FEVD_TREND]),
        BreadcrumbEntry::new(REN_SHARE, "Renewables rising").with_aliases([TIMELINE]),
        BreadcrumbEntry::new(BILLS, "What it means for bills"),
        BreadcrumbEntry::new(POLICY, "The road ahead"),
    ])
}

/// Market events on the timeline.
pub fn timeline_events() -> Vec<TimelineEvent> {
    vec![
        TimelineEvent::new(
            "hazelwood",
            "2017",
            "Hazelwood closes",
            "Victoria’s largest brown-coal plant shuts, removing about a fifth of the state’s \
             generation and leaning harder on gas and imports at the margin.",
        ),
        TimelineEvent::new(
            "covid",
            "2020",
            "Covid shifts demand",
            "Lockdowns reshape when and where power is used, and wholesale prices fall to \
             multi-year lows.",
        ),
        TimelineEvent::new(
            "gas-crisis",
            "2022",
            "Gas crisis and market suspension",
            "Russia’s invasion of Ukraine sends global gas prices soaring. In June the market \
             operator suspends the NEM spot market for the first time.",
        ),
        TimelineEvent::new(
            "renewables",
            "2023–25",
            "Renewables take the lead",
            "Wind and rooftop solar supply a growing share of generation, and weather becomes \
             the main source of price swings.",
        ),
    ]
}

pub const PAPER_URL: &str = "https://example.com/working-paper.pdf";

const HERO_HTML: &str = "\
<p class=\"kicker\">Victoria · Wholesale Electricity · 2015–2025</p>
<h1>When gas sneezes, power prices catch a cold.</h1>
<h2 class=\"subtitle\">This used to be the story of Victoria’s power market. Our data shows that story is breaking down.</h2>
<p class=\"lede\">Using monthly data from 2015 to 2025 and standard tools from energy economics, we track how gas, \
renewables, imports and demand each contribute to Victorian wholesale electricity prices, and how that mix has \
changed over time.</p>
<div class=\"cta\"><a class=\"button\" href=\"https://example.com/working-paper.pdf\">Download full working paper (PDF)</a></div>
";

const OLD_STORY_HTML: &str = "\
<h2>1. The old story: gas in the driver’s seat</h2>
<p>For years, the conventional wisdom in Australia’s electricity market was simple:</p>
<p class=\"pull-quote\">“If gas prices jump, electricity prices follow.”</p>
<p>That view isn’t just folklore. Reputable outlets like the ABC and Guardian Australia, and official budget \
documents, routinely describe gas as the fuel that “sets the price” in the National Electricity Market. When gas \
sneezes, power prices catch a cold.</p>
<p>Economically, this made sense. When demand was high and the grid needed extra supply, gas-fired generators were \
often the last, most expensive units dispatched. Because everyone is paid the price of that marginal unit, higher \
gas prices pushed up the wholesale electricity price.</p>
";

const WHAT_WE_DID_HTML: &str = "\
<h2>2. What we did: follow the data, month by month</h2>
<p>We assembled monthly data for Victoria from early 2015 to late 2025:</p>
<ul>
<li>wholesale electricity prices</li>
<li>gas prices at the Wallumbilla gas hub</li>
<li>the share of generation from renewables</li>
<li>imports and exports between Victoria and other states</li>
<li>demand, temperature and key global fuel prices</li>
</ul>
<p>On top of this, we applied well-established econometric tools:</p>
<ul>
<li>structural break tests to see if key relationships change over time,</li>
<li>rolling models that track how the gas–electricity pass-through evolves month by month, and</li>
<li>variance decompositions that attribute movements in prices to shocks in gas, renewables, imports and demand.</li>
</ul>
<p>You don’t need the equations to follow the story. The important part is that we ask the same question in \
several different, independent ways.</p>
";

const PHASES_HTML: &str = "\
<h2>3. Three phases of Victoria’s power market</h2>
<p>When we line up the data with the model results, Victoria’s last decade looks like three broad phases.</p>
<h3>Phase 1: Gas-anchored prices (roughly 2015–2019)</h3>
<p>In the early years of our sample, the old story holds. When gas prices move in our models, Victorian wholesale \
prices move with them. Over a two-year horizon, gas shocks explain roughly <strong>one in every eight \
movements</strong> in the wholesale price.</p>
<p>Renewables are growing, but in statistical terms they still explain only a modest share of price variation. Gas \
is central to price formation; renewables are supporting actors.</p>
<h3>Phase 2: Crisis and transition (around 2020–2022)</h3>
<p>Then the world gets messy. Covid shifts demand patterns. Global gas markets tighten. The war in Ukraine and \
supply disruptions trigger a spike in international energy prices. The NEM goes through a period of extreme stress \
and market intervention.</p>
<p>In our models, this shows up as <strong>clear structural breaks</strong> in the gas–price relationship. Formal \
tests reject the idea that the gas–electricity link is stable from 2015 to 2025. When we track the gas \
pass-through in rolling windows, we see it change noticeably around 2022–23.</p>
<h3>Phase 3: Weather and renewables in the driver’s seat (2023 onwards)</h3>
<p>By the most recent years, the picture has flipped. In our variance decompositions, gas shocks explain only \
around <strong>2% of price variation</strong>, while renewables explain about <strong>14–15%</strong> and imports \
a few percent more. The bulk – roughly four-fifths – is due to own-price shocks and other factors.</p>
<p>In practical terms: gas hasn’t disappeared, but it has moved from the <em>centre</em> of price formation to the \
<em>periphery</em>. In a high-renewables, interconnected system, prices behave less like a pure gas market and \
more like a <strong>weather-driven, renewable-rich system</strong>.</p>
";

const FEVD_NOW_HTML: &str = "\
<h2>Who moves prices today?</h2>
";

const FEVD_TREND_HTML: &str = "\
<h2>How the drivers have shifted</h2>
";

const REN_SHARE_HTML: &str = "\
<h2>Renewables on the rise</h2>
";

const BILLS_HTML: &str = "\
<h2>4. What this means for bills</h2>
<p>For a household or small business, the core question is simple:<br/>\
<span class=\"pull-quote\">“What am I actually exposed to now?”</span></p>
<p>Earlier in the decade, a significant share of the risk in your electricity bill really was about gas. If \
international gas prices spiked, there was a good chance your power bill would feel it.</p>
<p>Today, our analysis suggests that your bill is relatively <em>less</em> exposed to gas price shocks and \
<em>more</em> exposed to:</p>
<ul>
<li>weather and temperature, which drive demand,</li>
<li>the availability of wind and solar, which shifts the supply curve,</li>
<li>and the health of transmission and interconnectors, which govern imports and congestion.</li>
</ul>
<p>Gas still matters, especially for firming and peak periods, but the direct line from gas hubs to your power \
bill is weaker than it used to be.</p>
";

const POLICY_HTML: &str = "\
<h2>5. Policy, risk and the road ahead</h2>
<p>This shift has real consequences for how we design markets and manage risk:</p>
<ul>
<li><strong>Hedging strategies need to evolve.</strong> Hedging gas prices alone is no longer enough. Weather \
risk, renewable generation risk and congestion risk now matter more for wholesale prices.</li>
<li><strong>Market signals must reward flexibility.</strong> In a system where prices swing between scarcity and \
abundance, storage, flexible demand and transmission are just as important as fuel.</li>
<li><strong>Public debate should catch up.</strong> We still often talk as if gas is always in the driver’s seat. \
The data suggest a more nuanced story: gas is now one actor in a larger ensemble that includes weather, renewables \
and the grid itself.</li>
</ul>
<p>The full working paper sets out the models and robustness checks in detail, including unit root tests, break \
tests and variance decompositions. This page is the accessible version of that story.</p>
";
