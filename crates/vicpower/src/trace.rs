#![forbid(unsafe_code)]

//! Scroll trace: walk the page top to bottom and report every activation.
//!
//! Each broadcast becomes one JSON line. The consumer fields (`breadcrumb`,
//! `scroll_cue`, `states`) describe the page after the frame that produced
//! the broadcast.

use std::io::Write;
use std::time::Duration;

use serde::Serialize;
use vicpower_runtime::Instant;

use crate::build::BuildError;
use crate::page::{StoryPage, Viewport};

/// Simulated time between scroll frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// One section's reveal state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionState {
    pub id: String,
    pub state: &'static str,
}

/// One activation broadcast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceLine {
    pub frame: u64,
    pub scroll_y: f64,
    /// The broadcast section id.
    pub active: String,
    /// Highlighted breadcrumb after the frame.
    pub breadcrumb: Option<String>,
    pub scroll_cue: bool,
    /// Every section, in document order.
    pub states: Vec<SectionState>,
}

fn collect(page: &StoryPage, frame: u64, lines: &mut Vec<TraceLine>) {
    let activations = page.take_activations();
    if activations.is_empty() {
        return;
    }
    let breadcrumb = page.highlighted().map(|id| id.as_str().to_string());
    let scroll_cue = page.scroll_cue_visible();
    let states: Vec<SectionState> = page
        .session()
        .states()
        .into_iter()
        .map(|(id, state)| SectionState {
            id: id.as_str().to_string(),
            state: state.as_class(),
        })
        .collect();
    lines.extend(activations.into_iter().map(|id| TraceLine {
        frame,
        scroll_y: page.scroll_y(),
        active: id.as_str().to_string(),
        breadcrumb: breadcrumb.clone(),
        scroll_cue,
        states: states.clone(),
    }));
}

/// Mount the story in `viewport` and scroll to the bottom `step` pixels at a
/// time.
pub fn record(viewport: Viewport, step: f64) -> Vec<TraceLine> {
    let step = if step.is_finite() && step > 0.0 {
        step
    } else {
        viewport.height.max(1.0)
    };
    let t0 = Instant::now();
    let mut page = StoryPage::mount(viewport, t0);
    let mut lines = Vec::new();
    collect(&page, 0, &mut lines);

    let max = page.max_scroll();
    let mut frame = 0u64;
    let mut y = 0.0;
    while y < max {
        y = (y + step).min(max);
        frame += 1;
        let elapsed = FRAME_INTERVAL.saturating_mul(u32::try_from(frame).unwrap_or(u32::MAX));
        page.scroll_to(y, t0 + elapsed);
        collect(&page, frame, &mut lines);
    }
    tracing::info!(frames = frame, activations = lines.len(), "scroll trace recorded");
    lines
}

/// Write `lines` as JSON Lines.
pub fn write_jsonl(lines: &[TraceLine], mut out: impl Write) -> Result<(), BuildError> {
    for line in lines {
        serde_json::to_writer(&mut out, line)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
