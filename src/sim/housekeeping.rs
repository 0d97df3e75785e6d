//! World housekeeping
//!
//! Keeps the entity lists bounded as the hero travels:
//! - every frame, decorations behind the view are dropped and new ones are
//!   added ahead of it
//! - once per landing, platforms and sticks beyond the retention window are
//!   spliced out
//!
//! The current stick is held outside the history list, and the platform a
//! pending landing refers to is always retained.

use rand::Rng;

use super::generate::generate_decoration;
use super::state::{Decoration, Platform, Stick};
use crate::consts::*;
use crate::{DecorationTheme, Viewport};

/// Span of decoration x coordinates currently on screen
///
/// Decorations scroll at `BACKGROUND_SPEED_MULTIPLIER` of the scene speed.
pub fn visible_decoration_span(scene_offset: f32, viewport: Viewport) -> (f32, f32) {
    let parallax = scene_offset * BACKGROUND_SPEED_MULTIPLIER;
    (parallax, parallax + viewport.width / HILL1_STRETCH)
}

/// Whether the decoration frontier is short of the lookahead past the view
pub fn needs_decoration(decorations: &[Decoration], scene_offset: f32, viewport: Viewport) -> bool {
    let (_, end) = visible_decoration_span(scene_offset, viewport);
    decorations
        .last()
        .is_none_or(|d| d.x < end + DECORATION_LOOKAHEAD)
}

/// Per-frame pass: top up decorations ahead and drop the ones far behind
pub fn tend_decorations<R: Rng + ?Sized>(
    decorations: &mut Vec<Decoration>,
    scene_offset: f32,
    viewport: Viewport,
    theme: DecorationTheme,
    rng: &mut R,
) {
    while needs_decoration(decorations, scene_offset, viewport) {
        for _ in 0..DECORATION_BATCH {
            let decoration = generate_decoration(decorations, theme, rng);
            decorations.push(decoration);
        }
    }

    let (start, _) = visible_decoration_span(scene_offset, viewport);
    let behind = start - DECORATION_BEHIND_MARGIN;
    let before = decorations.len();
    decorations.retain(|d| d.x > behind);
    if decorations.len() != before {
        log::trace!("Pruned {} decorations", before - decorations.len());
    }
}

/// Per-landing pass over platforms and sticks
///
/// Keeps the first platform, up to `KEEP_PAST_PLATFORMS` platforms before the
/// first one still ahead of the hero's waiting spot, and everything after.
/// `protected` names a platform that must survive regardless.
pub fn prune_after_landing(
    platforms: &mut Vec<Platform>,
    sticks: &mut Vec<Stick>,
    scene_offset: f32,
    protected: Option<u32>,
) {
    let active = platforms
        .iter()
        .position(|p| p.x > scene_offset + PADDING_X);

    if let Some(active) = active.filter(|&i| i > 0) {
        let keep = active.min(KEEP_PAST_PLATFORMS);
        let mut start = (active - keep).max(1);
        if let Some(index) = protected.and_then(|id| platforms.iter().position(|p| p.id == id)) {
            start = start.min(index.max(1));
        }
        if start > 1 {
            platforms.drain(1..start);
            log::debug!("Pruned {} platforms", start - 1);
        }
    }

    if sticks.len() > KEEP_PAST_STICKS {
        let excess = sticks.len() - KEEP_PAST_STICKS;
        sticks.drain(..excess);
    }
}
