//! Rendering seam
//!
//! The simulation never draws. Once per frame the host hands a read-only
//! `FrameSnapshot` to a `Renderer`; the renderer reports window size and is
//! told about resizes so it can extend its backdrop.

pub mod backdrop;
#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use backdrop::Backdrop;
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::Vec2;

use crate::consts::*;
use crate::sim::{Decoration, GamePhase, GameState, Gem, GemKind, Platform, Stick};
use crate::{Viewport, sin_degrees};

/// Server and tree body colors, indexed by `DecorationLook` color
pub const SERVER_PALETTE: [&str; 3] = ["#4A5568", "#2D3748", "#1A202C"];
pub const TREE_PALETTE: [&str; 3] = ["#6D8821", "#8FAC34", "#98B333"];
pub const LIGHT_OK: &str = "#68D391";
pub const LIGHT_FAULT: &str = "#F56565";

/// Fill for a gem: teal normally, red while debugging
pub fn gem_color(gem: &Gem) -> &'static str {
    match (gem.kind(), gem.is_debug()) {
        (GemKind::Collected, false) => "#4FD1C5",
        (GemKind::Collected, true) => "#FC8181",
        (GemKind::Missed, false) => "#319795",
        (GemKind::Missed, true) => "#C76F6F",
    }
}

/// Fill for the spinning bonus gem over a platform's perfect zone
pub fn bonus_gem_color(debug: bool) -> &'static str {
    if debug { "#FC8181" } else { "#38B2AC" }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub phase: GamePhase,
    pub over: bool,
    pub hero: Vec2,
    /// 0 = eyes open, 1 = shut
    pub eyes_closed: f32,
    pub scene_offset: f32,
    pub platforms: &'a [Platform],
    /// Finished sticks, oldest first
    pub sticks: &'a [Stick],
    pub current_stick: &'a Stick,
    pub decorations: &'a [Decoration],
    pub gems: &'a [Gem],
    pub bonus_gem_rotation: f32,
    pub perfect_area: f32,
    pub score: u32,
    pub record: u32,
    pub debug: bool,
}

impl<'a> FrameSnapshot<'a> {
    pub fn of(state: &'a GameState) -> Self {
        Self {
            phase: state.phase,
            over: state.over,
            hero: state.hero,
            eyes_closed: if state.settings.blink {
                state.blink.closed_amount()
            } else {
                0.0
            },
            scene_offset: state.scene_offset,
            platforms: &state.platforms,
            sticks: &state.sticks,
            current_stick: &state.current_stick,
            decorations: &state.decorations,
            gems: &state.gems,
            bonus_gem_rotation: state.bonus_gem_rotation,
            perfect_area: state.perfect_area(),
            score: state.score,
            record: state.record,
            debug: state.settings.debug_mode,
        }
    }

    /// All sticks, the current one last
    pub fn all_sticks(&self) -> impl Iterator<Item = &'a Stick> {
        self.sticks.iter().chain(std::iter::once(self.current_stick))
    }
}

/// A presentation backend
pub trait Renderer {
    /// Current window size
    fn viewport(&self) -> Viewport;
    /// The window changed size; regenerate or extend the backdrop
    fn resize(&mut self, viewport: Viewport);
    fn draw(&mut self, frame: &FrameSnapshot<'_>);
}

/// Screen x of a decoration, which scrolls slower than the scene
pub fn decoration_screen_x(x: f32, scene_offset: f32) -> f32 {
    (x - scene_offset * BACKGROUND_SPEED_MULTIPLIER) * HILL1_STRETCH
}

/// Hill surface height at a window x
pub fn hill_y(
    window_x: f32,
    viewport: Viewport,
    base_height: f32,
    amplitude: f32,
    stretch: f32,
    scene_offset: f32,
) -> f32 {
    let base = viewport.height - base_height;
    sin_degrees((scene_offset * BACKGROUND_SPEED_MULTIPLIER + window_x) * stretch) * amplitude + base
}

/// Ground height a decoration stands on
pub fn decoration_y(x: f32, viewport: Viewport) -> f32 {
    viewport.height - HILL1_BASE_HEIGHT + sin_degrees(x) * HILL1_AMPLITUDE
}
