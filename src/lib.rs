//! Deploy Dash - a stick-bridging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (phase machine, hit detection, scoring, world upkeep)
//! - `renderer`: Renderer seam (frame snapshot, backdrop patterns, Canvas2D on web)
//! - `record`: The single persisted high score
//! - `settings`: Cosmetic and debug preferences

pub mod record;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use record::Record;
pub use settings::{DecorationTheme, Settings};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Logical canvas size the layout is designed around
    pub const CANVAS_WIDTH: f32 = 375.0;
    pub const CANVAS_HEIGHT: f32 = 375.0;
    pub const PLATFORM_HEIGHT: f32 = 100.0;

    /// Hero sprite dimensions
    pub const HERO_WIDTH: f32 = 17.0;
    pub const HERO_HEIGHT: f32 = 30.0;
    /// Hero stands this far in from a platform's right edge while waiting
    pub const HERO_DISTANCE_FROM_EDGE: f32 = 10.0;
    /// Waiting position of the hero from the left of the logical canvas
    pub const PADDING_X: f32 = 100.0;

    /// Width of the centered "perfect" zone on a platform
    pub const PERFECT_AREA_SIZE: f32 = 10.0;

    /// Phase speed divisors (milliseconds per pixel or per degree)
    pub const CODING_SPEED: f32 = 4.0;
    pub const DEPLOYING_SPEED: f32 = 4.0;
    pub const RUNNING_SPEED: f32 = 4.0;
    pub const MIGRATING_SPEED: f32 = 2.0;
    pub const CRASHING_SPEED: f32 = 2.0;

    /// How far below the platform top the hero falls before the run ends
    pub const FALL_DEPTH: f32 = 100.0;
    /// Stick rotation at which it lies flat / hangs straight down
    pub const STICK_FLAT_DEGREES: f32 = 90.0;
    pub const STICK_HANGING_DEGREES: f32 = 180.0;

    /// Platform generation
    pub const FIRST_PLATFORM_X: f32 = 50.0;
    pub const FIRST_PLATFORM_WIDTH: f32 = 50.0;
    pub const INITIAL_PLATFORMS: usize = 12;
    pub const PLATFORM_MIN_GAP: u32 = 40;
    pub const PLATFORM_MAX_GAP: u32 = 200;
    pub const DEBUG_PLATFORM_MIN_GAP: u32 = 30;
    pub const DEBUG_PLATFORM_MAX_GAP: u32 = 100;
    pub const PLATFORM_MIN_WIDTH: u32 = 20;
    pub const PLATFORM_MAX_WIDTH: u32 = 100;

    /// Decoration generation
    pub const DECORATION_MIN_GAP: u32 = 50;
    pub const DECORATION_MAX_GAP: u32 = 200;
    pub const DENSE_DECORATION_MIN_GAP: u32 = 40;
    pub const DENSE_DECORATION_MAX_GAP: u32 = 150;
    /// Above this many decorations the narrower gap range applies
    pub const DENSE_DECORATION_THRESHOLD: usize = 20;
    pub const MIN_INITIAL_DECORATIONS: usize = 10;
    pub const DECORATIONS_PER_CANVAS_WIDTH: usize = 8;
    /// Decorations are added in batches when the frontier nears the visible end
    pub const DECORATION_BATCH: usize = 5;
    pub const DECORATION_LOOKAHEAD: f32 = 500.0;
    pub const DECORATION_BEHIND_MARGIN: f32 = 300.0;
    pub const SERVER_RACKS: u8 = 5;
    pub const PALETTE_SIZE: u8 = 3;

    /// Housekeeping retention
    pub const KEEP_PAST_PLATFORMS: usize = 6;
    pub const KEEP_PAST_STICKS: usize = 5;

    /// Background parallax and hills
    pub const BACKGROUND_SPEED_MULTIPLIER: f32 = 0.2;
    pub const HILL1_BASE_HEIGHT: f32 = 100.0;
    pub const HILL1_AMPLITUDE: f32 = 10.0;
    pub const HILL1_STRETCH: f32 = 1.0;
    pub const HILL2_BASE_HEIGHT: f32 = 70.0;
    pub const HILL2_AMPLITUDE: f32 = 20.0;
    pub const HILL2_STRETCH: f32 = 0.5;

    /// Gem animation lifetimes (ms)
    pub const COLLECTED_GEM_MS: f32 = 1000.0;
    pub const MISSED_GEM_MS: f32 = 800.0;
    /// Spin of the bonus gem drawn on platforms (degrees per ms)
    pub const BONUS_GEM_SPIN: f32 = 0.06;

    /// How long streak banners stay up (presentation only)
    pub const BANNER_MS: i32 = 1500;
}

/// Current browser window size as reported by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: consts::CANVAS_WIDTH,
            height: consts::CANVAS_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal offset that centers the logical canvas in the window
    #[inline]
    pub fn margin_x(&self) -> f32 {
        (self.width - consts::CANVAS_WIDTH) / 2.0
    }

    /// Vertical offset that centers the logical canvas in the window
    #[inline]
    pub fn margin_y(&self) -> f32 {
        (self.height - consts::CANVAS_HEIGHT) / 2.0
    }
}

/// Sine of an angle given in degrees
#[inline]
pub fn sin_degrees(degrees: f32) -> f32 {
    degrees.to_radians().sin()
}
