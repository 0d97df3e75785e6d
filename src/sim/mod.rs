//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame time (`dt`) drives all motion
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod blink;
pub mod error;
pub mod gem;
pub mod generate;
pub mod hit;
pub mod housekeeping;
pub mod score;
pub mod state;
pub mod tick;

pub use blink::{Blink, BlinkState};
pub use error::SimError;
pub use gem::{Gem, GemKind};
pub use generate::{generate_decoration, generate_platform};
pub use hit::{HitResult, check_hit};
pub use score::{ScoreOutcome, StreakMessage, award};
pub use state::{
    Decoration, DecorationLook, GameEvent, GamePhase, GameState, IndicatorLight, Landing,
    Platform, Stick,
};
pub use tick::{TickInput, tick};
