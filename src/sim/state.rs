//! Game state and core simulation types
//!
//! One owned `GameState` holds everything the per-frame update mutates and
//! the renderer reads. Nothing lives in globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::blink::Blink;
use super::error::SimError;
use super::gem::{Gem, GemKind};
use super::generate;
use super::score::StreakMessage;
use crate::consts::*;
use crate::{Settings, Viewport};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle on a platform, waiting for a press
    Waiting,
    /// Stick grows while input is held
    Coding,
    /// Stick rotates down toward flat
    Deploying,
    /// Hero walks along the stick
    Running,
    /// Scene scrolls so the landed platform becomes the new start
    Migrating,
    /// Hero falls and the stick swings down
    Crashing,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Waiting => "waiting",
            GamePhase::Coding => "coding",
            GamePhase::Deploying => "deploying",
            GamePhase::Running => "running",
            GamePhase::Migrating => "migrating",
            GamePhase::Crashing => "crashing",
        }
    }

    pub fn parse(name: &str) -> Result<Self, SimError> {
        match name {
            "waiting" => Ok(GamePhase::Waiting),
            "coding" => Ok(GamePhase::Coding),
            "deploying" => Ok(GamePhase::Deploying),
            "running" => Ok(GamePhase::Running),
            "migrating" => Ok(GamePhase::Migrating),
            "crashing" => Ok(GamePhase::Crashing),
            other => Err(SimError::UnknownPhase(other.to_string())),
        }
    }
}

/// A platform the hero can stand on. Immutable once generated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Left edge in world coordinates
    pub x: f32,
    pub width: f32,
    pub id: u32,
}

impl Platform {
    pub fn new(x: f32, width: f32, id: u32) -> Self {
        Self { x, width, id }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// A stick anchored at the right edge of the platform it launched from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stick {
    pub x: f32,
    pub length: f32,
    /// 0 = upright, 90 = flat, 180 = hanging down
    pub rotation: f32,
}

impl Stick {
    pub fn new(x: f32) -> Self {
        Self {
            x,
            length: 0.0,
            rotation: 0.0,
        }
    }

    /// World x of the far end once the stick lies flat
    #[inline]
    pub fn tip(&self) -> f32 {
        self.x + self.length
    }
}

/// Indicator light on a server rack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorLight {
    pub rack: u8,
    /// Green when healthy, red otherwise
    pub healthy: bool,
}

/// Visual attributes of a decoration, per theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecorationLook {
    Server {
        color: u8,
        lights: Vec<IndicatorLight>,
    },
    Tree {
        color: u8,
    },
}

/// Cosmetic world filler drawn behind the platforms with parallax
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub x: f32,
    pub look: DecorationLook,
}

/// Landing established when the stick came down on a platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landing {
    pub platform_id: u32,
    pub perfect: bool,
}

/// Notifications from the simulation to the host, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    Scored { points: u32, perfect: bool, streak: u32 },
    Banner(StreakMessage),
    RecordBroken { record: u32 },
    GemSpawned(GemKind),
    Landed { platform_id: u32, perfect: bool },
    Crashed,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Set once the hero has fallen out of view; ticks are no-ops afterwards
    pub over: bool,
    /// Hero position: x along the world, y downward offset while falling
    pub hero: Vec2,
    /// Horizontal world-to-screen translation
    pub scene_offset: f32,
    /// Platforms in strictly increasing x order
    pub platforms: Vec<Platform>,
    /// Number of platforms ever generated this run (next platform id)
    pub platforms_generated: u32,
    /// Finished sticks, oldest first
    pub sticks: Vec<Stick>,
    /// The stick being coded, deployed or walked on
    pub current_stick: Stick,
    pub decorations: Vec<Decoration>,
    pub gems: Vec<Gem>,
    /// Spin of the bonus gem marker (degrees)
    pub bonus_gem_rotation: f32,
    pub blink: Blink,
    pub score: u32,
    pub record: u32,
    /// Consecutive perfect hits
    pub streak: u32,
    /// Pending landing between deploying and the end of migrating
    pub landing: Option<Landing>,
    pub settings: Settings,
    pub viewport: Viewport,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the given seed and persisted record
    pub fn new(seed: u64, record: u32, settings: Settings, viewport: Viewport) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Waiting,
            over: false,
            hero: Vec2::ZERO,
            scene_offset: 0.0,
            platforms: Vec::new(),
            platforms_generated: 0,
            sticks: Vec::new(),
            current_stick: Stick::new(0.0),
            decorations: Vec::new(),
            gems: Vec::new(),
            bonus_gem_rotation: 0.0,
            blink: Blink::default(),
            score: 0,
            record,
            streak: 0,
            landing: None,
            settings,
            viewport,
            events: Vec::new(),
        };
        state.reset(seed);
        state
    }

    /// Re-initialize everything but the record, settings and viewport
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.phase = GamePhase::Waiting;
        self.over = false;
        self.scene_offset = 0.0;
        self.score = 0;
        self.streak = 0;
        self.landing = None;

        self.platforms = generate::initial_platforms(self.settings.debug_mode, &mut self.rng);
        self.platforms_generated = self.platforms.len() as u32;

        let first = self.platforms[0];
        self.sticks.clear();
        self.current_stick = Stick::new(first.right());
        self.decorations =
            generate::initial_decorations(self.viewport, self.settings.theme, &mut self.rng);

        self.hero = Vec2::new(first.right() - HERO_DISTANCE_FROM_EDGE, 0.0);
        self.gems.clear();
        self.bonus_gem_rotation = 0.0;
        self.blink = Blink::default();
        self.events.clear();

        log::info!("Game reset with seed {}", seed);
    }

    /// Perfect zone width, doubled in debug mode
    pub fn perfect_area(&self) -> f32 {
        if self.settings.debug_mode {
            PERFECT_AREA_SIZE * 2.0
        } else {
            PERFECT_AREA_SIZE
        }
    }

    /// How far the hero falls before the run ends
    pub fn fall_threshold(&self) -> f32 {
        PLATFORM_HEIGHT + FALL_DEPTH + self.viewport.margin_y().max(0.0)
    }

    /// Input edge: start coding a stick. Only valid while waiting.
    pub fn press(&mut self) -> bool {
        if self.over || self.phase != GamePhase::Waiting {
            return false;
        }
        self.set_phase(GamePhase::Coding);
        true
    }

    /// Input edge: stop coding and deploy. Only valid while coding.
    pub fn release(&mut self) -> bool {
        if self.over || self.phase != GamePhase::Coding {
            return false;
        }
        self.set_phase(GamePhase::Deploying);
        true
    }

    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::debug!("Phase {} -> {}", from.as_str(), to.as_str());
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn spawn_gem(&mut self, gem: Gem) {
        self.events.push(GameEvent::GemSpawned(gem.kind()));
        self.gems.push(gem);
    }

    pub fn find_platform(&self, id: u32) -> Option<Platform> {
        self.platforms.iter().find(|p| p.id == id).copied()
    }

    /// All sticks, oldest first, the current one last
    pub fn all_sticks(&self) -> impl Iterator<Item = &Stick> {
        self.sticks.iter().chain(std::iter::once(&self.current_stick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_state() -> GameState {
        GameState::new(7, 0, Settings::default(), Viewport::default())
    }

    #[test]
    fn test_reset_layout() {
        let state = new_state();
        assert_eq!(state.phase, GamePhase::Waiting);
        assert_eq!(state.platforms.len(), INITIAL_PLATFORMS + 1);
        assert_eq!(state.platforms[0], Platform::new(50.0, 50.0, 0));
        assert_eq!(state.current_stick, Stick::new(100.0));
        assert!(state.sticks.is_empty());
        assert_eq!(state.hero, Vec2::new(90.0, 0.0));
        assert!(state.decorations.len() >= MIN_INITIAL_DECORATIONS);
    }

    #[test]
    fn test_reset_keeps_record() {
        let mut state = GameState::new(1, 42, Settings::default(), Viewport::default());
        state.score = 10;
        state.streak = 3;
        state.over = true;
        state.reset(2);
        assert_eq!(state.record, 42);
        assert_eq!(state.score, 0);
        assert_eq!(state.streak, 0);
        assert!(!state.over);
    }

    #[test]
    fn test_press_release_edges() {
        let mut state = new_state();
        assert!(!state.release());
        assert!(state.press());
        assert_eq!(state.phase, GamePhase::Coding);
        assert!(!state.press());
        assert!(state.release());
        assert_eq!(state.phase, GamePhase::Deploying);
        assert!(!state.release());

        let events = state.drain_events();
        assert_eq!(events.len(), 2);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_phase_names() {
        for phase in [
            GamePhase::Waiting,
            GamePhase::Coding,
            GamePhase::Deploying,
            GamePhase::Running,
            GamePhase::Migrating,
            GamePhase::Crashing,
        ] {
            assert_eq!(GamePhase::parse(phase.as_str()), Ok(phase));
        }
        assert_eq!(
            GamePhase::parse("walking"),
            Err(SimError::UnknownPhase("walking".into()))
        );
    }

    #[test]
    fn test_fall_threshold_tracks_viewport() {
        let mut state = new_state();
        assert_eq!(state.fall_threshold(), 200.0);
        state.viewport = Viewport::new(800.0, 775.0);
        assert_eq!(state.fall_threshold(), 400.0);
    }

    #[test]
    fn test_debug_doubles_perfect_area() {
        let mut state = new_state();
        assert_eq!(state.perfect_area(), PERFECT_AREA_SIZE);
        state.settings.debug_mode = true;
        assert_eq!(state.perfect_area(), PERFECT_AREA_SIZE * 2.0);
    }
}
