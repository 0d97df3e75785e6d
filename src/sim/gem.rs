//! Gem feedback animations
//!
//! A collected gem bursts from the platform center on a perfect hit; a missed
//! gem fades there when a landing was not perfect. Both count down and are
//! dropped once their timer runs out. Purely cosmetic.

use glam::Vec2;

use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GemKind {
    Collected,
    Missed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gem {
    Collected {
        pos: Vec2,
        size: f32,
        time_left: f32,
        /// Degrees
        rotation: f32,
        debug: bool,
    },
    Missed {
        pos: Vec2,
        size: f32,
        time_left: f32,
        debug: bool,
    },
}

/// Height at which gems sit above a platform at world x
fn gem_anchor(x: f32, size: f32) -> Vec2 {
    Vec2::new(x, CANVAS_HEIGHT - PLATFORM_HEIGHT - size / 2.0)
}

impl Gem {
    /// Starts from the bonus gem's current spin angle
    pub fn collected(x: f32, size: f32, rotation: f32, debug: bool) -> Self {
        Gem::Collected {
            pos: gem_anchor(x, size),
            size,
            time_left: COLLECTED_GEM_MS,
            rotation,
            debug,
        }
    }

    pub fn missed(x: f32, size: f32, debug: bool) -> Self {
        Gem::Missed {
            pos: gem_anchor(x, size),
            size,
            time_left: MISSED_GEM_MS,
            debug,
        }
    }

    pub fn kind(&self) -> GemKind {
        match self {
            Gem::Collected { .. } => GemKind::Collected,
            Gem::Missed { .. } => GemKind::Missed,
        }
    }

    pub fn pos(&self) -> Vec2 {
        match self {
            Gem::Collected { pos, .. } | Gem::Missed { pos, .. } => *pos,
        }
    }

    pub fn size(&self) -> f32 {
        match self {
            Gem::Collected { size, .. } | Gem::Missed { size, .. } => *size,
        }
    }

    pub fn rotation(&self) -> f32 {
        match self {
            Gem::Collected { rotation, .. } => *rotation,
            Gem::Missed { .. } => 0.0,
        }
    }

    pub fn is_debug(&self) -> bool {
        match self {
            Gem::Collected { debug, .. } | Gem::Missed { debug, .. } => *debug,
        }
    }

    /// Animation progress from 0 (spawned) to 1 (finished)
    pub fn progress(&self) -> f32 {
        let (time_left, duration) = match self {
            Gem::Collected { time_left, .. } => (*time_left, COLLECTED_GEM_MS),
            Gem::Missed { time_left, .. } => (*time_left, MISSED_GEM_MS),
        };
        (1.0 - time_left / duration).clamp(0.0, 1.0)
    }

    pub fn opacity(&self) -> f32 {
        match self {
            Gem::Collected { .. } => 1.0 - self.progress(),
            Gem::Missed { .. } => 0.7 - self.progress() * 0.7,
        }
    }

    pub fn scale(&self) -> f32 {
        match self {
            Gem::Collected { .. } => 1.0 + self.progress() * 0.8,
            Gem::Missed { .. } => 1.0 - self.progress() * 0.3,
        }
    }

    /// Advance the animation; returns true once it has finished
    pub fn update(&mut self, dt: f32) -> bool {
        match self {
            Gem::Collected {
                pos,
                time_left,
                rotation,
                ..
            } => {
                *time_left -= dt;
                *rotation += dt / 10.0;
                pos.y -= dt * 0.05;
                *time_left <= 0.0
            }
            Gem::Missed { time_left, .. } => {
                *time_left -= dt;
                *time_left <= 0.0
            }
        }
    }
}

/// Advance all gems and drop the finished ones
pub fn update_gems(gems: &mut Vec<Gem>, dt: f32) {
    gems.retain_mut(|gem| !gem.update(dt));
}
