//! Scoring, perfect-hit streaks and the record
//!
//! A perfect hit is worth 2 points, a plain hit 1. From the second
//! consecutive perfect hit on, points are multiplied by `1 + streak * 0.5`.
//! Applied to the 2-point base that is always the whole number `2 + streak`,
//! so scores stay integers with no rounding.

use core::fmt;

pub const HIT_POINTS: u32 = 1;
pub const PERFECT_POINTS: u32 = 2;

/// Banner text surfaced for perfect hits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakMessage {
    /// First perfect hit of a streak
    Bonus,
    /// Second or later perfect hit in a row
    Streak { count: u32, points: u32 },
}

impl fmt::Display for StreakMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bonus => write!(f, "CLEAN CODE! x2 POINTS"),
            Self::Streak { count, points } => {
                write!(f, "CLEAN CODE STREAK!\nx{count} BONUS ({points}pts)")
            }
        }
    }
}

/// Result of scoring one landing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub points: u32,
    pub score: u32,
    pub record: u32,
    pub streak: u32,
    /// Score moved strictly past the previous record and must be persisted
    pub record_broken: bool,
    pub message: Option<StreakMessage>,
}

/// Point multiplier for the given streak count
pub fn streak_multiplier(streak: u32) -> f32 {
    if streak > 1 {
        1.0 + streak as f32 * 0.5
    } else {
        1.0
    }
}

/// Points for a hit given the streak count after it
fn points_for(perfect: bool, streak: u32) -> u32 {
    if !perfect {
        return HIT_POINTS;
    }
    if streak > 1 {
        // PERFECT_POINTS * (1 + streak / 2), exact in integers
        PERFECT_POINTS * (2 + streak) / 2
    } else {
        PERFECT_POINTS
    }
}

/// Score a landing on a platform
pub fn award(perfect: bool, streak: u32, score: u32, record: u32) -> ScoreOutcome {
    let streak = if perfect { streak + 1 } else { 0 };
    let points = points_for(perfect, streak);

    let message = match (perfect, streak) {
        (false, _) => None,
        (true, 1) => Some(StreakMessage::Bonus),
        (true, count) => Some(StreakMessage::Streak { count, points }),
    };

    let score = score + points;
    let record_broken = score > record;

    ScoreOutcome {
        points,
        score,
        record: record.max(score),
        streak,
        record_broken,
        message,
    }
}
