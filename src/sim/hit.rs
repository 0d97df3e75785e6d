//! Stick-to-platform hit detection
//!
//! Pure: no randomness, no state. Safe to call every frame while running.

use super::error::SimError;
use super::state::{Platform, Stick};
use crate::consts::STICK_FLAT_DEGREES;

/// Result of a hit check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// Platform under the stick's tip, if any
    pub platform: Option<Platform>,
    /// Tip landed inside the centered perfect zone
    pub perfect: bool,
}

impl HitResult {
    pub fn miss() -> Self {
        Self {
            platform: None,
            perfect: false,
        }
    }
}

/// Find the platform the flat stick's tip rests on
///
/// Both the platform span and the perfect zone are open intervals: a tip
/// exactly on an edge is outside.
pub fn check_hit(
    stick: &Stick,
    platforms: &[Platform],
    perfect_area: f32,
) -> Result<HitResult, SimError> {
    if stick.rotation != STICK_FLAT_DEGREES {
        return Err(SimError::InvalidStickRotation {
            degrees: stick.rotation,
        });
    }

    let tip = stick.tip();
    let Some(platform) = platforms
        .iter()
        .find(|p| p.x < tip && tip < p.right())
        .copied()
    else {
        return Ok(HitResult::miss());
    };

    let half = perfect_area / 2.0;
    let center = platform.center();
    let perfect = center - half < tip && tip < center + half;

    Ok(HitResult {
        platform: Some(platform),
        perfect,
    })
}
