//! Simulation faults
//!
//! None of these are recoverable: each one means the phase machine itself
//! was driven out of sequence. The host logs the error and stops ticking.

use core::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    /// Hit detection requires a stick lying exactly flat
    InvalidStickRotation { degrees: f32 },
    /// Migrating refers to a landed platform that is no longer in the world
    MissingLandingPlatform { id: u32 },
    /// Migrating was entered without a landing being recorded
    NoLanding,
    /// A phase name outside the known set
    UnknownPhase(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStickRotation { degrees } => {
                write!(f, "hit check on a stick at {degrees}°, expected 90°")
            }
            Self::MissingLandingPlatform { id } => {
                write!(f, "landed platform {id} missing while migrating")
            }
            Self::NoLanding => write!(f, "migrating without a recorded landing"),
            Self::UnknownPhase(name) => write!(f, "unknown game phase: {name:?}"),
        }
    }
}

impl std::error::Error for SimError {}
