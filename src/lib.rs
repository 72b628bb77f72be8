//! Pet Flap - a side-scrolling pet flapping arcade game
//!
//! Core modules:
//! - `sim`: Simulation (clock, physics, obstacle generation, collisions, scoring)
//! - `engine`: Lifecycle state machine, the only entry point for commands
//! - `tuning`: Data-driven game balance, selected per viewport class
//! - `highscores`: Best score persistence collaborator
//! - `pets`: Cosmetic pet roster used by the presentation layer

pub mod engine;
pub mod highscores;
pub mod pets;
pub mod sim;
pub mod tuning;

pub use engine::{DebugSnapshot, Engine};
pub use highscores::{BestScoreStore, MemoryStore};
pub use pets::{Pet, PetKind};
pub use tuning::{TuningProfile, ViewportClass};

/// Game configuration constants
pub mod consts {
    /// Tuning values are authored against a 60 Hz frame; rates are scaled by this
    pub const TIME_SCALE: f32 = 60.0;
    /// Largest simulation step after a stall (seconds)
    pub const MAX_DELTA: f32 = 0.1;
    /// Impulses closer together than this (ms) collapse into one
    pub const IMPULSE_DEBOUNCE_MS: f64 = 200.0;

    /// Fixed horizontal position of the pet's center
    pub const ENTITY_X: f32 = 100.0;
    /// Vertical start position on every run
    pub const ENTITY_START_Y: f32 = 300.0;
    /// Visual height of the pet; the floor sits this far above the playfield bottom
    pub const ENTITY_HEIGHT: f32 = 50.0;

    /// Obstacle column width
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    /// Smallest vertical range the gap placement may be drawn from
    pub const MIN_GAP_SPAN: f32 = 1.0;
    /// Extra lead-in distance for the first obstacle of a run
    pub const OPENING_OFFSET: f32 = 160.0;
    /// Max distance the opening gap may stray from the vertical center
    pub const OPENING_JITTER: f32 = 40.0;
}

/// Sprite tilt for a given vertical velocity (degrees, positive = nose down)
///
/// Rising always shows a slight upward tilt; falling tilts progressively
/// toward a 45 degree dive.
#[inline]
pub fn tilt_degrees(velocity: f32) -> f32 {
    if velocity < 0.0 {
        -15.0
    } else {
        (velocity * 4.0).clamp(-15.0, 45.0)
    }
}
