//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time enters only as explicit timestamps / step lengths
//! - Randomness only through `RandomSource`
//! - Stable iteration order (obstacles in insertion order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod physics;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::{Stepper, delta_seconds};
pub use collision::{Collision, Rect, circle_rect_collision};
pub use spawn::{
    Cadence, PcgSource, RandomSource, ScriptedSource, SpawnSchedule, create_obstacle,
    create_opening_obstacle, gap_bounds,
};
pub use state::{
    Entity, GameEvent, GamePhase, GameState, Obstacle, ObstacleView, Playfield, Snapshot,
};
pub use tick::{TickOutcome, tick};
