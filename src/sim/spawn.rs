//! Obstacle generation
//!
//! Gap placement is random within safe bounds; spawning follows a wall-clock
//! cadence that is independent of the physics step.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Obstacle, Playfield};
use crate::consts::*;

/// Source of uniform randomness in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

/// Seeded PCG source (reproducible runs)
#[derive(Debug, Clone)]
pub struct PcgSource {
    rng: Pcg32,
}

impl PcgSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for PcgSource {
    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed list of values, cycling; 0.5 when empty
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Always returns `value`
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0)
    }
}

/// Range `gap_top_height` may be drawn from
///
/// Never empty: a playfield too small for the gap plus both margins gets a
/// `MIN_GAP_SPAN` wide range starting at the top margin.
pub fn gap_bounds(playfield_height: f32, gap_size: f32, edge_margin: f32) -> (f32, f32) {
    let lower = edge_margin;
    let upper = playfield_height - gap_size - edge_margin;
    if upper < lower {
        (lower, lower + MIN_GAP_SPAN)
    } else {
        (lower, upper)
    }
}

/// New obstacle just off the right edge with a random gap
pub fn create_obstacle(
    id: u32,
    playfield: Playfield,
    gap_size: f32,
    edge_margin: f32,
    rng: &mut dyn RandomSource,
) -> Obstacle {
    let (lower, upper) = gap_bounds(playfield.height, gap_size, edge_margin);
    let gap_top_height = (lower + rng.next_unit() * (upper - lower)).clamp(lower, upper);
    Obstacle {
        id,
        horizontal_position: playfield.width,
        gap_top_height,
        passed: false,
    }
}

/// First obstacle of a run: further out, gap near the vertical center
pub fn create_opening_obstacle(
    id: u32,
    playfield: Playfield,
    gap_size: f32,
    edge_margin: f32,
    rng: &mut dyn RandomSource,
) -> Obstacle {
    let (lower, upper) = gap_bounds(playfield.height, gap_size, edge_margin);
    let centered = (playfield.height - gap_size) * 0.5;
    let jitter = (rng.next_unit() * 2.0 - 1.0) * OPENING_JITTER;
    Obstacle {
        id,
        horizontal_position: playfield.width + OPENING_OFFSET,
        gap_top_height: (centered + jitter).clamp(lower, upper),
        passed: false,
    }
}

/// Wall-clock spawn timer state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Cadence {
    /// No run in progress
    #[default]
    Stopped,
    /// Run started; first frame sets the due time
    Arming,
    /// Next spawn at this timestamp (ms)
    Due(f64),
    /// Paused with this much time left until the next spawn (ms)
    Suspended { remaining_ms: f64 },
}

/// Decides when the next obstacle appears
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnSchedule {
    cadence: Cadence,
}

impl SpawnSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn next_due_ms(&self) -> Option<f64> {
        match self.cadence {
            Cadence::Due(at) => Some(at),
            _ => None,
        }
    }

    /// Begin a run; the interval starts counting on the first frame
    pub fn arm(&mut self) {
        self.cadence = Cadence::Arming;
    }

    /// Stop spawning entirely (run ended or abandoned)
    pub fn stop(&mut self) {
        self.cadence = Cadence::Stopped;
    }

    /// True when an obstacle should spawn at `now_ms`
    ///
    /// At most one spawn per call. The next due time keeps to the fixed grid
    /// while polls arrive within one interval of it; a later poll restarts
    /// the interval from now instead of catching up.
    pub fn poll(&mut self, now_ms: f64, interval_ms: f64) -> bool {
        match self.cadence {
            Cadence::Arming => {
                self.cadence = Cadence::Due(now_ms + interval_ms);
                false
            }
            Cadence::Due(at) if now_ms >= at => {
                let next = if now_ms - at < interval_ms {
                    at + interval_ms
                } else {
                    now_ms + interval_ms
                };
                self.cadence = Cadence::Due(next);
                true
            }
            _ => false,
        }
    }

    /// Freeze the countdown
    pub fn suspend(&mut self, now_ms: f64, interval_ms: f64) {
        self.cadence = match self.cadence {
            Cadence::Due(at) => Cadence::Suspended {
                remaining_ms: (at - now_ms).clamp(0.0, interval_ms),
            },
            Cadence::Arming => Cadence::Suspended {
                remaining_ms: interval_ms,
            },
            other => other,
        };
    }

    /// Continue the countdown from where it was frozen
    pub fn resume(&mut self, now_ms: f64) {
        if let Cadence::Suspended { remaining_ms } = self.cadence {
            self.cadence = Cadence::Due(now_ms + remaining_ms);
        }
    }
}
