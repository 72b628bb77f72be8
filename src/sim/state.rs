//! Game state and core simulation types
//!
//! `GameState` is the single authoritative record of a run. The presentation
//! layer only ever sees a `Snapshot` of it.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tilt_degrees;

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu / waiting for the first tap
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Suspended (tab hidden, window blurred, pause button)
    Paused,
    /// Run over, final frame frozen for display
    Ended,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Score first reached the celebration threshold this run
    Milestone { score: u32 },
}

/// Playfield dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Where the pet starts each run
    pub fn start_y(&self) -> f32 {
        ENTITY_START_Y.min(self.height * 0.5)
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// The controlled pet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Center Y; positions out of bounds end the run, they are never clamped
    pub vertical_position: f32,
    /// Negative is upward
    pub vertical_velocity: f32,
}

impl Entity {
    pub fn at(vertical_position: f32) -> Self {
        Self {
            vertical_position,
            vertical_velocity: 0.0,
        }
    }
}

/// A gapped obstacle pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Leading (left) edge
    pub horizontal_position: f32,
    /// Bottom edge of the upper segment
    pub gap_top_height: f32,
    /// Already scored; an obstacle is counted at most once
    #[serde(default)]
    pub passed: bool,
}

/// Complete run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub entity: Entity,
    /// Active obstacles, oldest (leftmost) first
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub scroll_speed: f32,
    pub best_score: u32,
    /// Milestone already announced this run
    pub milestone_fired: bool,
    /// Simulated ticks this run
    pub time_ticks: u64,
    /// Pending notifications, drained by the engine
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(start_y: f32, base_speed: f32) -> Self {
        Self {
            phase: GamePhase::Idle,
            entity: Entity::at(start_y),
            obstacles: Vec::new(),
            score: 0,
            scroll_speed: base_speed,
            best_score: 0,
            milestone_fired: false,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Put every per-run field back to its starting value
    ///
    /// `best_score` survives; it belongs to the player, not the run.
    pub fn reset_run(&mut self, start_y: f32, base_speed: f32) {
        self.entity = Entity::at(start_y);
        self.obstacles.clear();
        self.score = 0;
        self.scroll_speed = base_speed;
        self.milestone_fired = false;
        self.time_ticks = 0;
        self.events.clear();
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append an obstacle at the back of the queue
    pub fn push_obstacle(&mut self, horizontal_position: f32, gap_top_height: f32) -> u32 {
        let id = self.next_obstacle_id();
        self.obstacles.push(Obstacle {
            id,
            horizontal_position,
            gap_top_height,
            passed: false,
        });
        id
    }
}

/// Obstacle as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstacleView {
    pub horizontal_position: f32,
    pub gap_top_height: f32,
}

/// Immutable per-frame view of the run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub entity_position: f32,
    pub entity_velocity: f32,
    pub score: u32,
    pub scroll_speed: f32,
    pub obstacles: Vec<ObstacleView>,
    pub best_score: u32,
    /// Geometry needed to draw obstacles
    pub gap_size: f32,
    pub obstacle_width: f32,
    pub milestone_score: u32,
}

impl Snapshot {
    pub fn capture(state: &GameState, gap_size: f32, milestone_score: u32) -> Self {
        Self {
            phase: state.phase,
            entity_position: state.entity.vertical_position,
            entity_velocity: state.entity.vertical_velocity,
            score: state.score,
            scroll_speed: state.scroll_speed,
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    horizontal_position: o.horizontal_position,
                    gap_top_height: o.gap_top_height,
                })
                .collect(),
            best_score: state.best_score,
            gap_size,
            obstacle_width: OBSTACLE_WIDTH,
            milestone_score,
        }
    }

    /// Score card: reached the celebration threshold
    pub fn goal_reached(&self) -> bool {
        self.score >= self.milestone_score
    }

    /// Score card progress bar fill, 0..=1
    pub fn milestone_progress(&self) -> f32 {
        if self.milestone_score == 0 {
            return 1.0;
        }
        (self.score as f32 / self.milestone_score as f32).min(1.0)
    }

    /// Sprite rotation for the pet
    pub fn tilt_degrees(&self) -> f32 {
        tilt_degrees(self.entity_velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_run_keeps_best_score() {
        let mut state = GameState::new(300.0, 4.0);
        state.best_score = 12;
        state.score = 7;
        state.scroll_speed = 4.7;
        state.milestone_fired = true;
        state.push_obstacle(50.0, 200.0);

        state.reset_run(300.0, 4.0);
        assert_eq!(state.best_score, 12);
        assert_eq!(state.score, 0);
        assert_eq!(state.scroll_speed, 4.0);
        assert!(!state.milestone_fired);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_obstacle_ids_keep_insertion_order() {
        let mut state = GameState::new(300.0, 4.0);
        let a = state.push_obstacle(800.0, 100.0);
        let b = state.push_obstacle(900.0, 150.0);
        assert!(a < b);
        assert_eq!(state.obstacles[0].id, a);
        assert_eq!(state.obstacles[1].id, b);
    }

    #[test]
    fn test_start_y_fits_small_playfield() {
        assert_eq!(Playfield::new(800.0, 900.0).start_y(), ENTITY_START_Y);
        assert_eq!(Playfield::new(300.0, 400.0).start_y(), 200.0);
    }

    #[test]
    fn test_snapshot_progress() {
        let mut state = GameState::new(300.0, 4.0);
        state.score = 5;
        let snap = Snapshot::capture(&state, 200.0, 10);
        assert!(!snap.goal_reached());
        assert!((snap.milestone_progress() - 0.5).abs() < 1e-6);

        state.score = 14;
        let snap = Snapshot::capture(&state, 200.0, 10);
        assert!(snap.goal_reached());
        assert_eq!(snap.milestone_progress(), 1.0);
    }

    #[test]
    fn test_milestone_event_json_shape() {
        let json = serde_json::to_string(&GameEvent::Milestone { score: 10 }).unwrap();
        assert_eq!(json, r#"{"type":"milestone","score":10}"#);
    }
}
