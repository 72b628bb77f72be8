//! Lifecycle state machine
//!
//! `Engine` owns the run and is the only way in: the host forwards frame
//! callbacks and player commands, and reads back a `Snapshot`. Commands
//! issued in the wrong phase are dropped without error.

use serde::Serialize;

use crate::consts::*;
use crate::highscores::BestScoreStore;
use crate::sim::physics::apply_impulse;
use crate::sim::scoring::speed_for_score;
use crate::sim::spawn::{
    PcgSource, RandomSource, SpawnSchedule, create_obstacle, create_opening_obstacle,
};
use crate::sim::{GameEvent, GamePhase, GameState, Playfield, Snapshot, Stepper, tick};
use crate::tuning::TuningProfile;

/// Internals exposed for inspection (debug overlay, console)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugSnapshot {
    pub phase: GamePhase,
    pub profile: String,
    pub playfield: Playfield,
    pub time_ticks: u64,
    pub stepper_anchor_ms: Option<f64>,
    pub next_spawn_due_ms: Option<f64>,
    pub last_impulse_ms: Option<f64>,
    pub milestone_fired: bool,
    pub obstacle_count: usize,
    pub entity_position: f32,
    pub score: u32,
}

/// The game core
pub struct Engine<S: BestScoreStore, R: RandomSource = PcgSource> {
    state: GameState,
    profile: TuningProfile,
    /// Profile waiting for the next run boundary
    pending_profile: Option<TuningProfile>,
    playfield: Playfield,
    stepper: Stepper,
    spawner: SpawnSchedule,
    rng: R,
    store: S,
    last_impulse_ms: Option<f64>,
}

impl<S: BestScoreStore, R: RandomSource> Engine<S, R> {
    /// Mount in `Idle` with the stored best score
    pub fn new(profile: TuningProfile, playfield: Playfield, rng: R, store: S) -> Self {
        let mut state = GameState::new(playfield.start_y(), profile.base_speed);
        state.best_score = store.load_best_score();
        log::info!(
            "Engine ready ({} profile, {}x{}, best {})",
            profile.name,
            playfield.width,
            playfield.height,
            state.best_score
        );
        Self {
            state,
            profile,
            pending_profile: None,
            playfield,
            stepper: Stepper::new(),
            spawner: SpawnSchedule::new(),
            rng,
            store,
            last_impulse_ms: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn profile(&self) -> &TuningProfile {
        &self.profile
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Begin a run from `Idle`
    pub fn start(&mut self) {
        if self.state.phase != GamePhase::Idle {
            log::debug!("start ignored in {:?}", self.state.phase);
            return;
        }
        self.begin_run();
    }

    /// Begin a fresh run after game over
    pub fn retry(&mut self) {
        if self.state.phase != GamePhase::Ended {
            log::debug!("retry ignored in {:?}", self.state.phase);
            return;
        }
        self.begin_run();
    }

    /// Leave the game-over screen for the menu
    pub fn return_to_menu(&mut self) {
        if self.state.phase != GamePhase::Ended {
            log::debug!("return_to_menu ignored in {:?}", self.state.phase);
            return;
        }
        self.apply_pending_profile();
        self.state.reset_run(self.playfield.start_y(), self.profile.base_speed);
        self.state.phase = GamePhase::Idle;
        self.state.best_score = self.store.load_best_score();
        self.stepper.clear();
        self.spawner.stop();
        self.last_impulse_ms = None;
        log::info!("Back to menu");
    }

    /// Flap (tap, click, space bar)
    ///
    /// In `Idle` this starts the run instead. Taps within the debounce window
    /// of the last accepted one are dropped.
    pub fn impulse(&mut self, now_ms: f64) {
        match self.state.phase {
            GamePhase::Idle => {
                self.begin_run();
                self.last_impulse_ms = Some(now_ms);
            }
            GamePhase::Running => {
                if let Some(last) = self.last_impulse_ms {
                    if now_ms - last < IMPULSE_DEBOUNCE_MS {
                        log::debug!("impulse debounced ({:.0} ms)", now_ms - last);
                        return;
                    }
                }
                apply_impulse(&mut self.state.entity, self.profile.jump_impulse);
                self.last_impulse_ms = Some(now_ms);
            }
            GamePhase::Paused | GamePhase::Ended => {}
        }
    }

    /// Suspend or resume (visibility loss, window blur, pause button)
    pub fn set_paused(&mut self, paused: bool, now_ms: f64) {
        match (paused, self.state.phase) {
            (true, GamePhase::Running) => {
                self.state.phase = GamePhase::Paused;
                self.spawner.suspend(now_ms, self.profile.spawn_interval_ms);
                self.stepper.clear();
                log::info!("Paused at score {}", self.state.score);
            }
            (false, GamePhase::Paused) => {
                self.state.phase = GamePhase::Running;
                self.spawner.resume(now_ms);
                self.stepper.anchor(now_ms);
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    /// Per-frame callback from the host
    ///
    /// Stray callbacks outside `Running` do nothing.
    pub fn frame(&mut self, now_ms: f64) {
        if self.state.phase != GamePhase::Running {
            return;
        }
        let dt = self.stepper.advance(now_ms);

        if self.spawner.poll(now_ms, self.profile.spawn_interval_ms) {
            self.spawn_obstacle();
        }

        let outcome = tick(&mut self.state, &self.profile, self.playfield, dt);
        if let Some(collision) = outcome.collision {
            log::info!("Collision: {:?}", collision);
            self.end_run();
        }
    }

    /// Playfield resized; bounds are re-derived from it on every use
    pub fn resize(&mut self, width: f32, height: f32) {
        self.playfield = Playfield::new(width, height);
        if self.state.phase == GamePhase::Idle {
            self.state.entity.vertical_position = self.playfield.start_y();
        }
    }

    /// Swap the tuning profile (viewport class changed)
    ///
    /// Takes effect right away in `Idle`. During a run, or on the game-over
    /// screen, it waits for the next run boundary so obstacles already on
    /// the field keep their geometry.
    pub fn set_profile(&mut self, profile: TuningProfile) {
        if self.state.phase == GamePhase::Idle {
            self.pending_profile = None;
            self.install_profile(profile);
        } else {
            log::info!("Tuning profile {} deferred to next run", profile.name);
            self.pending_profile = Some(profile);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.profile.gap_size, self.profile.milestone_score)
    }

    /// Take pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    pub fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            phase: self.state.phase,
            profile: self.profile.name.clone(),
            playfield: self.playfield,
            time_ticks: self.state.time_ticks,
            stepper_anchor_ms: self.stepper.previous_ms(),
            next_spawn_due_ms: self.spawner.next_due_ms(),
            last_impulse_ms: self.last_impulse_ms,
            milestone_fired: self.state.milestone_fired,
            obstacle_count: self.state.obstacles.len(),
            entity_position: self.state.entity.vertical_position,
            score: self.state.score,
        }
    }

    fn install_profile(&mut self, profile: TuningProfile) {
        log::info!("Tuning profile: {}", profile.name);
        self.profile = profile;
        self.state.scroll_speed = speed_for_score(
            self.state.score,
            self.profile.base_speed,
            self.profile.max_speed,
            self.profile.speed_increase_rate,
        );
    }

    fn apply_pending_profile(&mut self) {
        if let Some(profile) = self.pending_profile.take() {
            self.install_profile(profile);
        }
    }

    fn begin_run(&mut self) {
        self.apply_pending_profile();
        self.state.reset_run(self.playfield.start_y(), self.profile.base_speed);
        self.state.phase = GamePhase::Running;
        self.stepper.clear();
        self.spawner.arm();
        self.last_impulse_ms = None;

        let id = self.state.next_obstacle_id();
        let opening = create_opening_obstacle(
            id,
            self.playfield,
            self.profile.gap_size,
            self.profile.edge_margin,
            &mut self.rng,
        );
        self.state.obstacles.push(opening);
        log::info!("Run started (best {})", self.state.best_score);
    }

    fn spawn_obstacle(&mut self) {
        let id = self.state.next_obstacle_id();
        let obstacle = create_obstacle(
            id,
            self.playfield,
            self.profile.gap_size,
            self.profile.edge_margin,
            &mut self.rng,
        );
        self.state.obstacles.push(obstacle);
    }

    /// Freeze the final frame and offer the score to persistence
    fn end_run(&mut self) {
        self.state.phase = GamePhase::Ended;
        self.spawner.stop();
        self.stepper.clear();

        let final_score = self.state.score;
        log::info!("Game over, score {}", final_score);
        if final_score > self.state.best_score {
            self.state.best_score = final_score;
            self.store.save_best_score(final_score);
            log::info!("New best score: {}", final_score);
        }
    }
}
