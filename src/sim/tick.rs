//! Variable timestep simulation tick
//!
//! One tick runs integrate -> collide -> score in that order. The lifecycle
//! reaction to a collision belongs to the engine.

use glam::Vec2;

use super::collision::{Collision, bounds_collision, hits_obstacle};
use super::physics::integrate;
use super::scoring::{crossed_center, milestone_due, speed_for_score};
use super::state::{GameEvent, GamePhase, GameState, Playfield};
use crate::consts::*;
use crate::tuning::TuningProfile;

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutcome {
    /// First terminal contact, if any
    pub collision: Option<Collision>,
    /// Obstacles scored this tick
    pub passes: u32,
}

/// Advance a running game by `dt` seconds
///
/// Obstacles before the first one hit still score; those after it are left
/// unscored for the tick. A no-op outside `Running`.
pub fn tick(
    state: &mut GameState,
    profile: &TuningProfile,
    playfield: Playfield,
    dt: f32,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if state.phase != GamePhase::Running {
        return outcome;
    }
    state.time_ticks += 1;

    // Integrate
    integrate(&mut state.entity, profile.gravity, dt);
    let scroll = state.scroll_speed * dt * TIME_SCALE;
    for obstacle in &mut state.obstacles {
        obstacle.horizontal_position -= scroll;
    }

    // Collide
    outcome.collision = bounds_collision(
        state.entity.vertical_position,
        playfield.height,
        ENTITY_HEIGHT,
    );
    let center = Vec2::new(ENTITY_X, state.entity.vertical_position);
    let first_hit = state.obstacles.iter().position(|obstacle| {
        hits_obstacle(
            center,
            profile.hitbox_radius,
            obstacle,
            profile.gap_size,
            playfield.height,
            profile.hitbox_margin,
        )
    });
    if let Some(index) = first_hit {
        let id = state.obstacles[index].id;
        outcome.collision.get_or_insert(Collision::Obstacle { id });
    }

    // Score
    let scored = first_hit.unwrap_or(state.obstacles.len());
    for obstacle in &mut state.obstacles[..scored] {
        let prev_x = obstacle.horizontal_position + scroll;
        if obstacle.passed || !crossed_center(prev_x, obstacle.horizontal_position, ENTITY_X) {
            continue;
        }
        obstacle.passed = true;
        state.score += 1;
        outcome.passes += 1;
        state.scroll_speed = speed_for_score(
            state.score,
            profile.base_speed,
            profile.max_speed,
            profile.speed_increase_rate,
        );
        if milestone_due(state.score, profile.milestone_score, state.milestone_fired) {
            state.milestone_fired = true;
            state.events.push(GameEvent::Milestone { score: state.score });
        }
    }

    // Cull obstacles whose trailing edge left the playfield
    state
        .obstacles
        .retain(|o| o.horizontal_position + OBSTACLE_WIDTH > 0.0);

    debug_assert!(state.scroll_speed >= profile.base_speed);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn running_state(profile: &TuningProfile) -> GameState {
        let mut state = GameState::new(300.0, profile.base_speed);
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_tick_is_noop_unless_running() {
        let profile = TuningProfile::desktop();
        let mut state = running_state(&profile);
        for phase in [GamePhase::Idle, GamePhase::Paused, GamePhase::Ended] {
            state.phase = phase;
            let outcome = tick(&mut state, &profile, Playfield::new(800.0, 600.0), DT);
            assert_eq!(outcome, TickOutcome::default());
            assert_eq!(state.entity.vertical_position, 300.0);
            assert_eq!(state.time_ticks, 0);
        }
    }

    #[test]
    fn test_obstacles_scroll_by_speed() {
        let profile = TuningProfile::desktop();
        let mut state = running_state(&profile);
        state.push_obstacle(700.0, 200.0);
        tick(&mut state, &profile, Playfield::new(800.0, 600.0), DT);
        let moved = 700.0 - state.obstacles[0].horizontal_position;
        assert!((moved - profile.base_speed).abs() < 1e-3);
    }

    #[test]
    fn test_clean_pass_scores_once() {
        let mut profile = TuningProfile::desktop();
        profile.gravity = 0.0;
        let playfield = Playfield::new(800.0, 600.0);
        let mut state = running_state(&profile);
        state.push_obstacle(200.0, 200.0);

        let mut collided = false;
        for _ in 0..120 {
            // Hold the pet inside the gap
            state.entity.vertical_position = 300.0;
            state.entity.vertical_velocity = 0.0;
            collided |= tick(&mut state, &profile, playfield, DT).collision.is_some();
        }
        assert!(!collided);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_pass_and_crash_same_tick_keeps_point() {
        let mut profile = TuningProfile::desktop();
        profile.gravity = 0.0;
        let playfield = Playfield::new(800.0, 600.0);
        let mut state = running_state(&profile);
        // First obstacle's center is about to cross the pet
        state.push_obstacle(ENTITY_X - OBSTACLE_WIDTH / 2.0 + 1.0, 200.0);
        // Second obstacle's upper segment covers the pet
        state.push_obstacle(ENTITY_X - 10.0, 450.0);

        let outcome = tick(&mut state, &profile, playfield, DT);
        assert_eq!(outcome.passes, 1);
        assert_eq!(state.score, 1);
        assert_eq!(
            outcome.collision,
            Some(Collision::Obstacle {
                id: state.obstacles[1].id
            })
        );
    }

    #[test]
    fn test_obstacles_behind_hit_are_not_scored() {
        let mut profile = TuningProfile::desktop();
        profile.gravity = 0.0;
        let mut state = running_state(&profile);
        // Colliding obstacle first, crossing obstacle second
        state.push_obstacle(ENTITY_X - 10.0, 450.0);
        state.push_obstacle(ENTITY_X - OBSTACLE_WIDTH / 2.0 + 1.0, 200.0);

        let outcome = tick(&mut state, &profile, Playfield::new(800.0, 600.0), DT);
        assert!(outcome.collision.is_some());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_speed_ramps_with_score() {
        let mut profile = TuningProfile::desktop();
        profile.gravity = 0.0;
        let mut state = running_state(&profile);
        state.score = 4;
        state.push_obstacle(ENTITY_X - OBSTACLE_WIDTH / 2.0 + 1.0, 200.0);
        tick(&mut state, &profile, Playfield::new(800.0, 600.0), DT);
        let expected = profile.base_speed + 5.0 * profile.speed_increase_rate;
        assert!((state.scroll_speed - expected).abs() < 1e-5);
    }

    #[test]
    fn test_milestone_event_fires_once() {
        let mut profile = TuningProfile::desktop();
        profile.gravity = 0.0;
        let playfield = Playfield::new(800.0, 600.0);
        let mut state = running_state(&profile);
        state.score = profile.milestone_score - 1;
        // Two obstacles crossing on the same tick
        state.push_obstacle(ENTITY_X - OBSTACLE_WIDTH / 2.0 + 1.0, 200.0);
        state.push_obstacle(ENTITY_X - OBSTACLE_WIDTH / 2.0 + 2.0, 200.0);

        tick(&mut state, &profile, playfield, DT);
        assert_eq!(state.score, profile.milestone_score + 1);
        assert_eq!(
            state.events,
            vec![GameEvent::Milestone {
                score: profile.milestone_score
            }]
        );
        assert!(state.milestone_fired);
    }

    #[test]
    fn test_offscreen_obstacles_are_culled() {
        let profile = TuningProfile::desktop();
        let mut state = running_state(&profile);
        state.push_obstacle(-OBSTACLE_WIDTH + 1.0, 200.0);
        state.push_obstacle(400.0, 200.0);
        tick(&mut state, &profile, Playfield::new(800.0, 600.0), DT);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].id, 2);
    }

    #[test]
    fn test_floor_contact_reported() {
        let profile = TuningProfile::desktop();
        let mut state = running_state(&profile);
        state.entity.vertical_position = 549.0;
        state.entity.vertical_velocity = 5.0;
        let outcome = tick(&mut state, &profile, Playfield::new(800.0, 600.0), DT);
        assert_eq!(outcome.collision, Some(Collision::Floor));
    }
}
