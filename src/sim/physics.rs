//! Vertical motion of the pet

use super::state::Entity;
use crate::consts::TIME_SCALE;

/// Advance velocity then position by one step of `dt` seconds
///
/// Semi-implicit Euler: the freshly updated velocity moves the pet.
#[inline]
pub fn integrate(entity: &mut Entity, gravity: f32, dt: f32) {
    entity.vertical_velocity += gravity * dt * TIME_SCALE;
    entity.vertical_position += entity.vertical_velocity * dt * TIME_SCALE;
}

/// Flap: velocity is overwritten, never accumulated
#[inline]
pub fn apply_impulse(entity: &mut Entity, jump_impulse: f32) {
    entity.vertical_velocity = jump_impulse;
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_free_fall_matches_closed_form() {
        let mut entity = Entity::at(300.0);
        let gravity = 0.4;
        for n in 1..=30u32 {
            integrate(&mut entity, gravity, DT);
            // v_i = i * g, position sums every post-update velocity
            let expected_v = n as f32 * gravity;
            let expected_y = 300.0 + gravity * (n * (n + 1)) as f32 / 2.0;
            assert!((entity.vertical_velocity - expected_v).abs() < 1e-3);
            assert!((entity.vertical_position - expected_y).abs() < 1e-2);
        }
    }

    #[test]
    fn test_zero_step_is_noop() {
        let mut entity = Entity {
            vertical_position: 120.0,
            vertical_velocity: -3.0,
        };
        integrate(&mut entity, 0.4, 0.0);
        assert_eq!(entity.vertical_position, 120.0);
        assert_eq!(entity.vertical_velocity, -3.0);
    }

    #[test]
    fn test_impulse_overwrites_velocity() {
        let mut entity = Entity::at(300.0);
        entity.vertical_velocity = 6.5;
        apply_impulse(&mut entity, -8.0);
        assert_eq!(entity.vertical_velocity, -8.0);
        apply_impulse(&mut entity, -8.0);
        assert_eq!(entity.vertical_velocity, -8.0);
    }
}
