//! Scoring and the difficulty ramp

use crate::consts::OBSTACLE_WIDTH;

/// Did the obstacle's center cross `entity_x` while moving from `prev_x` to `new_x`
///
/// Positions are leading edges. The crossing is half-open
/// (`prev_center >= entity_x > new_center`) so a center landing exactly on
/// the pet counts on that tick and never again on the next one.
#[inline]
pub fn crossed_center(prev_x: f32, new_x: f32, entity_x: f32) -> bool {
    let half = OBSTACLE_WIDTH / 2.0;
    prev_x + half >= entity_x && entity_x > new_x + half
}

/// Scroll speed for a score, always within `[base_speed, max_speed]`
#[inline]
pub fn speed_for_score(score: u32, base_speed: f32, max_speed: f32, increase_rate: f32) -> f32 {
    let ceiling = max_speed.max(base_speed);
    (base_speed + score as f32 * increase_rate).clamp(base_speed, ceiling)
}

/// Should the milestone notification fire now
#[inline]
pub fn milestone_due(score: u32, milestone_score: u32, already_fired: bool) -> bool {
    !already_fired && milestone_score > 0 && score >= milestone_score
}
