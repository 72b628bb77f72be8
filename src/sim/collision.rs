//! Collision detection for the pet
//!
//! The pet is a circle; obstacle segments are axis-aligned rectangles shrunk
//! by a hitbox margin so rounded pipe caps never cause unfair hits.

use glam::Vec2;

use super::state::Obstacle;
use crate::consts::OBSTACLE_WIDTH;

/// Axis-aligned rectangle, `min` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            min: Vec2::new(left, top),
            max: Vec2::new(right, bottom),
        }
    }

    /// Point of the rectangle nearest to `p`
    ///
    /// Component-wise so an inverted (fully inset) rectangle still yields a
    /// finite point instead of tripping `Vec2::clamp`'s ordering assertion.
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.max(self.min.x).min(self.max.x),
            p.y.max(self.min.y).min(self.max.y),
        )
    }
}

/// Which surface ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Ceiling,
    Floor,
    Obstacle { id: u32 },
}

/// Circle vs rectangle; touching counts as a hit
#[inline]
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    center.distance_squared(closest) <= radius * radius
}

/// Check the pet against the top and bottom of the playfield
pub fn bounds_collision(
    vertical_position: f32,
    playfield_height: f32,
    entity_height: f32,
) -> Option<Collision> {
    if vertical_position < 0.0 {
        Some(Collision::Ceiling)
    } else if vertical_position > playfield_height - entity_height {
        Some(Collision::Floor)
    } else {
        None
    }
}

/// Upper and lower hitboxes of an obstacle
pub fn obstacle_hitboxes(
    obstacle: &Obstacle,
    gap_size: f32,
    playfield_height: f32,
    margin: f32,
) -> [Rect; 2] {
    let left = obstacle.horizontal_position + margin;
    let right = obstacle.horizontal_position + OBSTACLE_WIDTH - margin;
    let upper = Rect::new(left, 0.0, right, obstacle.gap_top_height - margin);
    let lower = Rect::new(
        left,
        obstacle.gap_top_height + gap_size + margin,
        right,
        playfield_height,
    );
    [upper, lower]
}

/// Does the pet circle touch either segment of `obstacle`
pub fn hits_obstacle(
    center: Vec2,
    radius: f32,
    obstacle: &Obstacle,
    gap_size: f32,
    playfield_height: f32,
    margin: f32,
) -> bool {
    obstacle_hitboxes(obstacle, gap_size, playfield_height, margin)
        .iter()
        .any(|rect| circle_rect_collision(center, radius, rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn obstacle_at(x: f32, gap_top: f32) -> Obstacle {
        Obstacle {
            id: 1,
            horizontal_position: x,
            gap_top_height: gap_top,
            passed: false,
        }
    }

    #[test]
    fn test_center_on_edge_collides() {
        let rect = Rect::new(100.0, 100.0, 200.0, 200.0);
        assert!(circle_rect_collision(Vec2::new(100.0, 150.0), 15.0, &rect));
        assert!(circle_rect_collision(Vec2::new(150.0, 200.0), 0.0, &rect));
    }

    #[test]
    fn test_touching_is_inclusive() {
        let rect = Rect::new(100.0, 100.0, 200.0, 200.0);
        // Exactly radius away from the left edge
        assert!(circle_rect_collision(Vec2::new(85.0, 150.0), 15.0, &rect));
        assert!(!circle_rect_collision(Vec2::new(84.9, 150.0), 15.0, &rect));
    }

    #[test]
    fn test_corner_uses_euclidean_distance() {
        let rect = Rect::new(100.0, 100.0, 200.0, 200.0);
        // 10,10 from the corner: distance ~14.1
        assert!(circle_rect_collision(Vec2::new(90.0, 90.0), 15.0, &rect));
        // 12,12 from the corner: distance ~16.97
        assert!(!circle_rect_collision(Vec2::new(88.0, 88.0), 15.0, &rect));
    }

    #[test]
    fn test_bounds() {
        assert_eq!(bounds_collision(-0.1, 600.0, 50.0), Some(Collision::Ceiling));
        assert_eq!(bounds_collision(0.0, 600.0, 50.0), None);
        assert_eq!(bounds_collision(550.0, 600.0, 50.0), None);
        assert_eq!(bounds_collision(550.1, 600.0, 50.0), Some(Collision::Floor));
    }

    #[test]
    fn test_hitboxes_are_inset() {
        let [upper, lower] = obstacle_hitboxes(&obstacle_at(300.0, 200.0), 200.0, 600.0, 5.0);
        assert_eq!(upper, Rect::new(305.0, 0.0, 375.0, 195.0));
        assert_eq!(lower, Rect::new(305.0, 405.0, 375.0, 600.0));
    }

    #[test]
    fn test_pet_inside_gap_is_safe() {
        let obstacle = obstacle_at(60.0, 200.0);
        let center = Vec2::new(100.0, 300.0);
        assert!(!hits_obstacle(center, 15.0, &obstacle, 200.0, 600.0, 5.0));
    }

    #[test]
    fn test_pet_grazing_visual_edge_is_forgiven() {
        // Touches the drawn pipe (x = 200) but not the inset hitbox (x = 205)
        let obstacle = obstacle_at(200.0, 100.0);
        let center = Vec2::new(185.0, 50.0);
        assert!(!hits_obstacle(center, 15.0, &obstacle, 200.0, 600.0, 5.0));
        assert!(hits_obstacle(center, 15.0, &obstacle, 200.0, 600.0, 0.0));
    }

    #[test]
    fn test_inverted_rect_does_not_panic() {
        let rect = Rect::new(10.0, 0.0, 5.0, -3.0);
        let _ = circle_rect_collision(Vec2::new(0.0, 0.0), 1.0, &rect);
    }

    proptest! {
        #[test]
        fn prop_far_outside_never_collides(
            dx in 0.01f32..500.0,
            y in 0.0f32..100.0,
            radius in 1.0f32..40.0,
        ) {
            let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
            let center = Vec2::new(100.0 + radius + dx, y);
            prop_assert!(!circle_rect_collision(center, radius, &rect));
        }

        #[test]
        fn prop_center_on_boundary_collides(t in 0.0f32..=100.0, radius in 0.0f32..40.0) {
            let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
            for center in [
                Vec2::new(t, 0.0),
                Vec2::new(t, 100.0),
                Vec2::new(0.0, t),
                Vec2::new(100.0, t),
            ] {
                prop_assert!(circle_rect_collision(center, radius, &rect));
            }
        }
    }
}
