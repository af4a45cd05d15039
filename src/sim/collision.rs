//! Vehicle vs obstacle proximity test
//!
//! Not a physics solver: a hit is an axis-aligned overlap with independent
//! lateral and forward extents.

use glam::Vec2;

use super::state::{Obstacle, Vehicle};
use crate::tuning::Tuning;

/// Project a world position onto the ground plane as (x, z)
#[inline]
fn ground(x: f32, z: f32) -> Vec2 {
    Vec2::new(x, z)
}

/// True when both axis distances are strictly inside the collision extents
pub fn within_extents(a: Vec2, b: Vec2, half_extents: Vec2) -> bool {
    (a - b).abs().cmplt(half_extents).all()
}

/// Check whether `obstacle` currently overlaps the vehicle
pub fn vehicle_hits_obstacle(vehicle: &Vehicle, obstacle: &Obstacle, tuning: &Tuning) -> bool {
    within_extents(
        ground(vehicle.position_x, vehicle.position_z),
        ground(obstacle.position_x(tuning), obstacle.position_z),
        Vec2::new(tuning.collision_half_x, tuning.collision_half_z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle(lane: u8, z: f32) -> Obstacle {
        Obstacle { id: 1, lane, position_z: z }
    }

    #[test]
    fn test_same_lane_close_hits() {
        let tuning = Tuning::default();
        let vehicle = Vehicle::default();
        assert!(vehicle_hits_obstacle(&vehicle, &obstacle(1, 2.9), &tuning));
        assert!(vehicle_hits_obstacle(&vehicle, &obstacle(1, -2.9), &tuning));
        assert!(vehicle_hits_obstacle(&vehicle, &obstacle(1, 0.0), &tuning));
    }

    #[test]
    fn test_forward_distance_misses() {
        let tuning = Tuning::default();
        let vehicle = Vehicle::default();
        assert!(!vehicle_hits_obstacle(&vehicle, &obstacle(1, 3.0), &tuning));
        assert!(!vehicle_hits_obstacle(&vehicle, &obstacle(1, 50.0), &tuning));
    }

    #[test]
    fn test_adjacent_lane_misses() {
        let tuning = Tuning::default();
        let vehicle = Vehicle::default();
        assert!(!vehicle_hits_obstacle(&vehicle, &obstacle(0, 0.0), &tuning));
        assert!(!vehicle_hits_obstacle(&vehicle, &obstacle(2, 0.0), &tuning));
    }

    #[test]
    fn test_mid_lane_change_can_clip() {
        let tuning = Tuning::default();
        // Halfway between middle and left lane
        let vehicle = Vehicle { position_x: 2.6, ..Default::default() };
        assert!(vehicle_hits_obstacle(&vehicle, &obstacle(0, 1.0), &tuning));
        assert!(!vehicle_hits_obstacle(&vehicle, &obstacle(1, 1.0), &tuning));
    }

    #[test]
    fn test_extents_are_per_axis() {
        // Corner inside both extents but outside a circle of radius 2.5
        let half = Vec2::new(2.5, 3.0);
        assert!(within_extents(Vec2::ZERO, Vec2::new(2.4, 2.9), half));
        assert!(!within_extents(Vec2::ZERO, Vec2::new(2.5, 0.0), half));
    }
}
