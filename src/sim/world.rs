//! World scrolling and culling
//!
//! The vehicle stays at z = 0 and everything else moves toward it by the
//! current speed each tick. Collections are walked back to front so removal
//! never skips or revisits an element.

use super::collision::vehicle_hits_obstacle;
use super::state::{Obstacle, Tree, Vehicle};
use crate::tuning::Tuning;

/// Result of advancing the obstacle collection for one tick
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ObstacleSweep {
    /// Obstacles culled behind the camera without a hit, in removal order
    pub passed: Vec<u32>,
    /// First obstacle found overlapping the vehicle; the sweep stops there
    pub collision: Option<u32>,
}

/// Move obstacles forward, test each against the vehicle, cull passed ones
pub fn advance_obstacles(
    obstacles: &mut Vec<Obstacle>,
    vehicle: &Vehicle,
    tuning: &Tuning,
) -> ObstacleSweep {
    let mut sweep = ObstacleSweep::default();

    for i in (0..obstacles.len()).rev() {
        let obstacle = &mut obstacles[i];
        obstacle.position_z -= vehicle.speed;

        if vehicle_hits_obstacle(vehicle, obstacle, tuning) {
            sweep.collision = Some(obstacle.id);
            return sweep;
        }

        if obstacle.position_z < tuning.obstacle_cull_z {
            let removed = obstacles.remove(i);
            sweep.passed.push(removed.id);
        }
    }

    sweep
}

/// Move trees forward and cull the ones behind the camera
///
/// Returns the ids of culled trees.
pub fn advance_trees(trees: &mut Vec<Tree>, speed: f32, tuning: &Tuning) -> Vec<u32> {
    let mut culled = Vec::new();

    for i in (0..trees.len()).rev() {
        trees[i].position_z -= speed;
        if trees[i].position_z < tuning.tree_cull_z {
            culled.push(trees.remove(i).id);
        }
    }

    culled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving(speed: f32) -> Vehicle {
        Vehicle { speed, ..Default::default() }
    }

    #[test]
    fn test_obstacles_scroll_toward_vehicle() {
        let tuning = Tuning::default();
        let mut obstacles = vec![
            Obstacle { id: 1, lane: 0, position_z: 300.0 },
            Obstacle { id: 2, lane: 2, position_z: 150.0 },
        ];
        let sweep = advance_obstacles(&mut obstacles, &moving(10.0), &tuning);
        assert_eq!(sweep, ObstacleSweep::default());
        assert_eq!(obstacles[0].position_z, 290.0);
        assert_eq!(obstacles[1].position_z, 140.0);
    }

    #[test]
    fn test_cull_preserves_order_of_survivors() {
        let tuning = Tuning::default();
        let mut obstacles = vec![
            Obstacle { id: 1, lane: 0, position_z: -5.0 },
            Obstacle { id: 2, lane: 2, position_z: 100.0 },
            Obstacle { id: 3, lane: 0, position_z: -8.0 },
            Obstacle { id: 4, lane: 2, position_z: 200.0 },
        ];
        let sweep = advance_obstacles(&mut obstacles, &moving(6.0), &tuning);
        assert_eq!(sweep.passed, vec![3, 1]);
        assert_eq!(sweep.collision, None);
        let ids: Vec<u32> = obstacles.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_collision_stops_sweep() {
        let tuning = Tuning::default();
        let mut obstacles = vec![
            Obstacle { id: 1, lane: 0, position_z: 50.0 },
            Obstacle { id: 2, lane: 1, position_z: 1.0 },
            Obstacle { id: 3, lane: 2, position_z: -9.8 },
        ];
        let sweep = advance_obstacles(&mut obstacles, &moving(0.5), &tuning);
        assert_eq!(sweep.passed, vec![3]);
        assert_eq!(sweep.collision, Some(2));
        // Obstacle 1 was never reached
        assert_eq!(obstacles[0].position_z, 50.0);
        assert_eq!(obstacles.len(), 2);
    }

    #[test]
    fn test_trees_cull_at_their_own_threshold() {
        let tuning = Tuning::default();
        let mut trees = vec![
            Tree { id: 1, offset_x: 20.0, position_z: -12.0 },
            Tree { id: 2, offset_x: -20.0, position_z: -25.0 },
            Tree { id: 3, offset_x: 30.0, position_z: 80.0 },
        ];
        let culled = advance_trees(&mut trees, 5.0, &tuning);
        assert_eq!(culled, vec![2]);
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].position_z, -17.0);
    }
}
