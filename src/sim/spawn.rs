//! Probabilistic spawning of obstacles and scenery

use rand::Rng;

use super::state::{GameEvent, GameState, Obstacle, Tree};

/// Chance of spawning an obstacle this tick at the given speed
pub fn obstacle_spawn_chance(state: &GameState) -> f32 {
    (state.tuning.obstacle_spawn_rate * state.vehicle.speed).clamp(0.0, 1.0)
}

/// Roll for a new obstacle; returns its id if one was created
///
/// Nothing spawns once the live obstacle cap is reached.
pub fn maybe_spawn_obstacle(state: &mut GameState) -> Option<u32> {
    if state.obstacles.len() >= state.tuning.max_obstacles {
        return None;
    }
    let chance = obstacle_spawn_chance(state);
    if state.rng.random::<f32>() >= chance {
        return None;
    }
    let lane = state.rng.random_range(0..3u8);
    Some(spawn_obstacle(state, lane))
}

/// Place an obstacle at the far end of the road in `lane`
pub fn spawn_obstacle(state: &mut GameState, lane: u8) -> u32 {
    debug_assert!(lane < 3);
    let id = state.next_entity_id();
    let position_z = state.tuning.road_length;
    state.obstacles.push(Obstacle { id, lane, position_z });
    state.events.push(GameEvent::ObstacleSpawned { id, lane });
    log::debug!("Obstacle {} spawned in lane {}", id, lane);
    id
}

/// Roll for a new tree at the far end of the road
pub fn maybe_spawn_tree(state: &mut GameState) -> Option<u32> {
    if state.rng.random::<f32>() >= state.tuning.tree_spawn_chance {
        return None;
    }
    let z = state.tuning.road_length;
    Some(spawn_tree(state, z))
}

/// Place a tree at `position_z` on a random side of the road
pub fn spawn_tree(state: &mut GameState, position_z: f32) -> u32 {
    let side = if state.rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };
    let distance = state.tuning.road_width / 2.0
        + state.tuning.tree_min_margin
        + state.rng.random::<f32>() * state.tuning.tree_margin_spread;
    let id = state.next_entity_id();
    state.trees.push(Tree {
        id,
        offset_x: side * distance,
        position_z,
    });
    state.events.push(GameEvent::TreeSpawned { id });
    id
}

/// Scatter the starting tree population along the whole road
pub fn plant_initial_trees(state: &mut GameState) {
    for _ in 0..state.tuning.initial_trees {
        let z = state.rng.random::<f32>() * state.tuning.road_length;
        spawn_tree(state, z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_no_obstacles_at_rest() {
        let mut state = GameState::new(1);
        assert_eq!(obstacle_spawn_chance(&state), 0.0);
        for _ in 0..1000 {
            assert!(maybe_spawn_obstacle(&mut state).is_none());
        }
    }

    #[test]
    fn test_obstacle_spawn_respects_cap() {
        let tuning = Tuning {
            obstacle_spawn_rate: 0.05,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(3, tuning);
        state.vehicle.speed = 30.0;
        assert_eq!(obstacle_spawn_chance(&state), 1.0);

        for _ in 0..20 {
            maybe_spawn_obstacle(&mut state);
        }
        assert_eq!(state.obstacles.len(), 5);
        assert!(state.obstacles.iter().all(|o| o.lane < 3));
        assert!(state.obstacles.iter().all(|o| o.position_z == state.tuning.road_length));
    }

    #[test]
    fn test_trees_stay_off_road() {
        let mut state = GameState::new(11);
        for _ in 0..200 {
            spawn_tree(&mut state, 10.0);
        }
        let min = state.tuning.road_width / 2.0 + state.tuning.tree_min_margin;
        let max = min + state.tuning.tree_margin_spread;
        for tree in &state.trees {
            assert!(tree.offset_x.abs() >= min && tree.offset_x.abs() <= max);
        }
        assert!(state.trees.iter().any(|t| t.offset_x > 0.0));
        assert!(state.trees.iter().any(|t| t.offset_x < 0.0));
    }

    #[test]
    fn test_initial_trees_cover_road() {
        let state = GameState::new(5);
        let len = state.tuning.road_length;
        assert!(state.trees.iter().all(|t| (0.0..=len).contains(&t.position_z)));
    }

    #[test]
    fn test_spawn_emits_events() {
        let mut state = GameState::new(9);
        let id = spawn_obstacle(&mut state, 2);
        assert_eq!(state.events, vec![GameEvent::ObstacleSpawned { id, lane: 2 }]);
    }
}
