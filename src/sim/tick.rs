//! Per-frame simulation tick
//!
//! Core game loop that advances the simulation by one rendered frame.

use super::spawn::{maybe_spawn_obstacle, maybe_spawn_tree, plant_initial_trees};
use super::state::{GameEvent, GamePhase, GameState, Vehicle};
use super::vehicle::{ramp_speed, update_vehicle};
use super::world::{advance_obstacles, advance_trees};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move one lane left (press edge)
    pub steer_left: bool,
    /// Move one lane right (press edge)
    pub steer_right: bool,
    /// Throttle held
    pub accelerate: bool,
    /// Brake held
    pub brake: bool,
    /// Start a new run (only honored after game over)
    pub restart: bool,
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if state.phase == GamePhase::GameOver {
        if input.restart {
            reset(state);
        }
        return;
    }

    state.time_ticks += 1;
    state.clock += f64::from(dt);

    ramp_speed(&mut state.vehicle, &state.tuning, dt);
    update_vehicle(&mut state.vehicle, input, &state.tuning, state.clock);

    let sweep = advance_obstacles(&mut state.obstacles, &state.vehicle, &state.tuning);
    for id in sweep.passed {
        state.score += state.tuning.pass_reward;
        state.events.push(GameEvent::ObstaclePassed { id });
        log::debug!("Passed obstacle {} (score {})", id, state.score);
    }
    if let Some(obstacle_id) = sweep.collision {
        end_run(state, obstacle_id);
        return;
    }

    for id in advance_trees(&mut state.trees, state.vehicle.speed, &state.tuning) {
        state.events.push(GameEvent::TreeCulled { id });
    }

    maybe_spawn_obstacle(state);
    maybe_spawn_tree(state);
}

/// Terminal transition after a hit
fn end_run(state: &mut GameState, obstacle_id: u32) {
    state.phase = GamePhase::GameOver;
    state.vehicle.speed = 0.0;
    state.events.push(GameEvent::Collision { obstacle_id });
    state.events.push(GameEvent::GameOver { final_score: state.score });
    log::info!(
        "Game over: hit obstacle {} after {} ticks, score {}",
        obstacle_id,
        state.time_ticks,
        state.score
    );
}

/// Return to a freshly initialized run
///
/// Seed and tuning are kept; the RNG keeps its stream so the new run gets a
/// different layout.
pub fn reset(state: &mut GameState) {
    state.phase = GamePhase::Running;
    state.score = 0;
    state.clock = 0.0;
    state.time_ticks = 0;
    state.vehicle = Vehicle::default();
    state.obstacles.clear();
    state.trees.clear();
    state.events.push(GameEvent::Reset);
    plant_initial_trees(state);
    log::info!("Run reset (seed {})", state.seed);
}
