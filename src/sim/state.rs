//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`]; collaborators only
//! ever borrow it immutably.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{START_LANE, VEHICLE_REST_Y};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Vehicle hit an obstacle; waits for restart
    GameOver,
}

/// The player's vehicle
///
/// The vehicle never moves forward; the world scrolls toward it instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Target lane (0 = left, 1 = middle, 2 = right)
    pub lane: u8,
    /// Lateral position, eased toward the lane's offset
    pub position_x: f32,
    /// Forward position (always 0)
    pub position_z: f32,
    /// World units per tick
    pub speed: f32,
    /// Visual tilt while changing lanes
    pub rotation_z: f32,
    /// Cosmetic body bob height
    pub bob_y: f32,
    /// Cosmetic pitch wobble
    pub pitch_x: f32,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            lane: START_LANE,
            position_x: 0.0,
            position_z: 0.0,
            speed: 0.0,
            rotation_z: 0.0,
            bob_y: VEHICLE_REST_Y,
            pitch_x: 0.0,
        }
    }
}

impl Vehicle {
    /// World position of the body center
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.position_x, self.bob_y, self.position_z)
    }
}

/// An obstacle blocking one lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: u8,
    pub position_z: f32,
}

impl Obstacle {
    pub fn position_x(&self, tuning: &Tuning) -> f32 {
        tuning.lane_x(self.lane)
    }
}

/// Roadside scenery, no gameplay effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub id: u32,
    /// Lateral offset, always outside the road
    pub offset_x: f32,
    pub position_z: f32,
}

/// Things that happened during a tick, for renderer/UI/logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ObstacleSpawned { id: u32, lane: u8 },
    /// Obstacle went behind the camera without a hit; score was awarded
    ObstaclePassed { id: u32 },
    TreeSpawned { id: u32 },
    TreeCulled { id: u32 },
    Collision { obstacle_id: u32 },
    GameOver { final_score: u32 },
    Reset,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay constants for this run
    pub tuning: Tuning,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    /// Simulation clock in seconds (sum of tick dt)
    pub clock: f64,
    /// Ticks simulated while running
    pub time_ticks: u64,
    pub vehicle: Vehicle,
    /// Live obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    /// Live trees, oldest first
    pub trees: Vec<Tree>,
    /// Events emitted by the most recent tick
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game and plant the initial trees
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            score: 0,
            clock: 0.0,
            time_ticks: 0,
            vehicle: Vehicle::default(),
            obstacles: Vec::new(),
            trees: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };

        super::spawn::plant_initial_trees(&mut state);
        state.events.clear();

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// HUD speed for the current vehicle speed
    pub fn display_speed(&self) -> u32 {
        self.tuning.display_speed(self.vehicle.speed)
    }
}
