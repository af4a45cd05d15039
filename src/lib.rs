//! Endless Racer - A three-lane endless driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vehicle, spawning, culling, collisions)
//! - `input`: Key edges to per-tick input snapshots
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game balance
//! - `ui`: HUD values handed to the DOM layer

pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use input::{InputQueue, InputState, Intent, KeyEdge};
pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};
pub use ui::HudSnapshot;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Nominal frame time used by the headless runner and tests
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest elapsed time accepted for a single frame
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Road dimensions (world units)
    pub const ROAD_WIDTH: f32 = 15.0;
    pub const ROAD_LENGTH: f32 = 300.0;
    /// Lateral offset of each lane: left, middle, right
    pub const LANE_POSITIONS: [f32; 3] = [5.0, 0.0, -5.0];
    /// Lane the vehicle starts in
    pub const START_LANE: u8 = 1;

    /// Speed is world units per tick
    pub const MAX_SPEED: f32 = 30.0;
    pub const ACCELERATION: f32 = 0.05;
    /// Accelerate key adds `ACCELERATION * ACCEL_MULTIPLIER` per tick
    pub const ACCEL_MULTIPLIER: f32 = 5.0;
    /// Brake key removes `ACCELERATION * BRAKE_MULTIPLIER` per tick
    pub const BRAKE_MULTIPLIER: f32 = 10.0;

    /// Fraction of the remaining lateral distance covered per tick
    pub const LATERAL_SMOOTHING: f32 = 0.2;
    pub const TILT_GAIN: f32 = 0.05;
    pub const TILT_SMOOTHING: f32 = 0.1;

    /// Objects behind these z values are culled
    pub const OBSTACLE_CULL_Z: f32 = -10.0;
    pub const TREE_CULL_Z: f32 = -20.0;

    /// Per-axis collision extents (x = lateral, y = forward)
    pub const COLLISION_HALF_X: f32 = 2.5;
    pub const COLLISION_HALF_Z: f32 = 3.0;

    pub const PASS_REWARD: u32 = 10;
    pub const MAX_OBSTACLES: usize = 5;
    /// Obstacle slots the renderer can draw; `max_obstacles` may not exceed it
    pub const MAX_DRAWN_OBSTACLES: usize = 8;
    /// Obstacle spawn probability per tick, per unit of speed
    pub const OBSTACLE_SPAWN_RATE: f32 = 0.001;
    pub const TREE_SPAWN_CHANCE: f32 = 0.05;
    pub const INITIAL_TREES: usize = 50;
    /// Trees sit at least this far past the road edge
    pub const TREE_MIN_MARGIN: f32 = 5.0;
    pub const TREE_MARGIN_SPREAD: f32 = 30.0;

    /// HUD speed = floor(speed * DISPLAY_SPEED_FACTOR)
    pub const DISPLAY_SPEED_FACTOR: f32 = 10.0;

    /// Resting height of the vehicle body
    pub const VEHICLE_REST_Y: f32 = 1.0;
}
