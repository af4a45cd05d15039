//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through the `dt` passed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (oldest entity first)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod vehicle;
pub mod world;

pub use collision::vehicle_hits_obstacle;
pub use state::{GameEvent, GamePhase, GameState, Obstacle, Tree, Vehicle};
pub use tick::{TickInput, reset, tick};
pub use world::ObstacleSweep;
