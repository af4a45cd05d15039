//! Data-driven game balance
//!
//! Every gameplay constant lives here so a page can override it with a JSON
//! blob. Missing fields fall back to the values in [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors produced while loading tuning overrides
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub road_width: f32,
    pub road_length: f32,
    pub lane_positions: [f32; 3],

    pub max_speed: f32,
    pub acceleration: f32,
    pub accel_multiplier: f32,
    pub brake_multiplier: f32,

    pub lateral_smoothing: f32,
    pub tilt_gain: f32,
    pub tilt_smoothing: f32,

    pub obstacle_cull_z: f32,
    pub tree_cull_z: f32,
    pub collision_half_x: f32,
    pub collision_half_z: f32,

    pub pass_reward: u32,
    pub max_obstacles: usize,
    pub obstacle_spawn_rate: f32,
    pub tree_spawn_chance: f32,
    pub initial_trees: usize,
    pub tree_min_margin: f32,
    pub tree_margin_spread: f32,

    pub display_speed_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            road_width: ROAD_WIDTH,
            road_length: ROAD_LENGTH,
            lane_positions: LANE_POSITIONS,

            max_speed: MAX_SPEED,
            acceleration: ACCELERATION,
            accel_multiplier: ACCEL_MULTIPLIER,
            brake_multiplier: BRAKE_MULTIPLIER,

            lateral_smoothing: LATERAL_SMOOTHING,
            tilt_gain: TILT_GAIN,
            tilt_smoothing: TILT_SMOOTHING,

            obstacle_cull_z: OBSTACLE_CULL_Z,
            tree_cull_z: TREE_CULL_Z,
            collision_half_x: COLLISION_HALF_X,
            collision_half_z: COLLISION_HALF_Z,

            pass_reward: PASS_REWARD,
            max_obstacles: MAX_OBSTACLES,
            obstacle_spawn_rate: OBSTACLE_SPAWN_RATE,
            tree_spawn_chance: TREE_SPAWN_CHANCE,
            initial_trees: INITIAL_TREES,
            tree_min_margin: TREE_MIN_MARGIN,
            tree_margin_spread: TREE_MARGIN_SPREAD,

            display_speed_factor: DISPLAY_SPEED_FACTOR,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Parse a JSON override, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {}", e);
                Self::default()
            }
        }
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.max_speed > 0.0) {
            return invalid("max_speed", "must be positive");
        }
        if !(self.road_length > 0.0) {
            return invalid("road_length", "must be positive");
        }
        if !(self.road_width > 0.0) {
            return invalid("road_width", "must be positive");
        }
        if self.acceleration < 0.0 || self.accel_multiplier < 0.0 || self.brake_multiplier < 0.0 {
            return invalid("acceleration", "rates must not be negative");
        }
        if !(0.0..=1.0).contains(&self.lateral_smoothing) {
            return invalid("lateral_smoothing", "must be within [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.tilt_smoothing) {
            return invalid("tilt_smoothing", "must be within [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.tree_spawn_chance) {
            return invalid("tree_spawn_chance", "must be within [0, 1]");
        }
        if self.obstacle_spawn_rate < 0.0 || self.obstacle_spawn_rate * self.max_speed > 1.0 {
            return invalid(
                "obstacle_spawn_rate",
                "spawn chance at max speed must be within [0, 1]",
            );
        }
        if self.obstacle_cull_z >= 0.0 {
            return invalid("obstacle_cull_z", "must be behind the vehicle");
        }
        if self.tree_cull_z >= 0.0 {
            return invalid("tree_cull_z", "must be behind the vehicle");
        }
        if !(self.collision_half_x > 0.0 && self.collision_half_z > 0.0) {
            return invalid("collision_half_x", "collision extents must be positive");
        }
        if self.max_obstacles == 0 {
            return invalid("max_obstacles", "must allow at least one obstacle");
        }
        if self.max_obstacles > MAX_DRAWN_OBSTACLES {
            return invalid("max_obstacles", "exceeds the obstacles the renderer can draw");
        }
        if !(self.tree_min_margin >= 0.0) {
            return invalid("tree_min_margin", "trees must stay off the road");
        }
        if !(self.tree_margin_spread >= 0.0) {
            return invalid("tree_margin_spread", "must not be negative");
        }
        Ok(())
    }

    /// Lateral offset of a lane
    #[inline]
    pub fn lane_x(&self, lane: u8) -> f32 {
        debug_assert!(lane < 3, "lane index out of range: {lane}");
        self.lane_positions[lane as usize]
    }

    /// Speed as shown on the HUD
    #[inline]
    pub fn display_speed(&self, speed: f32) -> u32 {
        (speed * self.display_speed_factor).floor().max(0.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_speed": 40.0, "initial_trees": 10 }"#).unwrap();
        assert_eq!(tuning.max_speed, 40.0);
        assert_eq!(tuning.initial_trees, 10);
        assert_eq!(tuning.road_length, ROAD_LENGTH);
        assert_eq!(tuning.lane_positions, LANE_POSITIONS);
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_invalid_fields_rejected() {
        let err = Tuning::from_json(r#"{ "max_speed": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "max_speed", .. }));

        let err = Tuning::from_json(r#"{ "tree_spawn_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "tree_spawn_chance", .. }));

        let err = Tuning::from_json(r#"{ "obstacle_cull_z": 5.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "obstacle_cull_z", .. }));

        let err = Tuning::from_json(r#"{ "max_obstacles": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "max_obstacles", .. }));
    }

    #[test]
    fn test_obstacle_cap_limited_to_drawn_slots() {
        let tuning = Tuning::from_json(r#"{ "max_obstacles": 8 }"#).unwrap();
        assert_eq!(tuning.max_obstacles, MAX_DRAWN_OBSTACLES);

        let err = Tuning::from_json(r#"{ "max_obstacles": 9 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "max_obstacles", .. }));
        let err = Tuning::from_json(r#"{ "max_obstacles": 12 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "max_obstacles", .. }));
    }

    #[test]
    fn test_negative_tree_margins_rejected() {
        let err = Tuning::from_json(r#"{ "tree_min_margin": -20.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "tree_min_margin", .. }));

        let err = Tuning::from_json(r#"{ "tree_margin_spread": -1.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "tree_margin_spread", .. }));

        // Zero margin puts trees right at the road edge, which is allowed
        assert!(Tuning::from_json(r#"{ "tree_min_margin": 0.0, "tree_margin_spread": 0.0 }"#).is_ok());
    }

    #[test]
    fn test_fallback_to_default() {
        assert_eq!(Tuning::from_json_or_default("[]"), Tuning::default());
    }

    #[test]
    fn test_display_speed() {
        let tuning = Tuning::default();
        assert_eq!(tuning.display_speed(0.0), 0);
        assert_eq!(tuning.display_speed(12.37), 123);
        assert_eq!(tuning.display_speed(MAX_SPEED), 300);
    }
}
