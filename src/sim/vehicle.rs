//! Vehicle control: lane changes, throttle and cosmetic motion

use super::state::Vehicle;
use super::tick::TickInput;
use crate::consts::VEHICLE_REST_Y;
use crate::tuning::Tuning;

/// Ambient acceleration applied every running tick, scaled by frame time
pub fn ramp_speed(vehicle: &mut Vehicle, tuning: &Tuning, dt: f32) {
    if vehicle.speed < tuning.max_speed {
        vehicle.speed += tuning.acceleration * dt;
    }
    vehicle.speed = vehicle.speed.clamp(0.0, tuning.max_speed);
}

/// Apply one tick of player input and easing
///
/// `clock` is the simulation clock in seconds and only drives the bob/pitch
/// animation.
pub fn update_vehicle(vehicle: &mut Vehicle, input: &TickInput, tuning: &Tuning, clock: f64) {
    // Steering flags are press edges, so each press moves one lane
    if input.steer_left && vehicle.lane > 0 {
        vehicle.lane -= 1;
    }
    if input.steer_right && vehicle.lane < 2 {
        vehicle.lane += 1;
    }
    debug_assert!(vehicle.lane < 3);

    if input.accelerate && vehicle.speed < tuning.max_speed {
        vehicle.speed += tuning.acceleration * tuning.accel_multiplier;
    }
    if input.brake && vehicle.speed > 0.0 {
        vehicle.speed -= tuning.acceleration * tuning.brake_multiplier;
    }
    vehicle.speed = vehicle.speed.clamp(0.0, tuning.max_speed);

    let target_x = tuning.lane_x(vehicle.lane);
    vehicle.position_x += (target_x - vehicle.position_x) * tuning.lateral_smoothing;

    let target_tilt = (target_x - vehicle.position_x) * tuning.tilt_gain;
    vehicle.rotation_z += (target_tilt - vehicle.rotation_z) * tuning.tilt_smoothing;

    let millis = clock * 1000.0;
    vehicle.bob_y = VEHICLE_REST_Y + ((millis * 0.003).sin() * 0.05) as f32;
    vehicle.pitch_x = ((millis * 0.002).sin() * 0.02) as f32;
}
