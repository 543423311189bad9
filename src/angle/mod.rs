//! Angle derivation for the three movement protocols.
//!
//! Roll and pitch come from the direction of gravity in a held stance; yaw has
//! no absolute reference and is dead-reckoned from the angular rate over a
//! short window, so it drifts with time.

use crate::sensors::{RawTriple, StanceVector};

/// Fold an angle into `[0, 360)`.
pub fn fold_degrees(angle: f32) -> f32 {
    if angle < 0.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Wrap an angle into `(-180, 180]`. An angle already in range is returned
/// as is, so exactly 180 stays 180.
pub fn wrap_degrees(angle: f32) -> f32 {
    if angle > -180.0 && angle <= 180.0 {
        return angle;
    }
    180.0 - (180.0 - angle).rem_euclid(360.0)
}

/// Rotation about the long axis, from the Y/Z components of gravity, in `[0, 360)`.
pub fn roll_degrees(stance: &StanceVector) -> f32 {
    fold_degrees(stance.y.atan2(stance.z).to_degrees())
}

/// Tilt about the lateral axis, from the X/Z components of gravity.
pub fn pitch_degrees(stance: &StanceVector) -> f32 {
    stance.x.atan2(stance.z).to_degrees()
}

/// Signed roll change between two stances, taking the short way round the
/// 0/360 seam.
pub fn roll_delta(baseline: &StanceVector, result: &StanceVector) -> f32 {
    wrap_degrees(roll_degrees(result) - roll_degrees(baseline))
}

/// Running yaw estimate fed with raw Z-axis angular rate samples.
#[derive(Debug, Clone, Copy)]
pub struct YawIntegrator {
    yaw: f32,
    lsb_per_dps: f32,
}

impl YawIntegrator {
    pub fn new(lsb_per_dps: f32) -> Self {
        Self {
            yaw: 0.0,
            lsb_per_dps,
        }
    }

    /// Start from a known yaw instead of zero.
    pub fn starting_at(mut self, yaw: f32) -> Self {
        self.yaw = wrap_degrees(yaw);
        self
    }

    /// Integrate one rate sample held for `dt` seconds and return the new yaw.
    pub fn step(&mut self, gyro: &RawTriple, dt: f32) -> f32 {
        let rate = gyro.z as f32 / self.lsb_per_dps;
        self.yaw = wrap_degrees(self.yaw + rate * dt);
        self.yaw
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }
}
