//! Access to the inertial sensor as seen by the motion-capture engine.

use accelerometer::vector::{F32x3, I16x3};

/// Raw counts per 1 g at the ±2 g full-scale range.
pub const ACCEL_LSB_PER_G: f32 = 16384.0;
/// Raw counts per °/s at the ±250 °/s full-scale range.
pub const GYRO_LSB_PER_DPS: f32 = 131.0;

/// Three raw signed sensor counts at native sensitivity.
pub type RawTriple = I16x3;

/// An averaged acceleration in units of g, representing one held orientation.
pub type StanceVector = F32x3;

/// One combined acceleration and angular rate reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionReading {
    pub accel: RawTriple,
    pub gyro: RawTriple,
}

/// The sensor handle shared by the sampler and the angle protocols.
///
/// Both reads are synchronous and assumed to succeed; a lost connection
/// only shows up as implausible numbers further downstream.
pub trait MotionSensor {
    /// Instantaneous 3-axis acceleration.
    fn acceleration(&mut self) -> RawTriple;

    /// Instantaneous 3-axis acceleration together with the 3-axis angular rate.
    fn motion(&mut self) -> MotionReading;
}

pub fn raw_triple(x: i16, y: i16, z: i16) -> RawTriple {
    I16x3 { x, y, z }
}

/// Decode three big-endian 16-bit registers, as laid out in the sensor's output block.
pub fn decode_triple(bytes: &[u8; 6]) -> RawTriple {
    raw_triple(
        i16::from_be_bytes([bytes[0], bytes[1]]),
        i16::from_be_bytes([bytes[2], bytes[3]]),
        i16::from_be_bytes([bytes[4], bytes[5]]),
    )
}

/// Decode the 14-byte block starting at the first acceleration register:
/// acceleration, temperature (skipped), angular rate.
pub fn decode_motion(bytes: &[u8; 14]) -> MotionReading {
    let mut accel = [0u8; 6];
    let mut gyro = [0u8; 6];
    accel.copy_from_slice(&bytes[0..6]);
    gyro.copy_from_slice(&bytes[8..14]);

    MotionReading {
        accel: decode_triple(&accel),
        gyro: decode_triple(&gyro),
    }
}
