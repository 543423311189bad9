//! Motion capture for range-of-motion measurements with a body-worn IMU.
//!
//! A single command character arriving on the wired or the wireless serial
//! link selects a joint movement; the matching protocol samples the sensor
//! and answers on both links with one `ANGLE:<degrees>` line.

pub mod angle;
pub mod clock;
pub mod command;
pub mod configuration;
pub mod controller;
pub mod link;
pub mod notice;
pub mod sensors;
pub mod sim;
pub mod stance;

#[cfg(target_os = "espidf")]
pub mod imu;

pub use configuration::MotionConfig;
pub use controller::{Controller, ControllerMode};
