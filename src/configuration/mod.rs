//! Various data structures used to configure the motion-capture engine.

use anyhow::Context;
use serde_derive::Deserialize;

/// JSON rendition of `motion.yml`, produced by the build script.
const EMBEDDED_CONFIG: &str = include_str!(concat!(env!("OUT_DIR"), "/motion.json"));

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// How many acceleration readings are averaged into one stance vector.
    pub stance_samples: u32,
    /// Pause between two stance readings, roughly 100 Hz at the default.
    pub stance_interval_ms: u32,
    /// Pause announced before a stance burst starts.
    pub settle_delay_ms: u32,
    /// Number of announcements in a movement countdown.
    pub countdown_seconds: u32,
    /// Length of one countdown step.
    pub countdown_tick_ms: u32,
    /// Wall-clock window over which the angular rate is integrated.
    pub yaw_window_ms: u32,
    /// Fixed throttle between two integration steps.
    pub yaw_interval_ms: u32,
    /// Sleep between dispatcher ticks when neither channel has input.
    pub idle_poll_ms: u32,
    /// Raw accelerometer counts per 1 g.
    pub accel_lsb_per_g: f32,
    /// Raw gyroscope counts per degree per second.
    pub gyro_lsb_per_dps: f32,
    pub wired_baud: u32,
    pub wireless_baud: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            stance_samples:     50,
            stance_interval_ms: 10,
            settle_delay_ms:    500,
            countdown_seconds:  5,
            countdown_tick_ms:  1000,
            yaw_window_ms:      5000,
            yaw_interval_ms:    10,
            idle_poll_ms:       10,
            accel_lsb_per_g:    crate::sensors::ACCEL_LSB_PER_G,
            gyro_lsb_per_dps:   crate::sensors::GYRO_LSB_PER_DPS,
            wired_baud:         115_200,
            wireless_baud:      9_600,
        }
    }
}

impl MotionConfig {
    /// The configuration baked in from `motion.yml` at build time.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_json(EMBEDDED_CONFIG).context("embedded motion configuration is invalid")
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("failed to parse motion configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.stance_samples > 0, "stance_samples must be at least 1");
        anyhow::ensure!(self.yaw_interval_ms > 0, "yaw_interval_ms must be at least 1");
        anyhow::ensure!(self.accel_lsb_per_g > 0.0, "accel_lsb_per_g must be positive");
        anyhow::ensure!(self.gyro_lsb_per_dps > 0.0, "gyro_lsb_per_dps must be positive");
        Ok(())
    }
}
