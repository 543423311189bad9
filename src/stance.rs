//! Burst sampling of a held orientation into a single averaged stance vector.

use crate::clock::Clock;
use crate::configuration::MotionConfig;
use crate::link::{ByteSource, Channels, LineSink};
use crate::notice::Notice;
use crate::sensors::{MotionSensor, RawTriple, StanceVector};

/// Per-axis running sums of raw accelerometer counts.
#[derive(Debug, Default, Clone, Copy)]
pub struct StanceAccumulator {
    sum: [i64; 3],
    count: u32,
}

impl StanceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one raw reading to the burst.
    pub fn add(&mut self, reading: &RawTriple) {
        self.sum[0] += reading.x as i64;
        self.sum[1] += reading.y as i64;
        self.sum[2] += reading.z as i64;
        self.count += 1;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Average of all readings so far, converted to g. An empty burst is the zero vector.
    pub fn average(&self, lsb_per_g: f32) -> StanceVector {
        if self.count == 0 {
            return StanceVector { x: 0.0, y: 0.0, z: 0.0 };
        }
        let n = self.count as f32;
        StanceVector {
            x: self.sum[0] as f32 / n / lsb_per_g,
            y: self.sum[1] as f32 / n / lsb_per_g,
            z: self.sum[2] as f32 / n / lsb_per_g,
        }
    }
}

/// Collects one stance vector. Used identically for the baseline and the result
/// of a trial; the caller decides which slot the vector goes into.
pub struct StanceSampler {
    samples: u32,
    interval_ms: u32,
    settle_delay_ms: u32,
    lsb_per_g: f32,
}

impl StanceSampler {
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            samples: config.stance_samples,
            interval_ms: config.stance_interval_ms,
            settle_delay_ms: config.settle_delay_ms,
            lsb_per_g: config.accel_lsb_per_g,
        }
    }

    pub fn sample<S, C, W, B>(&self, sensor: &mut S, clock: &mut C, channels: &mut Channels<W, B>) -> StanceVector
    where
        S: MotionSensor,
        C: Clock,
        W: ByteSource + LineSink,
        B: ByteSource + LineSink,
    {
        channels.report(&Notice::HoldStill);
        clock.delay_ms(self.settle_delay_ms);

        let mut accumulator = StanceAccumulator::new();
        for _ in 0..self.samples {
            accumulator.add(&sensor.acceleration());
            clock.delay_ms(self.interval_ms);
        }

        let stance = accumulator.average(self.lsb_per_g);
        log::debug!("Stance ({} samples): x={:.4} y={:.4} z={:.4}", accumulator.count(), stance.x, stance.y, stance.z);
        stance
    }
}
