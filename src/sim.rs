//! Deterministic stand-ins for the sensor and the clock, for bench runs and tests.

use std::collections::VecDeque;

use crate::clock::Clock;
use crate::sensors::{raw_triple, MotionReading, MotionSensor, RawTriple};

/// A clock whose time only moves when somebody waits on it.
#[derive(Debug, Default, Clone)]
pub struct VirtualClock {
    now_us: u64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for VirtualClock {
    fn now_us(&self) -> u64 {
        self.now_us
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_us += ms as u64 * 1000;
    }
}

/// Replays held accelerations, each for a number of reads, and a constant
/// angular rate. Once the script runs out the last acceleration is held forever.
#[derive(Debug, Clone)]
pub struct ScriptedSensor {
    phases: VecDeque<(RawTriple, usize)>,
    current: RawTriple,
    rate: RawTriple,
    accel_reads: usize,
    motion_reads: usize,
}

impl ScriptedSensor {
    /// A sensor lying flat and still, gravity entirely on Z.
    pub fn new() -> Self {
        Self {
            phases: VecDeque::new(),
            current: raw_triple(0, 0, 16384),
            rate: raw_triple(0, 0, 0),
            accel_reads: 0,
            motion_reads: 0,
        }
    }

    /// Return `accel` for the next `reads` reads.
    pub fn hold_for(mut self, accel: RawTriple, reads: usize) -> Self {
        if reads > 0 {
            self.phases.push_back((accel, reads));
        }
        self
    }

    /// Return `accel` from here on.
    pub fn hold(self, accel: RawTriple) -> Self {
        self.hold_for(accel, 1)
    }

    /// Report a constant raw angular rate.
    pub fn rotating(mut self, rate: RawTriple) -> Self {
        self.rate = rate;
        self
    }

    pub fn accel_reads(&self) -> usize {
        self.accel_reads
    }

    pub fn motion_reads(&self) -> usize {
        self.motion_reads
    }

    fn next_accel(&mut self) -> RawTriple {
        if let Some((accel, remaining)) = self.phases.front_mut() {
            self.current = *accel;
            *remaining -= 1;
            if *remaining == 0 {
                self.phases.pop_front();
            }
        }
        self.current
    }
}

impl Default for ScriptedSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionSensor for ScriptedSensor {
    fn acceleration(&mut self) -> RawTriple {
        self.accel_reads += 1;
        self.next_accel()
    }

    fn motion(&mut self) -> MotionReading {
        self.motion_reads += 1;
        MotionReading {
            accel: self.next_accel(),
            gyro: self.rate,
        }
    }
}
