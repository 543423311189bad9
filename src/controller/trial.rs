//! The three movement protocols. Each one blocks the loop until its result
//! has been reported.

use crate::angle::{self, YawIntegrator};
use crate::clock::Clock;
use crate::command::{Movement, Protocol};
use crate::link::{ByteSource, LineSink};
use crate::notice::{AngleMagnitude, Notice};
use crate::sensors::MotionSensor;

use super::Controller;

impl<S, C, W, B> Controller<S, C, W, B>
where
    S: MotionSensor,
    C: Clock,
    W: ByteSource + LineSink,
    B: ByteSource + LineSink,
{
    /// Run the protocol for `movement` and report its angle.
    pub fn measure(&mut self, movement: Movement) -> AngleMagnitude {
        log::info!("Measuring {} ({:?})", movement.label(), movement.protocol());

        let signed = match movement.protocol() {
            Protocol::Roll => self.roll_trial(),
            Protocol::Pitch => self.pitch_trial(),
            Protocol::Yaw => self.yaw_trial(),
        };

        let angle = AngleMagnitude::from_degrees(signed);
        log::info!("{}: {:.2} degrees", movement.label(), angle.degrees());
        self.channels.report(&Notice::Angle(angle));
        angle
    }

    fn roll_trial(&mut self) -> f32 {
        self.channels.report(&Notice::GetIntoPosition);
        let baseline = self.sampler.sample(&mut self.sensor, &mut self.clock, &mut self.channels);

        self.channels.report(&Notice::RotateNow);
        self.countdown();

        let result = self.sampler.sample(&mut self.sensor, &mut self.clock, &mut self.channels);

        let delta = angle::roll_delta(&baseline, &result);
        log::debug!(
            "Roll {:.2} -> {:.2}, delta {:.2}",
            angle::roll_degrees(&baseline),
            angle::roll_degrees(&result),
            delta
        );
        delta
    }

    /// Only the final stance enters the formula; the first burst just lets the limb settle.
    fn pitch_trial(&mut self) -> f32 {
        self.channels.report(&Notice::GetIntoPosition);
        let _baseline = self.sampler.sample(&mut self.sensor, &mut self.clock, &mut self.channels);

        self.channels.report(&Notice::StartMoving);
        self.countdown();

        let result = self.sampler.sample(&mut self.sensor, &mut self.clock, &mut self.channels);
        angle::pitch_degrees(&result)
    }

    /// Dead-reckoned yaw over a fixed window. Each pass waits one interval,
    /// then reads the sensor and integrates the rate over the time actually
    /// elapsed since the previous read.
    fn yaw_trial(&mut self) -> f32 {
        self.channels.report(&Notice::StartMoving);

        let window_ms = self.config.yaw_window_ms as u64;
        let tick_ms = self.config.countdown_tick_ms.max(1) as u64;
        let mut yaw = YawIntegrator::new(self.config.gyro_lsb_per_dps);

        let start_us = self.clock.now_us();
        let mut last_us = start_us;
        let mut next_announcement_ms = 0;

        loop {
            let elapsed_ms = self.clock.elapsed_ms_since(start_us);
            if elapsed_ms >= window_ms {
                break;
            }

            if elapsed_ms >= next_announcement_ms {
                let remaining = (window_ms - elapsed_ms + tick_ms - 1) / tick_ms;
                self.channels.report(&Notice::Countdown(remaining as u32));
                next_announcement_ms = (elapsed_ms / tick_ms + 1) * tick_ms;
            }

            self.clock.delay_ms(self.config.yaw_interval_ms);

            let reading = self.sensor.motion();
            let now_us = self.clock.now_us();
            let dt = now_us.saturating_sub(last_us) as f32 / 1_000_000.0;
            last_us = now_us;

            let value = yaw.step(&reading.gyro, dt);
            log::trace!("yaw step dt={:.4}s gz={} yaw={:.3}", dt, reading.gyro.z, value);
        }

        yaw.yaw()
    }

    /// One announcement per tick, counting down to one.
    fn countdown(&mut self) {
        for remaining in (1..=self.config.countdown_seconds).rev() {
            self.channels.report(&Notice::Countdown(remaining));
            self.clock.delay_ms(self.config.countdown_tick_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::configuration::MotionConfig;
    use crate::controller::Controller;
    use crate::command::Movement;
    use crate::clock::Clock;
    use crate::link::{Detached, Duplex};
    use crate::sensors::raw_triple;
    use crate::sim::{ScriptedSensor, VirtualClock};

    fn run(
        config: MotionConfig,
        sensor: ScriptedSensor,
        movement: Movement,
    ) -> (f32, Vec<String>, ScriptedSensor, VirtualClock) {
        let (out_tx, out_rx) = flume::unbounded();
        let (_in_tx, in_rx) = flume::unbounded::<u8>();
        let mut controller = Controller::new(config, sensor, VirtualClock::new(), Duplex::new(in_rx, out_tx), Detached);

        let angle = controller.measure(movement).degrees();
        let (sensor, clock, _, _) = controller.into_parts();
        (angle, out_rx.try_iter().collect(), sensor, clock)
    }

    #[test]
    fn roll_reports_the_change_between_stances() {
        let sensor = ScriptedSensor::new()
            .hold_for(raw_triple(0, 8192, 14189), 50)
            .hold(raw_triple(0, 14189, 8192));

        let (angle, lines, _, _) = run(MotionConfig::default(), sensor, Movement::ForearmSupination);

        assert!((angle - 30.0).abs() < 0.01);
        assert_eq!(lines.last().unwrap(), "ANGLE:30.00");
        assert_eq!(
            lines,
            vec![
                "Get into position...", "Hold still...",
                "Rotate now...", "5...", "4...", "3...", "2...", "1...",
                "Hold still...", "ANGLE:30.00",
            ]
        );
    }

    #[test]
    fn pronation_runs_the_same_roll_protocol() {
        let sensor = ScriptedSensor::new()
            .hold_for(raw_triple(0, 14189, 8192), 50)
            .hold(raw_triple(0, 8192, 14189));

        let (angle, lines, _, _) = run(MotionConfig::default(), sensor, Movement::ForearmPronation);

        assert!((angle - 30.0).abs() < 0.01);
        assert_eq!(lines.last().unwrap(), "ANGLE:30.00");
    }

    #[test]
    fn roll_across_the_seam_takes_the_short_way() {
        // About 350 degrees before, about 10 degrees after.
        let sensor = ScriptedSensor::new()
            .hold_for(raw_triple(0, -2845, 16135), 50)
            .hold(raw_triple(0, 2845, 16135));

        let (angle, _, _, _) = run(MotionConfig::default(), sensor, Movement::ForearmSupination);

        assert!((angle - 20.0).abs() < 0.05, "angle was {}", angle);
    }

    #[test]
    fn pitch_ignores_the_baseline() {
        let sensor = ScriptedSensor::new()
            .hold_for(raw_triple(16384, 0, 0), 50)
            .hold(raw_triple(-8192, 0, 14189));

        let (angle, lines, sensor, clock) = run(MotionConfig::default(), sensor, Movement::ElbowFlexion);

        assert!((angle - 30.0).abs() < 0.01);
        assert_eq!(lines.last().unwrap(), "ANGLE:30.00");
        assert_eq!(lines[2], "Start moving now!");
        assert_eq!(sensor.accel_reads(), 100);
        // Two bursts of 500 + 50 * 10 ms around a five second countdown.
        assert_eq!(clock.now_us(), 7_000_000);
    }

    #[test]
    fn every_pitch_selector_behaves_the_same() {
        for movement in [Movement::WristFlexion, Movement::WristExtension, Movement::ElbowFlexion, Movement::ElbowExtension] {
            let sensor = ScriptedSensor::new().hold_for(raw_triple(0, 0, 16384), 50).hold(raw_triple(8192, 0, 14189));
            let (_, lines, _, _) = run(MotionConfig::default(), sensor, movement);
            assert_eq!(lines.last().unwrap(), "ANGLE:30.00");
        }
    }

    #[test]
    fn yaw_integrates_a_constant_rate() {
        let config = MotionConfig {
            yaw_window_ms: 500,
            yaw_interval_ms: 100,
            ..MotionConfig::default()
        };
        let sensor = ScriptedSensor::new().rotating(raw_triple(0, 0, 30 * 131));

        let (angle, lines, sensor, _) = run(config, sensor, Movement::WristDeviation);

        assert_eq!(sensor.motion_reads(), 5);
        assert!((angle - 15.0).abs() < 1e-3);
        assert_eq!(lines, vec!["Start moving now!", "1...", "ANGLE:15.00"]);
    }

    #[test]
    fn yaw_counts_down_once_per_second_over_the_default_window() {
        let sensor = ScriptedSensor::new().rotating(raw_triple(0, 0, -10 * 131));

        let (angle, lines, sensor, clock) = run(MotionConfig::default(), sensor, Movement::WristDeviation);

        assert_eq!(sensor.motion_reads(), 500);
        assert_eq!(clock.now_us(), 5_000_000);
        assert!((angle - 50.0).abs() < 0.01);
        assert_eq!(
            lines,
            vec!["Start moving now!", "5...", "4...", "3...", "2...", "1...", "ANGLE:50.00"]
        );
    }

    #[test]
    fn yaw_magnitude_survives_a_wrap() {
        let config = MotionConfig {
            yaw_window_ms: 1000,
            yaw_interval_ms: 100,
            ..MotionConfig::default()
        };
        // 200 degrees in one second wraps to -160.
        let sensor = ScriptedSensor::new().rotating(raw_triple(0, 0, 200 * 131));

        let (angle, lines, _, _) = run(config, sensor, Movement::WristDeviation);

        assert!((angle - 160.0).abs() < 0.01);
        assert!(lines.iter().all(|line| !line.starts_with("ANGLE:-")));
    }
}
