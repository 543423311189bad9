//! End-to-end runs of the dispatcher over in-memory serial links.

use medmove_firmware::command::{Command, Movement};
use medmove_firmware::link::Duplex;
use medmove_firmware::notice::Notice;
use medmove_firmware::sensors::raw_triple;
use medmove_firmware::sim::{ScriptedSensor, VirtualClock};
use medmove_firmware::{Controller, ControllerMode, MotionConfig};

type Link = Duplex<flume::Receiver<u8>, flume::Sender<String>>;

struct Device {
    controller: Controller<ScriptedSensor, VirtualClock, Link, Link>,
    wired_in: flume::Sender<u8>,
    wired_out: flume::Receiver<String>,
    wireless_in: flume::Sender<u8>,
    wireless_out: flume::Receiver<String>,
}

impl Device {
    fn new(config: MotionConfig, sensor: ScriptedSensor) -> Self {
        let (wired_in, wired_rx) = flume::unbounded();
        let (wired_tx, wired_out) = flume::unbounded();
        let (wireless_in, wireless_rx) = flume::unbounded();
        let (wireless_tx, wireless_out) = flume::unbounded();

        Self {
            controller: Controller::new(
                config,
                sensor,
                VirtualClock::new(),
                Duplex::new(wired_rx, wired_tx),
                Duplex::new(wireless_rx, wireless_tx),
            ),
            wired_in,
            wired_out,
            wireless_in,
            wireless_out,
        }
    }

    /// Tick until both links are drained.
    fn run_until_idle(&mut self) -> Vec<Command> {
        let mut handled = Vec::new();
        while let Some(command) = self.controller.tick() {
            handled.push(command);
        }
        handled
    }

    fn wired_lines(&self) -> Vec<String> {
        self.wired_out.try_iter().collect()
    }

    fn wireless_lines(&self) -> Vec<String> {
        self.wireless_out.try_iter().collect()
    }
}

fn angle_lines(lines: &[String]) -> Vec<&str> {
    lines
        .iter()
        .filter(|line| line.starts_with("ANGLE:"))
        .map(String::as_str)
        .collect()
}

#[test]
fn supination_over_the_wireless_link() {
    let sensor = ScriptedSensor::new()
        .hold_for(raw_triple(0, 8192, 14189), 50)
        .hold(raw_triple(0, 14189, 8192));
    let mut device = Device::new(MotionConfig::default(), sensor);

    device.wireless_in.send(b'S').unwrap();
    device.wireless_in.send(b'\n').unwrap();

    let handled = device.run_until_idle();
    assert_eq!(handled, vec![Command::Measure(Movement::ForearmSupination)]);

    let wired = device.wired_lines();
    let wireless = device.wireless_lines();
    assert_eq!(wired, wireless);
    assert_eq!(angle_lines(&wired), vec!["ANGLE:30.00"]);
    assert_eq!(wired.last().unwrap(), &Notice::Instructions.to_string());
    assert_eq!(device.controller.mode, ControllerMode::Idle);
}

#[test]
fn deviation_reports_integrated_yaw() {
    let config = MotionConfig {
        yaw_window_ms: 500,
        yaw_interval_ms: 100,
        ..MotionConfig::default()
    };
    let mut device = Device::new(config, ScriptedSensor::new().rotating(raw_triple(0, 0, 3930)));

    device.wired_in.send(b'z').unwrap();
    device.run_until_idle();

    assert_eq!(angle_lines(&device.wired_lines()), vec!["ANGLE:15.00"]);
}

#[test]
fn negative_rotation_is_reported_unsigned() {
    let config = MotionConfig {
        yaw_window_ms: 500,
        yaw_interval_ms: 100,
        ..MotionConfig::default()
    };
    let mut device = Device::new(config, ScriptedSensor::new().rotating(raw_triple(0, 0, -3930)));

    device.wired_in.send(b'Z').unwrap();
    device.run_until_idle();

    assert_eq!(angle_lines(&device.wired_lines()), vec!["ANGLE:15.00"]);
}

#[test]
fn wired_commands_take_priority() {
    let mut device = Device::new(MotionConfig::default(), ScriptedSensor::new());

    device.wireless_in.send(b'q').unwrap();
    device.wired_in.send(b'r').unwrap();

    // The recalibration runs first; the wireless byte still queued when it finishes is dropped.
    let handled = device.run_until_idle();
    assert_eq!(handled, vec![Command::Recalibrate]);

    let wired = device.wired_lines();
    assert!(!wired.iter().any(|line| line == "Invalid command."));
    assert_eq!(wired.last().unwrap(), &Notice::Instructions.to_string());
}

#[test]
fn commands_after_a_trial_are_served() {
    let mut device = Device::new(MotionConfig::default(), ScriptedSensor::new());

    device.wired_in.send(b'x').unwrap();
    device.run_until_idle();
    device.wired_in.send(b'?').unwrap();
    device.wired_in.send(b'y').unwrap();
    let handled = device.run_until_idle();

    assert_eq!(handled, vec![Command::Invalid(b'?'), Command::Measure(Movement::ElbowExtension)]);
    let wired = device.wired_lines();
    assert_eq!(wired.iter().filter(|line| *line == "Invalid command.").count(), 1);
    assert_eq!(angle_lines(&wired), vec!["ANGLE:0.00", "ANGLE:0.00"]);
}
