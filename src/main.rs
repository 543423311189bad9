#[cfg(target_os = "espidf")]
use esp_idf_svc::sys as _; // If using the `binstart` feature of `esp-idf-sys`, always keep this module imported

use anyhow::Context;
use medmove_firmware::{clock::SystemClock, Controller, MotionConfig};

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp_idf_hal::peripherals::Peripherals;
    use medmove_firmware::{imu::Mpu6050, link::uart::SerialLink};

    esp_idf_svc::sys::link_patches(); // Needed for esp32-rs
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("Entered Main function!");

    let config = MotionConfig::embedded().context("failed to load the motion configuration")?;
    let peripherals = Peripherals::take().context("peripherals were already taken")?;

    let sensor = Mpu6050::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
    )?;

    let wired = SerialLink::new(
        "wired",
        peripherals.uart0,
        peripherals.pins.gpio1,
        peripherals.pins.gpio3,
        config.wired_baud,
    )?;

    // HC-05 style Bluetooth serial bridge.
    let wireless = SerialLink::new(
        "wireless",
        peripherals.uart2,
        peripherals.pins.gpio17,
        peripherals.pins.gpio16,
        config.wireless_baud,
    )?;

    let mut controller = Controller::new(config, sensor, SystemClock::new(), wired, wireless);
    controller.start_event_loop()
}

/// Bench simulator: the line protocol on stdin/stdout with a sensor lying flat
/// and still, and no wireless peer.
#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use medmove_firmware::link::{Detached, Duplex};
    use medmove_firmware::sim::ScriptedSensor;

    host::ConsoleLogger::install().map_err(|e| anyhow::anyhow!("failed to install the logger: {}", e))?;
    log::info!("Entered Main function!");

    let config = MotionConfig::embedded().context("failed to load the motion configuration")?;

    let (byte_tx, byte_rx) = flume::unbounded();
    std::thread::spawn(move || host::forward_stdin(byte_tx));

    let wired = Duplex::new(byte_rx, host::StdoutSink);
    let mut controller = Controller::new(config, ScriptedSensor::new(), SystemClock::new(), wired, Detached);
    controller.start_event_loop()
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::{Read, Write};

    use colored::*;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use medmove_firmware::link::LineSink;

    /// Writes log records to stderr so stdout carries nothing but the line protocol.
    pub struct ConsoleLogger;

    static LOGGER: ConsoleLogger = ConsoleLogger;

    impl ConsoleLogger {
        pub fn install() -> Result<(), log::SetLoggerError> {
            log::set_logger(&LOGGER)?;
            log::set_max_level(LevelFilter::Debug);
            Ok(())
        }
    }

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Debug
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let tag = match record.level() {
                Level::Error => "[error]".red().bold(),
                Level::Warn  => "[warn]".yellow().bold(),
                Level::Info  => "[info]".bright_blue().bold(),
                Level::Debug => "[debug]".dimmed(),
                Level::Trace => "[trace]".dimmed(),
            };
            eprintln!("{}  {}", tag, record.args());
        }

        fn flush(&self) {}
    }

    pub struct StdoutSink;

    impl LineSink for StdoutSink {
        fn write_line(&mut self, line: &str) {
            let mut stdout = std::io::stdout().lock();
            let _ = writeln!(stdout, "{}", line).and_then(|_| stdout.flush());
        }
    }

    /// Feed stdin into the wired link one byte at a time until EOF.
    pub fn forward_stdin(tx: flume::Sender<u8>) {
        for byte in std::io::stdin().lock().bytes() {
            match byte {
                Ok(byte) => {
                    if tx.send(byte).is_err() {
                        break;
                    }
                },
                Err(e) => {
                    log::warn!("stdin closed: {}", e);
                    break;
                },
            }
        }
    }
}
