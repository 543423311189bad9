//! The command dispatcher: a cooperative loop that runs one command per tick.

mod trial;

use crate::clock::Clock;
use crate::command::{Command, Movement};
use crate::configuration::MotionConfig;
use crate::link::{ByteSource, Channels, LineSink};
use crate::notice::Notice;
use crate::sensors::MotionSensor;
use crate::stance::StanceSampler;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerMode {
    /// Waiting for the next command character on either link.
    Idle,
    /// Running the stance sampler as a warm-up, with nothing measured.
    Recalibrating,
    /// A movement protocol is running. Input is not looked at until it returns.
    Measuring(Movement),
}

pub struct Controller<S, C, W, B> {
    pub mode: ControllerMode,
    config: MotionConfig,
    sampler: StanceSampler,
    sensor: S,
    clock: C,
    channels: Channels<W, B>,
}

impl<S, C, W, B> Controller<S, C, W, B>
where
    S: MotionSensor,
    C: Clock,
    W: ByteSource + LineSink,
    B: ByteSource + LineSink,
{
    pub fn new(config: MotionConfig, sensor: S, clock: C, wired: W, wireless: B) -> Self {
        Self {
            mode:     ControllerMode::Idle,
            sampler:  StanceSampler::new(&config),
            config,
            sensor,
            clock,
            channels: Channels::new(wired, wireless),
        }
    }

    /// Announce the accepted commands once, then serve commands forever.
    pub fn start_event_loop(&mut self) -> ! {
        self.announce();

        loop {
            self.poll_once();
        }
    }

    /// Broadcast the command reminder on both links.
    pub fn announce(&mut self) {
        self.channels.report(&Notice::Instructions);
    }

    /// One pass of the event loop: handle a byte if there is one, otherwise
    /// yield for the idle poll delay.
    pub fn poll_once(&mut self) -> Option<Command> {
        let command = self.tick();
        if command.is_none() {
            self.clock.delay_ms(self.config.idle_poll_ms);
        }
        command
    }

    /// Read at most one byte and act on it. Returns the command that was
    /// handled, or `None` when neither link had input.
    pub fn tick(&mut self) -> Option<Command> {
        let byte = self.channels.poll_byte()?;
        let command = Command::parse(byte);

        match command {
            Command::Ignore => {},
            Command::Invalid(byte) => {
                log::warn!("Invalid command byte 0x{:02x}", byte);
                self.channels.report(&Notice::InvalidCommand);
            },
            Command::Recalibrate => {
                self.set_mode(ControllerMode::Recalibrating);
                self.recalibrate();
                self.finish();
            },
            Command::Measure(movement) => {
                self.set_mode(ControllerMode::Measuring(movement));
                self.measure(movement);
                self.finish();
            },
        }

        Some(command)
    }

    /// Two back-to-back stance bursts whose results are thrown away.
    pub fn recalibrate(&mut self) {
        self.channels.report(&Notice::Recalibrating);
        for _ in 0..2 {
            let _ = self.sampler.sample(&mut self.sensor, &mut self.clock, &mut self.channels);
        }
        self.channels.report(&Notice::CalibrationComplete);
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn into_parts(self) -> (S, C, W, B) {
        let (wired, wireless) = self.channels.into_inner();
        (self.sensor, self.clock, wired, wireless)
    }

    fn set_mode(&mut self, mode: ControllerMode) {
        log::info!("Mode change: {:?}", mode);
        self.mode = mode;
    }

    /// Whatever is still queued when a protocol returns is dropped rather
    /// than replayed as another trial.
    fn finish(&mut self) {
        let discarded = self.channels.discard_pending();
        if discarded > 0 {
            log::info!("Discarded {} byte(s) pending after the run", discarded);
        }
        self.channels.report(&Notice::Instructions);
        self.set_mode(ControllerMode::Idle);
    }
}
