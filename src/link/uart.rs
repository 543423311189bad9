//! UART-backed serial links: the USB bridge on UART0 and the Bluetooth
//! serial module on UART2.

use anyhow::Context;
use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::uart::{config::Config, Uart, UartDriver};
use esp_idf_hal::units::Hertz;

use super::{ByteSource, LineSink};

pub struct SerialLink<'a> {
    name: &'static str,
    uart: UartDriver<'a>,
}

impl<'a> SerialLink<'a> {
    pub fn new<UART: Uart>(
        name: &'static str,
        uart: impl Peripheral<P = UART> + 'a,
        tx: impl Peripheral<P = impl OutputPin> + 'a,
        rx: impl Peripheral<P = impl InputPin> + 'a,
        baud: u32,
    ) -> anyhow::Result<Self> {
        let config = Config::default().baudrate(Hertz(baud));
        let uart = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )
        .with_context(|| format!("failed to open the {} link", name))?;

        log::info!("{} link open at {} baud", name, baud);
        Ok(Self { name, uart })
    }
}

impl ByteSource for SerialLink<'_> {
    fn try_read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte, NON_BLOCK) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(e) => {
                log::debug!("{} read failed: {}", self.name, e);
                None
            },
        }
    }
}

impl LineSink for SerialLink<'_> {
    fn write_line(&mut self, line: &str) {
        for chunk in [line.as_bytes(), &b"\r\n"[..]] {
            let mut pending = chunk;
            while !pending.is_empty() {
                match self.uart.write(pending) {
                    Ok(0) => return,
                    Ok(written) => pending = &pending[written..],
                    Err(e) => {
                        log::debug!("{} write failed: {}", self.name, e);
                        return;
                    },
                }
            }
        }
    }
}
