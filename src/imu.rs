//! Driver for the MPU-6050 Inertial Measurement Unit (IMU) on the ESP-IDF I2C bus.

use anyhow::Context;
use esp_idf_hal::delay::BLOCK;
use esp_idf_hal::gpio::{InputPin, OutputPin};
use esp_idf_hal::i2c::{I2c, I2cConfig, I2cDriver};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::prelude::*;

use crate::sensors::{decode_motion, decode_triple, raw_triple, MotionReading, MotionSensor, RawTriple};

const ADDRESS: u8 = 0x68;

const REG_GYRO_CONFIG: u8 = 0x1B;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B;
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;

/// Full-scale select bits: ±250 °/s and ±2 g.
const GYRO_FS_250: u8 = 0x00;
const ACCEL_FS_2G: u8 = 0x00;

pub struct Mpu6050<'a> {
    i2c: I2cDriver<'a>,
}

impl<'a> Mpu6050<'a> {
    pub fn new<I2C: I2c>(
        i2c: impl Peripheral<P = I2C> + 'a,
        sda: impl Peripheral<P = impl InputPin + OutputPin> + 'a,
        scl: impl Peripheral<P = impl InputPin + OutputPin> + 'a,
    ) -> anyhow::Result<Self> {
        let config = I2cConfig::new().baudrate(400.kHz().into());
        let i2c = I2cDriver::new(i2c, sda, scl, &config).context("failed to set up the I2C bus")?;

        let mut imu = Self { i2c };

        let mut who_am_i = [0u8; 1];
        imu.i2c
            .write_read(ADDRESS, &[REG_WHO_AM_I], &mut who_am_i, BLOCK)
            .context("MPU-6050 did not answer")?;
        anyhow::ensure!(who_am_i[0] == ADDRESS, "unexpected WHO_AM_I 0x{:02x}", who_am_i[0]);

        imu.write_register(REG_PWR_MGMT_1, 0x00).context("failed to wake the MPU-6050")?;
        imu.write_register(REG_ACCEL_CONFIG, ACCEL_FS_2G).context("failed to set the accelerometer range")?;
        imu.write_register(REG_GYRO_CONFIG, GYRO_FS_250).context("failed to set the gyroscope range")?;

        log::info!("MPU-6050 ready at ±2 g / ±250 °/s");
        Ok(imu)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), esp_idf_hal::sys::EspError> {
        self.i2c.write(ADDRESS, &[register, value], BLOCK)
    }
}

impl MotionSensor for Mpu6050<'_> {
    fn acceleration(&mut self) -> RawTriple {
        let mut bytes = [0u8; 6];
        match self.i2c.write_read(ADDRESS, &[REG_ACCEL_XOUT_H], &mut bytes, BLOCK) {
            Ok(()) => decode_triple(&bytes),
            Err(e) => {
                log::warn!("Acceleration read failed: {}", e);
                raw_triple(0, 0, 0)
            },
        }
    }

    fn motion(&mut self) -> MotionReading {
        let mut bytes = [0u8; 14];
        match self.i2c.write_read(ADDRESS, &[REG_ACCEL_XOUT_H], &mut bytes, BLOCK) {
            Ok(()) => decode_motion(&bytes),
            Err(e) => {
                log::warn!("Motion read failed: {}", e);
                MotionReading::default()
            },
        }
    }
}
