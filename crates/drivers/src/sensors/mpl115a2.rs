//! Freescale MPL115A2 barometric pressure sensor.
//!
//! The chip returns raw 10-bit pressure and temperature ADC counts plus four
//! factory coefficients; compensation follows the datasheet polynomial
//! `Pcomp = a0 + (b1 + c12 * Tadc) * Padc + b2 * Tadc`.

use std::thread::sleep;
use std::time::Duration;

use hkusbio_board::I2cBus;
use hkusbio_protocol::{combine_i16, combine_u16};
use serde::Serialize;
use tracing::debug;

use crate::error::DriverResult;

pub const MPL115A2_ADDRESS: u8 = 0x60;

pub mod reg {
    pub const PADC_MSB: u8 = 0x00;
    pub const A0_MSB: u8 = 0x04;
    pub const START_CONVERSION: u8 = 0x12;
}

const PRESSURE_MIN_KPA: f32 = 50.0;
const PRESSURE_MAX_KPA: f32 = 115.0;
const PCOMP_FULL_SCALE: f32 = 1023.0;

/// Factory compensation coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coefficients {
    pub a0: f32,
    pub b1: f32,
    pub b2: f32,
    pub c12: f32,
}

impl Coefficients {
    /// Decode the eight coefficient bytes read from `A0_MSB` onward.
    ///
    /// a0 is Q12.3, b1 is Q2.13, b2 is Q1.14 and c12 is a 14-bit Q0.13
    /// value padded with nine further fractional zeros.
    pub fn from_bytes(raw: [u8; 8]) -> Self {
        let [a0_h, a0_l, b1_h, b1_l, b2_h, b2_l, c12_h, c12_l] = raw;
        Self {
            a0: f32::from(combine_i16(a0_h, a0_l)) / 8.0,
            b1: f32::from(combine_i16(b1_h, b1_l)) / 8192.0,
            b2: f32::from(combine_i16(b2_h, b2_l)) / 16384.0,
            c12: f32::from(combine_i16(c12_h, c12_l) >> 2) / 4_194_304.0,
        }
    }

    /// Compensated pressure in counts (0..=1023 over 50..=115 kPa).
    pub fn compensate(&self, raw: RawSample) -> f32 {
        let padc = f32::from(raw.padc);
        let tadc = f32::from(raw.tadc);
        self.a0 + (self.b1 + self.c12 * tadc) * padc + self.b2 * tadc
    }

    pub fn pressure_kpa(&self, raw: RawSample) -> f32 {
        pcomp_to_kpa(self.compensate(raw))
    }
}

/// Raw 10-bit conversion results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RawSample {
    pub padc: u16,
    pub tadc: u16,
}

impl RawSample {
    /// Decode the four bytes read from `PADC_MSB` onward.
    pub fn from_bytes(raw: [u8; 4]) -> Self {
        let [p_h, p_l, t_h, t_l] = raw;
        Self {
            padc: combine_u16(p_h, p_l) >> 6,
            tadc: combine_u16(t_h, t_l) >> 6,
        }
    }

    /// Rough temperature estimate.
    ///
    /// Uses a nominal -5.35 counts/°C slope around 498 counts at 25 °C. The
    /// chip is not factory-calibrated for temperature, so this is only
    /// indicative.
    pub fn approximate_temperature_c(&self) -> f32 {
        (f32::from(self.tadc) - 498.0) / -5.35 + 25.0
    }
}

/// One compensated reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PressureSample {
    pub raw: RawSample,
    pub pressure_kpa: f32,
    pub approximate_temperature_c: f32,
}

pub fn pcomp_to_kpa(pcomp: f32) -> f32 {
    pcomp * (PRESSURE_MAX_KPA - PRESSURE_MIN_KPA) / PCOMP_FULL_SCALE + PRESSURE_MIN_KPA
}

pub struct Mpl115a2<B> {
    bus: B,
    coefficients: Option<Coefficients>,
    conversion_delay: Duration,
}

impl<B: I2cBus> Mpl115a2<B> {
    /// `conversion_delay` is the wait between starting a conversion and
    /// reading it (datasheet minimum 3 ms).
    pub fn new(bus: B, conversion_delay: Duration) -> Self {
        Self {
            bus,
            coefficients: None,
            conversion_delay,
        }
    }

    pub fn read_coefficients(&mut self) -> DriverResult<Coefficients> {
        let mut raw = [0u8; 8];
        self.bus.read_registers(MPL115A2_ADDRESS, reg::A0_MSB, &mut raw)?;
        let coefficients = Coefficients::from_bytes(raw);
        debug!(?raw, ?coefficients, "MPL115A2 coefficients");
        self.coefficients = Some(coefficients);
        Ok(coefficients)
    }

    pub fn start_conversion(&mut self) -> DriverResult<()> {
        self.bus
            .write_register(MPL115A2_ADDRESS, reg::START_CONVERSION, 0x00)?;
        Ok(())
    }

    pub fn read_raw(&mut self) -> DriverResult<RawSample> {
        let mut raw = [0u8; 4];
        self.bus.read_registers(MPL115A2_ADDRESS, reg::PADC_MSB, &mut raw)?;
        Ok(RawSample::from_bytes(raw))
    }

    /// Convert and read one sample, fetching coefficients on first use.
    pub fn sample(&mut self) -> DriverResult<PressureSample> {
        let coefficients = match self.coefficients {
            Some(c) => c,
            None => self.read_coefficients()?,
        };
        self.start_conversion()?;
        if !self.conversion_delay.is_zero() {
            sleep(self.conversion_delay);
        }
        let raw = self.read_raw()?;
        Ok(PressureSample {
            raw,
            pressure_kpa: coefficients.pressure_kpa(raw),
            approximate_temperature_c: raw.approximate_temperature_c(),
        })
    }

    pub fn into_inner(self) -> B {
        self.bus
    }
}
