//! Drivers for parts wired to the HKUSBIO board.
//!
//! Sensors are generic over [`RegisterAccess`](hkusbio_board::RegisterAccess)
//! or [`I2cBus`](hkusbio_board::I2cBus), so the same driver runs over I2C,
//! the board's SPI engine or a simulated board. Peripherals drive the
//! PIC18F45K50 directly through special function register writes.

#![deny(static_mut_refs)]

pub mod error;
pub mod peripherals;
pub mod sensors;

pub use error::{DriverError, DriverResult};
pub use peripherals::{Color, Dac, Pwm, RgbLed, SevenSegment, SfrPin, SfrSpi};
pub use sensors::{
    Coefficients, FullScale, GyroChip, L3gGyro, Lsm303dlhc, Mpl115a2, PressureSample, RawSample,
};
