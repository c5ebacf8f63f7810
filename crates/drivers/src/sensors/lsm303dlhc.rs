//! ST LSM303DLHC accelerometer and magnetometer.
//!
//! The two halves of the chip answer at separate I2C addresses. The
//! accelerometer stores its outputs low byte first; the magnetometer stores
//! them high byte first and in X, Z, Y order.

use hkusbio_board::I2cBus;
use hkusbio_protocol::{Axes, combine_i16};
use tracing::debug;

use crate::error::DriverResult;

pub const ACCEL_ADDRESS: u8 = 0x19;
pub const MAG_ADDRESS: u8 = 0x1E;

pub mod reg {
    pub const CTRL_REG1_A: u8 = 0x20;
    pub const CTRL_REG2_A: u8 = 0x21;
    pub const CTRL_REG3_A: u8 = 0x22;
    pub const CTRL_REG4_A: u8 = 0x23;
    pub const CTRL_REG5_A: u8 = 0x24;
    pub const CTRL_REG6_A: u8 = 0x25;
    pub const OUT_X_L_A: u8 = 0x28;
    pub const OUT_Y_L_A: u8 = 0x2A;
    pub const OUT_Z_L_A: u8 = 0x2C;

    pub const CRA_REG_M: u8 = 0x00;
    pub const CRB_REG_M: u8 = 0x01;
    pub const MR_REG_M: u8 = 0x02;
    pub const OUT_X_H_M: u8 = 0x03;
    pub const OUT_Z_H_M: u8 = 0x05;
    pub const OUT_Y_H_M: u8 = 0x07;
    pub const TEMP_OUT_H_M: u8 = 0x31;
    pub const TEMP_OUT_L_M: u8 = 0x32;
}

/// Accelerometer: 10 Hz, normal power, X/Y/Z enabled.
const CTRL_REG1_A_VALUE: u8 = 0b0010_0111;
/// Magnetometer: temperature sensor on, 3 Hz output rate.
const CRA_REG_M_VALUE: u8 = 0b1000_1000;
/// Magnetometer gain: ±1.3 gauss.
const CRB_REG_M_VALUE: u8 = 0b0000_0000;
/// Magnetometer continuous conversion.
const MR_REG_M_VALUE: u8 = 0b0000_0000;

pub struct Lsm303dlhc<B> {
    bus: B,
}

impl<B: I2cBus> Lsm303dlhc<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn setup(&mut self) -> DriverResult<()> {
        debug!("configuring LSM303DLHC");
        let accel = [
            (reg::CTRL_REG1_A, CTRL_REG1_A_VALUE),
            (reg::CTRL_REG2_A, 0),
            (reg::CTRL_REG3_A, 0),
            (reg::CTRL_REG4_A, 0),
            (reg::CTRL_REG5_A, 0),
            (reg::CTRL_REG6_A, 0),
        ];
        for (register, value) in accel {
            self.bus.write_register(ACCEL_ADDRESS, register, value)?;
        }
        let mag = [
            (reg::CRA_REG_M, CRA_REG_M_VALUE),
            (reg::CRB_REG_M, CRB_REG_M_VALUE),
            (reg::MR_REG_M, MR_REG_M_VALUE),
        ];
        for (register, value) in mag {
            self.bus.write_register(MAG_ADDRESS, register, value)?;
        }
        Ok(())
    }

    fn read_le(&mut self, address: u8, register: u8) -> DriverResult<i16> {
        let lsb = self.bus.read_register(address, register)?;
        let msb = self.bus.read_register(address, register + 1)?;
        Ok(combine_i16(msb, lsb))
    }

    fn read_be(&mut self, address: u8, register: u8) -> DriverResult<i16> {
        let msb = self.bus.read_register(address, register)?;
        let lsb = self.bus.read_register(address, register + 1)?;
        Ok(combine_i16(msb, lsb))
    }

    /// Raw acceleration.
    pub fn read_accel(&mut self) -> DriverResult<Axes> {
        let x = self.read_le(ACCEL_ADDRESS, reg::OUT_X_L_A)?;
        let y = self.read_le(ACCEL_ADDRESS, reg::OUT_Y_L_A)?;
        let z = self.read_le(ACCEL_ADDRESS, reg::OUT_Z_L_A)?;
        Ok(Axes::new(x, y, z))
    }

    /// Raw magnetic field, reordered to x, y, z.
    pub fn read_mag(&mut self) -> DriverResult<Axes> {
        let x = self.read_be(MAG_ADDRESS, reg::OUT_X_H_M)?;
        let z = self.read_be(MAG_ADDRESS, reg::OUT_Z_H_M)?;
        let y = self.read_be(MAG_ADDRESS, reg::OUT_Y_H_M)?;
        Ok(Axes::new(x, y, z))
    }

    /// 12-bit signed temperature, 8 digits per degree from an uncalibrated offset.
    pub fn read_temperature_raw(&mut self) -> DriverResult<i16> {
        let msb = self.bus.read_register(MAG_ADDRESS, reg::TEMP_OUT_H_M)?;
        let lsb = self.bus.read_register(MAG_ADDRESS, reg::TEMP_OUT_L_M)?;
        Ok(combine_i16(msb, lsb) >> 4)
    }

    pub fn into_inner(self) -> B {
        self.bus
    }
}

/// Compass heading in degrees clockwise from magnetic north, assuming the
/// board lies flat.
pub fn heading_degrees(mag: Axes) -> f32 {
    let heading = f32::from(mag.y).atan2(f32::from(mag.x)).to_degrees();
    if heading < 0.0 { heading + 360.0 } else { heading }
}
