//! ST L3G4200D / L3GD20 three-axis gyroscopes.
//!
//! Both chips share a register map and differ in identity and the output
//! data rate written to CTRL_REG1. The L3G4200D is usually wired to I2C at
//! [`L3G4200D_I2C_ADDRESS`]; either chip also works on the SPI engine.

use hkusbio_board::RegisterAccess;
use hkusbio_protocol::Axes;
use tracing::{debug, warn};

use crate::error::{DriverError, DriverResult};

/// I2C address with SDO pulled high.
pub const L3G4200D_I2C_ADDRESS: u8 = 0x69;

pub mod reg {
    pub const WHO_AM_I: u8 = 0x0F;
    pub const CTRL_REG1: u8 = 0x20;
    pub const CTRL_REG2: u8 = 0x21;
    pub const CTRL_REG3: u8 = 0x22;
    pub const CTRL_REG4: u8 = 0x23;
    pub const CTRL_REG5: u8 = 0x24;
    pub const OUT_TEMP: u8 = 0x26;
    pub const OUT_X_L: u8 = 0x28;
    pub const OUT_Y_L: u8 = 0x2A;
    pub const OUT_Z_L: u8 = 0x2C;
}

/// CTRL_REG2: high-pass filter left at reset configuration.
const CTRL_REG2_VALUE: u8 = 0b0000_0000;
/// CTRL_REG3: data-ready on DRDY/INT2.
const CTRL_REG3_VALUE: u8 = 0b0000_1000;
/// CTRL_REG5: FIFO and high-pass filter off.
const CTRL_REG5_VALUE: u8 = 0b0000_0000;
/// CTRL_REG4 block data update bit.
const BDU: u8 = 0b1000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyroChip {
    L3g4200d,
    L3gd20,
}

impl GyroChip {
    pub fn name(self) -> &'static str {
        match self {
            Self::L3g4200d => "L3G4200D",
            Self::L3gd20 => "L3GD20",
        }
    }

    /// Expected WHO_AM_I value.
    pub fn identity(self) -> u8 {
        match self {
            Self::L3g4200d => 0xD3,
            Self::L3gd20 => 0xD4,
        }
    }

    /// CTRL_REG1: power on with X, Y and Z enabled.
    ///
    /// The L3GD20 runs at 760 Hz ODR with a 100 Hz cut-off.
    pub fn ctrl_reg1(self) -> u8 {
        match self {
            Self::L3g4200d => 0b0000_1111,
            Self::L3gd20 => 0b0111_1111,
        }
    }
}

/// Full-scale range selected through CTRL_REG4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FullScale {
    Dps250,
    Dps500,
    #[default]
    Dps2000,
}

impl FullScale {
    pub const ALL: [FullScale; 3] = [Self::Dps250, Self::Dps500, Self::Dps2000];

    pub fn from_dps(dps: u16) -> Option<Self> {
        match dps {
            250 => Some(Self::Dps250),
            500 => Some(Self::Dps500),
            2000 => Some(Self::Dps2000),
            _ => None,
        }
    }

    pub fn dps(self) -> u16 {
        match self {
            Self::Dps250 => 250,
            Self::Dps500 => 500,
            Self::Dps2000 => 2000,
        }
    }

    /// CTRL_REG4 value: block data update plus the FS bits.
    pub fn ctrl_reg4(self) -> u8 {
        let fs = match self {
            Self::Dps250 => 0b00,
            Self::Dps500 => 0b01,
            Self::Dps2000 => 0b11,
        };
        BDU | (fs << 4)
    }

    /// Datasheet sensitivity in millidegrees per second per digit.
    pub fn sensitivity_mdps(self) -> f32 {
        match self {
            Self::Dps250 => 8.75,
            Self::Dps500 => 17.5,
            Self::Dps2000 => 70.0,
        }
    }
}

pub struct L3gGyro<R> {
    regs: R,
    chip: GyroChip,
    scale: FullScale,
}

impl<R: RegisterAccess> L3gGyro<R> {
    pub fn new(regs: R, chip: GyroChip) -> Self {
        Self {
            regs,
            chip,
            scale: FullScale::default(),
        }
    }

    pub fn chip(&self) -> GyroChip {
        self.chip
    }

    pub fn scale(&self) -> FullScale {
        self.scale
    }

    pub fn who_am_i(&mut self) -> DriverResult<u8> {
        Ok(self.regs.read_register(reg::WHO_AM_I)?)
    }

    /// Verify the chip identity, then write the control registers.
    ///
    /// # Errors
    ///
    /// `IdentityMismatch` if WHO_AM_I does not match the chip; nothing is
    /// written in that case.
    pub fn setup(&mut self, scale: FullScale) -> DriverResult<()> {
        let actual = self.who_am_i()?;
        let expected = self.chip.identity();
        if actual != expected {
            warn!(chip = self.chip.name(), actual, expected, "WHOAMI mismatch");
            return Err(DriverError::IdentityMismatch {
                chip: self.chip.name(),
                expected,
                actual,
            });
        }

        debug!(chip = self.chip.name(), dps = scale.dps(), "configuring gyro");
        self.regs.write_register(reg::CTRL_REG1, self.chip.ctrl_reg1())?;
        self.regs.write_register(reg::CTRL_REG2, CTRL_REG2_VALUE)?;
        self.regs.write_register(reg::CTRL_REG3, CTRL_REG3_VALUE)?;
        self.regs.write_register(reg::CTRL_REG4, scale.ctrl_reg4())?;
        self.regs.write_register(reg::CTRL_REG5, CTRL_REG5_VALUE)?;
        self.scale = scale;
        Ok(())
    }

    /// Raw angular rate, one register pair per axis.
    pub fn read_axes(&mut self) -> DriverResult<Axes> {
        let x = self.regs.read_i16_le(reg::OUT_X_L)?;
        let y = self.regs.read_i16_le(reg::OUT_Y_L)?;
        let z = self.regs.read_i16_le(reg::OUT_Z_L)?;
        Ok(Axes::new(x, y, z))
    }

    /// Angular rate in degrees per second at the configured scale.
    pub fn read_rate_dps(&mut self) -> DriverResult<[f32; 3]> {
        let axes = self.read_axes()?;
        Ok(axes.scaled(self.scale.sensitivity_mdps() / 1000.0))
    }

    /// Die temperature, uncalibrated: -1 digit per degree from an unknown offset.
    pub fn read_temperature_raw(&mut self) -> DriverResult<i8> {
        let raw = self.regs.read_register(reg::OUT_TEMP)?;
        Ok(i8::from_ne_bytes([raw]))
    }

    pub fn into_inner(self) -> R {
        self.regs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hkusbio_board::{BoardError, BoardResult};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    struct FakeRegs {
        file: [u8; 64],
        writes: Vec<(u8, u8)>,
    }

    impl Default for FakeRegs {
        fn default() -> Self {
            Self {
                file: [0; 64],
                writes: Vec::new(),
            }
        }
    }

    impl RegisterAccess for FakeRegs {
        fn read_register(&mut self, register: u8) -> BoardResult<u8> {
            self.file
                .get(usize::from(register))
                .copied()
                .ok_or(BoardError::Disconnected)
        }

        fn write_register(&mut self, register: u8, value: u8) -> BoardResult<()> {
            self.writes.push((register, value));
            Ok(())
        }
    }

    fn regs_with_identity(id: u8) -> FakeRegs {
        let mut regs = FakeRegs::default();
        regs.file[usize::from(reg::WHO_AM_I)] = id;
        regs
    }

    #[test]
    fn test_ctrl_reg4_values() {
        assert_eq!(FullScale::Dps250.ctrl_reg4(), 0b1000_0000);
        assert_eq!(FullScale::Dps500.ctrl_reg4(), 0b1001_0000);
        assert_eq!(FullScale::Dps2000.ctrl_reg4(), 0b1011_0000);
    }

    #[test]
    fn test_full_scale_from_dps() {
        for scale in FullScale::ALL {
            assert_eq!(FullScale::from_dps(scale.dps()), Some(scale));
        }
        assert_eq!(FullScale::from_dps(1000), None);
    }

    #[test]
    fn test_setup_l3g4200d_sequence() -> TestResult {
        let mut gyro = L3gGyro::new(regs_with_identity(0xD3), GyroChip::L3g4200d);
        gyro.setup(FullScale::Dps2000)?;
        let regs = gyro.into_inner();
        assert_eq!(
            regs.writes,
            vec![(0x20, 0x0F), (0x21, 0x00), (0x22, 0x08), (0x23, 0xB0), (0x24, 0x00)]
        );
        Ok(())
    }

    #[test]
    fn test_setup_l3gd20_uses_fast_odr() -> TestResult {
        let mut gyro = L3gGyro::new(regs_with_identity(0xD4), GyroChip::L3gd20);
        gyro.setup(FullScale::Dps250)?;
        assert_eq!(gyro.scale(), FullScale::Dps250);
        let regs = gyro.into_inner();
        assert_eq!(regs.writes.first(), Some(&(0x20, 0x7F)));
        assert_eq!(regs.writes.get(3), Some(&(0x23, 0x80)));
        Ok(())
    }

    #[test]
    fn test_identity_mismatch_is_typed_and_writes_nothing() {
        let mut gyro = L3gGyro::new(regs_with_identity(0xD3), GyroChip::L3gd20);
        let result = gyro.setup(FullScale::Dps500);
        assert!(matches!(
            result,
            Err(DriverError::IdentityMismatch {
                chip: "L3GD20",
                expected: 0xD4,
                actual: 0xD3
            })
        ));
        assert!(gyro.into_inner().writes.is_empty());
    }

    #[test]
    fn test_read_axes_and_rate() -> TestResult {
        let mut regs = regs_with_identity(0xD3);
        regs.file[0x28..0x2E].copy_from_slice(&[0x01, 0x00, 0xFF, 0xFF, 0x00, 0x80]);
        regs.file[usize::from(reg::OUT_TEMP)] = 0xE7;
        let mut gyro = L3gGyro::new(regs, GyroChip::L3g4200d);
        gyro.setup(FullScale::Dps250)?;

        assert_eq!(gyro.read_axes()?, Axes::new(1, -1, i16::MIN));
        let [x, y, _] = gyro.read_rate_dps()?;
        assert!((x - 0.00875).abs() < 1e-6);
        assert!((y + 0.00875).abs() < 1e-6);
        assert_eq!(gyro.read_temperature_raw()?, -25);
        Ok(())
    }
}
