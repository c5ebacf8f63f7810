//! 5-bit DAC on RA2 (DACOUT).
//!
//! VOUT = (VSRC+ - VSRC-) * level / 32 + VSRC-, with VSRC+ = VDD and
//! VSRC- = VSS.

use hkusbio_board::{Board, Transport};
use hkusbio_protocol::{Port, Sfr, SfrBit};
use tracing::debug;

use crate::error::{DriverError, DriverResult};
use crate::peripherals::pin::SfrPin;

pub const MAX_LEVEL: u8 = 0x1F;

const DACOUT: SfrPin = SfrPin::fixed(Port::A, 2);
/// ADCON0 with the channel select bits on the DAC output.
const ADCON0_DAC_CHANNEL: u8 = 0b0111_1000;

pub struct Dac<'a, T: Transport> {
    board: &'a mut Board<T>,
}

impl<'a, T: Transport> Dac<'a, T> {
    /// Route the DAC to RA2 at `level` and enable it.
    pub fn init(board: &'a mut Board<T>, level: u8) -> DriverResult<Self> {
        check_level(level)?;
        debug!(level, "dac init");
        DACOUT.set_analog(board, true)?;
        board.sfr_set_register(Sfr::Adcon0, ADCON0_DAC_CHANNEL)?;
        // fixed voltage reference off
        board.sfr_set_register(Sfr::Vrefcon0, 0x00)?;
        board.sfr_write_flag(SfrBit::Vrefcon1Dacen, false)?;
        board.sfr_write_flag(SfrBit::Vrefcon1Daclps, true)?;
        board.sfr_write_flag(SfrBit::Vrefcon1Dacoe, true)?;
        // positive source VDD
        board.sfr_write_flag(SfrBit::Vrefcon1Dacpss1, false)?;
        board.sfr_write_flag(SfrBit::Vrefcon1Dacpss0, false)?;
        board.sfr_set_register(Sfr::Vrefcon2, level)?;
        board.sfr_write_flag(SfrBit::Vrefcon1Dacen, true)?;
        Ok(Self { board })
    }

    pub fn set_level(&mut self, level: u8) -> DriverResult<()> {
        check_level(level)?;
        self.board.sfr_set_register(Sfr::Vrefcon2, level)?;
        Ok(())
    }

    /// Disable the DAC and release RA2.
    pub fn stop(self) -> DriverResult<()> {
        self.board.sfr_write_flag(SfrBit::Vrefcon1Dacen, false)?;
        DACOUT.set_analog(self.board, false)?;
        self.board.sfr_write_flag(SfrBit::Vrefcon1Dacoe, false)?;
        Ok(())
    }
}

fn check_level(level: u8) -> DriverResult<()> {
    if level > MAX_LEVEL {
        return Err(DriverError::invalid_argument(format!(
            "DAC level must be 0..={MAX_LEVEL:#04x}, got {level:#04x}"
        )));
    }
    Ok(())
}

/// Nominal output voltage for `level` with the given supply.
pub fn output_voltage(level: u8, vdd: f32) -> f32 {
    vdd * f32::from(level.min(MAX_LEVEL)) / 32.0
}
