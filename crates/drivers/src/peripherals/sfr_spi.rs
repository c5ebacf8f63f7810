//! SPI master driven directly through the MSSP1 registers.
//!
//! This bypasses the firmware SPI commands: RC7 is SDO, RB0 SDI, RB1 SCK
//! and RA5 a software chip select. Mode 3 (CKP=1, CKE=0), Fosc/64
//! (750 kHz), input sampled at the end of the clock.

use hkusbio_board::{Board, BoardError, BoardResult, RegisterAccess, Transport};
use hkusbio_protocol::{Direction, Port, Sfr, SfrBit};
use tracing::{debug, trace};

use crate::error::DriverResult;
use crate::peripherals::pin::SfrPin;

const SDO: SfrPin = SfrPin::fixed(Port::C, 7);
const SDI: SfrPin = SfrPin::fixed(Port::B, 0);
const SCK: SfrPin = SfrPin::fixed(Port::B, 1);
const CHIP_SELECT: SfrPin = SfrPin::fixed(Port::A, 5);

/// SSP1CON1 with CKP set and the port disabled.
const SSP1CON1_MODE3: u8 = 0x10;
/// SSPM1 in SSP1CON1: master, Fosc/64.
const SSPM_FOSC_64_BIT: u8 = 1;
const READ_FLAG: u8 = 0x80;
const DUMMY: u8 = 0x00;

pub struct SfrSpi<'a, T: Transport> {
    board: &'a mut Board<T>,
}

impl<'a, T: Transport> SfrSpi<'a, T> {
    /// Program MSSP1 as SPI master and leave the slave deselected.
    pub fn init(board: &'a mut Board<T>) -> DriverResult<Self> {
        debug!("sfr spi init");
        SCK.set_analog(board, false)?;
        SDI.set_analog(board, false)?;
        CHIP_SELECT.set_analog(board, false)?;
        board.sfr_set_register(Sfr::Ssp1Con1, 0x00)?;
        SDO.set_direction(board, Direction::Output)?;
        CHIP_SELECT.set_direction(board, Direction::Output)?;
        SDI.set_direction(board, Direction::Input)?;
        SCK.set_direction(board, Direction::Output)?;
        board.sfr_set_register(Sfr::Ssp1Stat, 0x00)?;
        board.sfr_set_register(Sfr::Ssp1Con1, SSP1CON1_MODE3)?;
        board.sfr_set_bit(Sfr::Ssp1Con1, SSPM_FOSC_64_BIT, true)?;
        board.sfr_write_flag(SfrBit::Ssp1StatSmp, true)?;
        CHIP_SELECT.write(board, true)?;
        board.sfr_write_flag(SfrBit::Ssp1Con1Sspen, true)?;
        Ok(Self { board })
    }

    /// Drive RA5 low to select the slave, then wait for it to settle.
    pub fn chip_select(&mut self, enable: bool) -> BoardResult<()> {
        self.board
            .sfr_set_bit(CHIP_SELECT.port().lat(), CHIP_SELECT.bit(), !enable)?;
        let settle = self.board.config().cs_settle();
        self.board.delay(settle);
        Ok(())
    }

    /// Clock one byte out and return the byte clocked in.
    pub fn transfer(&mut self, byte: u8) -> BoardResult<u8> {
        self.board.sfr_set_register(Sfr::Ssp1Buf, byte)?;
        self.wait_buffer_full()?;
        let received = self.board.sfr_get_register(Sfr::Ssp1Buf)?;
        trace!(sent = byte, received, "sfr spi transfer");
        Ok(received)
    }

    fn wait_buffer_full(&mut self) -> BoardResult<()> {
        let max_polls = self.board.config().busy_max_polls;
        let interval = self.board.config().busy_poll_interval();
        for poll in 1..=max_polls {
            if self.board.sfr_read_flag(SfrBit::Ssp1StatBf)? {
                return Ok(());
            }
            if poll < max_polls {
                self.board.delay(interval);
            }
        }
        Err(BoardError::BusyTimeout {
            flag: "SSP1STAT.BF",
            polls: max_polls,
        })
    }

    /// Deselect after a failed access, keeping the original error.
    fn deselect_after<V>(&mut self, result: BoardResult<V>) -> BoardResult<V> {
        match result {
            Ok(value) => {
                self.chip_select(false)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(cleanup) = self.chip_select(false) {
                    debug!(error = %cleanup, "chip select release failed");
                }
                Err(err)
            }
        }
    }
}

impl<T: Transport> RegisterAccess for SfrSpi<'_, T> {
    fn read_register(&mut self, register: u8) -> BoardResult<u8> {
        self.chip_select(true)?;
        let result = self
            .transfer(register | READ_FLAG)
            .and_then(|_| self.transfer(DUMMY));
        let value = self.deselect_after(result)?;
        debug!(register, value, "sfr spi read register");
        Ok(value)
    }

    fn write_register(&mut self, register: u8, value: u8) -> BoardResult<()> {
        debug!(register, value, "sfr spi write register");
        self.chip_select(true)?;
        let result = self
            .transfer(register & !READ_FLAG)
            .and_then(|_| self.transfer(value))
            .map(drop);
        self.deselect_after(result)
    }
}
