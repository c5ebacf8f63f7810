//! SPI register access over the board's SPI engine.
//!
//! Register reads set bit 7 of the address byte and clock a dummy byte to
//! shift the value in; writes clear bit 7. Each chip-select transition is
//! followed by `BoardConfig::cs_settle_ms`.

use hkusbio_protocol::{ChipSelect, SpiBaud, SpiMode, SpiSample};
use tracing::debug;

use crate::board::Board;
use crate::error::BoardResult;
use crate::register::RegisterAccess;
use crate::transport::Transport;

const READ_FLAG: u8 = 0x80;
const DUMMY: u8 = 0x00;

/// The slave wired to the board's SPI chip-select line.
pub struct SpiDevice<'a, T: Transport> {
    board: &'a mut Board<T>,
}

impl<'a, T: Transport> SpiDevice<'a, T> {
    /// Use the SPI engine as already configured.
    pub fn new(board: &'a mut Board<T>) -> Self {
        Self { board }
    }

    /// Configure the SPI engine, then wait for it to settle.
    pub fn init(
        board: &'a mut Board<T>,
        mode: SpiMode,
        baud: SpiBaud,
        sample: SpiSample,
    ) -> BoardResult<Self> {
        debug!(?mode, ?baud, ?sample, "spi init");
        board.spi_init(mode, baud, sample)?;
        let settle = board.config().spi_init_settle();
        board.delay(settle);
        Ok(Self { board })
    }

    pub fn board(&mut self) -> &mut Board<T> {
        self.board
    }

    fn select(&mut self, select: ChipSelect) -> BoardResult<()> {
        self.board.spi_chip_select(select)?;
        let settle = self.board.config().cs_settle();
        self.board.delay(settle);
        Ok(())
    }

    /// Run `transaction` with chip select asserted.
    ///
    /// Chip select is released even when the transaction fails; the
    /// transaction's error wins over a failure to release.
    fn selected<R>(
        &mut self,
        transaction: impl FnOnce(&mut Board<T>) -> BoardResult<R>,
    ) -> BoardResult<R> {
        self.select(ChipSelect::Enable)?;
        match transaction(&mut *self.board) {
            Ok(value) => {
                self.select(ChipSelect::Disable)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(release_err) = self.select(ChipSelect::Disable) {
                    debug!(%release_err, "spi chip select release after failed transfer");
                }
                Err(err)
            }
        }
    }
}

impl<T: Transport> RegisterAccess for SpiDevice<'_, T> {
    fn read_register(&mut self, register: u8) -> BoardResult<u8> {
        let value = self.selected(|board| {
            board.spi_transfer(register | READ_FLAG)?;
            board.spi_transfer(DUMMY)
        })?;
        debug!(register, value, "spi read register");
        Ok(value)
    }

    fn write_register(&mut self, register: u8, value: u8) -> BoardResult<()> {
        debug!(register, value, "spi write register");
        self.selected(|board| {
            board.spi_transfer(register & !READ_FLAG)?;
            board.spi_transfer(value)?;
            Ok(())
        })
    }
}
