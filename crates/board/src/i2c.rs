//! I2C register access over the board's I2C engine.
//!
//! Every byte the host writes is followed by slave-acknowledge polling.
//! Polling is bounded by `BoardConfig::ack_max_polls`; an unresponsive
//! slave yields `AckTimeout` instead of hanging the host.

use hkusbio_protocol::{I2cAck, I2cDirection, I2cStart, i2c_address_byte};
use tracing::{debug, trace};

use crate::board::Board;
use crate::error::{BoardError, BoardResult};
use crate::register::RegisterAccess;
use crate::transport::Transport;

/// Register-level I2C master.
pub trait I2cBus {
    /// Write one register of the slave at 7-bit `address`.
    fn write_register(&mut self, address: u8, register: u8, value: u8) -> BoardResult<()>;

    /// Read one register of the slave at 7-bit `address`.
    fn read_register(&mut self, address: u8, register: u8) -> BoardResult<u8>;

    /// Read `buf.len()` consecutive registers starting at `register`.
    ///
    /// The slave must auto-increment its register pointer.
    fn read_registers(&mut self, address: u8, register: u8, buf: &mut [u8]) -> BoardResult<()>;
}

impl<B: I2cBus + ?Sized> I2cBus for &mut B {
    fn write_register(&mut self, address: u8, register: u8, value: u8) -> BoardResult<()> {
        (**self).write_register(address, register, value)
    }

    fn read_register(&mut self, address: u8, register: u8) -> BoardResult<u8> {
        (**self).read_register(address, register)
    }

    fn read_registers(&mut self, address: u8, register: u8, buf: &mut [u8]) -> BoardResult<()> {
        (**self).read_registers(address, register, buf)
    }
}

impl<T: Transport> Board<T> {
    /// Poll until the addressed slave acknowledges the last byte.
    ///
    /// # Errors
    ///
    /// `AckTimeout` after `ack_max_polls` unanswered polls.
    pub fn wait_for_slave_ack(&mut self, address: u8) -> BoardResult<()> {
        let max_polls = self.config().ack_max_polls;
        let interval = self.config().ack_poll_interval();
        for poll in 1..=max_polls {
            if self.i2c_slave_ack()? {
                trace!(address, poll, "slave ack");
                return Ok(());
            }
            if poll < max_polls {
                self.delay(interval);
            }
        }
        Err(BoardError::AckTimeout {
            address,
            polls: max_polls,
        })
    }

    fn write_acked(&mut self, address: u8, byte: u8) -> BoardResult<()> {
        self.i2c_write(byte)?;
        self.wait_for_slave_ack(address)
    }

    /// Address the slave for writing and select `register`.
    fn select_register(&mut self, address: u8, register: u8) -> BoardResult<()> {
        self.i2c_start(I2cStart::Start)?;
        self.write_acked(address, i2c_address_byte(address, I2cDirection::Write))?;
        self.write_acked(address, register)
    }

    /// Release the bus after a failed transaction, keeping the original error.
    fn abort_transaction<R>(&mut self, err: BoardError) -> BoardResult<R> {
        if let Err(stop_err) = self.i2c_stop() {
            debug!(%stop_err, "i2c stop after failed transaction");
        }
        Err(err)
    }

    fn try_write_register(&mut self, address: u8, register: u8, value: u8) -> BoardResult<()> {
        self.select_register(address, register)?;
        self.write_acked(address, value)?;
        self.i2c_stop()
    }

    fn try_read_registers(&mut self, address: u8, register: u8, buf: &mut [u8]) -> BoardResult<()> {
        self.select_register(address, register)?;
        self.i2c_start(I2cStart::RepeatedStart)?;
        self.write_acked(address, i2c_address_byte(address, I2cDirection::Read))?;
        let last = buf.len().saturating_sub(1);
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = self.i2c_read()?;
            let ack = if i == last { I2cAck::Nack } else { I2cAck::Ack };
            self.i2c_master_ack(ack)?;
        }
        self.i2c_stop()
    }
}

impl<T: Transport> I2cBus for Board<T> {
    fn write_register(&mut self, address: u8, register: u8, value: u8) -> BoardResult<()> {
        debug!(address, register, value, "i2c write register");
        match self.try_write_register(address, register, value) {
            Ok(()) => Ok(()),
            Err(err) => self.abort_transaction(err),
        }
    }

    fn read_register(&mut self, address: u8, register: u8) -> BoardResult<u8> {
        let mut buf = [0u8; 1];
        self.read_registers(address, register, &mut buf)?;
        Ok(buf[0])
    }

    fn read_registers(&mut self, address: u8, register: u8, buf: &mut [u8]) -> BoardResult<()> {
        if buf.is_empty() {
            return Ok(());
        }
        debug!(address, register, len = buf.len(), "i2c read registers");
        match self.try_read_registers(address, register, buf) {
            Ok(()) => Ok(()),
            Err(err) => self.abort_transaction(err),
        }
    }
}

/// A slave at a fixed 7-bit address on an [`I2cBus`].
pub struct I2cDevice<B> {
    bus: B,
    address: u8,
}

impl<B: I2cBus> I2cDevice<B> {
    pub fn new(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }
}

impl<B: I2cBus> RegisterAccess for I2cDevice<B> {
    fn read_register(&mut self, register: u8) -> BoardResult<u8> {
        self.bus.read_register(self.address, register)
    }

    fn write_register(&mut self, register: u8, value: u8) -> BoardResult<()> {
        self.bus.write_register(self.address, register, value)
    }
}
