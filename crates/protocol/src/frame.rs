//! Command frame encoding.
//!
//! Frame layouts (byte 0 is always the opcode):
//! - Short frames: opcode plus 0-2 parameter bytes (LED, switch, GPIO, ADC,
//!   UART, I2C init/idle/stop/read).
//! - Register-style frames, 14 bytes: SFR register address at offset 10,
//!   value or bit index at offset 11, bit value at offset 12. I2C start,
//!   write and master-ack carry their parameter at offset 1 of a 14-byte frame.
//! - SPI frames, 5 bytes: parameters at offsets 1-3.
//! - UART string: opcode, payload bytes, NUL terminator.

use std::fmt;

use crate::error::{ProtocolError, ProtocolResult};
use crate::ids::REPLY_LEN;
use crate::opcodes::Opcode;
use crate::types::{
    AdcChannel, ChipSelect, Direction, GpioPin, I2cAck, I2cStart, SpiBaud, SpiMode, SpiSample,
};

/// Largest frame the firmware accepts (one full-speed packet).
pub const MAX_FRAME_LEN: usize = REPLY_LEN;
pub const REGISTER_FRAME_LEN: usize = 14;
pub const SPI_FRAME_LEN: usize = 5;

pub const SFR_ADDR_OFFSET: usize = 10;
pub const SFR_VALUE_OFFSET: usize = 11;
pub const SFR_BIT_VALUE_OFFSET: usize = 12;

/// Longest UART string: the frame also holds the opcode and the NUL terminator.
pub const MAX_UART_STRING_LEN: usize = MAX_FRAME_LEN - 2;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame {
    opcode: Opcode,
    buf: [u8; MAX_FRAME_LEN],
    len: usize,
}

impl CommandFrame {
    fn new(opcode: Opcode, len: usize) -> Self {
        let mut buf = [0u8; MAX_FRAME_LEN];
        buf[0] = opcode.to_u8();
        Self { opcode, buf, len }
    }

    fn with_param(mut self, offset: usize, value: u8) -> Self {
        if let Some(byte) = self.buf.get_mut(offset) {
            *byte = value;
        }
        self
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.get(..self.len).unwrap_or(&self.buf)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Frames always carry at least the opcode byte.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn expects_reply(&self) -> bool {
        self.opcode.expects_reply()
    }
}

impl fmt::Debug for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:02x?}", self.opcode, self.as_bytes())
    }
}

impl AsRef<[u8]> for CommandFrame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

fn check_bit(bit: u8) -> ProtocolResult<u8> {
    if bit > 7 {
        return Err(ProtocolError::InvalidBitIndex(bit));
    }
    Ok(bit)
}

pub fn build_toggle_led() -> CommandFrame {
    CommandFrame::new(Opcode::ToggleLed, 1)
}

pub fn build_read_switch() -> CommandFrame {
    CommandFrame::new(Opcode::ReadSwitch, 1)
}

pub fn build_rom_version() -> CommandFrame {
    CommandFrame::new(Opcode::RomVersion, 1)
}

pub fn build_gpio_direction(pin: GpioPin, direction: Direction) -> CommandFrame {
    CommandFrame::new(Opcode::GpioDirection, 3)
        .with_param(1, pin.to_u8())
        .with_param(2, direction.to_u8())
}

pub fn build_gpio_write(pin: GpioPin, high: bool) -> CommandFrame {
    CommandFrame::new(Opcode::GpioWrite, 3)
        .with_param(1, pin.to_u8())
        .with_param(2, u8::from(high))
}

pub fn build_gpio_read(pin: GpioPin) -> CommandFrame {
    CommandFrame::new(Opcode::GpioRead, 2).with_param(1, pin.to_u8())
}

pub fn build_adc_read(channel: AdcChannel) -> CommandFrame {
    match channel {
        AdcChannel::Ra0 => CommandFrame::new(Opcode::AdcRa0, 1),
        AdcChannel::Ra1 => CommandFrame::new(Opcode::AdcRa1, 1),
    }
}

pub fn build_uart_has_char() -> CommandFrame {
    CommandFrame::new(Opcode::UartHasChar, 1)
}

pub fn build_uart_get_char() -> CommandFrame {
    CommandFrame::new(Opcode::UartGetChar, 1)
}

pub fn build_uart_put_char(ch: u8) -> CommandFrame {
    CommandFrame::new(Opcode::UartPutChar, 2).with_param(1, ch)
}

/// Encodes a NUL-terminated UART string.
///
/// The firmware stops at the first NUL, so the payload itself must not
/// contain one.
pub fn build_uart_put_str(payload: &[u8]) -> ProtocolResult<CommandFrame> {
    if payload.len() > MAX_UART_STRING_LEN {
        return Err(ProtocolError::PayloadTooLong {
            max: MAX_UART_STRING_LEN,
            actual: payload.len(),
        });
    }
    if payload.contains(&0) {
        return Err(ProtocolError::InvalidValue {
            kind: "UART string byte",
            value: 0,
        });
    }

    let mut frame = CommandFrame::new(Opcode::UartPutString, payload.len() + 2);
    if let Some(dst) = frame.buf.get_mut(1..=payload.len()) {
        dst.copy_from_slice(payload);
    }
    Ok(frame)
}

pub fn build_sfr_get_register(register: u8) -> CommandFrame {
    CommandFrame::new(Opcode::SfrGetRegister, REGISTER_FRAME_LEN)
        .with_param(SFR_ADDR_OFFSET, register)
}

pub fn build_sfr_set_register(register: u8, value: u8) -> CommandFrame {
    CommandFrame::new(Opcode::SfrSetRegister, REGISTER_FRAME_LEN)
        .with_param(SFR_ADDR_OFFSET, register)
        .with_param(SFR_VALUE_OFFSET, value)
}

pub fn build_sfr_get_bit(register: u8, bit: u8) -> ProtocolResult<CommandFrame> {
    Ok(
        CommandFrame::new(Opcode::SfrGetBit, REGISTER_FRAME_LEN)
            .with_param(SFR_ADDR_OFFSET, register)
            .with_param(SFR_VALUE_OFFSET, check_bit(bit)?),
    )
}

pub fn build_sfr_set_bit(register: u8, bit: u8, value: bool) -> ProtocolResult<CommandFrame> {
    Ok(
        CommandFrame::new(Opcode::SfrSetBit, REGISTER_FRAME_LEN)
            .with_param(SFR_ADDR_OFFSET, register)
            .with_param(SFR_VALUE_OFFSET, check_bit(bit)?)
            .with_param(SFR_BIT_VALUE_OFFSET, u8::from(value)),
    )
}

pub fn build_i2c_init() -> CommandFrame {
    CommandFrame::new(Opcode::I2cInit, 1)
}

pub fn build_i2c_idle() -> CommandFrame {
    CommandFrame::new(Opcode::I2cIdle, 1)
}

pub fn build_i2c_start(kind: I2cStart) -> CommandFrame {
    CommandFrame::new(Opcode::I2cStart, REGISTER_FRAME_LEN).with_param(1, kind.to_u8())
}

pub fn build_i2c_stop() -> CommandFrame {
    CommandFrame::new(Opcode::I2cStop, 1)
}

pub fn build_i2c_slave_ack() -> CommandFrame {
    CommandFrame::new(Opcode::I2cSlaveAck, 1)
}

pub fn build_i2c_write(byte: u8) -> CommandFrame {
    CommandFrame::new(Opcode::I2cWrite, REGISTER_FRAME_LEN).with_param(1, byte)
}

pub fn build_i2c_master_ack(ack: I2cAck) -> CommandFrame {
    CommandFrame::new(Opcode::I2cMasterAck, REGISTER_FRAME_LEN).with_param(1, ack.to_u8())
}

pub fn build_i2c_read() -> CommandFrame {
    CommandFrame::new(Opcode::I2cRead, 1)
}

pub fn build_i2c_data_ready() -> CommandFrame {
    CommandFrame::new(Opcode::I2cDataReady, 1)
}

pub fn build_spi_init(mode: SpiMode, baud: SpiBaud, sample: SpiSample) -> CommandFrame {
    CommandFrame::new(Opcode::SpiInit, SPI_FRAME_LEN)
        .with_param(1, mode.to_u8())
        .with_param(2, baud.to_u8())
        .with_param(3, sample.to_u8())
}

pub fn build_spi_transfer(byte: u8) -> CommandFrame {
    CommandFrame::new(Opcode::SpiTransfer, SPI_FRAME_LEN).with_param(1, byte)
}

pub fn build_spi_chip_select(select: ChipSelect) -> CommandFrame {
    CommandFrame::new(Opcode::SpiChipSelect, SPI_FRAME_LEN).with_param(1, select.to_u8())
}
