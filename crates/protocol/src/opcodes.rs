//! Firmware opcode table.
//!
//! Every command frame starts with one of these bytes. The values are fixed
//! by the board firmware and must match exactly.

use crate::error::ProtocolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    AdcRa0,
    AdcRa1,
    I2cInit,
    I2cIdle,
    I2cStart,
    I2cStop,
    I2cSlaveAck,
    I2cWrite,
    I2cMasterAck,
    I2cRead,
    I2cDataReady,
    SpiInit,
    SpiTransfer,
    SpiChipSelect,
    ToggleLed,
    ReadSwitch,
    GpioRead,
    GpioWrite,
    GpioDirection,
    RomVersion,
    UartPutString,
    UartHasChar,
    UartGetChar,
    UartPutChar,
    SfrGetRegister,
    SfrSetRegister,
    SfrGetBit,
    SfrSetBit,
}

impl Opcode {
    pub const ALL: [Opcode; 28] = [
        Self::AdcRa0,
        Self::AdcRa1,
        Self::I2cInit,
        Self::I2cIdle,
        Self::I2cStart,
        Self::I2cStop,
        Self::I2cSlaveAck,
        Self::I2cWrite,
        Self::I2cMasterAck,
        Self::I2cRead,
        Self::I2cDataReady,
        Self::SpiInit,
        Self::SpiTransfer,
        Self::SpiChipSelect,
        Self::ToggleLed,
        Self::ReadSwitch,
        Self::GpioRead,
        Self::GpioWrite,
        Self::GpioDirection,
        Self::RomVersion,
        Self::UartPutString,
        Self::UartHasChar,
        Self::UartGetChar,
        Self::UartPutChar,
        Self::SfrGetRegister,
        Self::SfrSetRegister,
        Self::SfrGetBit,
        Self::SfrSetBit,
    ];

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0x37 => Some(Self::AdcRa0),
            0x38 => Some(Self::AdcRa1),
            0x40 => Some(Self::I2cInit),
            0x41 => Some(Self::I2cIdle),
            0x42 => Some(Self::I2cStart),
            0x43 => Some(Self::I2cStop),
            0x44 => Some(Self::I2cSlaveAck),
            0x45 => Some(Self::I2cWrite),
            0x46 => Some(Self::I2cMasterAck),
            0x47 => Some(Self::I2cRead),
            0x48 => Some(Self::I2cDataReady),
            0x50 => Some(Self::SpiInit),
            0x51 => Some(Self::SpiTransfer),
            0x52 => Some(Self::SpiChipSelect),
            0x80 => Some(Self::ToggleLed),
            0x81 => Some(Self::ReadSwitch),
            0x82 => Some(Self::GpioRead),
            0x83 => Some(Self::GpioWrite),
            0x84 => Some(Self::GpioDirection),
            0x85 => Some(Self::RomVersion),
            0x86 => Some(Self::UartPutString),
            0x87 => Some(Self::UartHasChar),
            0x88 => Some(Self::UartGetChar),
            0x89 => Some(Self::UartPutChar),
            0x98 => Some(Self::SfrGetRegister),
            0x99 => Some(Self::SfrSetRegister),
            0x9A => Some(Self::SfrGetBit),
            0x9B => Some(Self::SfrSetBit),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::AdcRa0 => 0x37,
            Self::AdcRa1 => 0x38,
            Self::I2cInit => 0x40,
            Self::I2cIdle => 0x41,
            Self::I2cStart => 0x42,
            Self::I2cStop => 0x43,
            Self::I2cSlaveAck => 0x44,
            Self::I2cWrite => 0x45,
            Self::I2cMasterAck => 0x46,
            Self::I2cRead => 0x47,
            Self::I2cDataReady => 0x48,
            Self::SpiInit => 0x50,
            Self::SpiTransfer => 0x51,
            Self::SpiChipSelect => 0x52,
            Self::ToggleLed => 0x80,
            Self::ReadSwitch => 0x81,
            Self::GpioRead => 0x82,
            Self::GpioWrite => 0x83,
            Self::GpioDirection => 0x84,
            Self::RomVersion => 0x85,
            Self::UartPutString => 0x86,
            Self::UartHasChar => 0x87,
            Self::UartGetChar => 0x88,
            Self::UartPutChar => 0x89,
            Self::SfrGetRegister => 0x98,
            Self::SfrSetRegister => 0x99,
            Self::SfrGetBit => 0x9A,
            Self::SfrSetBit => 0x9B,
        }
    }

    /// Whether the firmware answers this opcode with a 64-byte reply.
    ///
    /// Reading after an opcode that has no reply would block until the
    /// transfer timeout expires.
    pub fn expects_reply(self) -> bool {
        matches!(
            self,
            Self::AdcRa0
                | Self::AdcRa1
                | Self::I2cSlaveAck
                | Self::I2cRead
                | Self::I2cDataReady
                | Self::SpiTransfer
                | Self::ReadSwitch
                | Self::GpioRead
                | Self::RomVersion
                | Self::UartHasChar
                | Self::UartGetChar
                | Self::SfrGetRegister
                | Self::SfrSetRegister
                | Self::SfrGetBit
                | Self::SfrSetBit
        )
    }
}

impl TryFrom<u8> for Opcode {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(ProtocolError::UnknownOpcode(value))
    }
}
