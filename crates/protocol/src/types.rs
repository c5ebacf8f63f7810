//! Board-level parameter values carried inside command frames.

use crate::error::{ProtocolError, ProtocolResult};

/// The four firmware-managed GPIO pins on PORTD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpioPin {
    Rd4,
    Rd5,
    Rd6,
    Rd7,
}

impl GpioPin {
    pub const ALL: [GpioPin; 4] = [Self::Rd4, Self::Rd5, Self::Rd6, Self::Rd7];

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Rd4 => 1,
            Self::Rd5 => 2,
            Self::Rd6 => 3,
            Self::Rd7 => 4,
        }
    }

    pub fn from_u8(val: u8) -> ProtocolResult<Self> {
        match val {
            1 => Ok(Self::Rd4),
            2 => Ok(Self::Rd5),
            3 => Ok(Self::Rd6),
            4 => Ok(Self::Rd7),
            _ => Err(ProtocolError::InvalidValue {
                kind: "GPIO pin",
                value: val,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Output,
    Input,
}

impl Direction {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Output => 0,
            Self::Input => 1,
        }
    }

    /// Value of the matching TRIS bit (1 = input).
    pub fn tris_bit(self) -> bool {
        matches!(self, Self::Input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdcChannel {
    Ra0,
    Ra1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpiMode {
    Mode0,
    Mode1,
    Mode2,
    #[default]
    Mode3,
}

impl SpiMode {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Mode0 => 0,
            Self::Mode1 => 1,
            Self::Mode2 => 2,
            Self::Mode3 => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpiBaud {
    /// 750 kHz
    #[default]
    Low,
    /// 3 MHz
    Medium,
    /// 12 MHz
    High,
}

impl SpiBaud {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub fn hz(self) -> u32 {
        match self {
            Self::Low => 750_000,
            Self::Medium => 3_000_000,
            Self::High => 12_000_000,
        }
    }
}

/// Input sample point relative to the data output time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpiSample {
    Middle,
    #[default]
    End,
}

impl SpiSample {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Middle => 0,
            Self::End => 1,
        }
    }
}

/// Chip select is active low: `Enable` drives the line low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChipSelect {
    Enable,
    Disable,
}

impl ChipSelect {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Enable => 0,
            Self::Disable => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum I2cStart {
    Start,
    RepeatedStart,
}

impl I2cStart {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Start => 0,
            Self::RepeatedStart => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum I2cAck {
    Ack,
    Nack,
}

impl I2cAck {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Ack => 0,
            Self::Nack => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum I2cDirection {
    Write,
    Read,
}

impl I2cDirection {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Write => 0,
            Self::Read => 1,
        }
    }
}

/// First byte after a start condition: 7-bit address shifted left, R/W in bit 0.
pub fn i2c_address_byte(address: u8, direction: I2cDirection) -> u8 {
    (address << 1) | direction.to_u8()
}
