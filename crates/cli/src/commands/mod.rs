//! Command implementations for the hkusbio CLI

pub mod board;
pub mod peripherals;
pub mod sensors;

use std::thread::sleep;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand, ValueEnum};
use hkusbio_board::{Board, BoardConfig, UsbTransport};
use hkusbio_drivers::{Color, FullScale, GyroChip};
use hkusbio_protocol::{AdcChannel, Direction, GpioPin, Sfr};

/// Settings shared by every command that talks to a board.
pub struct Session {
    pub json: bool,
    pub device: usize,
    pub reset: bool,
    pub config: BoardConfig,
}

impl Session {
    pub fn open(&self) -> Result<Board<UsbTransport>> {
        Board::open_nth(self.device, self.config.clone())
            .with_context(|| format!("opening HKUSBIO board #{}", self.device))
    }

    /// Release the board, resetting it first when `--reset` was given.
    /// Peripherals configured by the command keep running otherwise.
    pub fn finish(&self, board: Board<UsbTransport>) -> Result<()> {
        if self.reset {
            board.close()?;
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampling {
    /// Number of samples to take (0 runs until interrupted)
    #[arg(long, default_value_t = 1)]
    pub samples: u32,

    /// Delay between samples in milliseconds
    #[arg(long, default_value_t = 500)]
    pub interval_ms: u64,
}

impl Sampling {
    /// Run `sample` the requested number of times, sleeping in between.
    pub fn run(&self, mut sample: impl FnMut(u32) -> Result<()>) -> Result<()> {
        let interval = Duration::from_millis(self.interval_ms);
        let mut n = 0u32;
        loop {
            sample(n)?;
            n = n.saturating_add(1);
            if self.samples != 0 && n >= self.samples {
                return Ok(());
            }
            sleep(interval);
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum GpioCommands {
    /// Read the level of a pin
    Read {
        #[arg(value_enum)]
        pin: PinArg,
    },

    /// Drive a pin high or low
    Write {
        #[arg(value_enum)]
        pin: PinArg,
        #[arg(value_enum)]
        level: LevelArg,
    },

    /// Set a pin as input or output
    Dir {
        #[arg(value_enum)]
        pin: PinArg,
        #[arg(value_enum)]
        direction: DirectionArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum UartCommands {
    /// Send one character
    Put { ch: char },

    /// Send a string
    Puts { text: String },

    /// Read one character if one is waiting
    Get,
}

#[derive(Subcommand, Debug)]
pub enum SfrCommands {
    /// Read a register
    Get {
        /// Register name (e.g. PORTD) or address (e.g. 0x83)
        #[arg(value_parser = parse_register)]
        register: u8,
    },

    /// Write a register
    Set {
        #[arg(value_parser = parse_register)]
        register: u8,
        #[arg(value_parser = parse_byte)]
        value: u8,
    },

    /// Read one bit of a register
    GetBit {
        #[arg(value_parser = parse_register)]
        register: u8,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=7))]
        bit: u8,
    },

    /// Write one bit of a register
    SetBit {
        #[arg(value_parser = parse_register)]
        register: u8,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=7))]
        bit: u8,
        #[arg(value_enum)]
        level: LevelArg,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinArg {
    Rd4,
    Rd5,
    Rd6,
    Rd7,
}

impl From<PinArg> for GpioPin {
    fn from(pin: PinArg) -> Self {
        match pin {
            PinArg::Rd4 => Self::Rd4,
            PinArg::Rd5 => Self::Rd5,
            PinArg::Rd6 => Self::Rd6,
            PinArg::Rd7 => Self::Rd7,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelArg {
    #[value(alias = "1")]
    High,
    #[value(alias = "0")]
    Low,
}

impl LevelArg {
    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionArg {
    In,
    Out,
}

impl From<DirectionArg> for Direction {
    fn from(direction: DirectionArg) -> Self {
        match direction {
            DirectionArg::In => Self::Input,
            DirectionArg::Out => Self::Output,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcArg {
    #[value(name = "0", alias = "ra0")]
    Ra0,
    #[value(name = "1", alias = "ra1")]
    Ra1,
}

impl From<AdcArg> for AdcChannel {
    fn from(channel: AdcArg) -> Self {
        match channel {
            AdcArg::Ra0 => Self::Ra0,
            AdcArg::Ra1 => Self::Ra1,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyroArg {
    /// L3G4200D on the I2C bus at 0x69
    #[value(name = "l3g4200d-i2c")]
    L3g4200dI2c,
    /// L3G4200D on the SPI bus
    #[value(name = "l3g4200d-spi")]
    L3g4200dSpi,
    /// L3GD20 on the SPI bus
    #[value(name = "l3gd20")]
    L3gd20,
}

impl GyroArg {
    pub fn chip(self) -> GyroChip {
        match self {
            Self::L3g4200dI2c | Self::L3g4200dSpi => GyroChip::L3g4200d,
            Self::L3gd20 => GyroChip::L3gd20,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorArg {
    Off,
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
}

impl From<ColorArg> for Color {
    fn from(color: ColorArg) -> Self {
        match color {
            ColorArg::Off => Self::Off,
            ColorArg::Red => Self::Red,
            ColorArg::Green => Self::Green,
            ColorArg::Blue => Self::Blue,
            ColorArg::Yellow => Self::Yellow,
            ColorArg::Cyan => Self::Cyan,
            ColorArg::Magenta => Self::Magenta,
            ColorArg::White => Self::White,
        }
    }
}

/// Parse a byte written in decimal, `0x` hex or `0b` binary.
pub fn parse_byte(text: &str) -> Result<u8, String> {
    let text = text.trim();
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16)
    } else if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        u8::from_str_radix(bin, 2)
    } else {
        text.parse()
    };
    parsed.map_err(|e| format!("'{text}' is not a byte value: {e}"))
}

/// Parse a register given by name (`TRISD`) or address (`0x95`).
pub fn parse_register(text: &str) -> Result<u8, String> {
    match Sfr::from_name(text) {
        Ok(sfr) => Ok(sfr.address()),
        Err(name_err) => parse_byte(text).map_err(|_| name_err.to_string()),
    }
}

/// Parse a single hex digit for the seven-segment display.
pub fn parse_hex_digit(text: &str) -> Result<u8, String> {
    let digit = text.strip_prefix("0x").unwrap_or(text);
    match u8::from_str_radix(digit, 16) {
        Ok(value) if value <= 0xF => Ok(value),
        _ => Err(format!("'{text}' is not a hex digit 0-F")),
    }
}

pub fn parse_scale(text: &str) -> Result<FullScale, String> {
    text.parse::<u16>()
        .ok()
        .and_then(FullScale::from_dps)
        .ok_or_else(|| format!("'{text}' is not one of 250, 500, 2000"))
}
