//! Host-side access to the HKUSBIO PIC18 USB I/O board.
//!
//! Layers, leaf first:
//! - [`Transport`]: raw frame send/receive ([`UsbTransport`] over rusb, or
//!   `SimulatedBoard` for tests, behind the `sim` feature)
//! - [`Board`]: one method per firmware primitive (GPIO, ADC, UART, SFR, raw I2C/SPI)
//! - [`I2cBus`], [`I2cDevice`] and [`SpiDevice`]: register-level bus protocols
//!   with bounded acknowledgement polling
//!
//! All access is single-threaded and blocking. A [`Board`] owns its transport
//! exclusively and is consumed by [`Board::close`].

#![deny(static_mut_refs)]

pub mod board;
pub mod config;
pub mod error;
pub mod i2c;
pub mod register;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod spi;
pub mod transport;
pub mod usb;

pub use board::Board;
pub use config::{BoardConfig, BoardConfigBuilder};
pub use error::{BoardError, BoardResult};
pub use i2c::{I2cBus, I2cDevice};
pub use register::RegisterAccess;
#[cfg(any(test, feature = "sim"))]
pub use sim::{SimI2cSlave, SimulatedBoard};
pub use spi::SpiDevice;
pub use transport::Transport;
pub use usb::{UsbDeviceInfo, UsbTransport};

/// Commonly used types for driver code.
pub mod prelude {
    pub use crate::{
        Board, BoardConfig, BoardError, BoardResult, I2cBus, I2cDevice, RegisterAccess,
        SpiDevice, Transport,
    };
    pub use hkusbio_protocol::{
        AdcChannel, Axes, ChipSelect, Direction, GpioPin, I2cAck, I2cStart, Port, Sfr, SfrBit,
        SpiBaud, SpiMode, SpiSample,
    };
}
