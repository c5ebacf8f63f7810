//! Wire protocol for the HKUSBIO PIC18F45K50 USB I/O board.
//!
//! This crate is intentionally I/O-free. It provides the opcode table, the
//! command-frame builders, reply decoding, the special function register map
//! and the small value decoders used by sensor drivers, so all of it can be
//! tested without hardware.
//!
//! # Key Features
//! - Opcode table matching the board firmware
//! - Fixed-layout command frames (register-style, SPI-style and short frames)
//! - 64-byte reply decoding (ADC, switch, UART, SFR values, ROM version)
//! - Static SFR register and bit tables
//! - Two's-complement sensor value reconstruction

#![deny(static_mut_refs)]

pub mod decode;
pub mod error;
pub mod frame;
pub mod ids;
pub mod opcodes;
pub mod registers;
pub mod reply;
pub mod types;

pub use decode::{Axes, combine_i16, combine_u16};
pub use error::{ProtocolError, ProtocolResult};
pub use frame::{
    CommandFrame, MAX_FRAME_LEN, REGISTER_FRAME_LEN, SFR_ADDR_OFFSET, SFR_BIT_VALUE_OFFSET,
    SFR_VALUE_OFFSET, SPI_FRAME_LEN, build_adc_read, build_gpio_direction, build_gpio_read,
    build_gpio_write, build_i2c_data_ready, build_i2c_idle, build_i2c_init,
    build_i2c_master_ack, build_i2c_read, build_i2c_slave_ack, build_i2c_start, build_i2c_stop,
    build_i2c_write, build_read_switch, build_rom_version, build_sfr_get_bit,
    build_sfr_get_register, build_sfr_set_bit, build_sfr_set_register, build_spi_chip_select,
    build_spi_init, build_spi_transfer, build_toggle_led, build_uart_get_char,
    build_uart_has_char, build_uart_put_char, build_uart_put_str,
};
pub use ids::{
    DEFAULT_USB_TIMEOUT_MS, ENDPOINT_IN, ENDPOINT_OUT, HKUSBIO_PRODUCT_ID, HKUSBIO_VENDOR_ID,
    INTERFACE, MODULE_VERSION, REPLY_LEN, is_hkusbio,
};
pub use opcodes::Opcode;
pub use registers::{Port, Sfr, SfrBit};
pub use reply::Reply;
pub use types::{
    AdcChannel, ChipSelect, Direction, GpioPin, I2cAck, I2cDirection, I2cStart, SpiBaud,
    SpiMode, SpiSample, i2c_address_byte,
};
