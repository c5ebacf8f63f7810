//! Property-based tests for the HKUSBIO protocol crate.
//!
//! Covers the frame invariants the firmware relies on:
//! - every builder puts its opcode constant in byte 0
//! - ADC replies decode little-endian
//! - sensor register pairs decode as two's complement

use hkusbio_protocol::{
    AdcChannel, ChipSelect, Direction, GpioPin, I2cAck, I2cStart, Opcode, Reply, SpiBaud,
    SpiMode, SpiSample, build_adc_read, build_gpio_direction, build_gpio_read, build_gpio_write,
    build_i2c_data_ready, build_i2c_idle, build_i2c_init, build_i2c_master_ack, build_i2c_read,
    build_i2c_slave_ack, build_i2c_start, build_i2c_stop, build_i2c_write, build_read_switch,
    build_rom_version, build_sfr_get_bit, build_sfr_get_register, build_sfr_set_bit,
    build_sfr_set_register, build_spi_chip_select, build_spi_init, build_spi_transfer,
    build_toggle_led, build_uart_get_char, build_uart_has_char, build_uart_put_char,
    build_uart_put_str, combine_i16,
};
use proptest::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Every builder must emit the documented opcode constant as byte 0.
#[test]
fn test_every_builder_leads_with_its_opcode() -> TestResult {
    let frames = [
        (build_toggle_led(), 0x80),
        (build_read_switch(), 0x81),
        (build_gpio_read(GpioPin::Rd4), 0x82),
        (build_gpio_write(GpioPin::Rd4, true), 0x83),
        (build_gpio_direction(GpioPin::Rd4, Direction::Output), 0x84),
        (build_rom_version(), 0x85),
        (build_uart_put_str(b"x")?, 0x86),
        (build_uart_has_char(), 0x87),
        (build_uart_get_char(), 0x88),
        (build_uart_put_char(b'x'), 0x89),
        (build_adc_read(AdcChannel::Ra0), 0x37),
        (build_adc_read(AdcChannel::Ra1), 0x38),
        (build_sfr_get_register(0x80), 0x98),
        (build_sfr_set_register(0x80, 1), 0x99),
        (build_sfr_get_bit(0x80, 1)?, 0x9A),
        (build_sfr_set_bit(0x80, 1, true)?, 0x9B),
        (build_i2c_init(), 0x40),
        (build_i2c_idle(), 0x41),
        (build_i2c_start(I2cStart::Start), 0x42),
        (build_i2c_stop(), 0x43),
        (build_i2c_slave_ack(), 0x44),
        (build_i2c_write(0), 0x45),
        (build_i2c_master_ack(I2cAck::Ack), 0x46),
        (build_i2c_read(), 0x47),
        (build_i2c_data_ready(), 0x48),
        (build_spi_init(SpiMode::Mode0, SpiBaud::High, SpiSample::Middle), 0x50),
        (build_spi_transfer(0), 0x51),
        (build_spi_chip_select(ChipSelect::Enable), 0x52),
    ];

    assert_eq!(frames.len(), Opcode::ALL.len(), "one builder per opcode");
    for (frame, opcode) in frames {
        assert_eq!(frame.as_bytes()[0], opcode, "{frame:?}");
        assert_eq!(frame.opcode().to_u8(), opcode);
    }
    Ok(())
}

#[test]
fn test_signed_decode_examples() {
    assert_eq!(combine_i16(0xFF, 0xFF), -1);
    assert_eq!(combine_i16(0x00, 0x01), 1);
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    #[test]
    fn prop_adc_decode(byte1 in any::<u8>(), byte2 in any::<u8>()) {
        let reply = Reply::with_payload(0x38, &[byte1, byte2]);
        prop_assert_eq!(u32::from(reply.adc_value()), u32::from(byte2) * 256 + u32::from(byte1));
    }

    #[test]
    fn prop_signed_decode(msb in any::<u8>(), lsb in any::<u8>()) {
        let raw = (u16::from(msb) << 8) | u16::from(lsb);
        prop_assert_eq!(combine_i16(msb, lsb), raw as i16);
    }

    #[test]
    fn prop_gpio_write_level(high in any::<bool>()) {
        for pin in GpioPin::ALL {
            let frame = build_gpio_write(pin, high);
            prop_assert_eq!(frame.as_bytes(), &[0x83, pin.to_u8(), u8::from(high)][..]);
        }
    }
}
