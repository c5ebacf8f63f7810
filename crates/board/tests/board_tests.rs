//! End-to-end tests of board primitives and bus protocols against the
//! simulated firmware.

use hkusbio_board::prelude::*;
use hkusbio_board::{SimI2cSlave, SimulatedBoard};
use proptest::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn open(sim: &SimulatedBoard) -> Result<Board<SimulatedBoard>, BoardError> {
    Board::new(sim.clone(), BoardConfig::immediate())
}

#[test]
fn test_boxed_transport_drives_board() -> TestResult {
    let sim = SimulatedBoard::new();
    let transport: Box<dyn Transport> = Box::new(sim.clone());
    let mut board = Board::new(transport, BoardConfig::immediate())?;
    assert_eq!(board.rom_version()?, "1.00");
    board.close()?;
    assert_eq!(sim.reset_count(), 1);
    Ok(())
}

#[test]
fn test_rom_version_format() -> TestResult {
    let sim = SimulatedBoard::new();
    sim.set_rom_version(*b"213");
    let mut board = open(&sim)?;
    assert_eq!(board.rom_version()?, "2.13");
    Ok(())
}

#[test]
fn test_gpio_input_pin() -> TestResult {
    let sim = SimulatedBoard::new();
    let mut board = open(&sim)?;
    board.gpio_set_direction(GpioPin::Rd7, Direction::Input)?;
    assert!(sim.gpio_is_input(GpioPin::Rd7));

    sim.set_gpio_input(GpioPin::Rd7, true);
    assert!(board.gpio_read(GpioPin::Rd7)?);
    sim.set_gpio_input(GpioPin::Rd7, false);
    assert!(!board.gpio_read(GpioPin::Rd7)?);
    Ok(())
}

#[test]
fn test_i2c_and_spi_slaves_coexist() -> TestResult {
    let sim = SimulatedBoard::new();
    sim.add_i2c_slave(0x69, SimI2cSlave::new().with_registers(0x0F, &[0xD3]));
    sim.set_spi_register(0x0F, 0xD4);
    let mut board = open(&sim)?;

    board.i2c_init()?;
    assert_eq!(board.read_register(0x69, 0x0F)?, 0xD3);

    let mut spi = SpiDevice::init(&mut board, SpiMode::Mode3, SpiBaud::Low, SpiSample::End)?;
    assert_eq!(spi.read_register(0x0F)?, 0xD4);
    spi.write_register(0x20, 0x7F)?;
    assert_eq!(sim.spi_writes(), vec![(0x20, 0x7F)]);
    Ok(())
}

#[test]
fn test_i2c_device_write_lands_in_slave() -> TestResult {
    let sim = SimulatedBoard::new();
    sim.add_i2c_slave(0x1E, SimI2cSlave::new());
    let mut board = open(&sim)?;
    board.i2c_init()?;
    let mut mag = I2cDevice::new(&mut board, 0x1E);
    mag.write_register(0x00, 0x88)?;
    mag.write_register(0x02, 0x00)?;
    assert_eq!(sim.i2c_writes(0x1E), vec![(0x00, 0x88), (0x02, 0x00)]);
    Ok(())
}

#[test]
fn test_ack_timeout_is_transient() -> TestResult {
    let sim = SimulatedBoard::new();
    let config = BoardConfig::builder()
        .ack_max_polls(2)
        .ack_poll_interval_ms(0)
        .build()?;
    let mut board = Board::new(sim.clone(), config)?;
    board.i2c_init()?;
    let err = match board.read_register(0x77, 0xD0) {
        Err(err) => err,
        Ok(value) => return Err(format!("unexpected value {value:#04x}").into()),
    };
    assert!(err.is_transient());
    assert_eq!(err.to_string(), "I2C slave 0x77 did not acknowledge after 2 polls");
    Ok(())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(200))]

    #[test]
    fn prop_adc_round_trip(value in 0u16..=0x3FF, ra1 in any::<bool>()) {
        let sim = SimulatedBoard::new();
        let channel = if ra1 { AdcChannel::Ra1 } else { AdcChannel::Ra0 };
        sim.set_adc(channel, value);
        let mut board = open(&sim).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let read = board.adc_read(channel).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(read, value);
    }

    #[test]
    fn prop_i2c_register_round_trip(register in 0u8..0x80, value in any::<u8>()) {
        let sim = SimulatedBoard::new();
        sim.add_i2c_slave(0x19, SimI2cSlave::new());
        let mut board = open(&sim).map_err(|e| TestCaseError::fail(e.to_string()))?;
        board.i2c_init().map_err(|e| TestCaseError::fail(e.to_string()))?;
        board
            .write_register(0x19, register, value)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let read = board
            .read_register(0x19, register)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(read, value);
    }

    #[test]
    fn prop_sfr_ram_round_trip(value in any::<u8>()) {
        let sim = SimulatedBoard::new();
        let mut board = open(&sim).map_err(|e| TestCaseError::fail(e.to_string()))?;
        board
            .sfr_set_register(Sfr::GpRam3, value)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let read = board
            .sfr_get_register(Sfr::GpRam3)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(read, value);
    }
}
