//! Sensor drivers end to end over the simulated board's buses.

use hkusbio_board::prelude::*;
use hkusbio_board::{SimI2cSlave, SimulatedBoard};
use hkusbio_drivers::sensors::l3g::L3G4200D_I2C_ADDRESS;
use hkusbio_drivers::sensors::lsm303dlhc::{ACCEL_ADDRESS, MAG_ADDRESS};
use hkusbio_drivers::sensors::mpl115a2::MPL115A2_ADDRESS;
use hkusbio_drivers::{
    Coefficients, DriverError, FullScale, GyroChip, L3gGyro, Lsm303dlhc, Mpl115a2, RawSample,
    SfrSpi,
};
use insta::assert_snapshot;
use proptest::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn open(sim: &SimulatedBoard) -> Result<Board<SimulatedBoard>, BoardError> {
    Board::new(sim.clone(), BoardConfig::immediate())
}

/// Open a board and bring up its I2C engine, as every I2C command must.
fn open_i2c(sim: &SimulatedBoard) -> Result<Board<SimulatedBoard>, BoardError> {
    let mut board = open(sim)?;
    board.i2c_init()?;
    Ok(board)
}

#[test]
fn test_l3g4200d_over_i2c() -> TestResult {
    let sim = SimulatedBoard::new();
    sim.add_i2c_slave(
        L3G4200D_I2C_ADDRESS,
        SimI2cSlave::new()
            .with_registers(0x0F, &[0xD3])
            .with_registers(0x28, &[0x10, 0x00, 0xF0, 0xFF, 0x00, 0x80]),
    );
    let mut board = open_i2c(&sim)?;
    let device = I2cDevice::new(&mut board, L3G4200D_I2C_ADDRESS);
    let mut gyro = L3gGyro::new(device, GyroChip::L3g4200d);

    gyro.setup(FullScale::Dps2000)?;
    assert_snapshot!(
        format!("{:?}", sim.i2c_writes(L3G4200D_I2C_ADDRESS)),
        @"[(32, 15), (33, 0), (34, 8), (35, 176), (36, 0)]"
    );

    let axes = gyro.read_axes()?;
    assert_eq!((axes.x, axes.y, axes.z), (16, -16, i16::MIN));
    Ok(())
}

#[test]
fn test_l3g4200d_over_firmware_spi() -> TestResult {
    let sim = SimulatedBoard::new();
    sim.set_spi_register(0x0F, 0xD3);
    sim.set_spi_register(0x26, 0xFB);
    let mut board = open(&sim)?;
    let spi = SpiDevice::init(&mut board, SpiMode::Mode3, SpiBaud::Low, SpiSample::End)?;
    let mut gyro = L3gGyro::new(spi, GyroChip::L3g4200d);

    gyro.setup(FullScale::Dps250)?;
    assert_eq!(
        sim.spi_writes(),
        vec![(0x20, 0x0F), (0x21, 0x00), (0x22, 0x08), (0x23, 0x80), (0x24, 0x00)]
    );
    assert_eq!(gyro.read_temperature_raw()?, -5);
    Ok(())
}

#[test]
fn test_l3gd20_over_sfr_spi() -> TestResult {
    let sim = SimulatedBoard::new();
    sim.set_spi_register(0x0F, 0xD4);
    sim.set_spi_register(0x2A, 0x34);
    sim.set_spi_register(0x2B, 0x12);
    let mut board = open(&sim)?;
    let spi = SfrSpi::init(&mut board)?;
    let mut gyro = L3gGyro::new(spi, GyroChip::L3gd20);

    gyro.setup(FullScale::Dps500)?;
    assert_eq!(sim.spi_writes().first(), Some(&(0x20, 0x7F)));
    assert_eq!(gyro.read_axes()?.y, 0x1234);
    Ok(())
}

#[test]
fn test_wrong_chip_is_reported() -> TestResult {
    let sim = SimulatedBoard::new();
    sim.set_spi_register(0x0F, 0xD3);
    let mut board = open(&sim)?;
    let spi = SpiDevice::init(&mut board, SpiMode::Mode3, SpiBaud::Low, SpiSample::End)?;
    let mut gyro = L3gGyro::new(spi, GyroChip::L3gd20);

    let err = gyro.setup(FullScale::Dps2000);
    assert!(matches!(
        err,
        Err(DriverError::IdentityMismatch {
            expected: 0xD4,
            actual: 0xD3,
            ..
        })
    ));
    assert!(sim.spi_writes().is_empty());
    Ok(())
}

#[test]
fn test_missing_gyro_times_out() -> TestResult {
    let sim = SimulatedBoard::new();
    let mut board = open_i2c(&sim)?;
    let device = I2cDevice::new(&mut board, L3G4200D_I2C_ADDRESS);
    let mut gyro = L3gGyro::new(device, GyroChip::L3g4200d);

    let err = gyro.setup(FullScale::Dps2000);
    assert!(matches!(
        err,
        Err(DriverError::Board(BoardError::AckTimeout { address: 0x69, .. }))
    ));
    Ok(())
}

#[test]
fn test_gyro_without_i2c_init_is_not_acknowledged() -> TestResult {
    let sim = SimulatedBoard::new();
    sim.add_i2c_slave(
        L3G4200D_I2C_ADDRESS,
        SimI2cSlave::new().with_registers(0x0F, &[0xD3]),
    );
    let mut board = open(&sim)?;
    let device = I2cDevice::new(&mut board, L3G4200D_I2C_ADDRESS);
    let mut gyro = L3gGyro::new(device, GyroChip::L3g4200d);

    let err = gyro.setup(FullScale::Dps250);
    assert!(matches!(
        err,
        Err(DriverError::Board(BoardError::AckTimeout { address: 0x69, .. }))
    ));
    assert!(sim.i2c_writes(L3G4200D_I2C_ADDRESS).is_empty());
    Ok(())
}

#[test]
fn test_compass_setup_and_read() -> TestResult {
    let sim = SimulatedBoard::new();
    sim.add_i2c_slave(
        ACCEL_ADDRESS,
        SimI2cSlave::new().with_registers(0x28, &[0x00, 0x01, 0x00, 0x00, 0x00, 0x40]),
    );
    sim.add_i2c_slave(
        MAG_ADDRESS,
        // X, Z, Y high byte first
        SimI2cSlave::new().with_registers(0x03, &[0x00, 0x64, 0x00, 0x0A, 0xFF, 0x9C]),
    );
    let mut board = open_i2c(&sim)?;
    let mut compass = Lsm303dlhc::new(&mut board);
    compass.setup()?;

    assert_eq!(sim.i2c_register(ACCEL_ADDRESS, 0x20), Some(0x27));
    assert_eq!(sim.i2c_register(MAG_ADDRESS, 0x00), Some(0x88));

    let accel = compass.read_accel()?;
    assert_eq!((accel.x, accel.y, accel.z), (256, 0, 0x4000));
    let mag = compass.read_mag()?;
    assert_eq!((mag.x, mag.y, mag.z), (100, -100, 10));
    Ok(())
}

#[test]
fn test_pressure_sample() -> TestResult {
    let sim = SimulatedBoard::new();
    sim.add_i2c_slave(
        MPL115A2_ADDRESS,
        SimI2cSlave::new()
            .with_registers(0x00, &[0x66, 0x80, 0x7E, 0xC0])
            .with_registers(0x04, &[0x3E, 0xCE, 0xB3, 0xF9, 0xC5, 0x17, 0x33, 0xC8]),
    );
    let mut board = open_i2c(&sim)?;
    let mut sensor = Mpl115a2::new(&mut board, std::time::Duration::ZERO);

    let sample = sensor.sample()?;
    assert_eq!(sample.raw, RawSample { padc: 410, tadc: 507 });
    assert!((sample.pressure_kpa - 96.59).abs() < 0.05);
    assert_eq!(
        sim.i2c_writes(MPL115A2_ADDRESS).last(),
        Some(&(0x12, 0x00))
    );
    Ok(())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_pressure_stays_in_sensor_range(padc in 0u16..1024, tadc in 0u16..1024) {
        let coefficients = Coefficients::from_bytes([0x3E, 0xCE, 0xB3, 0xF9, 0xC5, 0x17, 0x33, 0xC8]);
        let pcomp = coefficients.compensate(RawSample { padc, tadc });
        let kpa = coefficients.pressure_kpa(RawSample { padc, tadc });
        if (0.0..=1023.0).contains(&pcomp) {
            prop_assert!((49.99..=115.01).contains(&kpa));
        }
    }

    #[test]
    fn prop_gyro_rate_scales_with_range(raw in any::<i16>()) {
        let fine = f32::from(raw) * FullScale::Dps250.sensitivity_mdps();
        let coarse = f32::from(raw) * FullScale::Dps2000.sensitivity_mdps();
        prop_assert!(fine.abs() <= coarse.abs());
    }
}
