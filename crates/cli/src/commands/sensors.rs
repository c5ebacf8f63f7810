//! Sensor sampling commands.

use std::thread::sleep;
use std::time::Duration;

use anyhow::Result;
use hkusbio_board::{Board, BoardResult, I2cDevice, RegisterAccess, SpiDevice, Transport};
use hkusbio_drivers::sensors::l3g::L3G4200D_I2C_ADDRESS;
use hkusbio_drivers::sensors::lsm303dlhc::heading_degrees;
use hkusbio_drivers::{FullScale, GyroChip, L3gGyro, Lsm303dlhc, Mpl115a2, SfrSpi};
use hkusbio_protocol::{SpiBaud, SpiMode, SpiSample};
use serde::Serialize;
use tracing::debug;

use crate::commands::{GyroArg, Sampling, Session};
use crate::error::CliError;
use crate::output::emit;

#[derive(Serialize)]
struct GyroRecord {
    raw: [i16; 3],
    dps: [f32; 3],
}

#[derive(Serialize)]
struct CompassRecord {
    accel: [i16; 3],
    mag: [i16; 3],
    heading_deg: f32,
}

pub fn gyro(
    session: &Session,
    chip: GyroArg,
    scale: FullScale,
    sfr_spi: bool,
    sampling: Sampling,
) -> Result<()> {
    let mut board = session.open()?;
    let ready = board.config().sensor_ready();
    match (chip, sfr_spi) {
        (GyroArg::L3g4200dI2c, true) => {
            return Err(CliError::InvalidArgument(
                "--sfr-spi applies to SPI gyros only".to_string(),
            )
            .into());
        }
        (GyroArg::L3g4200dI2c, false) => {
            let gyro = i2c_gyro(&mut board, chip.chip())?;
            run_gyro(gyro, scale, ready, session.json, sampling)?;
        }
        (_, true) => {
            let spi = SfrSpi::init(&mut board)?;
            run_gyro(L3gGyro::new(spi, chip.chip()), scale, ready, session.json, sampling)?;
        }
        (_, false) => {
            let spi = SpiDevice::init(&mut board, SpiMode::Mode3, SpiBaud::Low, SpiSample::End)?;
            run_gyro(L3gGyro::new(spi, chip.chip()), scale, ready, session.json, sampling)?;
        }
    }
    session.finish(board)
}

/// Bring up the I2C engine and bind the gyro at its fixed address.
///
/// The firmware ignores I2C bus traffic until it has seen the init command.
fn i2c_gyro<T: Transport>(
    board: &mut Board<T>,
    chip: GyroChip,
) -> BoardResult<L3gGyro<I2cDevice<&mut Board<T>>>> {
    board.i2c_init()?;
    Ok(L3gGyro::new(I2cDevice::new(board, L3G4200D_I2C_ADDRESS), chip))
}

fn run_gyro<R: RegisterAccess>(
    mut gyro: L3gGyro<R>,
    scale: FullScale,
    ready: Duration,
    json: bool,
    sampling: Sampling,
) -> Result<()> {
    gyro.setup(scale)?;
    let temperature_raw = gyro.read_temperature_raw()?;
    debug!(chip = gyro.chip().name(), temperature_raw, "gyro configured");
    sleep(ready);
    sampling.run(|_| {
        let axes = gyro.read_axes()?;
        let record = GyroRecord {
            raw: [axes.x, axes.y, axes.z],
            dps: axes.scaled(gyro.scale().sensitivity_mdps() / 1000.0),
        };
        emit(json, &record, |r| {
            format!("x={:6}, y={:6}, z={:6}", r.raw[0], r.raw[1], r.raw[2])
        });
        Ok(())
    })
}

fn setup_compass<T: Transport>(board: &mut Board<T>) -> Result<Lsm303dlhc<&mut Board<T>>> {
    board.i2c_init()?;
    let mut compass = Lsm303dlhc::new(board);
    compass.setup()?;
    Ok(compass)
}

pub fn compass(session: &Session, sampling: Sampling) -> Result<()> {
    let mut board = session.open()?;
    let ready = board.config().sensor_ready();
    let mut compass = setup_compass(&mut board)?;
    sleep(ready);
    sampling.run(|_| {
        let accel = compass.read_accel()?;
        let mag = compass.read_mag()?;
        let record = CompassRecord {
            accel: [accel.x, accel.y, accel.z],
            mag: [mag.x, mag.y, mag.z],
            heading_deg: heading_degrees(mag),
        };
        emit(session.json, &record, |r| {
            format!(
                "accel x={:6}, y={:6}, z={:6}  mag x={:6}, y={:6}, z={:6}  heading {:5.1}",
                r.accel[0], r.accel[1], r.accel[2], r.mag[0], r.mag[1], r.mag[2], r.heading_deg
            )
        });
        Ok(())
    })?;
    session.finish(board)
}

fn setup_pressure<T: Transport>(board: &mut Board<T>) -> Result<Mpl115a2<&mut Board<T>>> {
    let conversion_delay = board.config().conversion_delay();
    board.i2c_init()?;
    let mut sensor = Mpl115a2::new(board, conversion_delay);
    sensor.read_coefficients()?;
    Ok(sensor)
}

pub fn pressure(session: &Session, sampling: Sampling) -> Result<()> {
    let mut board = session.open()?;
    let mut sensor = setup_pressure(&mut board)?;
    sampling.run(|_| {
        let sample = sensor.sample()?;
        emit(session.json, &sample, |s| {
            format!(
                "{:.2} kPa  ~{:.1} C  (padc {}, tadc {})",
                s.pressure_kpa, s.approximate_temperature_c, s.raw.padc, s.raw.tadc
            )
        });
        Ok(())
    })?;
    session.finish(board)
}
