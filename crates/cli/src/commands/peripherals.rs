//! Commands that drive SFR-level peripherals.

use std::thread::sleep;
use std::time::Duration;

use anyhow::Result;
use hkusbio_drivers::peripherals::dac::output_voltage;
use hkusbio_drivers::peripherals::pwm::duty_percent;
use hkusbio_drivers::{Color, Dac, Pwm, RgbLed, SevenSegment};
use serde::Serialize;

use crate::commands::Session;
use crate::output::emit;

/// Nominal board supply used to report DAC voltages.
const VDD: f32 = 5.0;

#[derive(Serialize)]
struct DacRecord {
    level: u8,
    volts: f32,
}

#[derive(Serialize)]
struct PwmRecord {
    duty: u8,
    percent: f32,
}

/// Set the DAC level; with `hold_ms` the DAC is stopped again afterwards.
pub fn dac(session: &Session, level: u8, hold_ms: Option<u64>) -> Result<()> {
    let mut board = session.open()?;
    let dac = Dac::init(&mut board, level)?;
    let record = DacRecord {
        level,
        volts: output_voltage(level, VDD),
    };
    emit(session.json, &record, |r| {
        format!("DAC level {:#04x} (~{:.2} V)", r.level, r.volts)
    });
    if let Some(ms) = hold_ms {
        sleep(Duration::from_millis(ms));
        dac.stop()?;
    }
    session.finish(board)
}

pub fn pwm(session: &Session, duty: u8) -> Result<()> {
    let mut board = session.open()?;
    Pwm::init(&mut board, duty)?;
    let record = PwmRecord {
        duty,
        percent: duty_percent(duty),
    };
    emit(session.json, &record, |r| {
        format!("PWM duty {} ({:.1}%) on RD5", r.duty, r.percent)
    });
    session.finish(board)
}

pub fn rgb(session: &Session, color: Color, brightness: u8) -> Result<()> {
    let mut board = session.open()?;
    let mut led = RgbLed::init(&mut board, brightness)?;
    led.set(color)?;
    session.finish(board)
}

/// Show a hex digit, or blank the display when `digit` is `None`.
pub fn segment(session: &Session, digit: Option<u8>) -> Result<()> {
    let mut board = session.open()?;
    let mut display = SevenSegment::setup(&mut board)?;
    if let Some(digit) = digit {
        display.write_hex(digit)?;
        display.output_enable(true)?;
    }
    session.finish(board)
}
