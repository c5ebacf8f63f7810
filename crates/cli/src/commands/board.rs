//! Board-level commands: identity, LED, switch, GPIO, ADC, UART and SFRs.

use anyhow::Result;
use hkusbio_board::UsbTransport;
use hkusbio_protocol::{AdcChannel, GpioPin, MODULE_VERSION, Sfr};
use serde::Serialize;

use crate::commands::{AdcArg, GpioCommands, PinArg, Sampling, Session, SfrCommands, UartCommands};
use crate::error::CliError;
use crate::output::{self, emit};

#[derive(Serialize)]
struct InfoRecord {
    index: usize,
    bus: u8,
    address: u8,
    rom_version: String,
    module_version: &'static str,
}

#[derive(Serialize)]
struct SwitchRecord {
    pressed: bool,
}

#[derive(Serialize)]
struct PinRecord {
    pin: String,
    high: bool,
}

#[derive(Serialize)]
struct AdcRecord {
    channel: u8,
    value: u16,
}

#[derive(Serialize)]
struct UartRecord {
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    byte: Option<u8>,
}

#[derive(Serialize)]
struct RegisterRecord {
    register: String,
    address: u8,
    value: u8,
}

#[derive(Serialize)]
struct BitRecord {
    register: String,
    address: u8,
    bit: u8,
    value: bool,
}

/// List attached boards
pub fn list(json: bool) -> Result<()> {
    let devices = UsbTransport::list_devices()?;
    output::print_device_list(&devices, json);
    Ok(())
}

/// Show the identity and firmware version of the selected board
pub fn info(session: &Session) -> Result<()> {
    let mut board = session.open()?;
    let device = board.transport().info().clone();
    let record = InfoRecord {
        index: device.index,
        bus: device.bus,
        address: device.address,
        rom_version: board.rom_version()?,
        module_version: MODULE_VERSION,
    };
    emit(session.json, &record, |r| {
        format!(
            "{} firmware {} ({})",
            output::format_device(&device),
            r.rom_version,
            r.module_version
        )
    });
    session.finish(board)
}

/// Toggle the on-board LED
pub fn led(session: &Session) -> Result<()> {
    let mut board = session.open()?;
    board.toggle_led()?;
    session.finish(board)
}

pub fn switch(session: &Session, sampling: Sampling) -> Result<()> {
    let mut board = session.open()?;
    sampling.run(|_| {
        let record = SwitchRecord {
            pressed: board.read_switch()?,
        };
        emit(session.json, &record, |r| {
            if r.pressed { "pressed" } else { "released" }.to_string()
        });
        Ok(())
    })?;
    session.finish(board)
}

pub fn gpio(session: &Session, cmd: &GpioCommands) -> Result<()> {
    let mut board = session.open()?;
    match *cmd {
        GpioCommands::Read { pin } => {
            let record = PinRecord {
                pin: pin_name(pin),
                high: board.gpio_read(GpioPin::from(pin))?,
            };
            emit(session.json, &record, |r| {
                format!("{} {}", r.pin, if r.high { "high" } else { "low" })
            });
        }
        GpioCommands::Write { pin, level } => {
            board.gpio_write(GpioPin::from(pin), level.is_high())?;
        }
        GpioCommands::Dir { pin, direction } => {
            board.gpio_set_direction(GpioPin::from(pin), direction.into())?;
        }
    }
    session.finish(board)
}

pub fn adc(session: &Session, channel: AdcArg, sampling: Sampling) -> Result<()> {
    let mut board = session.open()?;
    let number = match channel {
        AdcArg::Ra0 => 0,
        AdcArg::Ra1 => 1,
    };
    sampling.run(|_| {
        let record = AdcRecord {
            channel: number,
            value: board.adc_read(AdcChannel::from(channel))?,
        };
        emit(session.json, &record, |r| format!("AN{} {}", r.channel, r.value));
        Ok(())
    })?;
    session.finish(board)
}

pub fn uart(session: &Session, cmd: &UartCommands) -> Result<()> {
    let mut board = session.open()?;
    match cmd {
        UartCommands::Put { ch } => {
            let byte = u8::try_from(*ch).map_err(|err| {
                CliError::InvalidArgument(format!("'{ch}' cannot be sent: {err}"))
            })?;
            board.uart_put_char(byte)?;
        }
        UartCommands::Puts { text } => board.uart_put_str(text)?,
        UartCommands::Get => {
            let byte = board.uart_get_char()?;
            let record = UartRecord {
                available: byte.is_some(),
                byte,
            };
            emit(session.json, &record, |r| match r.byte {
                Some(b) if b.is_ascii_graphic() || b == b' ' => format!("{}", char::from(b)),
                Some(b) => format!("{b:#04x}"),
                None => "no character waiting".to_string(),
            });
        }
    }
    session.finish(board)
}

pub fn sfr(session: &Session, cmd: &SfrCommands) -> Result<()> {
    let mut board = session.open()?;
    match *cmd {
        SfrCommands::Get { register } => {
            let record = RegisterRecord {
                register: register_name(register),
                address: register,
                value: board.sfr_get_register(register)?,
            };
            emit(session.json, &record, |r| {
                format!("{} = {:#04x} ({:#010b})", r.register, r.value, r.value)
            });
        }
        SfrCommands::Set { register, value } => board.sfr_set_register(register, value)?,
        SfrCommands::GetBit { register, bit } => {
            let record = BitRecord {
                register: register_name(register),
                address: register,
                bit,
                value: board.sfr_get_bit(register, bit)?,
            };
            emit(session.json, &record, |r| {
                format!("{}.{} = {}", r.register, r.bit, u8::from(r.value))
            });
        }
        SfrCommands::SetBit {
            register,
            bit,
            level,
        } => board.sfr_set_bit(register, bit, level.is_high())?,
    }
    session.finish(board)
}

fn pin_name(pin: PinArg) -> String {
    format!("{pin:?}").to_uppercase()
}

fn register_name(address: u8) -> String {
    Sfr::from_address(address)
        .map_or_else(|| format!("{address:#04x}"), |sfr| sfr.name().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_name() {
        assert_eq!(register_name(0x95), "TRISD");
        assert_eq!(register_name(0x01), "0x01");
    }

    #[test]
    fn test_pin_name() {
        assert_eq!(pin_name(PinArg::Rd6), "RD6");
    }
}
