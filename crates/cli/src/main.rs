//! hkusbio - HKUSBIO board control CLI
//!
//! Drives the PIC18F45K50 USB I/O board from the command line: firmware
//! primitives, register access, the supported sensors and the SFR-level
//! peripherals.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod config;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hkusbio_drivers::FullScale;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::*;

#[derive(Parser)]
#[command(name = "hkusbio")]
#[command(about = "HKUSBIO board control - GPIO, ADC, UART, SFRs, sensors and peripherals")]
#[command(version)]
#[command(long_about = "
hkusbio talks to a PIC18F45K50 HKUSBIO board over USB (04d8:003f).
It exposes the firmware commands directly and drives the attached
gyroscopes, compass, pressure sensor, DAC, PWM, RGB LED and seven-segment
display.

Use --json for one JSON object per line, suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(long, global = true, help = "Output one JSON object per line")]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Board configuration file (YAML, or JSON by extension)
    #[arg(long, global = true, env = "HKUSBIO_CONFIG")]
    config: Option<PathBuf>,

    /// Index of the board to open when several are attached
    #[arg(long, global = true, default_value_t = 0)]
    device: usize,

    /// Reset the board over USB when the command finishes
    #[arg(long, global = true)]
    reset: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List attached boards
    List,

    /// Show board identity and firmware version
    Info,

    /// Toggle the on-board LED
    Led,

    /// Read the on-board switch
    Switch {
        #[command(flatten)]
        sampling: Sampling,
    },

    /// GPIO pins RD4..RD7
    #[command(subcommand)]
    Gpio(GpioCommands),

    /// Read an analog channel
    Adc {
        #[arg(value_enum)]
        channel: AdcArg,
        #[command(flatten)]
        sampling: Sampling,
    },

    /// Serial port
    #[command(subcommand)]
    Uart(UartCommands),

    /// Special function registers
    #[command(subcommand)]
    Sfr(SfrCommands),

    /// Sample an L3G4200D or L3GD20 gyroscope
    Gyro {
        #[arg(long, value_enum, default_value = "l3g4200d-i2c")]
        chip: GyroArg,
        /// Full scale in degrees per second (250, 500 or 2000)
        #[arg(long, value_parser = parse_scale, default_value = "2000")]
        scale: FullScale,
        /// Drive SPI gyros through the MSSP registers instead of the
        /// firmware SPI commands
        #[arg(long)]
        sfr_spi: bool,
        #[command(flatten)]
        sampling: Sampling,
    },

    /// Sample the LSM303DLHC accelerometer and magnetometer
    Compass {
        #[command(flatten)]
        sampling: Sampling,
    },

    /// Sample the MPL115A2 barometer
    Pressure {
        #[command(flatten)]
        sampling: Sampling,
    },

    /// Set the DAC output on RA2
    Dac {
        /// Level 0..=31 (decimal or 0x hex)
        #[arg(value_parser = parse_byte)]
        level: u8,
        /// Hold the level for this many milliseconds, then stop the DAC
        #[arg(long)]
        hold_ms: Option<u64>,
    },

    /// Start PWM on RD5 at 3750 Hz
    Pwm {
        /// Duty cycle as CCPR1L; 200 and above is 100%
        #[arg(value_parser = parse_byte)]
        duty: u8,
    },

    /// Set the RGB LED colour
    Rgb {
        #[arg(value_enum)]
        color: ColorArg,
        /// PWM brightness
        #[arg(long, value_parser = parse_byte, default_value = "0xc0")]
        brightness: u8,
    },

    /// Show a hex digit on the seven-segment display
    Segment {
        /// Digit 0-F
        #[arg(value_parser = parse_hex_digit, required_unless_present = "off")]
        digit: Option<u8>,
        /// Blank the display
        #[arg(long, conflicts_with = "digit")]
        off: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("hkusbio={log_level},hkusbio_board={log_level},hkusbio_drivers={log_level}")
                    .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            std::process::exit(error::exit_code(&e));
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::List => return commands::board::list(cli.json),
        Commands::Completion { shell } => {
            completion::generate_completion(*shell);
            return Ok(());
        }
        _ => {}
    }

    let session = Session {
        json: cli.json,
        device: cli.device,
        reset: cli.reset,
        config: config::load_config(cli.config.as_deref())?,
    };

    match &cli.command {
        Commands::List | Commands::Completion { .. } => Ok(()),
        Commands::Info => commands::board::info(&session),
        Commands::Led => commands::board::led(&session),
        Commands::Switch { sampling } => commands::board::switch(&session, *sampling),
        Commands::Gpio(cmd) => commands::board::gpio(&session, cmd),
        Commands::Adc { channel, sampling } => {
            commands::board::adc(&session, *channel, *sampling)
        }
        Commands::Uart(cmd) => commands::board::uart(&session, cmd),
        Commands::Sfr(cmd) => commands::board::sfr(&session, cmd),
        Commands::Gyro {
            chip,
            scale,
            sfr_spi,
            sampling,
        } => commands::sensors::gyro(&session, *chip, *scale, *sfr_spi, *sampling),
        Commands::Compass { sampling } => commands::sensors::compass(&session, *sampling),
        Commands::Pressure { sampling } => commands::sensors::pressure(&session, *sampling),
        Commands::Dac { level, hold_ms } => {
            commands::peripherals::dac(&session, *level, *hold_ms)
        }
        Commands::Pwm { duty } => commands::peripherals::pwm(&session, *duty),
        Commands::Rgb { color, brightness } => {
            commands::peripherals::rgb(&session, (*color).into(), *brightness)
        }
        Commands::Segment { digit, .. } => commands::peripherals::segment(&session, *digit),
    }
}
