//! Common-anode RGB LED.
//!
//! The anode is fed from the PWM output on RD5, so CCPR1L sets the overall
//! brightness. Cathodes sit on RE0 (red), RE1 (blue) and RE2 (green) and
//! light when driven low.

use hkusbio_board::{Board, Transport};
use hkusbio_protocol::{Direction, Port};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DriverResult;
use crate::peripherals::pin::SfrPin;
use crate::peripherals::pwm::Pwm;

const RED: SfrPin = SfrPin::fixed(Port::E, 0);
const BLUE: SfrPin = SfrPin::fixed(Port::E, 1);
const GREEN: SfrPin = SfrPin::fixed(Port::E, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Off,
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
}

impl Color {
    pub const ALL: [Self; 8] = [
        Self::Off,
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Cyan,
        Self::Magenta,
        Self::White,
    ];

    /// Which of the (red, green, blue) dies are lit.
    pub fn channels(self) -> (bool, bool, bool) {
        match self {
            Self::Off => (false, false, false),
            Self::Red => (true, false, false),
            Self::Green => (false, true, false),
            Self::Blue => (false, false, true),
            Self::Yellow => (true, true, false),
            Self::Cyan => (false, true, true),
            Self::Magenta => (true, false, true),
            Self::White => (true, true, true),
        }
    }
}

pub struct RgbLed<'a, T: Transport> {
    pwm: Pwm<'a, T>,
}

impl<'a, T: Transport> RgbLed<'a, T> {
    /// Start the PWM at `brightness` and configure the cathodes, all dark.
    pub fn init(board: &'a mut Board<T>, brightness: u8) -> DriverResult<Self> {
        let mut pwm = Pwm::init(board, brightness)?;
        for pin in [RED, BLUE, GREEN] {
            pin.set_analog(pwm.board(), false)?;
        }
        for pin in [RED, BLUE, GREEN] {
            pin.write(pwm.board(), true)?;
            pin.set_direction(pwm.board(), Direction::Output)?;
        }
        Ok(Self { pwm })
    }

    pub fn set(&mut self, color: Color) -> DriverResult<()> {
        debug!(?color, "rgb led");
        let (red, green, blue) = color.channels();
        let board = self.pwm.board();
        RED.write(board, !red)?;
        BLUE.write(board, !blue)?;
        GREEN.write(board, !green)?;
        Ok(())
    }

    pub fn set_brightness(&mut self, brightness: u8) -> DriverResult<()> {
        self.pwm.set_duty(brightness)
    }
}
