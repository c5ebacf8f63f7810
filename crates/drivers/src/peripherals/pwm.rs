//! CCP1 pulse-width modulation on P1B (RD5).
//!
//! Timer2 runs at Fosc/4 with a 1:16 prescaler and PR2 = 199, which gives
//! a 3750 Hz period. The duty ratio is `CCPR1L / (PR2 + 1)`, so any duty
//! of 200 or more holds the output high.

use hkusbio_board::{Board, Transport};
use hkusbio_protocol::{Direction, Port, Sfr};
use tracing::debug;

use crate::error::DriverResult;
use crate::peripherals::pin::SfrPin;

pub const PERIOD_REGISTER: u8 = 199;
pub const FREQUENCY_HZ: u32 = 3750;
/// Duty value for a 100% high output.
pub const FULL_DUTY: u8 = PERIOD_REGISTER + 1;

const P1B: SfrPin = SfrPin::fixed(Port::D, 5);
/// PWM mode, duty LSBs zero.
const CCP1CON_PWM: u8 = 0b0000_1100;
/// TMR2ON, 1:16 prescale.
const T2CON_PRESCALE_16: u8 = 0b0000_0110;
/// STR1B steers the modulator onto P1B.
const PSTR1CON_STR1B: u8 = 1;

pub struct Pwm<'a, T: Transport> {
    board: &'a mut Board<T>,
}

impl<'a, T: Transport> Pwm<'a, T> {
    pub fn init(board: &'a mut Board<T>, duty: u8) -> DriverResult<Self> {
        debug!(duty, "pwm init");
        P1B.set_analog(board, false)?;
        // hold the pin tri-stated until the timer is running
        P1B.set_direction(board, Direction::Input)?;
        board.sfr_set_register(Sfr::Ccptmrs, 0x00)?;
        board.sfr_set_register(Sfr::Pr2, PERIOD_REGISTER)?;
        board.sfr_set_register(Sfr::Ccp1Con, CCP1CON_PWM)?;
        board.sfr_set_register(Sfr::Ccpr1L, 0x00)?;
        board.sfr_set_register(Sfr::T2Con, T2CON_PRESCALE_16)?;
        board.sfr_set_bit(Sfr::Pstr1Con, PSTR1CON_STR1B, true)?;
        P1B.set_direction(board, Direction::Output)?;
        board.sfr_set_register(Sfr::Ccpr1L, duty)?;
        Ok(Self { board })
    }

    pub fn set_duty(&mut self, duty: u8) -> DriverResult<()> {
        self.board.sfr_set_register(Sfr::Ccpr1L, duty)?;
        Ok(())
    }

    pub(crate) fn board(&mut self) -> &mut Board<T> {
        self.board
    }
}

/// Duty ratio in percent for a CCPR1L value.
pub fn duty_percent(duty: u8) -> f32 {
    f32::from(duty.min(FULL_DUTY)) * 100.0 / f32::from(FULL_DUTY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hkusbio_board::{BoardConfig, SimulatedBoard};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_init_programs_timer_and_ccp() -> TestResult {
        let sim = SimulatedBoard::new();
        sim.set_sfr(Sfr::AnselD.address(), 0xFF);
        let mut board = Board::new(sim.clone(), BoardConfig::immediate())?;

        let mut pwm = Pwm::init(&mut board, 100)?;
        assert_eq!(sim.sfr(Sfr::Pr2.address()), 199);
        assert_eq!(sim.sfr(Sfr::Ccp1Con.address()), 0x0C);
        assert_eq!(sim.sfr(Sfr::T2Con.address()), 0x06);
        assert_eq!(sim.sfr(Sfr::Pstr1Con.address()), 0b10);
        assert_eq!(sim.sfr(Sfr::AnselD.address()) & 0x20, 0);
        assert_eq!(sim.sfr(Sfr::TrisD.address()) & 0x20, 0);
        assert_eq!(sim.sfr(Sfr::Ccpr1L.address()), 100);

        pwm.set_duty(0xC0)?;
        assert_eq!(sim.sfr(Sfr::Ccpr1L.address()), 0xC0);
        Ok(())
    }

    #[test]
    fn test_duty_before_output_enable() -> TestResult {
        let sim = SimulatedBoard::new();
        let mut board = Board::new(sim.clone(), BoardConfig::immediate())?;
        Pwm::init(&mut board, 50)?;

        // the final frame carries the requested duty
        let frames = sim.frames();
        let last = frames.last().ok_or("no frames")?;
        assert_eq!(last.get(10).copied(), Some(Sfr::Ccpr1L.address()));
        assert_eq!(last.get(11).copied(), Some(50));
        Ok(())
    }

    #[test]
    fn test_duty_percent() {
        assert!((duty_percent(100) - 50.0).abs() < 1e-4);
        assert!((duty_percent(255) - 100.0).abs() < 1e-4);
        assert!(duty_percent(0).abs() < 1e-4);
    }
}
