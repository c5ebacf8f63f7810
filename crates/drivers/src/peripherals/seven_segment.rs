//! Seven-segment display behind an SN74HC595 shift register.
//!
//! Wiring: RD4 SER, RD5 RCLK, RD6 SRCLK, RD7 /OE. The display is common
//! anode, so a lit segment shifts out a low bit. State index `n` maps to
//! register output Q(n): A..G then the decimal point.

use hkusbio_board::{Board, Transport};
use hkusbio_protocol::Port;
use tracing::debug;

use crate::error::{DriverError, DriverResult};
use crate::peripherals::pin::SfrPin;

/// Segments lit for each hex digit, bit 0 = A through bit 7 = DP.
/// B and D carry the decimal point to tell them apart from 8 and 0.
pub const HEX_TABLE: [u8; 16] = [
    0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x67, 0x77, 0xFF, 0x39, 0xBF, 0x79, 0x71,
];

const SER: SfrPin = SfrPin::fixed(Port::D, 4);
const RCLK: SfrPin = SfrPin::fixed(Port::D, 5);
const SRCLK: SfrPin = SfrPin::fixed(Port::D, 6);
const OUTPUT_ENABLE: SfrPin = SfrPin::fixed(Port::D, 7);

pub struct SevenSegment<'a, T: Transport> {
    board: &'a mut Board<T>,
}

impl<'a, T: Transport> SevenSegment<'a, T> {
    /// Configure RD4..RD7 as outputs with clocks low and outputs disabled.
    pub fn setup(board: &'a mut Board<T>) -> DriverResult<Self> {
        for pin in [SER, RCLK, SRCLK, OUTPUT_ENABLE] {
            pin.configure_output(board)?;
        }
        SER.write(board, false)?;
        RCLK.write(board, false)?;
        SRCLK.write(board, false)?;
        OUTPUT_ENABLE.write(board, true)?;
        Ok(Self { board })
    }

    pub fn output_enable(&mut self, enable: bool) -> DriverResult<()> {
        // /OE is active low
        OUTPUT_ENABLE.write(self.board, !enable)
    }

    /// Shift out eight segment states and latch them onto the outputs.
    pub fn write_states(&mut self, states: [bool; 8]) -> DriverResult<()> {
        RCLK.write(self.board, false)?;
        for lit in states.iter().rev() {
            SRCLK.write(self.board, false)?;
            SER.write(self.board, !lit)?;
            SRCLK.write(self.board, true)?;
        }
        RCLK.write(self.board, true)
    }

    pub fn write_hex(&mut self, value: u8) -> DriverResult<()> {
        let Some(&segments) = HEX_TABLE.get(usize::from(value)) else {
            return Err(DriverError::invalid_argument(format!(
                "seven-segment digit must be 0x0..=0xF, got {value:#x}"
            )));
        };
        debug!(value, segments, "seven segment");
        self.write_states(segment_states(segments))
    }
}

fn segment_states(segments: u8) -> [bool; 8] {
    std::array::from_fn(|n| segments & (1 << n) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hkusbio_board::{BoardConfig, SimulatedBoard};
    use hkusbio_protocol::Sfr;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_setup_disables_outputs() -> TestResult {
        let sim = SimulatedBoard::new();
        sim.set_sfr(Sfr::TrisD.address(), 0xFF);
        let mut board = Board::new(sim.clone(), BoardConfig::immediate())?;
        SevenSegment::setup(&mut board)?;

        assert_eq!(sim.sfr(Sfr::TrisD.address()) & 0xF0, 0);
        assert_eq!(sim.sfr(Sfr::LatD.address()) & 0xF0, 0x80);
        assert_eq!(sim.shift_register_output(), None);
        Ok(())
    }

    #[test]
    fn test_every_digit_reaches_the_latch() -> TestResult {
        let sim = SimulatedBoard::new();
        let mut board = Board::new(sim.clone(), BoardConfig::immediate())?;
        let mut display = SevenSegment::setup(&mut board)?;
        display.output_enable(true)?;

        for (value, segments) in (0u8..).zip(HEX_TABLE) {
            display.write_hex(value)?;
            assert_eq!(sim.shift_register_output(), Some(!segments), "digit {value:#x}");
        }
        Ok(())
    }

    #[test]
    fn test_write_states_order() -> TestResult {
        let sim = SimulatedBoard::new();
        let mut board = Board::new(sim.clone(), BoardConfig::immediate())?;
        let mut display = SevenSegment::setup(&mut board)?;
        display.output_enable(true)?;

        // only segment A lit
        display.write_states([true, false, false, false, false, false, false, false])?;
        assert_eq!(sim.shift_register_output(), Some(0b1111_1110));
        Ok(())
    }

    #[test]
    fn test_rejects_non_hex_digit() -> TestResult {
        let sim = SimulatedBoard::new();
        let mut board = Board::new(sim.clone(), BoardConfig::immediate())?;
        let mut display = SevenSegment::setup(&mut board)?;
        assert!(matches!(
            display.write_hex(0x10),
            Err(DriverError::InvalidArgument(_))
        ));
        Ok(())
    }

    #[test]
    fn test_segment_states() {
        assert_eq!(
            segment_states(0x06),
            [false, true, true, false, false, false, false, false]
        );
    }
}
