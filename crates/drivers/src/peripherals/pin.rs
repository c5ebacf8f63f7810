//! Single port pins through the ANSEL/TRIS/LAT/PORT registers.

use hkusbio_board::{Board, Transport};
use hkusbio_protocol::{Direction, Port};

use crate::error::{DriverError, DriverResult};

/// One pin of a PIC port, e.g. RA5 or RD7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SfrPin {
    port: Port,
    bit: u8,
}

impl SfrPin {
    pub fn new(port: Port, bit: u8) -> DriverResult<Self> {
        if bit > 7 {
            return Err(DriverError::invalid_argument(format!(
                "pin bit must be 0..=7, got {bit}"
            )));
        }
        Ok(Self { port, bit })
    }

    /// Infallible constructor for pins known at compile time.
    pub(crate) const fn fixed(port: Port, bit: u8) -> Self {
        Self { port, bit }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn bit(&self) -> u8 {
        self.bit
    }

    /// Switch the pin between analog input and digital I/O.
    pub fn set_analog<T: Transport>(&self, board: &mut Board<T>, analog: bool) -> DriverResult<()> {
        board.sfr_set_bit(self.port.ansel(), self.bit, analog)?;
        Ok(())
    }

    pub fn set_direction<T: Transport>(
        &self,
        board: &mut Board<T>,
        direction: Direction,
    ) -> DriverResult<()> {
        board.sfr_set_bit(self.port.tris(), self.bit, direction.tris_bit())?;
        Ok(())
    }

    /// Make the pin a digital output.
    pub fn configure_output<T: Transport>(&self, board: &mut Board<T>) -> DriverResult<()> {
        self.set_analog(board, false)?;
        self.set_direction(board, Direction::Output)
    }

    /// Make the pin a digital input.
    pub fn configure_input<T: Transport>(&self, board: &mut Board<T>) -> DriverResult<()> {
        self.set_analog(board, false)?;
        self.set_direction(board, Direction::Input)
    }

    pub fn write<T: Transport>(&self, board: &mut Board<T>, high: bool) -> DriverResult<()> {
        board.sfr_set_bit(self.port.lat(), self.bit, high)?;
        Ok(())
    }

    pub fn read<T: Transport>(&self, board: &mut Board<T>) -> DriverResult<bool> {
        Ok(board.sfr_get_bit(self.port.port(), self.bit)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hkusbio_board::{BoardConfig, SimulatedBoard};
    use hkusbio_protocol::Sfr;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_rejects_bad_bit() {
        assert!(matches!(
            SfrPin::new(Port::A, 8),
            Err(DriverError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_output_pin() -> TestResult {
        let sim = SimulatedBoard::new();
        sim.set_sfr(Sfr::AnselA.address(), 0xFF);
        sim.set_sfr(Sfr::TrisA.address(), 0xFF);
        let mut board = Board::new(sim.clone(), BoardConfig::immediate())?;

        let pin = SfrPin::new(Port::A, 6)?;
        pin.configure_output(&mut board)?;
        pin.write(&mut board, true)?;

        assert_eq!(sim.sfr(Sfr::AnselA.address()), 0b1011_1111);
        assert_eq!(sim.sfr(Sfr::TrisA.address()), 0b1011_1111);
        assert_eq!(sim.sfr(Sfr::LatA.address()), 0b0100_0000);
        assert!(pin.read(&mut board)?);
        Ok(())
    }

    #[test]
    fn test_input_pin_reads_port() -> TestResult {
        let sim = SimulatedBoard::new();
        let mut board = Board::new(sim.clone(), BoardConfig::immediate())?;
        let pin = SfrPin::new(Port::B, 0)?;
        pin.configure_input(&mut board)?;
        assert_eq!(sim.sfr(Sfr::TrisB.address()) & 1, 1);

        sim.set_sfr(Sfr::PortB.address(), 0x01);
        assert!(pin.read(&mut board)?);
        Ok(())
    }
}
