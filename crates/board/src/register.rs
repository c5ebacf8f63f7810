//! Register-level access to a bus slave.

use hkusbio_protocol::combine_i16;

use crate::error::BoardResult;

/// A device exposing an 8-bit register file, whatever bus it sits on.
pub trait RegisterAccess {
    fn read_register(&mut self, register: u8) -> BoardResult<u8>;

    fn write_register(&mut self, register: u8, value: u8) -> BoardResult<()>;

    /// Read a signed value stored low byte first at `register`, `register + 1`.
    fn read_i16_le(&mut self, register: u8) -> BoardResult<i16> {
        let lsb = self.read_register(register)?;
        let msb = self.read_register(register.wrapping_add(1))?;
        Ok(combine_i16(msb, lsb))
    }

    /// Read a signed value stored high byte first at `register`, `register + 1`.
    fn read_i16_be(&mut self, register: u8) -> BoardResult<i16> {
        let msb = self.read_register(register)?;
        let lsb = self.read_register(register.wrapping_add(1))?;
        Ok(combine_i16(msb, lsb))
    }
}

impl<R: RegisterAccess + ?Sized> RegisterAccess for &mut R {
    fn read_register(&mut self, register: u8) -> BoardResult<u8> {
        (**self).read_register(register)
    }

    fn write_register(&mut self, register: u8, value: u8) -> BoardResult<()> {
        (**self).write_register(register, value)
    }
}

impl<R: RegisterAccess + ?Sized> RegisterAccess for Box<R> {
    fn read_register(&mut self, register: u8) -> BoardResult<u8> {
        (**self).read_register(register)
    }

    fn write_register(&mut self, register: u8, value: u8) -> BoardResult<()> {
        (**self).write_register(register, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bank([u8; 4]);

    impl RegisterAccess for Bank {
        fn read_register(&mut self, register: u8) -> BoardResult<u8> {
            Ok(self.0.get(usize::from(register)).copied().unwrap_or(0))
        }

        fn write_register(&mut self, register: u8, value: u8) -> BoardResult<()> {
            if let Some(slot) = self.0.get_mut(usize::from(register)) {
                *slot = value;
            }
            Ok(())
        }
    }

    #[test]
    fn test_read_i16_orders() -> Result<(), Box<dyn std::error::Error>> {
        let mut bank = Bank([0x01, 0x80, 0xFF, 0xFF]);
        assert_eq!(bank.read_i16_le(0)?, i16::MIN + 1);
        assert_eq!(bank.read_i16_be(0)?, 0x0180);
        assert_eq!(bank.read_i16_le(2)?, -1);
        Ok(())
    }

    #[test]
    fn test_forwarding_through_mut_ref() -> Result<(), Box<dyn std::error::Error>> {
        let mut bank = Bank([0; 4]);
        {
            let mut by_ref: &mut Bank = &mut bank;
            by_ref.write_register(3, 0x42)?;
        }
        assert_eq!(bank.read_register(3)?, 0x42);
        Ok(())
    }
}
