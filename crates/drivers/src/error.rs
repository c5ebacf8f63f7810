//! Driver error types.

use hkusbio_board::BoardError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("{chip} not responding: WHOAMI reads {actual:#04x}, expected {expected:#04x}")]
    IdentityMismatch {
        chip: &'static str,
        expected: u8,
        actual: u8,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl DriverError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

pub type DriverResult<T> = Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DriverError::IdentityMismatch {
            chip: "L3GD20",
            expected: 0xD4,
            actual: 0xFF,
        };
        assert_eq!(
            err.to_string(),
            "L3GD20 not responding: WHOAMI reads 0xff, expected 0xd4"
        );

        let err: DriverError = BoardError::Disconnected.into();
        assert_eq!(err.to_string(), "board disconnected");
    }
}
